use super::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use bytes::Bytes;
use nanoid::nanoid;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, error, info, info_span, warn};
use url::Url;

pub const API_VERSION_PREFIX: &str = "/v1";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub timeout: Duration,
    /// Delay before the login redirect after a session is terminated.
    pub redirect_delay: Duration,
    /// Require a `Set-Cookie` header on a successful cookie-mode refresh.
    pub verify_cookie_refresh: bool,
}

impl GatewayConfig {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout: Duration::from_secs(10),
            redirect_delay: Duration::from_millis(1500),
            verify_cookie_refresh: false,
        })
    }

    /// `{base_url}/v1{path}`.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}{}/{}", base, API_VERSION_PREFIX, path))
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    h_a: String,
    h_aa: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    h_a: Option<String>,
    h_aa: Option<String>,
    #[serde(alias = "userId", alias = "id")]
    user_id: Option<String>,
}

/// HTTP client for the platform backend.
///
/// Attaches credentials per request, classifies failures, and recovers from a 401
/// through one shared refresh. All refresh state lives in this instance; share it
/// behind an `Arc` to share the single-flight guarantee.
pub struct GatewayClient {
    config: GatewayConfig,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    gate: RefreshGate,
}

impl GatewayClient {
    pub fn new(
        config: GatewayConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            navigator,
            gate: RefreshGate::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn refresh_in_flight(&self) -> bool {
        self.gate.is_in_flight()
    }

    fn build(&self, request: &ApiRequest, mode: &AuthMode) -> Result<OutgoingRequest, ApiError> {
        let url = self
            .config
            .endpoint(&request.path)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", request.path, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

        let body = match &request.body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => Some(Bytes::from(
                serde_json::to_vec(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?,
            )),
            RequestBody::Raw {
                bytes,
                content_type,
            } => {
                let content_type = HeaderValue::from_str(content_type)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                headers.insert(CONTENT_TYPE, content_type);
                Some(bytes.clone())
            }
        };

        for (name, value) in request.options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        // The auth mode alone decides the Authorization header.
        match mode.bearer() {
            Some(bearer) => {
                let value = HeaderValue::from_str(&bearer)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
            None => {
                headers.remove(AUTHORIZATION);
            }
        }

        Ok(OutgoingRequest {
            method: request.method.clone(),
            url,
            headers,
            body,
            timeout: request.options.timeout.unwrap_or(self.config.timeout),
            include_credentials: true,
        })
    }

    /// One round trip, no recovery.
    async fn send(&self, request: &ApiRequest, mode: &AuthMode) -> Result<ApiResponse, ApiError> {
        let outgoing = self.build(request, mode)?;
        let response = self.transport.send(outgoing).await?;
        let TransportResponse {
            status,
            headers,
            body,
        } = response;

        match ApiError::from_status(status, String::from_utf8_lossy(&body).into_owned()) {
            None => Ok(ApiResponse {
                status,
                headers,
                body,
            }),
            Some(error) => Err(error),
        }
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mode = self.store.auth_mode().await?;
        debug!(mode = mode.name(), retried = request.retried, "sending");

        let result = self.send(&request, &mode).await;
        match result {
            Ok(response) => Ok(response),
            Err(error) if error.is_unauthorized() => self.recover(request, error).await,
            Err(error) => Err(self.on_failure(error).await),
        }
    }

    async fn recover(&self, request: ApiRequest, error: ApiError) -> Result<ApiResponse, ApiError> {
        if request.retried {
            warn!("unauthorized after retry");
            self.terminate_session("unauthorized after retry").await;
            return Err(error);
        }

        let has_session = match self.store.has_session_indicators().await {
            Ok(has_session) => has_session,
            Err(e) => {
                warn!("failed to read session indicators: {}", e);
                false
            }
        };
        if !has_session {
            self.terminate_session("unauthorized without a session").await;
            return Err(error);
        }

        if let Err(e) = self.shared_refresh().await {
            debug!("refresh did not recover the request: {}", e);
            return Err(error);
        }
        self.replay(request.into_retry()).await
    }

    /// Credentials are read from the store when the replay is sent, not taken from
    /// the refresh outcome: a later refresh may already have rotated them.
    async fn replay(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mode = self.store.auth_mode().await?;
        debug!(mode = mode.name(), "replaying after refresh");
        let result = self.send(&request, &mode).await;
        match result {
            Ok(response) => Ok(response),
            Err(error) if error.is_unauthorized() => {
                warn!("unauthorized after retry");
                self.terminate_session("unauthorized after retry").await;
                Err(error)
            }
            Err(error) => Err(self.on_failure(error).await),
        }
    }

    /// Runs the refresh as leader, or waits for the one already in flight.
    /// A failed refresh terminates the session exactly once, on the leader.
    async fn shared_refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        match self.gate.admit() {
            Admission::Leader(guard) => {
                info!("refreshing session");
                match self.refresh_once().await {
                    Ok(outcome) => {
                        let woken = guard.settle(Some(outcome.clone()));
                        info!(woken, "session refreshed");
                        Ok(outcome)
                    }
                    Err(e) => {
                        let woken = guard.settle(None);
                        error!(woken, "session refresh failed: {}", e);
                        self.terminate_session("refresh failed").await;
                        Err(e)
                    }
                }
            }
            Admission::Follower(rx) => {
                debug!("refresh in flight, queued");
                match rx.await {
                    Ok(Some(outcome)) => Ok(outcome),
                    _ => Err(RefreshError::SharedRefreshFailed),
                }
            }
        }
    }

    async fn refresh_once(&self) -> Result<RefreshOutcome, RefreshError> {
        let url = self.config.endpoint(REFRESH_PATH)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

        let mode = self.store.auth_mode().await?;
        let body = match mode {
            AuthMode::Token(_) => {
                let refresh = self
                    .store
                    .refresh_token()
                    .await?
                    .ok_or(RefreshError::NoRefreshToken)?;
                let body = serde_json::to_vec(&RefreshRequest {
                    token: refresh.as_str(),
                })
                .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;
                Some(Bytes::from(body))
            }
            AuthMode::Cookie => None,
        };

        let response = self
            .transport
            .send(OutgoingRequest {
                method: Method::POST,
                url,
                headers,
                body,
                timeout: self.config.timeout,
                include_credentials: true,
            })
            .await?;

        if !response.status.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status.as_u16(),
            });
        }

        match mode {
            AuthMode::Token(_) => {
                let tokens: RefreshResponse = serde_json::from_slice(&response.body)
                    .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;
                let access = AccessToken(tokens.h_a);
                self.store.set(ACCESS_TOKEN_KEY, access.as_str()).await?;
                if let Some(refresh) = tokens.h_aa {
                    self.store.set(REFRESH_TOKEN_KEY, &refresh).await?;
                }
                Ok(RefreshOutcome::Token(access))
            }
            AuthMode::Cookie => {
                if self.config.verify_cookie_refresh && !response.headers.contains_key(SET_COOKIE)
                {
                    return Err(RefreshError::CookieNotRenewed);
                }
                Ok(RefreshOutcome::CookieSession)
            }
        }
    }

    /// Side effects for failures the gateway does not recover from.
    async fn on_failure(&self, error: ApiError) -> ApiError {
        match &error {
            ApiError::Forbidden { .. } => {
                warn!("forbidden");
                self.navigator
                    .redirect(RedirectTarget::Unauthorized, Duration::ZERO);
            }
            ApiError::SessionExpired { .. } => {
                self.terminate_session("session expired").await;
            }
            ApiError::ServerError { status, .. } => error!(status, "server error"),
            ApiError::Network(e) => error!("network error: {}", e),
            other => debug!("request failed: {}", other),
        }
        error
    }

    async fn terminate_session(&self, reason: &str) {
        info!(reason, "terminating session");
        if let Err(e) = self.store.clear_session().await {
            error!("failed to clear credentials: {}", e);
        }
        self.navigator
            .redirect(RedirectTarget::Login, self.config.redirect_delay);
    }
}

#[async_trait::async_trait]
impl ApiGateway for GatewayClient {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let span = info_span!(
            "api",
            id = %nanoid!(8),
            method = %request.method,
            path = %request.path,
        );
        self.execute(request).instrument(span).await
    }

    async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        self.shared_refresh()
            .instrument(info_span!("refresh", id = %nanoid!(8)))
            .await
    }

    async fn login(&self, input: LoginInput) -> Result<LoginResult, ApiError> {
        let request = ApiRequest::post(LOGIN_PATH).with_body(RequestBody::json(&input)?);
        let response = self
            .send(&request, &AuthMode::Cookie)
            .instrument(info_span!("login"))
            .await?;
        // A cookie-mode backend may answer with no body at all.
        let login: LoginResponse = if response.body.iter().all(u8::is_ascii_whitespace) {
            LoginResponse::default()
        } else {
            response.json()?
        };

        self.store.clear_session().await?;
        let user_id = login.user_id.map(UserId);
        let mode = match (login.h_a, login.h_aa) {
            (Some(access), Some(refresh)) => {
                let credentials = SessionCredentials {
                    access: AccessToken(access),
                    refresh: RefreshToken(refresh),
                    user_id: user_id.clone(),
                };
                self.store.save_credentials(&credentials).await?;
                AuthMode::Token(credentials.access)
            }
            _ => {
                self.store.mark_cookie_session(user_id.as_ref()).await?;
                AuthMode::Cookie
            }
        };
        info!(mode = mode.name(), "logged in");

        Ok(LoginResult { user_id, mode })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let mode = self.store.auth_mode().await?;
        if let Err(e) = self.send(&ApiRequest::post(LOGOUT_PATH), &mode).await {
            warn!("logout request failed: {}", e);
        }
        self.store.clear_session().await?;
        info!("logged out");
        self.navigator.redirect(RedirectTarget::Login, Duration::ZERO);
        Ok(())
    }
}
