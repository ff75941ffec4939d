use crate::domain_port::*;
use cookie_store::CookieStore;
use reqwest::Client;
use reqwest_cookie_store::CookieStoreMutex;
use std::sync::Arc;

/// reqwest-backed transport.
///
/// Requests that include credentials go through a client sharing one cookie jar;
/// the others go through a client without cookies.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    anonymous: Client,
}

impl ReqwestTransport {
    /// Transport with a fresh in-memory jar.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_cookie_jar(Arc::new(CookieStoreMutex::new(CookieStore::default())))
    }

    pub fn with_cookie_jar(jar: Arc<CookieStoreMutex>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .cookie_provider(jar)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        let anonymous = Client::builder()
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client, anonymous })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<TransportResponse, TransportError> {
        let OutgoingRequest {
            method,
            url,
            headers,
            body,
            timeout,
            include_credentials,
        } = request;

        let client = if include_credentials {
            &self.client
        } else {
            &self.anonymous
        };
        let mut builder = client.request(method, url).headers(headers).timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
