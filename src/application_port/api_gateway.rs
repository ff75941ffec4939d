use super::*;
use crate::domain_model::*;
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub user_id: Option<UserId>,
    pub mode: AuthMode,
}

#[async_trait::async_trait]
pub trait ApiGateway: Send + Sync {
    /// Issues `request` with the current credentials, recovering once from a 401
    /// through the shared refresh.
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;

    /// Exchanges the stored refresh token (or the refresh cookie) for a new session.
    async fn refresh(&self) -> Result<RefreshOutcome, RefreshError>;

    async fn login(&self, input: LoginInput) -> Result<LoginResult, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(ApiRequest::get(path)).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(ApiRequest::new(Method::DELETE, path)).await
    }

    async fn post(&self, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.request(ApiRequest::post(path).with_body(body)).await
    }

    async fn put(&self, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.request(ApiRequest::new(Method::PUT, path).with_body(body))
            .await
    }

    async fn patch(&self, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.request(ApiRequest::new(Method::PATCH, path).with_body(body))
            .await
    }
}
