use crate::domain_port::{StoreError, TransportError};
use reqwest::StatusCode;

/// Status used by the backend for an expired server-side session.
pub const SESSION_EXPIRED: u16 = 419;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized: {body}")]
    Unauthorized { body: String },
    #[error("forbidden: {body}")]
    Forbidden { body: String },
    #[error("session expired")]
    SessionExpired { body: String },
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("network error: {0}")]
    Network(#[from] TransportError),
    #[error("unexpected status {status}: {body}")]
    Unclassified { status: u16, body: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Maps a non-success status to its error kind; `None` for 1xx-3xx.
    pub fn from_status(status: StatusCode, body: String) -> Option<Self> {
        let code = status.as_u16();
        let error = match code {
            100..=399 => return None,
            401 => ApiError::Unauthorized { body },
            403 => ApiError::Forbidden { body },
            SESSION_EXPIRED => ApiError::SessionExpired { body },
            500..=599 => ApiError::ServerError { status: code, body },
            _ => ApiError::Unclassified { status: code, body },
        };
        Some(error)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::SessionExpired { .. } => Some(SESSION_EXPIRED),
            ApiError::ServerError { status, .. } | ApiError::Unclassified { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("no refresh token stored")]
    NoRefreshToken,
    #[error("refresh rejected with status {status}")]
    Rejected { status: u16 },
    #[error("refresh transport error: {0}")]
    Network(#[from] TransportError),
    #[error("invalid refresh response: {0}")]
    InvalidResponse(String),
    #[error("refresh succeeded without renewing the session cookie")]
    CookieNotRenewed,
    #[error("the shared refresh failed")]
    SharedRefreshFailed,
    #[error("invalid refresh endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
