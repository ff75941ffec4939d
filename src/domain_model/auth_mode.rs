use super::AccessToken;

/// How a single request authenticates. Resolved from the credential store
/// at request time and never mixed within one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Bearer header plus cookies (mobile and testing clients).
    Token(AccessToken),
    /// Cookies only (browser sessions with httpOnly cookies).
    Cookie,
}

impl AuthMode {
    pub fn from_access_token(token: Option<AccessToken>) -> Self {
        match token {
            Some(token) => AuthMode::Token(token),
            None => AuthMode::Cookie,
        }
    }

    pub fn bearer(&self) -> Option<String> {
        match self {
            AuthMode::Token(token) => Some(token.bearer()),
            AuthMode::Cookie => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthMode::Token(_) => "token",
            AuthMode::Cookie => "cookie",
        }
    }
}

/// Result of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Token(AccessToken),
    /// The server renewed the cookie session; there is no token to propagate.
    CookieSession,
}

impl RefreshOutcome {
    pub fn auth_mode(&self) -> AuthMode {
        match self {
            RefreshOutcome::Token(token) => AuthMode::Token(token.clone()),
            RefreshOutcome::CookieSession => AuthMode::Cookie,
        }
    }
}
