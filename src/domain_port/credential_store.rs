use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store: {0}")]
    Corrupt(String),
}

/// Client-side key-value store holding the session under fixed keys.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(non_empty(self.get(ACCESS_TOKEN_KEY).await?).map(AccessToken))
    }

    async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(non_empty(self.get(REFRESH_TOKEN_KEY).await?).map(RefreshToken))
    }

    async fn user_id(&self) -> Result<Option<UserId>, StoreError> {
        Ok(non_empty(self.get(USER_ID_KEY).await?).map(UserId))
    }

    async fn auth_mode(&self) -> Result<AuthMode, StoreError> {
        Ok(AuthMode::from_access_token(self.access_token().await?))
    }

    /// True if any token or the auth-state marker is stored.
    async fn has_session_indicators(&self) -> Result<bool, StoreError> {
        if self.access_token().await?.is_some() || self.refresh_token().await?.is_some() {
            return Ok(true);
        }
        Ok(self.get(AUTH_STATE_KEY).await?.as_deref() == Some("true"))
    }

    async fn save_credentials(&self, credentials: &SessionCredentials) -> Result<(), StoreError> {
        self.set(ACCESS_TOKEN_KEY, credentials.access.as_str()).await?;
        self.set(REFRESH_TOKEN_KEY, credentials.refresh.as_str()).await?;
        if let Some(user_id) = &credentials.user_id {
            self.set(USER_ID_KEY, &user_id.0).await?;
        }
        Ok(())
    }

    async fn mark_cookie_session(&self, user_id: Option<&UserId>) -> Result<(), StoreError> {
        self.set(AUTH_STATE_KEY, "true").await?;
        if let Some(user_id) = user_id {
            self.set(USER_ID_KEY, &user_id.0).await?;
        }
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        for key in SESSION_KEYS {
            self.remove(key).await?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
