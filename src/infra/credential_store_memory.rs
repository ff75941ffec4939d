use crate::domain_port::*;
use dashmap::DashMap;

/// Process-lifetime store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: DashMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::*;

    #[tokio::test]
    async fn session_indicators() {
        let store = MemoryCredentialStore::new();
        assert!(!store.has_session_indicators().await.unwrap());

        store.set(AUTH_STATE_KEY, "false").await.unwrap();
        assert!(!store.has_session_indicators().await.unwrap());

        store.set(AUTH_STATE_KEY, "true").await.unwrap();
        assert!(store.has_session_indicators().await.unwrap());

        let store = MemoryCredentialStore::with_entries([(REFRESH_TOKEN_KEY, "r1")]);
        assert!(store.has_session_indicators().await.unwrap());
    }

    #[tokio::test]
    async fn empty_access_token_means_cookie_mode() {
        let store = MemoryCredentialStore::with_entries([(ACCESS_TOKEN_KEY, "")]);
        assert_eq!(store.auth_mode().await.unwrap(), AuthMode::Cookie);
    }

    #[tokio::test]
    async fn save_and_clear_session() {
        let store = MemoryCredentialStore::with_entries([("theme", "dark")]);
        store
            .save_credentials(&SessionCredentials {
                access: AccessToken("tokA".into()),
                refresh: RefreshToken("tokR".into()),
                user_id: Some(UserId("42".into())),
            })
            .await
            .unwrap();

        assert_eq!(
            store.auth_mode().await.unwrap(),
            AuthMode::Token(AccessToken("tokA".into()))
        );
        assert_eq!(store.user_id().await.unwrap(), Some(UserId("42".into())));

        store.clear_session().await.unwrap();
        for key in SESSION_KEYS {
            assert_eq!(store.get(key).await.unwrap(), None);
        }
        // Unrelated keys survive.
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
    }
}
