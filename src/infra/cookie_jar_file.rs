use super::credential_store_file::write_replacing;
use crate::domain_port::StoreError;
use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};

/// Cookie jar shared with the reqwest client and kept on disk between runs.
///
/// Session cookies have no expiry and are saved as well; the backend decides when
/// they stop being accepted.
pub struct FileCookieJar {
    path: PathBuf,
    jar: Arc<CookieStoreMutex>,
}

impl FileCookieJar {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cookies = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => CookieStore::default(),
            Ok(bytes) => cookie_store::serde::json::load_all(bytes.as_slice())
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CookieStore::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            jar: Arc::new(CookieStoreMutex::new(cookies)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The jar to hand to [`ReqwestTransport::with_cookie_jar`](super::ReqwestTransport::with_cookie_jar).
    pub fn jar(&self) -> Arc<CookieStoreMutex> {
        self.jar.clone()
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let mut bytes = Vec::new();
        {
            let cookies = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
            cookie_store::serde::json::save_incl_expired_and_nonpersistent(&cookies, &mut bytes)
                .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        }
        write_replacing(&self.path, bytes).await
    }
}
