use crate::application_impl::GatewayConfig;
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Plain variable honoured for the backend location, as the web frontend does.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub session: Session,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: u64,
    pub verify_cookie_refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub redirect_delay_ms: u64,
    pub store: String, // "memory" or "file"
    pub store_path: String,
    /// Cookie jar kept next to a "file" store.
    pub cookie_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

impl Settings {
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig::new(&self.api.base_url)
            .map_err(|e| anyhow!("invalid api.base_url {:?}: {}", self.api.base_url, e))?;
        config.timeout = Duration::from_secs(self.api.timeout_secs);
        config.redirect_delay = Duration::from_millis(self.session.redirect_delay_ms);
        config.verify_cookie_refresh = self.api.verify_cookie_refresh;
        Ok(config)
    }
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// An explicit `path` must exist; the default file is optional.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let file = match path {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(SETTINGS_PATH).required(false),
    };

    let settings: Settings = Config::builder()
        .set_default("api.base_url", base_url)?
        .set_default("api.timeout_secs", 10)?
        .set_default("api.verify_cookie_refresh", false)?
        .set_default("session.redirect_delay_ms", 1500)?
        .set_default("session.store", "file")?
        .set_default("session.store_path", ".donorlink/session.json")?
        .set_default("session.cookie_path", ".donorlink/cookies.json")?
        .set_default("log.filter", "info")?
        .add_source(file)
        .add_source(
            Environment::with_prefix("DONORLINK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://donors.example.org"
verify_cookie_refresh = true

[session]
store = "memory"
"#,
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert_eq!(settings.api.base_url, "https://donors.example.org");
        assert_eq!(settings.api.timeout_secs, 10);
        assert_eq!(settings.session.store, "memory");
        assert_eq!(settings.session.cookie_path, ".donorlink/cookies.json");
        assert_eq!(settings.log.filter, "info");

        let config = settings.gateway_config().unwrap();
        assert!(config.verify_cookie_refresh);
        assert_eq!(config.redirect_delay, Duration::from_millis(1500));
        assert_eq!(
            config.endpoint("/cases").unwrap().as_str(),
            "https://donors.example.org/v1/cases"
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let settings = Settings {
            api: Api {
                base_url: "not a url".to_string(),
                timeout_secs: 1,
                verify_cookie_refresh: false,
            },
            session: Session {
                redirect_delay_ms: 0,
                store: "memory".to_string(),
                store_path: String::new(),
                cookie_path: String::new(),
            },
            log: Log {
                filter: "info".to_string(),
            },
        };
        assert!(settings.gateway_config().is_err());
    }
}
