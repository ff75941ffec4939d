use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Used until settings are loaded.
const BOOTSTRAP_FILTER: &str = "info";

pub struct LogConfig {
    pub filter: String,
}

/// Handle on the global subscriber; only its filter changes after install.
pub struct Logger {
    filter: reload::Handle<EnvFilter, Registry>,
    // Set when RUST_LOG was given; it then outranks `log.filter`.
    from_env: bool,
}

impl Logger {
    pub fn new_bootstrap() -> Self {
        let env_filter = EnvFilter::try_from_default_env().ok();
        let from_env = env_filter.is_some();
        let (filter, handle) =
            reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(BOOTSTRAP_FILTER)));

        let output = fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .init();

        Self {
            filter: handle,
            from_env,
        }
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        if self.from_env {
            tracing::debug!(ignored = %config.filter, "RUST_LOG set, keeping it");
            return Ok(());
        }
        let filter = parse_filter(&config.filter)?;
        self.filter
            .reload(filter)
            .context("failed to swap log filter")?;
        Ok(())
    }
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("invalid log.filter {:?}", directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filters_parse() {
        assert!(parse_filter("donorlink=debug,info").is_ok());
        assert!(parse_filter("warn").is_ok());
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(parse_filter("donorlink=loud").is_err());
    }
}
