#![allow(dead_code)]

use donorlink::application_impl::*;
use donorlink::domain_port::*;
use donorlink::infra::*;
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "http://api.test";
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub struct Harness {
    pub client: Arc<GatewayClient>,
    pub transport: FakeTransport,
    pub store: Arc<MemoryCredentialStore>,
    pub navigator: RecordingNavigator,
}

pub fn config() -> GatewayConfig {
    let mut config = GatewayConfig::new(BASE_URL).expect("valid base url");
    config.redirect_delay = REDIRECT_DELAY;
    config
}

pub fn harness(transport: FakeTransport, entries: &[(&str, &str)]) -> Harness {
    harness_with_config(config(), transport, entries)
}

pub fn harness_with_config(
    config: GatewayConfig,
    transport: FakeTransport,
    entries: &[(&str, &str)],
) -> Harness {
    let store = Arc::new(MemoryCredentialStore::with_entries(entries.iter().copied()));
    harness_with_store(config, transport, store)
}

/// For backends that need to see or change the session mid-request.
pub fn harness_with_store(
    config: GatewayConfig,
    transport: FakeTransport,
    store: Arc<MemoryCredentialStore>,
) -> Harness {
    let navigator = RecordingNavigator::new();
    let client = Arc::new(GatewayClient::new(
        config,
        Arc::new(transport.clone()),
        store.clone(),
        Arc::new(navigator.clone()),
    ));
    Harness {
        client,
        transport,
        store,
        navigator,
    }
}

pub fn bearer(request: &OutgoingRequest) -> Option<String> {
    request.header("authorization").map(str::to_string)
}

pub fn body_json(request: &OutgoingRequest) -> Option<serde_json::Value> {
    request
        .body
        .as_ref()
        .and_then(|b| serde_json::from_slice(b).ok())
}
