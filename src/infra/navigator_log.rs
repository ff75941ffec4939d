use crate::domain_model::RedirectTarget;
use crate::domain_port::Navigator;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Navigator for headless use. There is no page to leave, so the redirect is logged
/// at once with its delay and remembered for the caller to act on.
#[derive(Debug, Clone, Default)]
pub struct LogNavigator {
    last: Arc<Mutex<Option<RedirectTarget>>>,
}

impl LogNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_redirect(&self) -> Option<RedirectTarget> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for LogNavigator {
    fn redirect(&self, target: RedirectTarget, delay: Duration) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(target);
        tracing::warn!(to = %target, delay_ms = delay.as_millis() as u64, "redirect");
    }
}
