use crate::domain_model::RedirectTarget;
use crate::domain_port::Navigator;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Records every redirect synchronously, for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    redirects: Arc<Mutex<Vec<(RedirectTarget, Duration)>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<(RedirectTarget, Duration)> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn targets(&self) -> Vec<RedirectTarget> {
        self.redirects().into_iter().map(|(target, _)| target).collect()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: RedirectTarget, delay: Duration) {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((target, delay));
    }
}
