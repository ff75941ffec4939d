use crate::domain_model::RedirectTarget;
use std::time::Duration;

/// Full-page navigation. Implementations must not block the caller for `delay`.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: RedirectTarget, delay: Duration);
}
