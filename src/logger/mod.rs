//! Tracing setup with a filter that can be swapped once settings are loaded.
//! Output goes to stderr so command output on stdout stays clean.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
