// store

mod cookie_jar_file;
mod credential_store_file;
mod credential_store_memory;

pub use cookie_jar_file::*;
pub use credential_store_file::*;
pub use credential_store_memory::*;

// transport

mod transport_fake;
mod transport_reqwest;

pub use transport_fake::*;
pub use transport_reqwest::*;

// navigation

mod navigator_log;
mod navigator_recording;

pub use navigator_log::*;
pub use navigator_recording::*;
