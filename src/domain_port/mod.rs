mod credential_store;
mod http_transport;
mod navigator;

pub use credential_store::*;
pub use http_transport::*;
pub use navigator::*;
