mod api_error;
mod api_gateway;
mod api_request;

pub use api_error::*;
pub use api_gateway::*;
pub use api_request::*;
