mod gateway_client;
mod refresh_gate;

pub use gateway_client::*;
pub use refresh_gate::*;
