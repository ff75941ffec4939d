//! Layered settings: built-in defaults, then the TOML file, then `DONORLINK_*`
//! environment variables.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
