mod auth_mode;
mod keys;
mod redirect;
mod token;

pub use auth_mode::*;
pub use keys::*;
pub use redirect::*;
pub use token::*;
