//! Fixed keys of the client-side credential store.

pub const ACCESS_TOKEN_KEY: &str = "h_a";
pub const REFRESH_TOKEN_KEY: &str = "h_aa";
pub const USER_ID_KEY: &str = "h_u";
/// Set to `"true"` after a cookie-mode login, where no token is visible to the client.
pub const AUTH_STATE_KEY: &str = "h_s";

pub const SESSION_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_ID_KEY,
    AUTH_STATE_KEY,
];
