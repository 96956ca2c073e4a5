//! The authorization gate and default token extraction.

mod gate;
mod token;

pub use gate::AuthGate;
pub use token::{extract_bearer_token, TOKEN_FIELDS, TOKEN_HEADERS};
