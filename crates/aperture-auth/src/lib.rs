pub mod password;
pub mod tokens;

use thiserror::Error;

pub use tokens::{AuthService, Claims, SCOPE_ACCESS, SCOPE_REFRESH};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token scope mismatch: expected {expected}, got {actual}")]
    Scope {
        expected: &'static str,
        actual: String,
    },
}
