use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("System random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("Malformed stored credential: {0}")]
    MalformedCredential(String),
}
