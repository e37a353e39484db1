use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading signing key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Key file {path} could not be read: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key material is invalid: {0}")]
    Invalid(String),
}
