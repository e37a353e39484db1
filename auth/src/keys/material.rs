use std::fmt;
use std::fs;
use std::path::Path;

use super::errors::KeyError;

/// RSA key pair used to sign and verify tokens.
///
/// Loaded once at start-up and shared read-only afterwards. The private half
/// is only reachable from inside this crate, where tokens are signed.
#[derive(Clone)]
pub struct KeyMaterial {
    private_pem: String,
    public_pem: String,
}

impl KeyMaterial {
    /// Read a PEM-encoded key pair from disk.
    ///
    /// # Arguments
    /// * `private_key_path` - File holding the PEM private key
    /// * `public_key_path` - File holding the PEM public key
    ///
    /// # Errors
    /// * `Missing` - A file does not exist or cannot be read
    /// * `Invalid` - A file does not contain a PEM block
    pub fn load(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let private_pem = read_pem(private_key_path.as_ref())?;
        let public_pem = read_pem(public_key_path.as_ref())?;
        Self::from_pem(private_pem, public_pem)
    }

    /// Build key material from PEM text already in memory.
    ///
    /// # Errors
    /// * `Invalid` - Either text is not a PEM block
    pub fn from_pem(
        private_pem: impl Into<String>,
        public_pem: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let private_pem = private_pem.into();
        let public_pem = public_pem.into();

        ensure_pem(&private_pem, "private key")?;
        ensure_pem(&public_pem, "public key")?;

        Ok(Self {
            private_pem,
            public_pem,
        })
    }

    /// PEM text of the verification key.
    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }

    pub(crate) fn private_pem(&self) -> &str {
        &self.private_pem
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_pem", &"<redacted>")
            .field("public_pem", &self.public_pem)
            .finish()
    }
}

fn read_pem(path: &Path) -> Result<String, KeyError> {
    fs::read_to_string(path).map_err(|source| KeyError::Missing {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_pem(pem: &str, what: &str) -> Result<(), KeyError> {
    let trimmed = pem.trim();
    if trimmed.starts_with("-----BEGIN ") && trimmed.ends_with("-----") {
        Ok(())
    } else {
        Err(KeyError::Invalid(format!("{what} is not PEM encoded")))
    }
}
