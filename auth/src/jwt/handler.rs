use chrono::Duration;
use jsonwebtoken::encode;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::JwtError;
use super::verifier::JwtVerifier;
use super::ALGORITHM;
use crate::keys::KeyMaterial;

/// JWT token handler for issuing and verifying access tokens.
///
/// Signs with the RSA private key (RS256) and verifies with the matching
/// public key.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    verifier: JwtVerifier,
    token_ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler from a loaded key pair.
    ///
    /// # Arguments
    /// * `keys` - RSA key pair, PEM encoded
    /// * `token_ttl` - Lifetime written into each issued token's `exp`
    ///
    /// # Errors
    /// * `InvalidKey` - Either key is not a PEM RSA key
    pub fn new(keys: &KeyMaterial, token_ttl: Duration) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(keys.private_pem().as_bytes())
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        Ok(Self {
            encoding_key,
            verifier: JwtVerifier::new(keys)?,
            token_ttl,
        })
    }

    /// Issue a token for a subject, stamped with the current time.
    ///
    /// # Arguments
    /// * `subject` - Unique principal identifier
    ///
    /// # Returns
    /// Compact `header.payload.signature` token
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: impl ToString) -> Result<String, JwtError> {
        self.encode(&Claims::for_subject(subject, self.token_ttl))
    }

    /// Sign the given claims.
    ///
    /// Output is deterministic for identical claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(ALGORITHM);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verifier.verify(token)
    }

    /// Verify-only handle for request authentication paths.
    pub fn verifier(&self) -> JwtVerifier {
        self.verifier.clone()
    }
}
