use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::ALGORITHM;
use crate::keys::KeyMaterial;

/// Verify-only half of the token handler.
///
/// Holds the public key alone, so request-authentication paths never see the
/// private key. The accepted algorithm is pinned to RS256 regardless of what
/// a token's header declares.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier from the public half of the key material.
    ///
    /// # Errors
    /// * `InvalidKey` - Public key is not a PEM RSA key
    pub fn new(keys: &KeyMaterial) -> Result<Self, JwtError> {
        Self::from_public_pem(keys.public_pem())
    }

    /// Create a verifier from PEM text of an RSA public key.
    ///
    /// # Errors
    /// * `InvalidKey` - Text is not a PEM RSA public key
    pub fn from_public_pem(public_pem: &str) -> Result<Self, JwtError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        let mut validation = Validation::new(ALGORITHM);
        validation.set_required_spec_claims(&["exp", "sub"]);
        // A token is expired the second after its `exp`, with no grace period.
        validation.leeway = 0;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify a token's structure, signature and expiry, and decode its claims.
    ///
    /// # Arguments
    /// * `token` - Compact `header.payload.signature` token
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `MalformedToken` - Not three base64url JSON segments, or claims missing
    /// * `InvalidSignature` - Signature does not verify under RS256 and the public key
    /// * `TokenExpired` - The `exp` claim has passed
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        check_structure(token)?;

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

fn check_structure(token: &str) -> Result<(), JwtError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    if signature.is_empty() {
        return Err(JwtError::MalformedToken("missing signature".to_string()));
    }

    check_json_segment(header, "header")?;
    check_json_segment(payload, "payload")
}

fn check_json_segment(segment: &str, name: &str) -> Result<(), JwtError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| JwtError::MalformedToken(format!("{name} is not base64url")))?;

    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(serde_json::Value::Object(_)) => Ok(()),
        _ => Err(JwtError::MalformedToken(format!("{name} is not a JSON object"))),
    }
}

// Header and payload were already checked, so a base64 failure here can only
// come from the signature segment.
fn classify(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::Base64(_)
        | ErrorKind::Crypto(_) => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::MalformedToken(err.to_string()),
    }
}
