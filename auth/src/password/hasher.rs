use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha512;

use super::errors::PasswordError;

/// Salt length in bytes (hex-encoded to 64 characters).
pub const SALT_LENGTH: usize = 32;

/// Derived key length in bytes (hex-encoded to 128 characters).
pub const HASH_LENGTH: usize = 64;

/// PBKDF2 work factor. Changing it invalidates every stored credential.
pub const HASH_ITERATIONS: u32 = 10_000;

/// Stored proof of a password: random salt and derived hash, both lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    pub salt: String,
    pub hash: String,
}

impl PasswordCredential {
    /// Rebuild a credential from its stored parts.
    pub fn new(hash: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            hash: hash.into(),
        }
    }
}

/// Password hashing implementation.
///
/// PBKDF2-HMAC-SHA512 with a per-credential random salt.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password under a freshly generated salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// New credential; two calls with the same password yield different salts
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The operating system RNG could not be read
    pub fn hash(&self, password: &str) -> Result<PasswordCredential, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::RandomSourceUnavailable(e.to_string()))?;

        let salt = hex::encode(salt_bytes);
        let hash = hex::encode(derive(password, &salt));

        Ok(PasswordCredential { salt, hash })
    }

    /// Verify a password against a stored hash and salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Hex-encoded derived key
    /// * `stored_salt` - Hex-encoded salt the hash was derived with
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedCredential` - Stored hash or salt is not hex of the expected width
    pub fn verify(
        &self,
        password: &str,
        stored_hash: &str,
        stored_salt: &str,
    ) -> Result<bool, PasswordError> {
        let expected = decode_fixed(stored_hash, HASH_LENGTH, "hash")?;
        decode_fixed(stored_salt, SALT_LENGTH, "salt")?;

        // Salts are fed to the KDF as their hex text, which is how existing
        // credentials were derived.
        let derived = derive(password, stored_salt);

        Ok(constant_time_eq(&derived, &expected))
    }

    /// Verify a password against a stored credential record.
    pub fn verify_credential(
        &self,
        password: &str,
        credential: &PasswordCredential,
    ) -> Result<bool, PasswordError> {
        self.verify(password, &credential.hash, &credential.salt)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn derive(password: &str, salt: &str) -> [u8; HASH_LENGTH] {
    let mut output = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), HASH_ITERATIONS, &mut output);
    output
}

fn decode_fixed(value: &str, length: usize, field: &str) -> Result<Vec<u8>, PasswordError> {
    let bytes = hex::decode(value)
        .map_err(|e| PasswordError::MalformedCredential(format!("{field}: {e}")))?;

    if bytes.len() != length {
        return Err(PasswordError::MalformedCredential(format!(
            "{field}: expected {length} bytes, got {}",
            bytes.len()
        )));
    }

    Ok(bytes)
}

/// Compare two byte slices without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_SALT: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";
    const KNOWN_HASH: &str = "e48c15c54c762b69b914b8505aea172272554d743c23cf6358de0a259494bfe7\
                              df78e4dda3ee923ebf1223e8833429a414d682969085f06a4f34e82ef3e03862";

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();

        let credential = hasher.hash("correct horse").expect("Failed to hash password");

        assert!(hasher
            .verify("correct horse", &credential.hash, &credential.salt)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong horse", &credential.hash, &credential.salt)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_has_fixed_width_hex() {
        let credential = PasswordHasher::new().hash("pass_word!").unwrap();

        assert_eq!(credential.salt.len(), SALT_LENGTH * 2);
        assert_eq!(credential.hash.len(), HASH_LENGTH * 2);
        assert!(credential.salt.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(credential.hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_different_passwords_get_distinct_hashes() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("password one").unwrap();
        let second = hasher.hash("password two").unwrap();

        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn test_known_vector() {
        let hasher = PasswordHasher::new();

        assert!(hasher
            .verify("correct horse", KNOWN_HASH, KNOWN_SALT)
            .unwrap());
        assert!(!hasher.verify("correct horse!", KNOWN_HASH, KNOWN_SALT).unwrap());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        assert_eq!(
            derive("correct horse", KNOWN_SALT),
            derive("correct horse", KNOWN_SALT)
        );
        assert_eq!(hex::encode(derive("correct horse", KNOWN_SALT)), KNOWN_HASH);
    }

    #[test]
    fn test_verify_credential_record() {
        let hasher = PasswordHasher::new();
        let credential = PasswordCredential::new(KNOWN_HASH, KNOWN_SALT);

        assert!(hasher.verify_credential("correct horse", &credential).unwrap());
    }

    #[test]
    fn test_verify_rejects_non_hex_hash() {
        let result = PasswordHasher::new().verify("password", "not-hex", KNOWN_SALT);
        assert!(matches!(result, Err(PasswordError::MalformedCredential(_))));
    }

    #[test]
    fn test_verify_rejects_short_salt() {
        let result = PasswordHasher::new().verify("password", KNOWN_HASH, "abcd");
        assert!(matches!(result, Err(PasswordError::MalformedCredential(_))));
    }

    #[test]
    fn test_verify_rejects_truncated_hash() {
        let result = PasswordHasher::new().verify("correct horse", &KNOWN_HASH[..64], KNOWN_SALT);
        assert!(matches!(result, Err(PasswordError::MalformedCredential(_))));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
