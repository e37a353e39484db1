use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::JwtVerifier;
use crate::keys::KeyMaterial;
use crate::password::PasswordCredential;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Registration uses the hasher only, login uses the hasher then the token
/// handler, and authenticated requests use the verifier only.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

/// Outcome of authenticating one request from its (optional) token.
///
/// Every state other than `Authenticated` is terminal and maps to a 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationState {
    NoToken,
    Malformed,
    InvalidSignature,
    Expired,
    Authenticated(Claims),
}

impl AuthenticationState {
    /// Run the per-request state machine.
    ///
    /// # Arguments
    /// * `verifier` - Verify-only token handler
    /// * `token` - Token found in the request, if any
    pub fn from_request_token(verifier: &JwtVerifier, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::NoToken;
        };

        match verifier.verify(token) {
            Ok(claims) => Self::Authenticated(claims),
            Err(JwtError::TokenExpired) => Self::Expired,
            Err(JwtError::InvalidSignature) => Self::InvalidSignature,
            Err(_) => Self::Malformed,
        }
    }

    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoToken => "no_token",
            Self::Malformed => "malformed",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `keys` - RSA key pair for signing and verifying tokens
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `JwtError::InvalidKey` - Key material does not hold a usable RSA key pair
    pub fn new(keys: &KeyMaterial, token_ttl: Duration) -> Result<Self, JwtError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(keys, token_ttl)?,
        })
    }

    /// Derive a new credential for a password.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - No entropy for the salt
    pub fn register_credential(&self, password: &str) -> Result<PasswordCredential, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `credential` - Stored salt and hash
    /// * `subject` - Principal identifier written into the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored credential is malformed; callers treat it as a mismatch
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        credential: &PasswordCredential,
        subject: impl ToString,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self
            .password_hasher
            .verify_credential(password, credential)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Generate JWT token without password verification.
    ///
    /// Used right after registration, when the password was just supplied.
    pub fn issue_token(&self, subject: impl ToString) -> Result<String, JwtError> {
        self.jwt_handler.issue(subject)
    }

    /// Validate and decode JWT token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// Verify-only handle that carries no private key.
    pub fn verifier(&self) -> JwtVerifier {
        self.jwt_handler.verifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn authenticator() -> Authenticator {
        Authenticator::new(&testutil::primary_keys(), Duration::hours(24))
            .expect("Failed to build authenticator")
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let credential = authenticator
            .register_credential("correct horse")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("correct horse", &credential, "user-42")
            .expect("Authentication failed");

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, "user-42");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let credential = authenticator.register_credential("correct horse").unwrap();

        let result = authenticator.authenticate("wrong horse", &credential, "user-42");

        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_malformed_credential() {
        let authenticator = authenticator();
        let credential = PasswordCredential::new("zz", "not-a-salt");

        let result = authenticator.authenticate("correct horse", &credential, "user-42");

        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::MalformedCredential(_)
            ))
        ));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = authenticator();

        let token = authenticator.issue_token("user-42").unwrap();

        assert_eq!(authenticator.validate_token(&token).unwrap().sub, "user-42");
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::MalformedToken(_))));
    }

    #[test]
    fn test_state_no_token() {
        let verifier = authenticator().verifier();

        assert_eq!(
            AuthenticationState::from_request_token(&verifier, None),
            AuthenticationState::NoToken
        );
    }

    #[test]
    fn test_state_malformed() {
        let verifier = authenticator().verifier();

        assert_eq!(
            AuthenticationState::from_request_token(&verifier, Some("abc.def.ghi")),
            AuthenticationState::Malformed
        );
    }

    #[test]
    fn test_state_invalid_signature() {
        let authenticator = authenticator();
        let foreign = Authenticator::new(&testutil::foreign_keys(), Duration::hours(24)).unwrap();
        let token = foreign.issue_token("user-42").unwrap();

        assert_eq!(
            AuthenticationState::from_request_token(&authenticator.verifier(), Some(&token)),
            AuthenticationState::InvalidSignature
        );
    }

    #[test]
    fn test_state_expired() {
        let authenticator = Authenticator::new(&testutil::primary_keys(), Duration::hours(-2)).unwrap();
        let token = authenticator.issue_token("user-42").unwrap();

        assert_eq!(
            AuthenticationState::from_request_token(&authenticator.verifier(), Some(&token)),
            AuthenticationState::Expired
        );
    }

    #[test]
    fn test_state_authenticated() {
        let authenticator = authenticator();
        let token = authenticator.issue_token("user-42").unwrap();

        match AuthenticationState::from_request_token(&authenticator.verifier(), Some(&token)) {
            AuthenticationState::Authenticated(claims) => assert_eq!(claims.sub, "user-42"),
            other => panic!("expected authenticated, got {other:?}"),
        }
    }
}
