//! Authentication utilities library
//!
//! Provides the authentication core shared by the service:
//! - Password hashing (PBKDF2-HMAC-SHA512, salted)
//! - RS256 JWT issuance and verification
//! - Key material loading
//! - Token extraction from request metadata
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let credential = hasher.hash("my_password").unwrap();
//! let is_valid = hasher
//!     .verify("my_password", &credential.hash, &credential.salt)
//!     .unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Extraction
//! ```
//! use auth::extract::token_from_authorization;
//!
//! assert_eq!(token_from_authorization("Bearer abc.def.ghi"), Some("abc.def.ghi"));
//! assert_eq!(token_from_authorization("Basic xyz"), None);
//! ```
//!
//! ## Complete Authentication Flow
//! ```no_run
//! use auth::{Authenticator, KeyMaterial};
//! use chrono::Duration;
//!
//! let keys = KeyMaterial::load("keys/jwt_private.pem", "keys/jwt_public.pem").unwrap();
//! let auth = Authenticator::new(&keys, Duration::hours(24)).unwrap();
//!
//! // Register: derive salt + hash
//! let credential = auth.register_credential("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &credential, "user-42").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "user-42");
//! ```

pub mod authenticator;
pub mod extract;
pub mod jwt;
pub mod keys;
pub mod password;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::AuthenticationState;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::JwtVerifier;
pub use keys::KeyError;
pub use keys::KeyMaterial;
pub use password::PasswordCredential;
pub use password::PasswordError;
pub use password::PasswordHasher;
