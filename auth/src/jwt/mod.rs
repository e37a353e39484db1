use jsonwebtoken::Algorithm;

pub mod claims;
pub mod errors;
pub mod handler;
pub mod verifier;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use verifier::JwtVerifier;

/// The only signing algorithm issued or accepted.
pub const ALGORITHM: Algorithm = Algorithm::RS256;
