pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::PasswordCredential;
pub use hasher::PasswordHasher;
pub use hasher::HASH_ITERATIONS;
