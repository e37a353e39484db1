//! Fixed RSA key pairs for tests.
//!
//! The keys are committed test fixtures and must never be used to sign real
//! tokens.

use crate::keys::KeyMaterial;

pub const PRIMARY_PRIVATE_PEM: &str = include_str!("testdata/primary_private.pem");
pub const PRIMARY_PUBLIC_PEM: &str = include_str!("testdata/primary_public.pem");

/// An unrelated key pair, for "signed by someone else" cases.
pub const FOREIGN_PRIVATE_PEM: &str = include_str!("testdata/foreign_private.pem");
pub const FOREIGN_PUBLIC_PEM: &str = include_str!("testdata/foreign_public.pem");

/// Key material built from the primary test key pair.
pub fn primary_keys() -> KeyMaterial {
    KeyMaterial::from_pem(PRIMARY_PRIVATE_PEM, PRIMARY_PUBLIC_PEM)
        .expect("primary test keys are valid PEM")
}

/// Key material built from the foreign test key pair.
pub fn foreign_keys() -> KeyMaterial {
    KeyMaterial::from_pem(FOREIGN_PRIVATE_PEM, FOREIGN_PUBLIC_PEM)
        .expect("foreign test keys are valid PEM")
}
