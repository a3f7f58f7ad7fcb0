use crate::domain::PasswordHasher;
use sha2::{Digest, Sha256};

/// Unsalted SHA-256, hex-encoded in lowercase.
///
/// Matches hashes already stored by earlier deployments of the to-do API.
/// TODO: move to a salted KDF (argon2) with rehash-on-login for existing rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

impl PasswordHasher for Sha256PasswordHasher {
    // ---
    fn hash(&self, password: &str) -> String {
        // ---
        hex::encode(Sha256::digest(password.as_bytes()))
    }
}
