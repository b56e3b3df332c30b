//! Salted password hashing and verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of random salt bytes per credential.
const SALT_LEN: usize = 16;

/// Hashes and verifies user credentials.
///
/// Stored hashes have the form `<salt>$<digest>`, both segments URL-safe
/// base64 without padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> String {
        let mut rng = rand::rng();
        let salt: Vec<u8> = (0..SALT_LEN).map(|_| rng.random::<u8>()).collect();
        let digest = digest(&salt, password);

        format!(
            "{}${}",
            URL_SAFE_NO_PAD.encode(&salt),
            URL_SAFE_NO_PAD.encode(digest)
        )
    }

    /// Verifies a password against a stored hash.
    ///
    /// Malformed stored values never verify.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
            return false;
        };
        let Ok(salt) = URL_SAFE_NO_PAD.decode(salt_b64) else {
            return false;
        };
        let Ok(expected) = URL_SAFE_NO_PAD.decode(digest_b64) else {
            return false;
        };

        digest(&salt, password).as_slice() == expected.as_slice()
    }
}

/// Computes the salted SHA-256 digest of a password.
fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
