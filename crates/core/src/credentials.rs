//! Credential hashing and verification.
//!
//! Passwords are stored as `sha256$<salt>$<digest>` where `salt` is 16 random
//! bytes hex-encoded and `digest` is SHA-256 over `salt || password`, also
//! hex-encoded. Callers treat the stored string as opaque; only this module
//! knows the layout.

use rand::RngCore;
use sha2::{Digest, Sha256};

const METHOD: &str = "sha256";
const SALT_BYTES: usize = 16;

/// Hashes a raw password with a fresh random salt.
pub fn hash_password(raw: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = digest_with_salt(&salt_hex, raw);
    format!("{METHOD}${salt_hex}${digest}")
}

/// Verifies a submitted password against a stored hash string.
///
/// Returns `false` for malformed stored values rather than erroring; a record
/// with an unreadable hash simply never authenticates.
pub fn verify_password(stored: &str, raw: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (method, salt_hex, expected) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), Some(d)) => (m, s, d),
        _ => return false,
    };
    if method != METHOD {
        return false;
    }
    digest_with_salt(salt_hex, raw) == expected
}

fn digest_with_salt(salt_hex: &str, raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
