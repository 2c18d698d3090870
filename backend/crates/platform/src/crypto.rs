//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random URL-safe secret with `len` bytes of entropy.
pub fn random_secret(len: usize) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes(len))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Storage key for a bearer secret: base64url(SHA-256(token)).
///
/// Only the digest is persisted; the raw token never reaches storage.
pub fn token_digest(token: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(sha256(token.as_bytes()))
}
