//! SHA-256 helpers used to pin word list files to known contents.

use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("digest mismatch: expected {expected}, found {actual}")]
    Mismatch { expected: String, actual: String },
    #[error("pinned digest is not 64 hex characters: '{0}'")]
    MalformedPin(String),
}

/// Produces a raw SHA-256 digest of the provided bytes.
pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Returns the lowercase hexadecimal representation of a SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = sha256_digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Checks `data` against a pinned hex digest. Case is ignored.
pub fn verify_sha256(data: &[u8], pinned: &str) -> Result<(), IntegrityError> {
    let pinned = pinned.trim();
    if pinned.len() != 64 || !pinned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IntegrityError::MalformedPin(pinned.to_string()));
    }
    let actual = sha256_hex(data);
    if actual.eq_ignore_ascii_case(pinned) {
        Ok(())
    } else {
        Err(IntegrityError::Mismatch {
            expected: pinned.to_ascii_lowercase(),
            actual,
        })
    }
}
