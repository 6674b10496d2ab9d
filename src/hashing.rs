//! Identity Hasher - SHA-256 fingerprints of account addresses

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, return lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Fingerprint of an account address: sha256 over its UTF-8 bytes.
///
/// The address is hashed exactly as given. No trimming or case folding, so
/// `0xABC...` and `0xabc...` produce different fingerprints.
pub fn hash_address(address: &str) -> String {
    sha256_hex(address.as_bytes())
}
