//! SHA-256 digests.
//!
//! The store uses the lowercase hex form as its access line and as the
//! file stem of each user's store.

use sha2::{Digest, Sha256};

/// Raw SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 of `data` as 64 lowercase hex characters.
pub fn digest_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
