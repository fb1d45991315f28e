//! Password-based derivation of the record key using Argon2id.
//!
//! The store format has no room for a random salt, so the salt is the
//! SHA-256 of the same `<username>_storage` string that names the store
//! file. Two users with the same master password still get different keys.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use super::digest::sha256;
use crate::errors::{PmError, Result};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` so the CLI can pass
/// whatever the user configured in `.pmanager.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject parameters weak enough to make brute force cheap.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(PmError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(PmError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(PmError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A 32-byte record key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct RecordKey {
    bytes: [u8; KEY_LEN],
}

impl RecordKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive the key that encrypts every record in `username`'s store.
///
/// The same username + password + params always produce the same key.
pub fn derive_record_key(
    username: &str,
    master_password: &[u8],
    argon2_params: &Argon2Params,
) -> Result<RecordKey> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| PmError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = sha256(format!("{username}_storage").as_bytes());

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(master_password, &salt, &mut key)
        .map_err(|e| PmError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    let record_key = RecordKey::new(key);
    key.zeroize();
    Ok(record_key)
}
