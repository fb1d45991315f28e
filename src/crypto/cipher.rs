//! Field encryption for store records.
//!
//! A store line is one encrypted field in text form:
//!
//! ```text
//! base64( [ 12-byte nonce | ciphertext + 16-byte auth tag ] )
//! ```
//!
//! Every call to `encrypt` uses a fresh random nonce, so the same site
//! name encrypts to a different line each time. Lookups must compare
//! decrypted plaintext, never ciphertext.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use super::kdf::{derive_record_key, Argon2Params, RecordKey};
use crate::errors::{PmError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Encrypts and decrypts single record fields to and from one line of text.
///
/// Implementations must never emit a line break in their ciphertext.
pub trait RecordCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String>;
    fn decrypt(&self, line: &str) -> Result<String>;
}

/// Builds a `RecordCipher` keyed by a user's master password.
pub trait CipherSuite {
    type Cipher: RecordCipher;

    fn keyed(&self, username: &str, master_password: &str) -> Result<Self::Cipher>;
}

/// AES-256-GCM over an Argon2id-derived key.
pub struct AesGcmCipher {
    key: RecordKey,
}

impl AesGcmCipher {
    pub fn new(key: RecordKey) -> Self {
        Self { key }
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|e| PmError::EncryptionFailed(format!("invalid key length: {e}")))
    }
}

impl RecordCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| PmError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    fn decrypt(&self, line: &str) -> Result<String> {
        let blob = BASE64
            .decode(line.trim_end())
            .map_err(|_| PmError::DecryptionFailed)?;
        if blob.len() < NONCE_LEN {
            return Err(PmError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher()
            .map_err(|_| PmError::DecryptionFailed)?
            .decrypt(nonce, ciphertext)
            .map_err(|_| PmError::DecryptionFailed)?;

        // On invalid UTF-8, wipe the plaintext before discarding it.
        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PmError::DecryptionFailed
        })
    }
}

/// The default suite: Argon2id key derivation, AES-256-GCM fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmSuite {
    params: Argon2Params,
}

impl AesGcmSuite {
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }
}

impl CipherSuite for AesGcmSuite {
    type Cipher = AesGcmCipher;

    fn keyed(&self, username: &str, master_password: &str) -> Result<AesGcmCipher> {
        let key = derive_record_key(username, master_password.as_bytes(), &self.params)?;
        Ok(AesGcmCipher::new(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(byte: u8) -> AesGcmCipher {
        AesGcmCipher::new(RecordKey::new([byte; 32]))
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let c = cipher(0xAB);
        let line = c.encrypt("github").unwrap();
        assert_eq!(c.decrypt(&line).unwrap(), "github");
    }

    #[test]
    fn ciphertext_is_a_single_line() {
        let line = cipher(0x01).encrypt("multi\nline\nsecret").unwrap();
        assert!(!line.contains('\n'));
        assert!(!line.contains('\r'));
    }

    #[test]
    fn wrong_key_fails() {
        let line = cipher(0x11).encrypt("hunter2").unwrap();
        assert!(matches!(
            cipher(0x22).decrypt(&line),
            Err(PmError::DecryptionFailed)
        ));
    }

    #[test]
    fn garbage_line_fails() {
        assert!(cipher(0x11).decrypt("not base64 !!").is_err());
        assert!(cipher(0x11).decrypt("AAAA").is_err());
    }
}
