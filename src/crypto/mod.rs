//! Cryptographic primitives for pmanager.
//!
//! This module provides:
//! - SHA-256 digests in hex text form (`digest`)
//! - Argon2id derivation of the record key (`kdf`)
//! - The `RecordCipher` seam and its AES-256-GCM implementation (`cipher`)

pub mod cipher;
pub mod digest;
pub mod kdf;

pub use cipher::{AesGcmCipher, AesGcmSuite, CipherSuite, RecordCipher};
pub use digest::{digest_hex, sha256};
pub use kdf::{derive_record_key, Argon2Params, RecordKey};
