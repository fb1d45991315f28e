//! Store module: one encrypted, line-oriented file per user.
//!
//! This module provides:
//! - `PathResolver`, mapping usernames to store files (`path`)
//! - The on-disk format and its primitive operations (`format`)
//! - Advisory locking scoped to one operation (`lock`)
//! - Request and record types (`record`)
//! - High-level `CredentialStore` for init/add/read/delete (`credentials`)

pub mod credentials;
pub mod format;
pub mod lock;
pub mod path;
pub mod record;

pub use credentials::CredentialStore;
pub use lock::StoreLock;
pub use path::PathResolver;
pub use record::{EncryptedPair, NewRecord, StoreAccess};
