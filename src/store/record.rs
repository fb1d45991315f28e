//! Record and request types.
//!
//! `EncryptedPair` is what lives on disk. `StoreAccess` and `NewRecord`
//! are the fully-populated, validated requests the CLI hands to
//! `CredentialStore`; constructing one is the validation step.

use std::fmt;

use zeroize::Zeroizing;

use crate::errors::{PmError, Result};

/// One record as stored: two consecutive encrypted lines, without their
/// line terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPair {
    pub site: String,
    pub password: String,
}

/// Who is asking, and the master password that proves it.
pub struct StoreAccess {
    username: String,
    master_password: Zeroizing<String>,
}

impl StoreAccess {
    pub fn new(username: impl Into<String>, master_password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let master_password = Zeroizing::new(master_password.into());

        validate_username(&username)?;
        if master_password.is_empty() {
            return Err(PmError::InvalidInput("master password cannot be empty".into()));
        }

        Ok(Self {
            username,
            master_password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn master_password(&self) -> &str {
        &self.master_password
    }
}

/// A site password to append to a store.
pub struct NewRecord {
    site: String,
    password: Zeroizing<String>,
}

impl NewRecord {
    pub fn new(site: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let site = site.into();
        validate_site_name(&site)?;
        Ok(Self {
            site,
            password: Zeroizing::new(password.into()),
        })
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for StoreAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreAccess")
            .field("username", &self.username)
            .field("master_password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for NewRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewRecord")
            .field("site", &self.site)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Usernames become part of a hashed file name, so any text works, but it
/// must be non-empty and a single line.
pub fn validate_username(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PmError::InvalidInput("username cannot be empty".into()));
    }
    if name.contains(['\n', '\r']) {
        return Err(PmError::InvalidInput(
            "username cannot contain line breaks".into(),
        ));
    }
    Ok(())
}

/// Site names are matched exactly after decryption; no trimming or case folding.
pub fn validate_site_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PmError::InvalidInput("site name cannot be empty".into()));
    }
    if name.contains(['\n', '\r']) {
        return Err(PmError::InvalidInput(
            "site name cannot contain line breaks".into(),
        ));
    }
    Ok(())
}
