//! High-level store operations used by CLI commands.
//!
//! `CredentialStore` ties the path resolver, the file format, and a
//! cipher suite together. Each call opens, uses, and closes the store
//! file; nothing is cached between calls.

use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use super::format;
use super::lock::StoreLock;
use super::path::PathResolver;
use super::record::{validate_site_name, NewRecord, StoreAccess};
use crate::config::Settings;
use crate::crypto::{AesGcmSuite, CipherSuite, RecordCipher};
use crate::errors::{PmError, Result};

pub struct CredentialStore<S = AesGcmSuite> {
    resolver: PathResolver,
    suite: S,
}

impl CredentialStore<AesGcmSuite> {
    /// The default store: AES-256-GCM records under the configured root.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            PathResolver::from_settings(settings)?,
            AesGcmSuite::new(settings.argon2_params()),
        ))
    }
}

impl<S: CipherSuite> CredentialStore<S> {
    pub fn new(resolver: PathResolver, suite: S) -> Self {
        Self { resolver, suite }
    }

    /// Path of `username`'s store file.
    pub fn store_path(&self, username: &str) -> PathBuf {
        self.resolver.resolve(username)
    }

    /// Whether `username` already has a store.
    pub fn exists(&self, username: &str) -> bool {
        format::exists(&self.store_path(username))
    }

    /// Create an empty store, replacing any existing one.
    ///
    /// Callers must confirm the overwrite first when `exists` is true.
    pub fn init(&self, access: &StoreAccess) -> Result<PathBuf> {
        let path = self.store_path(access.username());
        format::ensure_parent_dir(&path)?;

        let _lock = StoreLock::exclusive(&path)?;
        format::create(&path, access.master_password())?;

        debug!(store = %path.display(), "store initialized");
        Ok(path)
    }

    /// Append a record. Existing records for the same site are kept, so
    /// re-adding a site creates a second match.
    pub fn add(&self, access: &StoreAccess, record: &NewRecord) -> Result<()> {
        let path = self.store_path(access.username());
        let _lock = StoreLock::exclusive(&path)?;
        let cipher = self.unlock(access, &path)?;

        let site = cipher.encrypt(record.site())?;
        let password = cipher.encrypt(record.password())?;
        format::append_pair(&path, &site, &password)?;

        debug!(store = %path.display(), "record appended");
        Ok(())
    }

    /// Password of the first (oldest) record for `site`, or `None`.
    pub fn read(&self, access: &StoreAccess, site: &str) -> Result<Option<Zeroizing<String>>> {
        validate_site_name(site)?;
        let path = self.store_path(access.username());
        let _lock = StoreLock::shared(&path)?;
        let cipher = self.unlock(access, &path)?;

        for pair in format::read_all_pairs(&path)? {
            let name = Zeroizing::new(cipher.decrypt(&pair.site)?);
            if name.as_str() == site {
                return Ok(Some(Zeroizing::new(cipher.decrypt(&pair.password)?)));
            }
        }

        debug!(store = %path.display(), "no record matched");
        Ok(None)
    }

    /// Remove every record for `site` and return how many were removed.
    ///
    /// When nothing matches the file is not touched and `0` is returned.
    pub fn delete(&self, access: &StoreAccess, site: &str) -> Result<usize> {
        validate_site_name(site)?;
        let path = self.store_path(access.username());
        let _lock = StoreLock::exclusive(&path)?;
        let cipher = self.unlock(access, &path)?;

        let pairs = format::read_all_pairs(&path)?;
        let total = pairs.len();

        // Decrypt everything before mutating so a bad record aborts cleanly.
        let mut kept = Vec::with_capacity(total);
        for pair in pairs {
            let name = Zeroizing::new(cipher.decrypt(&pair.site)?);
            if name.as_str() != site {
                kept.push(pair);
            }
        }

        let removed = total - kept.len();
        if removed > 0 {
            format::replace_all(&path, access.master_password(), &kept)?;
        }

        debug!(store = %path.display(), removed, kept = kept.len(), "delete finished");
        Ok(removed)
    }

    /// Gate every record operation on the digest line, then key the cipher.
    fn unlock(&self, access: &StoreAccess, path: &Path) -> Result<S::Cipher> {
        if !format::verify_access(path, access.master_password()) {
            return Err(PmError::AccessDenied);
        }
        self.suite.keyed(access.username(), access.master_password())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Hex of the plaintext behind an `x` marker. Skips Argon2 so these
    /// tests stay fast.
    struct HexSuite;
    struct HexCipher;

    impl RecordCipher for HexCipher {
        fn encrypt(&self, plaintext: &str) -> Result<String> {
            Ok(format!("x{}", hex::encode(plaintext)))
        }

        fn decrypt(&self, line: &str) -> Result<String> {
            let raw = line.strip_prefix('x').ok_or(PmError::DecryptionFailed)?;
            let bytes = hex::decode(raw).map_err(|_| PmError::DecryptionFailed)?;
            String::from_utf8(bytes).map_err(|_| PmError::DecryptionFailed)
        }
    }

    impl CipherSuite for HexSuite {
        type Cipher = HexCipher;

        fn keyed(&self, _username: &str, _master_password: &str) -> Result<HexCipher> {
            Ok(HexCipher)
        }
    }

    fn store() -> (TempDir, CredentialStore<HexSuite>) {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path().join(".pmp"), "pst");
        (dir, CredentialStore::new(resolver, HexSuite))
    }

    fn alice() -> StoreAccess {
        StoreAccess::new("alice", "master1").unwrap()
    }

    #[test]
    fn add_before_init_is_denied() {
        let (_dir, s) = store();
        let err = s
            .add(&alice(), &NewRecord::new("github", "pw").unwrap())
            .unwrap_err();
        assert!(matches!(err, PmError::AccessDenied));
    }

    #[test]
    fn duplicate_sites_read_oldest_first() {
        let (_dir, s) = store();
        s.init(&alice()).unwrap();
        s.add(&alice(), &NewRecord::new("x", "a").unwrap()).unwrap();
        s.add(&alice(), &NewRecord::new("x", "b").unwrap()).unwrap();

        assert_eq!(s.read(&alice(), "x").unwrap().unwrap().as_str(), "a");
    }

    #[test]
    fn delete_keeps_other_records_in_order() {
        let (_dir, s) = store();
        s.init(&alice()).unwrap();
        for (site, pw) in [("a", "1"), ("b", "2"), ("a", "3"), ("c", "4")] {
            s.add(&alice(), &NewRecord::new(site, pw).unwrap()).unwrap();
        }

        assert_eq!(s.delete(&alice(), "a").unwrap(), 2);

        let pairs = format::read_all_pairs(&s.store_path("alice")).unwrap();
        let sites: Vec<String> = pairs
            .iter()
            .map(|p| HexCipher.decrypt(&p.site).unwrap())
            .collect();
        assert_eq!(sites, vec!["b", "c"]);
    }

    #[test]
    fn undecryptable_record_aborts_delete_without_rewrite() {
        let (_dir, s) = store();
        s.init(&alice()).unwrap();
        s.add(&alice(), &NewRecord::new("a", "1").unwrap()).unwrap();
        let path = s.store_path("alice");
        format::append_pair(&path, "garbage", "garbage").unwrap();
        let before = std::fs::read(&path).unwrap();

        assert!(matches!(
            s.delete(&alice(), "a"),
            Err(PmError::DecryptionFailed)
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn read_rejects_empty_site() {
        let (_dir, s) = store();
        s.init(&alice()).unwrap();
        assert!(matches!(
            s.read(&alice(), ""),
            Err(PmError::InvalidInput(_))
        ));
    }
}
