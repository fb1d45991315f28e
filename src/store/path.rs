//! Per-user store file location.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::crypto::digest_hex;
use crate::errors::Result;

/// Maps a username to its store file: `<root>/<sha256(username + "_storage")>.<ext>`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    extension: String,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Build a resolver from settings, falling back to `<home>/.pmp`.
    ///
    /// Fails with `ConfigError` when no store directory is configured and
    /// the home directory cannot be determined.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.store_root()?, settings.extension.clone()))
    }

    /// Directory holding every store file.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `username`'s store. Pure: the same username always maps to
    /// the same path and nothing touches the filesystem.
    pub fn resolve(&self, username: &str) -> PathBuf {
        let stem = digest_hex(format!("{username}_storage").as_bytes());
        self.root.join(format!("{stem}.{}", self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_deterministic() {
        let r = PathResolver::new("/home/alice/.pmp", "pst");
        assert_eq!(r.resolve("alice"), r.resolve("alice"));
    }

    #[test]
    fn resolve_uses_hashed_username() {
        let r = PathResolver::new("/home/alice/.pmp", "pst");
        let expected = format!("{}.pst", digest_hex(b"alice_storage"));
        assert_eq!(
            r.resolve("alice"),
            PathBuf::from("/home/alice/.pmp").join(expected)
        );
    }

    #[test]
    fn different_users_get_different_files() {
        let r = PathResolver::new("/stores", "pst");
        assert_ne!(r.resolve("alice"), r.resolve("bob"));
    }

    #[test]
    fn custom_extension_is_applied() {
        let r = PathResolver::new("/stores", "store");
        let path = r.resolve("alice");
        assert_eq!(path.extension().unwrap(), "store");
        assert_eq!(path.parent().unwrap(), Path::new("/stores"));
    }
}
