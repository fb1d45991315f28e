use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::Argon2Params;
use crate::errors::{PmError, Result};

/// User-level configuration, loaded from `~/.pmanager.toml`.
///
/// Every field has a sensible default so pmanager works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding store files. `None` means `<home>/.pmp`.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// File extension of store files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_extension() -> String {
    "pst".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: None,
            extension: default_extension(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the home directory.
    pub const FILE_NAME: &'static str = ".pmanager.toml";

    /// Name of the default store directory under the home directory.
    pub const STORE_DIR_NAME: &'static str = ".pmp";

    /// Load settings from `<home>/.pmanager.toml`.
    pub fn load_from_home() -> Result<Self> {
        let home = home_dir()?;
        Self::load(&home.join(Self::FILE_NAME))
    }

    /// Load settings from an explicit config file path.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PmError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.extension.is_empty() || settings.extension.contains(['/', '\\', '.']) {
            return Err(PmError::ConfigError(format!(
                "extension '{}' must be a non-empty name without dots or separators",
                settings.extension
            )));
        }

        Ok(settings)
    }

    /// The directory store files live in.
    ///
    /// An explicit `store_dir` wins; otherwise `<home>/.pmp`.
    pub fn store_root(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join(Self::STORE_DIR_NAME)),
        }
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

/// The current user's home directory, or a `ConfigError`.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| PmError::ConfigError("cannot determine the home directory".into()))
}

// ── Tests ────────────────────────────────────────────────────────────
