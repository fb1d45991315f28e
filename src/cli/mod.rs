//! CLI module: Clap argument parser, prompts, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PmError, Result};
use crate::store::{CredentialStore, StoreAccess};

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "PMANAGER_PASSWORD";

/// pmanager CLI: encrypted password store.
#[derive(Parser)]
#[command(
    name = "pmanager",
    about = "Encrypted password store for the command line",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Owner of the store (default: $USER)
    #[arg(short, long, env = "USER", global = true)]
    pub username: Option<String>,

    /// Directory holding store files (default: ~/.pmp)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Config file (default: ~/.pmanager.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a password store for the user
    Init {
        /// Overwrite an existing store without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Add a password for a site
    Add {
        /// Site name (omit for interactive prompt)
        #[arg(short, long)]
        site: Option<String>,
    },

    /// Read the password for a site (copied to the clipboard)
    Read {
        /// Site name (omit for interactive prompt)
        #[arg(short, long)]
        site: Option<String>,

        /// Print the password to stdout instead of the clipboard
        #[arg(short, long)]
        print: bool,
    },

    /// Delete every password stored for a site
    Delete {
        /// Site name (omit for interactive prompt)
        #[arg(short, long)]
        site: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings, letting `--store-dir` override the configured root.
pub fn settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None if cli.store_dir.is_some() => {
            // A home directory is optional once the root is explicit.
            match crate::config::home_dir() {
                Ok(home) => Settings::load(&home.join(Settings::FILE_NAME))?,
                Err(_) => Settings::default(),
            }
        }
        None => Settings::load_from_home()?,
    };

    if let Some(dir) = &cli.store_dir {
        settings.store_dir = Some(dir.clone());
    }
    Ok(settings)
}

/// Build the store the commands operate on.
pub fn open_store(cli: &Cli) -> Result<CredentialStore> {
    CredentialStore::from_settings(&settings(cli)?)
}

/// The store owner from `--username` or `$USER`.
pub fn username(cli: &Cli) -> Result<String> {
    match &cli.username {
        Some(name) if !name.is_empty() => Ok(name.clone()),
        _ => Err(PmError::ConfigError(
            "no username given and $USER is not set — use --username".into(),
        )),
    }
}

/// Get the master password, trying in order:
/// 1. `PMANAGER_PASSWORD` env var
/// 2. Interactive prompt
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| PmError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `PMANAGER_PASSWORD` for scripted usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose master password")
        .with_confirmation(
            "Confirm master password",
            "Passwords don't match, try again",
        )
        .interact()
        .map_err(|e| PmError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Use the site from the command line, or ask for it.
pub fn site_or_prompt(site: Option<&str>) -> Result<String> {
    if let Some(s) = site {
        return Ok(s.to_string());
    }

    dialoguer::Input::<String>::new()
        .with_prompt("Site")
        .interact_text()
        .map_err(|e| PmError::CommandFailed(format!("site prompt: {e}")))
}

/// Build the access request for `cli`'s user and `password`.
pub fn store_access(cli: &Cli, password: &str) -> Result<StoreAccess> {
    StoreAccess::new(username(cli)?, password)
}
