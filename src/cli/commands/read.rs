//! `pmanager read`: look up a site password.

use crate::cli::output;
use crate::cli::{open_store, prompt_password, site_or_prompt, store_access, Cli};
use crate::errors::{PmError, Result};

/// Execute the `read` command.
pub fn execute(cli: &Cli, site: Option<&str>, print: bool) -> Result<()> {
    let store = open_store(cli)?;
    let password = prompt_password()?;
    let access = store_access(cli, &password)?;
    let site = site_or_prompt(site)?;

    let secret = store
        .read(&access, &site)?
        .ok_or_else(|| PmError::RecordNotFound(site.clone()))?;

    if print {
        println!("{}", secret.as_str());
    } else {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| PmError::ClipboardError(e.to_string()))?;
        clipboard
            .set_text(secret.as_str())
            .map_err(|e| PmError::ClipboardError(e.to_string()))?;
        output::success("Copied to clipboard");
    }

    Ok(())
}
