//! `pmanager delete`: remove every password stored for a site.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_store, prompt_password, site_or_prompt, store_access, Cli};
use crate::errors::{PmError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, site: Option<&str>, force: bool) -> Result<()> {
    let store = open_store(cli)?;
    let site = site_or_prompt(site)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete all passwords for '{site}'? This cannot be undone"))
            .default(false)
            .interact()
            .map_err(|e| PmError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let password = prompt_password()?;
    let access = store_access(cli, &password)?;

    match store.delete(&access, &site)? {
        0 => Err(PmError::RecordNotFound(site)),
        1 => {
            output::success(format!("Password for '{site}' deleted"));
            Ok(())
        }
        n => {
            output::success(format!("{n} passwords for '{site}' deleted"));
            Ok(())
        }
    }
}
