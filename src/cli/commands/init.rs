//! `pmanager init`: create (or replace) the user's password store.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_store, prompt_new_password, store_access, username, Cli};
use crate::errors::{PmError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let store = open_store(cli)?;
    let user = username(cli)?;

    // 1. An existing store is only replaced after explicit confirmation.
    if store.exists(&user) && !force {
        let overwrite = Confirm::new()
            .with_prompt("Store already exists. Overwrite it? All saved passwords will be lost")
            .default(false)
            .interact()
            .map_err(|e| PmError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !overwrite {
            output::info("Aborted.");
            return Ok(());
        }
    }

    // 2. Choose the master password and write the digest line.
    let password = prompt_new_password()?;
    let access = store_access(cli, &password)?;
    let path = store.init(&access)?;

    output::success(format!("Store initialized for user {user}"));
    output::tip(format!("Store file: {}", path.display()));
    output::tip("Run `pmanager add --site <SITE>` to save a password.");

    Ok(())
}
