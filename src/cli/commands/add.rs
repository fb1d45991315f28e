//! `pmanager add`: append a site password to the store.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_store, prompt_password, site_or_prompt, store_access, Cli};
use crate::errors::{PmError, Result};
use crate::store::NewRecord;

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: Option<&str>) -> Result<()> {
    let store = open_store(cli)?;
    let password = prompt_password()?;
    let access = store_access(cli, &password)?;
    let site = site_or_prompt(site)?;

    let site_password = read_site_password(&site)?;
    let record = NewRecord::new(site.as_str(), site_password.as_str())?;
    store.add(&access, &record)?;

    output::success(format!("Password for '{site}' saved"));
    Ok(())
}

/// Read the site password from one of two sources:
/// piped stdin (taken once, trailing newline stripped) or two hidden
/// prompts that must agree.
fn read_site_password(site: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    let first = prompt_hidden(&format!("Password for {site}"))?;
    let second = prompt_hidden("Confirm password")?;
    if *first != *second {
        return Err(PmError::PasswordMismatch);
    }
    Ok(first)
}

fn prompt_hidden(prompt: &str) -> Result<Zeroizing<String>> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| PmError::CommandFailed(format!("password prompt: {e}")))
}
