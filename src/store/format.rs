//! Line-oriented store file format.
//!
//! A store file has this layout (UTF-8, every line `\n`-terminated):
//!
//! ```text
//! line 1:   sha256_hex(master password)     access digest
//! line 2:   encrypt(site name 1)
//! line 3:   encrypt(site password 1)
//! line 4:   encrypt(site name 2)
//! ...
//! ```
//!
//! The digest line is never encrypted. Record lines always come in pairs,
//! oldest first. These functions know nothing about the cipher; they move
//! opaque encrypted lines around.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::record::EncryptedPair;
use crate::crypto::digest_hex;
use crate::errors::Result;

/// `true` iff a regular file exists at `path`.
pub fn exists(path: &Path) -> bool {
    path.is_file()
}

/// Create (or overwrite) a store holding only the digest of `master_password`.
///
/// The parent directory is created if missing. Any prior content at `path`
/// is discarded; confirming that is the caller's job.
pub fn create(path: &Path, master_password: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    write_store(path, &digest_hex(master_password.as_bytes()), &[])
}

/// Check that `path` is a store whose digest line matches `master_password`.
///
/// Any failure to find or read the file counts as a mismatch.
pub fn verify_access(path: &Path, master_password: &str) -> bool {
    if !exists(path) {
        debug!(store = %path.display(), "no store file found");
        return false;
    }

    let mut first_line = String::new();
    let read = File::open(path).and_then(|f| BufReader::new(f).read_line(&mut first_line));
    if let Err(e) = read {
        debug!(store = %path.display(), error = %e, "store digest unreadable");
        return false;
    }

    let expected = digest_hex(master_password.as_bytes());
    first_line
        .trim_end()
        .as_bytes()
        .ct_eq(expected.as_bytes())
        .into()
}

/// Append one record to the end of the store.
///
/// Both lines go out in a single write and are synced before returning.
pub fn append_pair(path: &Path, encrypted_site: &str, encrypted_password: &str) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(format!("{encrypted_site}\n{encrypted_password}\n").as_bytes())?;
    file.sync_all()?;
    Ok(())
}

/// Every record in file order, skipping the digest line.
///
/// A trailing unpaired line is a malformed tail: it is logged and
/// left out of the result.
pub fn read_all_pairs(path: &Path) -> Result<Vec<EncryptedPair>> {
    let contents = fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().skip(1).collect();

    let chunks = lines.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        warn!(
            store = %path.display(),
            record_lines = lines.len(),
            "store has an unpaired trailing line; ignoring it"
        );
    }

    Ok(chunks
        .map(|pair| EncryptedPair {
            site: pair[0].to_string(),
            password: pair[1].to_string(),
        })
        .collect())
}

/// Rewrite the store as the digest line followed by `pairs`, in order.
pub fn replace_all(path: &Path, master_password: &str, pairs: &[EncryptedPair]) -> Result<()> {
    write_store(path, &digest_hex(master_password.as_bytes()), pairs)
}

/// Create the store's directory (owner-only on Unix) if it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    debug!(dir = %dir.display(), "created store directory");
    Ok(())
}

/// Write a whole store file **atomically**.
///
/// 1. Write digest + pairs to a temp file in the same directory.
/// 2. Sync it to disk.
/// 3. Rename the temp file over the target path.
///
/// A crash at any point leaves either the old store or the new one, never
/// a partial file. The temp file is removed if any step fails.
fn write_store(path: &Path, digest: &str, pairs: &[EncryptedPair]) -> Result<()> {
    let mut buf = String::with_capacity(digest.len() + 1 + pairs.len() * 128);
    buf.push_str(digest);
    buf.push('\n');
    for pair in pairs {
        buf.push_str(&pair.site);
        buf.push('\n');
        buf.push_str(&pair.password);
        buf.push('\n');
    }

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let written = write_synced(&tmp_path, buf.as_bytes()).and_then(|()| {
        fs::rename(&tmp_path, path)?;
        Ok(())
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written?;

    // Persist the rename itself.
    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    debug!(store = %path.display(), records = pairs.len(), "store written");
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
