//! Advisory locking around store operations.
//!
//! The lock is taken on a sidecar `.<store-file>.lock` next to the store
//! rather than the store itself, because a rewrite renames a new file over
//! the store and a lock on the old inode would no longer exclude anyone.
//! Dropping the guard releases the lock.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;

/// Held for the duration of a single store operation.
#[derive(Debug)]
pub struct StoreLock {
    file: Option<File>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Shared,
    Exclusive,
}

impl StoreLock {
    /// Lock for a write path (create, append, rewrite).
    pub fn exclusive(store_path: &Path) -> Result<Self> {
        Self::acquire(store_path, Mode::Exclusive)
    }

    /// Lock for a read; excludes writers but not other readers.
    pub fn shared(store_path: &Path) -> Result<Self> {
        Self::acquire(store_path, Mode::Shared)
    }

    /// Blocks until the lock is granted.
    ///
    /// If the store directory does not exist there is nothing to protect
    /// yet, and an inert guard is returned.
    fn acquire(store_path: &Path, mode: Mode) -> Result<Self> {
        let path = lock_path(store_path);
        match path.parent() {
            Some(dir) if dir.as_os_str().is_empty() || dir.is_dir() => {}
            _ => return Ok(Self { file: None }),
        }

        let mut options = OpenOptions::new();
        options.create(true).truncate(false).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&path)?;

        platform::lock(&file, mode)?;
        debug!(lock = %path.display(), ?mode, "store lock acquired");

        Ok(Self { file: Some(file) })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            // Closing the descriptor would release it too; this just makes it prompt.
            let _ = platform::unlock(file);
        }
    }
}

/// `<dir>/.<file-name>.lock`
fn lock_path(store_path: &Path) -> PathBuf {
    let parent = store_path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.lock",
        store_path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

#[cfg(unix)]
mod platform {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    use super::Mode;

    pub(super) fn lock(file: &File, mode: Mode) -> io::Result<()> {
        let op = match mode {
            Mode::Shared => libc::LOCK_SH,
            Mode::Exclusive => libc::LOCK_EX,
        };
        flock(file, op)
    }

    pub(super) fn unlock(file: &File) -> io::Result<()> {
        flock(file, libc::LOCK_UN)
    }

    fn flock(file: &File, op: libc::c_int) -> io::Result<()> {
        loop {
            // SAFETY: the descriptor is owned by `file` and open for the whole call.
            let rc = unsafe { libc::flock(file.as_raw_fd(), op) };
            if rc == 0 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

#[cfg(not(unix))]
mod platform {
    use std::fs::File;
    use std::io;

    use super::Mode;

    pub(super) fn lock(_file: &File, _mode: Mode) -> io::Result<()> {
        Ok(())
    }

    pub(super) fn unlock(_file: &File) -> io::Result<()> {
        Ok(())
    }
}
