//! Integration tests for the pmanager CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`. The
//! master password comes from `PMANAGER_PASSWORD`, site passwords are
//! piped through stdin, and a config file keeps Argon2 cheap.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: a temp dir holding a fast config and an empty store root.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("config.toml")
            .write_str("argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n")
            .unwrap();
        Self { dir }
    }

    /// A `pmanager` command for user alice, unlocked with `password`.
    fn cmd(&self, password: &str) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("pmanager").expect("binary should exist");
        cmd.env("PMANAGER_PASSWORD", password)
            .env_remove("PMANAGER_LOG")
            .args(["--username", "alice", "--store-dir"])
            .arg(self.dir.child("stores").path())
            .arg("--config")
            .arg(self.dir.child("config.toml").path());
        cmd
    }

    fn init(&self, password: &str) {
        self.cmd(password).arg("init").assert().success();
    }

    fn add(&self, password: &str, site: &str, value: &str) {
        self.cmd(password)
            .args(["add", "--site", site])
            .write_stdin(format!("{value}\n"))
            .assert()
            .success();
    }
}

#[test]
fn help_flag_shows_usage() {
    #[allow(deprecated)]
    Command::cargo_bin("pmanager")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted password store"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("help"));
}

#[test]
fn no_args_shows_usage() {
    #[allow(deprecated)]
    Command::cargo_bin("pmanager")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn init_add_read_delete_roundtrip() {
    let sb = Sandbox::new();
    sb.cmd("master1")
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store initialized for user alice"));

    sb.add("master1", "github", "hunter2");

    sb.cmd("master1")
        .args(["read", "--site", "github", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::diff("hunter2\n"));

    sb.cmd("master1")
        .args(["delete", "--site", "github", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    sb.cmd("master1")
        .args(["read", "--site", "github", "--print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't find password for 'github'"));
}

#[test]
fn wrong_master_password_is_denied() {
    let sb = Sandbox::new();
    sb.init("master1");
    sb.add("master1", "github", "hunter2");

    sb.cmd("wrong")
        .args(["read", "--site", "github", "--print"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("hunter2").not())
        .stderr(predicate::str::contains("Access denied"));
}

#[test]
fn read_without_store_is_denied() {
    let sb = Sandbox::new();
    sb.cmd("master1")
        .args(["read", "--site", "github", "--print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));
}

#[test]
fn first_added_duplicate_wins_on_read() {
    let sb = Sandbox::new();
    sb.init("master1");
    sb.add("master1", "x", "a");
    sb.add("master1", "x", "b");

    sb.cmd("master1")
        .args(["read", "--site", "x", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::diff("a\n"));

    sb.cmd("master1")
        .args(["delete", "--site", "x", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passwords for 'x' deleted"));
}

#[test]
fn delete_of_unknown_site_fails() {
    let sb = Sandbox::new();
    sb.init("master1");

    sb.cmd("master1")
        .args(["delete", "--site", "nonexistent", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't find password"));
}

#[test]
fn init_over_existing_store_needs_confirmation() {
    let sb = Sandbox::new();
    sb.init("master1");
    sb.add("master1", "github", "hunter2");

    // No terminal to confirm on: the store must survive.
    sb.cmd("master2").arg("init").assert().failure();
    sb.cmd("master1")
        .args(["read", "--site", "github", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::diff("hunter2\n"));

    // --force replaces it.
    sb.cmd("master2").args(["init", "--force"]).assert().success();
    sb.cmd("master1")
        .args(["read", "--site", "github", "--print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));
}

#[test]
fn store_file_lands_in_store_dir() {
    let sb = Sandbox::new();
    sb.init("master1");

    let files: Vec<_> = std::fs::read_dir(sb.dir.child("stores").path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with(".pst"));
}
