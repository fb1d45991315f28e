//! Configuration loaded from `~/.pmanager.toml`.

mod settings;

pub use settings::{home_dir, Settings};
