//! Styled terminal output for user-facing messages.
//!
//! Confirmations go to stdout, failures to stderr. Diagnostics go through
//! `tracing` instead and stay quiet unless `PMANAGER_LOG` asks for them.
//! `console` drops the colors when the stream is not a terminal.

use std::fmt::Display;

use console::style;

/// "✓ {msg}" in green.
pub fn success(msg: impl Display) {
    println!("{} {msg}", style("\u{2713}").green().bold());
}

/// "✗ {msg}" in red, on stderr.
pub fn error(msg: impl Display) {
    eprintln!("{} {msg}", style("\u{2717}").red().bold());
}

/// "ℹ {msg}" in blue.
pub fn info(msg: impl Display) {
    println!("{} {msg}", style("\u{2139}").blue().bold());
}

/// Dimmed "→ {msg}" hint.
pub fn tip(msg: impl Display) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}
