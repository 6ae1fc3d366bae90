//! Terminal output for the CLI commands.
//!
//! Everything here writes to stdout except [`error`], which writes to stderr.

use std::fmt::Display;

use owo_colors::OwoColorize;
use tessera_core::ConnectionDescriptor;

/// Print a title underlined to its width
pub fn header(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
    println!("{}", "─".repeat(text.chars().count()).dimmed());
    println!();
}

/// Print a section title
pub fn section(text: &str) {
    println!("{}", text.bold().white());
}

/// Print an indented `key: value` line
pub fn kv(key: &str, value: impl Display) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print the URI of `descriptor`, masked unless `show_secrets` is set, and
/// where it came from.
pub fn descriptor(descriptor: &ConnectionDescriptor, show_secrets: bool) {
    if show_secrets {
        kv("URI", descriptor.uri().yellow());
    } else {
        kv("URI", descriptor.redacted());
    }
    kv("Source", descriptor_source(descriptor));
}

/// `explicit_uri` or `derived`.
pub fn descriptor_source(descriptor: &ConnectionDescriptor) -> &'static str {
    if descriptor.uses_explicit_uri() {
        "explicit_uri"
    } else {
        "derived"
    }
}

/// Print a success line
pub fn success(text: &str) {
    println!("{} {}", "✔".green().bold(), text.green());
}

/// Print a warning line
pub fn warn(text: &str) {
    println!("{} {}", "⚠".yellow().bold(), text.yellow());
}

/// Print an error line to stderr
pub fn error(text: &str) {
    eprintln!("{} {}", "✖".red().bold(), text.red());
}

/// Print a `[current/total]` progress line
pub fn step(current: usize, total: usize, text: &str) {
    println!("{} {}", format!("[{current}/{total}]").dimmed(), text);
}

/// Print an empty line
pub fn newline() {
    println!();
}
