//! Subcommand handlers
//!
//! Each handler prints its result and returns `anyhow::Result` so `main`
//! can report failures uniformly.

pub mod auth;
pub mod balance;
pub mod fleet;
pub mod late_fees;
pub mod profile;
pub mod rental;

use std::io::{self, BufRead, Write};

/// Read one trimmed line from stdin after showing `prompt`
pub(crate) fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", prompt))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
