//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::{self, Write};

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Write success status (green checkmark)
pub fn success(w: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", "✓".green(), msg)
}

/// Write failure status (red X)
pub fn failure(w: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", "✗".red(), msg)
}

/// Write completed action (green label)
pub fn action(
    w: &mut dyn Write,
    label: &str,
    msg: &(impl std::fmt::Display + ?Sized),
) -> io::Result<()> {
    writeln!(w, "{}: {}", label.green(), msg)
}

/// Write plain output (no color, for data)
pub fn info(w: &mut dyn Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}", msg)
}
