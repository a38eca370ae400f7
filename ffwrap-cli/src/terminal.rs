//! Styled terminal lines.
//!
//! Status lines go to stdout, errors to stderr. `console` drops the styling
//! on its own when the stream is not a terminal.

use std::fmt::Display;
use std::io::{self, Write};

use console::style;

pub const SUCCESS_SYMBOL: &str = "✓";
pub const ERROR_SYMBOL: &str = "✗";
pub const INFO_SYMBOL: &str = "»";

pub fn print_success(message: impl Display) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{} {message}", style(SUCCESS_SYMBOL).green().bold())
}

pub fn print_status(message: impl Display) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{} {message}", style(INFO_SYMBOL).cyan())
}

pub fn print_error(message: impl Display) -> io::Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "{} {}", style(ERROR_SYMBOL).red().bold(), style(message).red())
}

/// Indented block of raw tool output under an error line.
pub fn print_detail(detail: &str) -> io::Result<()> {
    let mut err = io::stderr().lock();
    for line in detail.lines() {
        writeln!(err, "    {}", style(line).dim())?;
    }
    Ok(())
}
