//! Turns a pipeline [`Report`] into terminal output.

use std::io::{self, Write};

use ffwrap_core::{Outcome, RecoveryAction, Report, format_bytes};

use crate::error::CliResult;
use crate::terminal::{print_detail, print_error, print_status, print_success};

/// Prints everything the user should see for `report`.
pub fn print_report(report: &Report) -> CliResult<()> {
    match &report.outcome {
        Outcome::Continue => {
            for path in &report.produced {
                print_success(format_args!("Wrote {}", path.display()))?;
            }
        }
        Outcome::SoftFailure { .. } => {
            if let Some(RecoveryAction::Copied { to, bytes, .. }) = &report.recovery {
                print_status(format_args!(
                    "Input passed through unchanged to {} ({})",
                    to.display(),
                    format_bytes(*bytes)
                ))?;
            }
        }
        Outcome::HardFailure { message, detail, .. } => {
            print_error(format_args!("{}: {}", report.tool, message.trim_end()))?;
            if !detail.trim().is_empty() {
                print_detail(detail)?;
            }
        }
        Outcome::UsageExit { text, is_error, .. } => {
            if *is_error {
                let mut err = io::stderr().lock();
                err.write_all(text.as_bytes())?;
            } else {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
        }
    }
    Ok(())
}
