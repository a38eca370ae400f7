// ============================================================================
// ffwrap-core/src/recovery.rs
// ============================================================================
//
// FAILURE RECOVERY: What a Wrapper Does When Preflight Fails
//
// A wrapper that cannot validate its input usually degrades to a no-op
// stage: the input is copied to the output unchanged and the process exits
// 0, so a chain of wrappers keeps going. The choice is made per wrapper and
// is not unified:
//
// - PassThrough: copy input to output when the input exists.
// - SkipSilently: produce nothing (concatenation has no single input to
//   pass through).

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::utils::format_bytes;

/// Per-wrapper reaction to a soft failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPolicy {
    PassThrough,
    SkipSilently,
}

/// What recovery actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Input copied unchanged to the output path.
    Copied { from: PathBuf, to: PathBuf, bytes: u64 },
    /// Input and output are the same file; nothing to do.
    AlreadyInPlace(PathBuf),
    /// The input does not exist, so no output was created.
    NothingToCopy,
    /// Policy says produce no output.
    Skipped,
}

/// Applies `policy` for a wrapper whose preflight failed.
///
/// Only a failed copy is an error; every other path is a decision.
pub fn recover(policy: RecoveryPolicy, input: Option<&Path>, output: &Path) -> CoreResult<RecoveryAction> {
    match policy {
        RecoveryPolicy::SkipSilently => {
            warn!("Skipping without producing {}", output.display());
            Ok(RecoveryAction::Skipped)
        }
        RecoveryPolicy::PassThrough => pass_through(input, output),
    }
}

fn pass_through(input: Option<&Path>, output: &Path) -> CoreResult<RecoveryAction> {
    let Some(input) = input.filter(|p| p.is_file()) else {
        info!("Nothing to pass through; no output written");
        return Ok(RecoveryAction::NothingToCopy);
    };

    if is_same_file(input, output) {
        return Ok(RecoveryAction::AlreadyInPlace(output.to_path_buf()));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::PathError(format!(
                "Failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let bytes = fs::copy(input, output).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to copy '{}' to '{}': {e}",
            input.display(),
            output.display()
        ))
    })?;
    info!(
        "Passed {} through unchanged to {} ({})",
        input.display(),
        output.display(),
        format_bytes(bytes)
    );

    Ok(RecoveryAction::Copied {
        from: input.to_path_buf(),
        to: output.to_path_buf(),
        bytes,
    })
}

// fs::copy onto itself truncates the file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
