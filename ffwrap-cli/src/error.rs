// ============================================================================
// ffwrap-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING
//
// The binaries add no error kinds of their own; the only thing that can go
// wrong on this side is writing to a closed stdout/stderr, which maps onto
// `CoreError::Io`.

use ffwrap_core::CoreResult;

/// Result alias for CLI-side operations.
pub type CliResult<T> = CoreResult<T>;
