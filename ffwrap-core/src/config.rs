//! Process-level configuration read from environment variables.
//!
//! Per-invocation settings (input, output, tool parameters) live in
//! [`crate::settings`]. This module only covers what the environment decides
//! for every wrapper alike: where the external tools live and whether debug
//! echoing is on.

use std::ffi::OsString;
use std::path::PathBuf;

/// Overrides the processing tool binary.
pub const ENV_FFMPEG: &str = "FFWRAP_FFMPEG";
/// Overrides the probing tool binary.
pub const ENV_FFPROBE: &str = "FFWRAP_FFPROBE";
/// Overrides the interpreter used by the shell runner.
pub const ENV_SHELL: &str = "FFWRAP_SHELL";
/// `DEBUG=1` turns on command echoing and intermediate file dumps.
pub const ENV_DEBUG: &str = "DEBUG";

pub const DEFAULT_FFMPEG: &str = "ffmpeg";
pub const DEFAULT_FFPROBE: &str = "ffprobe";
pub const DEFAULT_SHELL: &str = "sh";

/// Tool locations and diagnostic switches for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub shell: PathBuf,
    pub debug: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            ffprobe: PathBuf::from(DEFAULT_FFPROBE),
            shell: PathBuf::from(DEFAULT_SHELL),
            debug: false,
        }
    }
}

impl Environment {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Builds an environment from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset so that `FFWRAP_FFMPEG=` falls back
    /// to the default binary instead of trying to spawn an empty path.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let path_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            ffmpeg: path_or(ENV_FFMPEG, DEFAULT_FFMPEG),
            ffprobe: path_or(ENV_FFPROBE, DEFAULT_FFPROBE),
            shell: path_or(ENV_SHELL, DEFAULT_SHELL),
            debug: lookup(ENV_DEBUG).is_some_and(|value| is_truthy(&value)),
        }
    }
}

fn is_truthy(value: &OsString) -> bool {
    let value = value.to_string_lossy();
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
