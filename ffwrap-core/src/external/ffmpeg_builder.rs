//! FFmpeg command builder utilities
//!
//! This module provides a builder for the ffmpeg argument lists every
//! wrapper constructs, plus a small helper for comma-joined filter chains.
//! The builder never adds anything time- or randomness-dependent, so the
//! same settings always produce the same argument list.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::ToolInvocation;
use crate::settings::LogLevel;

/// Builder for ffmpeg invocations with the flags every wrapper shares.
pub struct FfmpegCommandBuilder {
    program: PathBuf,
    log_level: LogLevel,
    hide_banner: bool,
    args: Vec<OsString>,
}

impl FfmpegCommandBuilder {
    /// Creates a builder for `program` running at `log_level`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, log_level: LogLevel) -> Self {
        Self {
            program: program.into(),
            log_level,
            hide_banner: true,
            args: Vec::new(),
        }
    }

    /// Sets whether to hide the ffmpeg banner
    #[must_use]
    pub fn with_hide_banner(mut self, hide: bool) -> Self {
        self.hide_banner = hide;
        self
    }

    /// Adds `-i <path>`.
    #[must_use]
    pub fn input(mut self, path: &Path) -> Self {
        self.args.push("-i".into());
        self.args.push(path.as_os_str().to_os_string());
        self
    }

    /// Adds input options followed by `-i <path>` (e.g. `-loop 1`, `-f concat`).
    #[must_use]
    pub fn input_with<I, S>(mut self, options: I, path: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(options.into_iter().map(|o| o.as_ref().to_os_string()));
        self.input(path)
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Adds `-vf <chain>` when the chain is non-empty.
    #[must_use]
    pub fn video_filter(mut self, chain: VideoFilterChain) -> Self {
        if let Some(filters) = chain.build() {
            self.args.push("-vf".into());
            self.args.push(filters.into());
        }
        self
    }

    /// Strips metadata and asks muxer and encoders for bit-exact output so
    /// repeated runs on the same input are byte-identical.
    #[must_use]
    pub fn deterministic(self) -> Self {
        self.args([
            "-map_metadata",
            "-1",
            "-fflags",
            "+bitexact",
            "-flags:v",
            "+bitexact",
            "-flags:a",
            "+bitexact",
        ])
    }

    /// Sets the output path and finishes the invocation.
    #[must_use]
    pub fn output(mut self, path: &Path) -> ToolInvocation {
        self.args.push(path.as_os_str().to_os_string());
        self.build()
    }

    /// Finishes the invocation without an output path.
    #[must_use]
    pub fn build(self) -> ToolInvocation {
        let mut head: Vec<OsString> = Vec::with_capacity(self.args.len() + 4);
        if self.hide_banner {
            head.push("-hide_banner".into());
        }
        head.push("-y".into());
        head.push("-v".into());
        head.push(self.log_level.as_str().into());

        ToolInvocation::new(self.program).args(head.into_iter().chain(self.args))
    }
}

/// Builder for constructing video filter chains
#[derive(Debug, Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter to the chain; empty strings are skipped
    #[must_use]
    pub fn add_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Scales to fit inside `width`x`height` keeping aspect ratio, then pads
    /// the rest of the canvas with `colour`.
    #[must_use]
    pub fn fit_to_canvas(self, width: u32, height: u32, colour: &str) -> Self {
        self.add_filter(format!(
            "scale={width}:{height}:force_original_aspect_ratio=decrease"
        ))
        .add_filter(format!(
            "pad={width}:{height}:(ow-iw)/2:(oh-ih)/2:color={colour}"
        ))
        .add_filter("setsar=1")
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}
