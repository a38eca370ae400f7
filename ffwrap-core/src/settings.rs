// ============================================================================
// ffwrap-core/src/settings.rs
// ============================================================================
//
// SETTINGS: The Resolved Configuration of One Invocation
//
// The same override structs serve two sources: `clap` parses them from the
// command line and `serde` deserializes them from a JSON config file. Every
// field is optional so "not given" is distinguishable from "given the
// default"; defaults are applied once, when `ResolvedSettings` is built.
//
// KEY COMPONENTS:
// - LogLevel: verbosity passed to ffprobe/ffmpeg via `-v`
// - CommonOverrides: the flags every wrapper accepts
// - OperationParams: bound for the per-wrapper override structs
// - SettingsSource: command line or config file
// - ResolvedSettings: immutable result of resolution

use std::fmt;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

// ============================================================================
// LOG LEVEL
// ============================================================================

/// Verbosity levels understood by ffmpeg and ffprobe (`-v <level>`).
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    Panic,
    Fatal,
    #[default]
    Error,
    Warning,
    Info,
    Verbose,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// OVERRIDES
// ============================================================================

/// Flags shared by every wrapper. Config keys use the long flag names.
#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CommonOverrides {
    /// Input file (repeat for tools that take several inputs)
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    #[serde(deserialize_with = "one_or_many")]
    pub input: Vec<PathBuf>,

    /// Output path
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// ffmpeg/ffprobe log level
    #[arg(short = 'l', long = "loglevel", value_name = "LEVEL", value_enum)]
    pub loglevel: Option<LogLevel>,

    /// Free-form note, accepted and ignored
    #[arg(long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Stray positional tokens; ignored.
    #[arg(hide = true, value_name = "IGNORED")]
    #[serde(skip)]
    pub stray: Vec<String>,
}

/// Accepts `"input": "a.mp4"` as well as `"input": ["a.mp4", "b.mp4"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

/// Bound satisfied by every wrapper's parameter struct.
///
/// Implemented automatically: deriving `Args`, `Deserialize`, `Debug`,
/// `Clone`, `Default` and `PartialEq` is all a wrapper has to do.
pub trait OperationParams:
    Args + DeserializeOwned + Debug + Clone + Default + PartialEq
{
}

impl<T> OperationParams for T where
    T: Args + DeserializeOwned + Debug + Clone + Default + PartialEq
{
}

// ============================================================================
// RESOLVED SETTINGS
// ============================================================================

/// Where the settings of an invocation came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettingsSource {
    #[default]
    CommandLine,
    ConfigFile(PathBuf),
}

/// Fully resolved settings for one wrapper invocation.
///
/// Built once by [`crate::resolve::resolve`] before anything touches the
/// filesystem or spawns a process, and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings<P> {
    /// Inputs in the order given.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub log_level: LogLevel,
    pub params: P,
    pub source: SettingsSource,
}

impl<P> ResolvedSettings<P> {
    /// The input of a single-input tool: the last `-i` on the command line,
    /// or the first entry of a config file's list.
    pub fn input(&self) -> Option<&Path> {
        let input = match self.source {
            SettingsSource::CommandLine => self.inputs.last(),
            SettingsSource::ConfigFile(_) => self.inputs.first(),
        };
        input.map(PathBuf::as_path)
    }
}
