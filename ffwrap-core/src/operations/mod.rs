//! Wrapper tool definitions.
//!
//! Every wrapper is a unit struct implementing [`Operation`]: its name, its
//! extra flags (a struct that is both a clap `Args` and a serde
//! `Deserialize`), what kind of input it expects, how it recovers from a
//! failed preflight, and the one command line it runs.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::Environment;
use crate::error::{CoreError, CoreResult};
use crate::external::ToolInvocation;
use crate::probe::InputKind;
use crate::recovery::RecoveryPolicy;
use crate::settings::{OperationParams, ResolvedSettings};

pub mod concat;
pub mod image;
pub mod pad;
pub mod rotate;
pub mod scale;
pub mod sharpen;
pub mod shell;
pub mod social;
pub mod thumbnail;

pub use concat::Concat;
pub use image::ImageToVideo;
pub use pad::Pad;
pub use rotate::Rotate;
pub use scale::Scale;
pub use sharpen::Sharpen;
pub use shell::ShellRunner;
pub use social::Social;
pub use thumbnail::Thumbnail;

/// A constructed command plus anything that must outlive its execution.
#[derive(Debug)]
pub struct PreparedCommand {
    pub invocation: ToolInvocation,
    /// Intermediate file the command reads; removed when dropped.
    pub scratch: Option<NamedTempFile>,
    /// Files the command is expected to write, for reporting.
    pub produces: Vec<PathBuf>,
}

impl PreparedCommand {
    pub fn new(invocation: ToolInvocation, produces: Vec<PathBuf>) -> Self {
        Self {
            invocation,
            scratch: None,
            produces,
        }
    }
}

/// One wrapper tool.
pub trait Operation {
    /// Binary name, also the namespace key accepted in config files.
    const NAME: &'static str;
    const ABOUT: &'static str;
    const DEFAULT_OUTPUT: &'static str;
    const INPUT_KIND: InputKind = InputKind::Video;
    const RECOVERY: RecoveryPolicy = RecoveryPolicy::PassThrough;
    /// Exit code after printing `--help`.
    const HELP_EXIT_CODE: i32 = 0;

    type Params: OperationParams;

    /// Adjusts the resolved output path (e.g. appending a missing extension).
    fn finalize_output(output: PathBuf) -> PathBuf {
        output
    }

    /// Range checks that clap and serde cannot express.
    fn check_params(_params: &Self::Params) -> CoreResult<()> {
        Ok(())
    }

    /// Inputs the preflight validator has to accept.
    fn preflight_inputs(settings: &ResolvedSettings<Self::Params>) -> Vec<&Path> {
        settings.input().into_iter().collect()
    }

    /// Builds the single external command for validated settings.
    fn prepare(settings: &ResolvedSettings<Self::Params>, env: &Environment) -> CoreResult<PreparedCommand>;
}

/// The input of a single-input wrapper; preflight guarantees it exists.
pub(crate) fn require_input<P>(settings: &ResolvedSettings<P>) -> CoreResult<&Path> {
    settings
        .input()
        .ok_or_else(|| CoreError::OperationFailed("No input file given".to_string()))
}
