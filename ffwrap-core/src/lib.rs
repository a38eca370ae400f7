//! Core library for a family of single-purpose ffmpeg wrapper tools.
//!
//! Every wrapper (thumbnail, scale, rotate, pad, sharpen, concat, image to
//! video, social reformat, shell runner) follows the same pipeline: resolve
//! settings from the command line or a JSON config, validate the input with
//! ffprobe, then either run exactly one external command or fall back to the
//! wrapper's recovery policy (usually copying the input through unchanged).
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ffwrap_core::operations::Rotate;
//! use ffwrap_core::{Environment, Pipeline, SystemRunner};
//!
//! let env = Environment::from_env();
//! let runner = SystemRunner;
//! let report = Pipeline::new(&env, &runner)
//!     .run::<Rotate, _, _>(["ff_rotate", "-i", "in.mp4", "-o", "out.mp4", "-r", "180"]);
//! std::process::exit(report.exit_code());
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod operations;
pub mod pipeline;
pub mod probe;
pub mod recovery;
pub mod resolve;
pub mod settings;
pub mod utils;

// Re-exports for public API
pub use config::Environment;
pub use error::{CoreError, CoreResult};
pub use external::{
    FfmpegCommandBuilder, StdioMode, SubprocessOutcome, SystemRunner, ToolInvocation, ToolRunner,
    VideoFilterChain,
};
pub use operations::{Operation, PreparedCommand};
pub use pipeline::{Outcome, Pipeline, Report};
pub use probe::{InputKind, ProbeResult, probe_dimensions, validate};
pub use recovery::{RecoveryAction, RecoveryPolicy, recover};
pub use resolve::{ConfigDocument, ResolveError, resolve};
pub use settings::{CommonOverrides, LogLevel, ResolvedSettings, SettingsSource};
pub use utils::format_bytes;
