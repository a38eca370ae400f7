//! Preflight validation with ffprobe.
//!
//! Validation never raises: a missing input, an ffprobe that cannot start,
//! an ffprobe that exits non-zero, or a stream of the wrong kind all come
//! back as an invalid [`ProbeResult`], which the pipeline hands to the
//! recovery policy.

use std::path::Path;

use log::debug;

use crate::config::Environment;
use crate::error::{CoreError, CoreResult};
use crate::external::{ToolInvocation, ToolRunner};
use crate::settings::LogLevel;

/// Codec names ffprobe reports for still images.
pub const STILL_IMAGE_CODECS: &[&str] = &[
    "png", "apng", "mjpeg", "jpegls", "jpeg2000", "webp", "bmp", "gif", "tiff", "targa",
    "ppm", "pgm", "pam", "qoi", "exr", "avif", "heic",
];

/// What a wrapper expects its input to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Anything ffprobe finds a video stream in.
    Video,
    /// A still image codec (see [`STILL_IMAGE_CODECS`]).
    Image,
    /// Not media; only existence is checked.
    File,
}

/// Outcome of validating one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub is_valid: bool,
    /// Raw ffprobe stderr, or why the probe was skipped.
    pub diagnostic_output: String,
    /// Codec ffprobe reported for the first video stream.
    pub codec: Option<String>,
}

impl ProbeResult {
    fn valid(codec: Option<String>) -> Self {
        Self {
            is_valid: true,
            diagnostic_output: String::new(),
            codec,
        }
    }

    fn invalid(diagnostic: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            diagnostic_output: diagnostic.into(),
            codec: None,
        }
    }
}

/// Validates a single input path.
pub fn validate<R: ToolRunner + ?Sized>(
    runner: &R,
    env: &Environment,
    input: Option<&Path>,
    kind: InputKind,
    log_level: LogLevel,
) -> ProbeResult {
    let Some(input) = input.filter(|p| !p.as_os_str().is_empty()) else {
        return ProbeResult::invalid("No input file given");
    };
    if !input.exists() {
        return ProbeResult::invalid(format!("Input file not found: {}", input.display()));
    }
    if kind == InputKind::File {
        return ProbeResult::valid(None);
    }

    let invocation = stream_entry_probe(env, input, "codec_name", log_level);
    let outcome = match runner.run(&invocation) {
        Ok(outcome) => outcome,
        Err(err) => return ProbeResult::invalid(err.to_string()),
    };

    if !outcome.success() {
        let diagnostic = if outcome.stderr.trim().is_empty() {
            format!("ffprobe exited with code {}", outcome.exit_code)
        } else {
            outcome.stderr
        };
        return ProbeResult::invalid(diagnostic);
    }

    let codec = outcome.stdout.lines().next().unwrap_or("").trim().to_string();
    if codec.is_empty() {
        return ProbeResult::invalid(format!("No video stream found in {}", input.display()));
    }
    debug!("{} has codec {codec}", input.display());

    if kind == InputKind::Image && !STILL_IMAGE_CODECS.contains(&codec.as_str()) {
        return ProbeResult::invalid(format!(
            "{} is not a still image (codec {codec})",
            input.display()
        ));
    }
    ProbeResult::valid(Some(codec))
}

/// Queries width and height of the first video stream.
///
/// The two values come from independent ffprobe runs executed concurrently.
pub fn probe_dimensions<R: ToolRunner + ?Sized>(
    runner: &R,
    env: &Environment,
    input: &Path,
) -> CoreResult<(u32, u32)> {
    let (width, height) = rayon::join(
        || probe_number(runner, env, input, "width"),
        || probe_number(runner, env, input, "height"),
    );
    Ok((width?, height?))
}

fn probe_number<R: ToolRunner + ?Sized>(
    runner: &R,
    env: &Environment,
    input: &Path,
    entry: &str,
) -> CoreResult<u32> {
    let invocation = stream_entry_probe(env, input, entry, LogLevel::Error);
    let outcome = runner.run(&invocation)?;
    if !outcome.success() {
        return Err(CoreError::OperationFailed(format!(
            "ffprobe could not read {entry} of {}: {}",
            input.display(),
            outcome.stderr.trim()
        )));
    }
    let text = outcome.stdout.trim();
    text.parse::<u32>().map_err(|_| {
        CoreError::OperationFailed(format!(
            "ffprobe returned {entry} '{text}' for {}",
            input.display()
        ))
    })
}

fn stream_entry_probe(env: &Environment, input: &Path, entry: &str, level: LogLevel) -> ToolInvocation {
    ToolInvocation::new(&env.ffprobe)
        .args(["-v", level.as_str(), "-select_streams", "v:0", "-show_entries"])
        .arg(format!("stream={entry}"))
        .args(["-of", "default=noprint_wrappers=1:nokey=1"])
        .arg(input)
}
