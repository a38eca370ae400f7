// ============================================================================
// ffwrap-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Subprocess Execution for ffmpeg, ffprobe and sh
//
// This module encapsulates every interaction with external command-line
// tools. A wrapper invocation runs exactly one processing tool to completion;
// the probe helpers run ffprobe the same way. Nothing here retries or times
// out: a long-running tool can only be bounded by whoever launched us.
//
// KEY COMPONENTS:
// - ToolInvocation: program + argument list + stdio mode
// - SubprocessOutcome: exit code and captured output of a finished child
// - ToolRunner: trait for running an invocation (dependency injection seam)
// - SystemRunner: std::process implementation with line-by-line draining
//
// DESIGN PHILOSOPHY:
// The runner is a trait so that the pipeline and every operation can be
// exercised with a scripted runner (see `mocks`) without ffmpeg installed.
//
// AI-ASSISTANT-INFO: External tool execution and abstractions

// ---- Internal crate imports ----
use crate::error::{CoreResult, command_start_error, command_wait_error};

// ---- External crate imports ----
use log::{debug, warn};

// ---- Standard library imports ----
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Argument-list builders for ffmpeg invocations and filter chains
pub mod ffmpeg_builder;

/// Scripted runner for tests (`test-mocks` feature)
pub mod mocks;

pub use ffmpeg_builder::{FfmpegCommandBuilder, VideoFilterChain};

// ============================================================================
// INVOCATION
// ============================================================================

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// stdout/stderr piped and returned in the outcome; stdin closed.
    #[default]
    Captured,
    /// All three streams passed through to the terminal.
    Inherited,
}

/// A fully constructed external command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub stdio: StdioMode,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdio: StdioMode::Captured,
        }
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

    #[must_use]
    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// Short name of the program, for messages ("ffmpeg", not "/usr/bin/ffmpeg").
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Arguments as UTF-8 strings (lossy), mostly for assertions and logging.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Renders the invocation as a copy-pasteable shell command line.
impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn shell_quote(text: &str) -> String {
    let is_plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+%,@".contains(c));
    if is_plain {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of a child process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubprocessOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl SubprocessOutcome {
    /// Exit code 0 is the only success condition.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn from_status(status: ExitStatus, stdout: String, stderr: String) -> Self {
        let exit_code = status.code().unwrap_or_else(|| {
            warn!("Child terminated without an exit code ({status}); reporting 1");
            1
        });
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }
}

// ============================================================================
// RUNNER
// ============================================================================

/// Runs a [`ToolInvocation`] to completion.
///
/// `Err` means the tool could not be started or waited on (a hard failure);
/// a tool that ran and exited non-zero is an `Ok` outcome with that code.
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &ToolInvocation) -> CoreResult<SubprocessOutcome>;
}

/// Runs tools with `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> CoreResult<SubprocessOutcome> {
        debug!("Running: {invocation}");
        let name = invocation.program_name();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        if invocation.stdio == StdioMode::Inherited {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|e| command_start_error(name.as_str(), e))?;
            return Ok(SubprocessOutcome::from_status(status, String::new(), String::new()));
        }

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(name.as_str(), e))?;

        // Both pipes are drained concurrently so a chatty stderr cannot block
        // the child while we wait on stdout.
        let stdout_handle = child
            .stdout
            .take()
            .map(|pipe| thread::spawn(move || drain(pipe, "stdout")));
        let stderr_handle = child
            .stderr
            .take()
            .map(|pipe| thread::spawn(move || drain(pipe, "stderr")));

        let status = child
            .wait()
            .map_err(|e| command_wait_error(name.as_str(), e))?;

        let stdout = stdout_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        let outcome = SubprocessOutcome::from_status(status, stdout, stderr);
        debug!("{name} exited with code {}", outcome.exit_code);
        Ok(outcome)
    }
}

fn drain<R: Read>(pipe: R, label: &'static str) -> String {
    let mut collected = String::new();
    for line in BufReader::new(pipe).lines().map_while(Result::ok) {
        debug!("{label}: {line}");
        collected.push_str(&line);
        collected.push('\n');
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_only_when_needed() {
        let inv = ToolInvocation::new("ffmpeg")
            .args(["-vf", "scale=1280:-2", "-i"])
            .arg("my clip's.mp4");
        assert_eq!(
            inv.to_string(),
            r"ffmpeg -vf scale=1280:-2 -i 'my clip'\''s.mp4'"
        );
    }

    #[test]
    fn test_display_quotes_filter_expressions() {
        let inv = ToolInvocation::new("ffmpeg").arg("pad=1920:1080:(ow-iw)/2:(oh-ih)/2");
        assert_eq!(inv.to_string(), "ffmpeg 'pad=1920:1080:(ow-iw)/2:(oh-ih)/2'");
    }

    #[test]
    fn test_program_name_strips_directories() {
        let inv = ToolInvocation::new("/usr/local/bin/ffprobe");
        assert_eq!(inv.program_name(), "ffprobe");
    }

    #[test]
    fn test_success_only_on_zero() {
        let mut outcome = SubprocessOutcome::default();
        assert!(outcome.success());
        outcome.exit_code = 2;
        assert!(!outcome.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let inv = ToolInvocation::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let outcome = SystemRunner.run(&inv).unwrap();
        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.stdout, "out\n");
        assert_eq!(outcome.stderr, "err\n");
    }

    #[test]
    fn test_system_runner_missing_binary_is_an_error() {
        let inv = ToolInvocation::new("/definitely/not/a/real/tool");
        let err = SystemRunner.run(&inv).unwrap_err();
        assert!(err.to_string().contains("Failed to start 'tool'"));
    }
}
