// ============================================================================
// ffwrap-core/src/pipeline.rs
// ============================================================================
//
// DISPATCHER: Runs One Wrapper Invocation End to End
//
// resolve -> check params -> preflight -> (recover | prepare -> execute)
//
// Every stage returns a value instead of exiting the process. The result is
// a tagged `Outcome`, and `Outcome::exit_code` is the only place where an
// outcome becomes a process exit code.
//
// AI-ASSISTANT-INFO: Top-level control flow shared by every wrapper binary

use std::ffi::OsString;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::config::Environment;
use crate::external::ToolRunner;
use crate::operations::{Operation, PreparedCommand};
use crate::probe;
use crate::recovery::{self, RecoveryAction};
use crate::resolve::{ResolveError, resolve};
use crate::settings::ResolvedSettings;

// ============================================================================
// OUTCOME
// ============================================================================

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every stage passed; the tool ran and exited 0.
    Continue,
    /// Preflight failed and the recovery policy handled it.
    SoftFailure { reason: String },
    /// Unrecoverable: tool missing, tool failed, config unreadable, ...
    HardFailure {
        code: i32,
        message: String,
        /// Captured stderr of the failed tool, if any.
        detail: String,
    },
    /// Help or a command-line error; `text` goes to stdout for help and to
    /// stderr otherwise.
    UsageExit { code: i32, text: String, is_error: bool },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Continue | Outcome::SoftFailure { .. } => 0,
            // A failure must never look like success to the caller.
            Outcome::HardFailure { code, .. } => {
                if *code == 0 {
                    1
                } else {
                    *code
                }
            }
            Outcome::UsageExit { code, .. } => *code,
        }
    }

    fn hard(code: i32, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Outcome::HardFailure {
            code,
            message: message.into(),
            detail: detail.into(),
        }
    }
}

/// Everything the binary needs to print and exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub tool: &'static str,
    pub outcome: Outcome,
    pub recovery: Option<RecoveryAction>,
    /// Files written on success (or by a pass-through copy).
    pub produced: Vec<PathBuf>,
}

impl Report {
    fn new(tool: &'static str, outcome: Outcome) -> Self {
        Self {
            tool,
            outcome,
            recovery: None,
            produced: Vec::new(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Runs wrapper invocations against an environment and a tool runner.
pub struct Pipeline<'a, R: ToolRunner + ?Sized> {
    env: &'a Environment,
    runner: &'a R,
}

impl<'a, R: ToolRunner + ?Sized> Pipeline<'a, R> {
    pub fn new(env: &'a Environment, runner: &'a R) -> Self {
        Self { env, runner }
    }

    /// Runs operation `O` for a full argument vector (program name first).
    pub fn run<O, I, T>(&self, args: I) -> Report
    where
        O: Operation,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let settings = match resolve::<O, _, _>(args) {
            Ok(settings) => settings,
            Err(err) => return Report::new(O::NAME, resolve_failure::<O>(err)),
        };

        if let Err(err) = O::check_params(&settings.params) {
            return Report::new(
                O::NAME,
                Outcome::UsageExit {
                    code: 1,
                    text: format!("{err}\n"),
                    is_error: true,
                },
            );
        }

        self.run_resolved::<O>(&settings)
    }

    /// Runs operation `O` for settings that were already resolved.
    pub fn run_resolved<O: Operation>(&self, settings: &ResolvedSettings<O::Params>) -> Report {
        debug!("{} settings: {settings:?}", O::NAME);

        if let Err(reason) = self.preflight::<O>(settings) {
            return self.recover::<O>(settings, reason);
        }

        let prepared = match O::prepare(settings, self.env) {
            Ok(prepared) => prepared,
            Err(err) => return Report::new(O::NAME, Outcome::hard(1, err.to_string(), "")),
        };
        self.execute::<O>(prepared)
    }

    fn preflight<O: Operation>(&self, settings: &ResolvedSettings<O::Params>) -> Result<(), String> {
        let inputs = O::preflight_inputs(settings);
        if inputs.is_empty() {
            warn!("{}: no input file given", O::NAME);
            return Err("No input file given".to_string());
        }

        for input in inputs {
            let result = probe::validate(
                self.runner,
                self.env,
                Some(input),
                O::INPUT_KIND,
                settings.log_level,
            );
            if !result.is_valid {
                warn!(
                    "{}: cannot use {}: {}",
                    O::NAME,
                    input.display(),
                    result.diagnostic_output.trim()
                );
                return Err(result.diagnostic_output);
            }
        }
        Ok(())
    }

    fn recover<O: Operation>(&self, settings: &ResolvedSettings<O::Params>, reason: String) -> Report {
        match recovery::recover(O::RECOVERY, settings.input(), &settings.output) {
            Ok(action) => {
                let produced = match &action {
                    RecoveryAction::Copied { to, .. } => vec![to.clone()],
                    _ => Vec::new(),
                };
                Report {
                    tool: O::NAME,
                    outcome: Outcome::SoftFailure { reason },
                    recovery: Some(action),
                    produced,
                }
            }
            Err(err) => Report::new(O::NAME, Outcome::hard(1, err.to_string(), reason)),
        }
    }

    fn execute<O: Operation>(&self, prepared: PreparedCommand) -> Report {
        let PreparedCommand {
            invocation,
            scratch,
            produces,
        } = prepared;
        let name = invocation.program_name();

        let result = self.runner.run(&invocation);
        // The list file must live until the child is done with it.
        drop(scratch);

        match result {
            Err(err) => Report::new(O::NAME, Outcome::hard(1, err.to_string(), "")),
            Ok(outcome) if outcome.success() => {
                info!("{} finished", O::NAME);
                Report {
                    tool: O::NAME,
                    outcome: Outcome::Continue,
                    recovery: None,
                    produced: produces,
                }
            }
            Ok(outcome) => Report::new(
                O::NAME,
                Outcome::hard(
                    outcome.exit_code,
                    format!("{name} exited with code {}", outcome.exit_code),
                    outcome.stderr,
                ),
            ),
        }
    }
}

fn resolve_failure<O: Operation>(err: ResolveError) -> Outcome {
    match err {
        ResolveError::Help(text) => Outcome::UsageExit {
            code: O::HELP_EXIT_CODE,
            text,
            is_error: false,
        },
        ResolveError::UnknownFlag { flag, usage } => Outcome::UsageExit {
            code: 1,
            text: format!("Unknown option: {flag}\n\n{usage}\n"),
            is_error: true,
        },
        ResolveError::InvalidArguments(text) => Outcome::UsageExit {
            code: 1,
            text,
            is_error: true,
        },
        ResolveError::Config(err) => Outcome::hard(1, err.to_string(), ""),
    }
}
