// ffwrap-core/src/external/mocks.rs

// --- Scripted runner (for testing) ---

// Only compiled for unit tests or with the "test-mocks" feature.
#![cfg(any(test, feature = "test-mocks"))]

//! A [`ToolRunner`] that never spawns anything.
//!
//! Expectations are matched against the rendered command line of each
//! invocation; the first expectation whose pattern is a substring wins and
//! may be matched any number of times. Invocations with no matching
//! expectation fail as if the binary were missing. Every invocation is
//! recorded for later assertions.

use std::io;
use std::sync::Mutex;

use super::{SubprocessOutcome, ToolInvocation, ToolRunner};
use crate::error::{CoreResult, command_start_error};

/// What a matched invocation returns.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Exit(SubprocessOutcome),
    NotFound,
}

impl ScriptedResponse {
    pub fn exit(code: i32) -> Self {
        ScriptedResponse::Exit(SubprocessOutcome {
            exit_code: code,
            ..Default::default()
        })
    }

    pub fn stdout(code: i32, stdout: &str) -> Self {
        ScriptedResponse::Exit(SubprocessOutcome {
            exit_code: code,
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn stderr(code: i32, stderr: &str) -> Self {
        ScriptedResponse::Exit(SubprocessOutcome {
            exit_code: code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }
}

#[derive(Default)]
pub struct ScriptedRunner {
    expectations: Mutex<Vec<(String, ScriptedResponse)>>,
    received: Mutex<Vec<ToolInvocation>>,
    /// Contents of every `-f concat` list file at the moment it was run.
    concat_lists: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a response for invocations whose command line contains `pattern`.
    #[must_use]
    pub fn on(self, pattern: &str, response: ScriptedResponse) -> Self {
        self.lock_expectations()
            .push((pattern.to_string(), response));
        self
    }

    /// ffprobe reports `codec` for the first video stream.
    #[must_use]
    pub fn probe_reports(self, codec: &str) -> Self {
        self.on("ffprobe", ScriptedResponse::stdout(0, &format!("{codec}\n")))
    }

    /// ffprobe fails the way it does on a file that is not media.
    #[must_use]
    pub fn probe_rejects(self) -> Self {
        self.on(
            "ffprobe",
            ScriptedResponse::stderr(1, "Invalid data found when processing input\n"),
        )
    }

    /// ffmpeg runs and exits with `code`.
    #[must_use]
    pub fn ffmpeg_exits(self, code: i32) -> Self {
        self.on("ffmpeg", ScriptedResponse::exit(code))
    }

    pub fn received(&self) -> Vec<ToolInvocation> {
        self.received
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Invocations of a given program name.
    pub fn received_for(&self, program_name: &str) -> Vec<ToolInvocation> {
        self.received()
            .into_iter()
            .filter(|inv| inv.program_name() == program_name)
            .collect()
    }

    pub fn concat_lists(&self) -> Vec<String> {
        self.concat_lists
            .lock()
            .map(|lists| lists.clone())
            .unwrap_or_default()
    }

    fn lock_expectations(&self) -> std::sync::MutexGuard<'_, Vec<(String, ScriptedResponse)>> {
        match self.expectations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn capture_concat_list(&self, invocation: &ToolInvocation) {
        let args = invocation.args_lossy();
        let is_concat = args.windows(2).any(|w| w[0] == "-f" && w[1] == "concat");
        if !is_concat {
            return;
        }
        let list = args
            .windows(2)
            .find(|w| w[0] == "-i")
            .and_then(|w| std::fs::read_to_string(&w[1]).ok());
        if let (Some(list), Ok(mut lists)) = (list, self.concat_lists.lock()) {
            lists.push(list);
        }
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, invocation: &ToolInvocation) -> CoreResult<SubprocessOutcome> {
        if let Ok(mut received) = self.received.lock() {
            received.push(invocation.clone());
        }
        self.capture_concat_list(invocation);

        let rendered = invocation.to_string();
        let response = self
            .lock_expectations()
            .iter()
            .find(|(pattern, _)| rendered.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            Some(ScriptedResponse::Exit(outcome)) => Ok(outcome),
            Some(ScriptedResponse::NotFound) | None => Err(command_start_error(
                invocation.program_name(),
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            )),
        }
    }
}
