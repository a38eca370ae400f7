//! `ff_shell`: run a shell script with the terminal attached.
//!
//! The script is the `-i` input; it is only checked for existence. A missing
//! script is a soft failure like any other: nothing runs and the exit is 0.

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::CoreResult;
use crate::external::{StdioMode, ToolInvocation};
use crate::probe::InputKind;
use crate::settings::ResolvedSettings;

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ShellParams {
    /// Argument passed to the script (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    #[serde(alias = "args")]
    pub arg: Vec<String>,
}

pub struct ShellRunner;

impl Operation for ShellRunner {
    const NAME: &'static str = "ff_shell";
    const ABOUT: &'static str = "Run a shell script";
    const DEFAULT_OUTPUT: &'static str = "";
    const INPUT_KIND: InputKind = InputKind::File;
    const HELP_EXIT_CODE: i32 = 1;

    type Params = ShellParams;

    fn prepare(settings: &ResolvedSettings<ShellParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let script = require_input(settings)?;
        let invocation = ToolInvocation::new(&env.shell)
            .arg(script)
            .args(&settings.params.arg)
            .stdio(StdioMode::Inherited);

        Ok(PreparedCommand::new(invocation, Vec::new()))
    }
}
