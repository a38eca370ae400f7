// ffwrap-cli/src/lib.rs
//
// Shared entry point for the wrapper binaries. Each binary under `src/bin/`
// is a one-line `main` that picks its operation and calls `run`.

pub mod error;
pub mod logging;
pub mod output;
pub mod terminal;

use std::process;

use ffwrap_core::{Environment, Operation, Pipeline, SystemRunner};
use log::debug;

/// Runs operation `O` with the process arguments and exits with its code.
pub fn run<O: Operation>() -> ! {
    let env = Environment::from_env();
    logging::init(env.debug);
    debug!("{} environment: {env:?}", O::NAME);

    let runner = SystemRunner;
    let report = Pipeline::new(&env, &runner).run::<O, _, _>(std::env::args_os());

    if let Err(err) = output::print_report(&report) {
        debug!("Could not print report: {err}");
    }
    process::exit(report.exit_code())
}
