// ============================================================================
// ffwrap-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the Wrapper Binaries
//
// All diagnostics go to stderr through the `log` facade so stdout stays free
// for help text and status lines.
//
// USAGE:
// - default: info
// - DEBUG=1: debug (echoes every external command and the concat list)
// - RUST_LOG=...: overrides both
//
// AI-ASSISTANT-INFO: Logger initialisation shared by every binary

use std::io::Write;

use console::style;
use log::{Level, LevelFilter};

/// Initialises the global logger. Calling it twice is harmless.
pub fn init(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let tag = match record.level() {
                Level::Error => style("error").red().bold(),
                Level::Warn => style("warn ").yellow(),
                Level::Info => style("info ").green(),
                Level::Debug => style("debug").blue(),
                Level::Trace => style("trace").magenta(),
            };
            writeln!(buf, "{tag} {}", record.args())
        })
        .try_init();
}
