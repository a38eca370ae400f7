// ============================================================================
// ffwrap-core/src/resolve.rs
// ============================================================================
//
// ARGUMENT/CONFIG RESOLVER: Command Line or JSON Config -> ResolvedSettings
//
// Resolution happens in two mutually exclusive ways:
//
// - With `-C/--config <file>`, the JSON document is the only source. Every
//   other flag on the command line is ignored, whether or not the config
//   defines the same field.
// - Without a config, the command-line flags are the source.
//
// Relative paths from a config file are resolved against the directory the
// config file lives in; relative paths from the command line are left as
// given (i.e. relative to the working directory).
//
// AI-ASSISTANT-INFO: Pure resolution step, no filesystem access besides reading the config

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgMatches, Command, FromArgMatches, value_parser};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::{CoreError, config_error};
use crate::operations::Operation;
use crate::settings::{CommonOverrides, ResolvedSettings, SettingsSource};

const CONFIG_ARG: &str = "config";

// ============================================================================
// RESOLUTION ERRORS
// ============================================================================

/// Why resolution stopped before producing settings.
#[derive(Debug)]
pub enum ResolveError {
    /// `-h/--help` was given; carries the rendered help text.
    Help(String),
    /// A token starting with `-` that no flag matches.
    UnknownFlag { flag: String, usage: String },
    /// Any other command-line problem (missing value, bad value, ...),
    /// already rendered by clap.
    InvalidArguments(String),
    /// The config file could not be read or has the wrong shape.
    Config(CoreError),
}

// ============================================================================
// CONFIG DOCUMENT
// ============================================================================

/// The two accepted shapes of a config file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigDocument {
    /// `{"input": "...", "output": "...", ...}`
    Flat(Map<String, Value>),
    /// `{"ff_rotate": {"input": "...", ...}}`
    Namespaced {
        name: String,
        settings: Map<String, Value>,
    },
}

impl ConfigDocument {
    /// Parses and normalizes a JSON config document.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let Value::Object(map) = value else {
            return Err("expected a JSON object at the top level".to_string());
        };

        if map.len() == 1 {
            if let Some((name, Value::Object(settings))) = map.iter().next() {
                return Ok(ConfigDocument::Namespaced {
                    name: name.clone(),
                    settings: settings.clone(),
                });
            }
        }
        Ok(ConfigDocument::Flat(map))
    }

    /// Returns the settings object, warning when a namespaced document was
    /// written for a different tool.
    pub fn into_settings(self, tool_name: &str) -> Map<String, Value> {
        match self {
            ConfigDocument::Flat(settings) => settings,
            ConfigDocument::Namespaced { name, settings } => {
                if name != tool_name {
                    warn!("Config is namespaced under '{name}', using it for {tool_name}");
                }
                settings
            }
        }
    }
}

// ============================================================================
// COMMAND DEFINITION
// ============================================================================

/// Builds the clap command for an operation: common flags, `-C/--config`,
/// then the operation's own flags.
pub fn command<O: Operation>() -> Command {
    let command = Command::new(O::NAME)
        .about(O::ABOUT)
        .disable_version_flag(true)
        .arg(
            Arg::new(CONFIG_ARG)
                .short('C')
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("JSON config file; when given, all other flags are ignored"),
        );
    let command = <CommonOverrides as clap::Args>::augment_args(command);
    <O::Params as clap::Args>::augment_args(command)
}

/// Renders the help text for an operation.
pub fn help_text<O: Operation>() -> String {
    command::<O>().render_help().to_string()
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolves the full argument vector (including the program name) into
/// settings for operation `O`.
///
/// Arguments are parsed twice. The first pass checks only their shape
/// (unknown flags, help, missing values) with every value kept as a raw
/// string, so a config file can replace flags whose values would not parse.
/// The typed pass runs only when no config file was given.
pub fn resolve<O, I, T>(args: I) -> Result<ResolvedSettings<O::Params>, ResolveError>
where
    O: Operation,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let shape = command::<O>()
        .mut_args(untyped)
        .try_get_matches_from(args.iter().cloned())
        .map_err(classify_clap_error::<O>)?;
    if let Some(config_path) = shape.get_one::<PathBuf>(CONFIG_ARG) {
        return resolve_from_config::<O>(config_path);
    }

    let matches = command::<O>()
        .try_get_matches_from(args)
        .map_err(classify_clap_error::<O>)?;
    resolve_from_matches::<O>(&matches)
}

/// Accepts any value for a flag that takes one; `-C/--config` keeps its parser.
fn untyped(arg: Arg) -> Arg {
    if arg.get_id().as_str() == CONFIG_ARG || !arg.get_action().takes_values() {
        arg
    } else {
        arg.value_parser(value_parser!(OsString))
    }
}

fn classify_clap_error<O: Operation>(err: clap::Error) -> ResolveError {
    let mut command = command::<O>();
    match err.kind() {
        ErrorKind::DisplayHelp => ResolveError::Help(command.render_help().to_string()),
        ErrorKind::UnknownArgument => {
            let flag = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(flag)) => flag.clone(),
                _ => "<unknown>".to_string(),
            };
            ResolveError::UnknownFlag {
                flag,
                usage: command.render_usage().to_string(),
            }
        }
        _ => ResolveError::InvalidArguments(err.render().to_string()),
    }
}

fn resolve_from_matches<O: Operation>(
    matches: &ArgMatches,
) -> Result<ResolvedSettings<O::Params>, ResolveError> {
    let common = CommonOverrides::from_arg_matches(matches)
        .map_err(|e| ResolveError::InvalidArguments(e.render().to_string()))?;
    let params = <O::Params as FromArgMatches>::from_arg_matches(matches)
        .map_err(|e| ResolveError::InvalidArguments(e.render().to_string()))?;

    if !common.stray.is_empty() {
        debug!("Ignoring stray arguments: {:?}", common.stray);
    }
    debug!("Settings resolved from the command line");
    Ok(settle::<O>(common, params, SettingsSource::CommandLine))
}

fn resolve_from_config<O: Operation>(
    config_path: &Path,
) -> Result<ResolvedSettings<O::Params>, ResolveError> {
    let text = fs::read_to_string(config_path)
        .map_err(|e| ResolveError::Config(config_error(config_path, e.to_string())))?;
    let document = ConfigDocument::parse(&text)
        .map_err(|message| ResolveError::Config(config_error(config_path, message)))?;
    let settings = Value::Object(document.into_settings(O::NAME));

    let mut common: CommonOverrides = serde_json::from_value(settings.clone())
        .map_err(|e| ResolveError::Config(config_error(config_path, e.to_string())))?;
    let params: O::Params = serde_json::from_value(settings)
        .map_err(|e| ResolveError::Config(config_error(config_path, e.to_string())))?;

    let base = config_dir(config_path);
    common.input = common
        .input
        .into_iter()
        .map(|path| rebase(&base, path))
        .collect();
    common.output = common.output.map(|path| rebase(&base, path));

    debug!("Settings resolved from config {}", config_path.display());
    Ok(settle::<O>(
        common,
        params,
        SettingsSource::ConfigFile(config_path.to_path_buf()),
    ))
}

/// Applies defaults and produces the immutable settings record.
fn settle<O: Operation>(
    common: CommonOverrides,
    params: O::Params,
    source: SettingsSource,
) -> ResolvedSettings<O::Params> {
    let output = common
        .output
        .unwrap_or_else(|| PathBuf::from(O::DEFAULT_OUTPUT));

    ResolvedSettings {
        inputs: common.input,
        output: O::finalize_output(output),
        log_level: common.loglevel.unwrap_or_default(),
        params,
        source,
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
