//! `ff_concat`: join clips with the concat demuxer, without re-encoding.
//!
//! Every input is validated; if any one fails the wrapper writes nothing and
//! still exits 0. The list file handed to ffmpeg is private to the
//! invocation and removed once ffmpeg has finished.

use std::io::Write;
use std::path::{self, Path};

use clap::Args;
use log::debug;
use serde::Deserialize;

use super::{Operation, PreparedCommand};
use crate::config::Environment;
use crate::error::{CoreError, CoreResult};
use crate::external::FfmpegCommandBuilder;
use crate::recovery::RecoveryPolicy;
use crate::settings::ResolvedSettings;

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConcatParams {}

/// One line of a concat demuxer list; single quotes become `'\''`.
fn list_entry(path: &Path) -> String {
    let quoted = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{quoted}'")
}

/// Renders the list file content for `inputs`, in order.
pub fn render_list(inputs: &[&Path]) -> CoreResult<String> {
    let mut list = String::new();
    for input in inputs {
        let absolute = path::absolute(input).map_err(|e| {
            CoreError::PathError(format!("Cannot resolve '{}': {e}", input.display()))
        })?;
        list.push_str(&list_entry(&absolute));
        list.push('\n');
    }
    Ok(list)
}

pub struct Concat;

impl Operation for Concat {
    const NAME: &'static str = "ff_concat";
    const ABOUT: &'static str = "Concatenate clips without re-encoding";
    const DEFAULT_OUTPUT: &'static str = "concatenated.mp4";
    const RECOVERY: RecoveryPolicy = RecoveryPolicy::SkipSilently;
    const HELP_EXIT_CODE: i32 = 1;

    type Params = ConcatParams;

    fn preflight_inputs(settings: &ResolvedSettings<ConcatParams>) -> Vec<&Path> {
        settings.inputs.iter().map(|p| p.as_path()).collect()
    }

    fn prepare(settings: &ResolvedSettings<ConcatParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let inputs: Vec<&Path> = settings.inputs.iter().map(|p| p.as_path()).collect();
        if inputs.is_empty() {
            return Err(CoreError::OperationFailed("No input files given".to_string()));
        }
        let content = render_list(&inputs)?;

        let mut list = tempfile::Builder::new()
            .prefix("ffwrap-concat-")
            .suffix(".txt")
            .tempfile()?;
        list.write_all(content.as_bytes())?;
        list.flush()?;
        debug!("Concat list {}:\n{content}", list.path().display());

        let invocation = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input_with(["-f", "concat", "-safe", "0"], list.path())
            .args(["-c", "copy"])
            .deterministic()
            .output(&settings.output);

        Ok(PreparedCommand {
            invocation,
            scratch: Some(list),
            produces: vec![settings.output.clone()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LogLevel, SettingsSource};
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_list_entry_escapes_quotes() {
        assert_eq!(list_entry(Path::new("/clips/a.mp4")), "file '/clips/a.mp4'");
        assert_eq!(
            list_entry(Path::new("/clips/it's.mp4")),
            r"file '/clips/it'\''s.mp4'"
        );
    }

    #[test]
    fn test_list_uses_absolute_paths_in_order() {
        let list = render_list(&[Path::new("b.mp4"), Path::new("/abs/a.mp4")]).unwrap();
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file '/"));
        assert!(lines[0].ends_with("b.mp4'"));
        assert_eq!(lines[1], "file '/abs/a.mp4'");
    }

    #[test]
    fn test_prepare_writes_private_list() {
        let settings = ResolvedSettings {
            inputs: vec![PathBuf::from("/abs/one.mp4"), PathBuf::from("/abs/two.mp4")],
            output: PathBuf::from("joined.mp4"),
            log_level: LogLevel::Error,
            source: SettingsSource::CommandLine,
            params: ConcatParams::default(),
        };
        let first = Concat::prepare(&settings, &Environment::default()).unwrap();
        let second = Concat::prepare(&settings, &Environment::default()).unwrap();

        let first_list = first.scratch.as_ref().unwrap().path().to_path_buf();
        let second_list = second.scratch.as_ref().unwrap().path().to_path_buf();
        assert_ne!(first_list, second_list);
        assert_eq!(
            fs::read_to_string(&first_list).unwrap(),
            "file '/abs/one.mp4'\nfile '/abs/two.mp4'\n"
        );

        let args = first.invocation.args_lossy();
        assert!(args.windows(2).any(|w| w[0] == "-safe" && w[1] == "0"));
        assert_eq!(args.last().map(String::as_str), Some("joined.mp4"));

        drop(first);
        assert!(!first_list.exists());
    }
}
