//! `ff_rotate`: rotate a video clockwise by an arbitrary angle.
//!
//! Right angles use lossless-geometry filters (`transpose`, `hflip,vflip`);
//! a full turn stream-copies; anything else goes through the `rotate` filter
//! with the output canvas grown to the rotated bounding box.

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::CoreResult;
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::settings::ResolvedSettings;

pub const DEFAULT_ROTATION: i32 = 90;

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RotateParams {
    /// Clockwise rotation in degrees
    #[arg(short = 'r', long = "rotation", value_name = "DEGREES", allow_negative_numbers = true)]
    pub rotation: Option<i32>,
}

impl RotateParams {
    /// Rotation normalised into `0..360`.
    pub fn degrees(&self) -> i32 {
        self.rotation.unwrap_or(DEFAULT_ROTATION).rem_euclid(360)
    }
}

/// Filter for a normalised angle; `None` means no rotation at all.
fn rotation_filter(degrees: i32) -> Option<String> {
    match degrees {
        0 => None,
        90 => Some("transpose=1".to_string()),
        180 => Some("hflip,vflip".to_string()),
        270 => Some("transpose=2".to_string()),
        other => {
            let radians = format!("{other}*PI/180");
            Some(format!(
                "rotate={radians}:ow=rotw({radians}):oh=roth({radians})"
            ))
        }
    }
}

pub struct Rotate;

impl Operation for Rotate {
    const NAME: &'static str = "ff_rotate";
    const ABOUT: &'static str = "Rotate a video clockwise";
    const DEFAULT_OUTPUT: &'static str = "rotated.mp4";

    type Params = RotateParams;

    fn prepare(settings: &ResolvedSettings<RotateParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let builder = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level).input(input);

        let builder = match rotation_filter(settings.params.degrees()) {
            Some(filter) => builder
                .video_filter(VideoFilterChain::new().add_filter(filter))
                .args(["-c:a", "copy"]),
            None => builder.args(["-c", "copy"]),
        };
        let invocation = builder.deterministic().output(&settings.output);

        Ok(PreparedCommand::new(invocation, vec![settings.output.clone()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LogLevel, SettingsSource};
    use std::path::PathBuf;

    fn args_for(rotation: i32) -> Vec<String> {
        let settings = ResolvedSettings {
            inputs: vec![PathBuf::from("in.mp4")],
            output: PathBuf::from("out.mp4"),
            log_level: LogLevel::Error,
            source: SettingsSource::CommandLine,
            params: RotateParams {
                rotation: Some(rotation),
            },
        };
        Rotate::prepare(&settings, &Environment::default())
            .unwrap()
            .invocation
            .args_lossy()
    }

    #[test]
    fn test_normalisation() {
        let p = |r| RotateParams { rotation: Some(r) };
        assert_eq!(p(450).degrees(), 90);
        assert_eq!(p(-90).degrees(), 270);
        assert_eq!(p(360).degrees(), 0);
        assert_eq!(RotateParams::default().degrees(), 90);
    }

    #[test]
    fn test_right_angles() {
        assert!(args_for(90).contains(&"transpose=1".to_string()));
        assert!(args_for(180).contains(&"hflip,vflip".to_string()));
        assert!(args_for(-90).contains(&"transpose=2".to_string()));
    }

    #[test]
    fn test_full_turn_stream_copies() {
        let args = args_for(720);
        assert!(!args.contains(&"-vf".to_string()));
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
    }

    #[test]
    fn test_arbitrary_angle_grows_canvas() {
        assert_eq!(
            rotation_filter(45).unwrap(),
            "rotate=45*PI/180:ow=rotw(45*PI/180):oh=roth(45*PI/180)"
        );
    }
}
