//! `ff_image`: turn a still image into a fixed-length H.264 clip.

use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::{CoreResult, invalid_setting};
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::probe::InputKind;
use crate::settings::ResolvedSettings;
use crate::utils::with_default_extension;

pub const DEFAULT_DURATION: f64 = 5.0;
pub const DEFAULT_FRAMERATE: u32 = 30;

/// libx264 with yuv420p needs even dimensions.
const EVEN_DIMENSIONS: &str = "scale=trunc(iw/2)*2:trunc(ih/2)*2";

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ImageParams {
    /// Clip length in seconds
    #[arg(short = 'd', long = "duration", value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Output frame rate
    #[arg(short = 'r', long = "framerate", value_name = "FPS")]
    pub framerate: Option<u32>,
}

impl ImageParams {
    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or(DEFAULT_DURATION)
    }

    pub fn framerate(&self) -> u32 {
        self.framerate.unwrap_or(DEFAULT_FRAMERATE)
    }
}

pub struct ImageToVideo;

impl Operation for ImageToVideo {
    const NAME: &'static str = "ff_image";
    const ABOUT: &'static str = "Turn a still image into a video clip";
    const DEFAULT_OUTPUT: &'static str = "output.mp4";
    const INPUT_KIND: InputKind = InputKind::Image;

    type Params = ImageParams;

    fn finalize_output(output: PathBuf) -> PathBuf {
        with_default_extension(output, "mp4")
    }

    fn check_params(params: &ImageParams) -> CoreResult<()> {
        let duration = params.duration();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(invalid_setting("duration", "must be a positive number of seconds"));
        }
        if !(1..=240).contains(&params.framerate()) {
            return Err(invalid_setting("framerate", "must be between 1 and 240"));
        }
        Ok(())
    }

    fn prepare(settings: &ResolvedSettings<ImageParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let params = &settings.params;

        let invocation = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input_with(["-loop", "1"], input)
            .arg("-t")
            .arg(params.duration().to_string())
            .arg("-r")
            .arg(params.framerate().to_string())
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .video_filter(VideoFilterChain::new().add_filter(EVEN_DIMENSIONS))
            .deterministic()
            .output(&settings.output);

        Ok(PreparedCommand::new(invocation, vec![settings.output.clone()]))
    }
}
