//! `ff_scale`: resize a video with the `scale` filter.

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::{CoreResult, invalid_setting};
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::settings::ResolvedSettings;

pub const DEFAULT_WIDTH: i32 = 1280;
/// `-2` keeps the aspect ratio and rounds to an even height.
pub const DEFAULT_HEIGHT: i32 = -2;

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScaleParams {
    /// Target width (-1/-2 keep aspect ratio)
    #[arg(short = 'W', long = "width", value_name = "PX", allow_negative_numbers = true)]
    pub width: Option<i32>,

    /// Target height (-1/-2 keep aspect ratio)
    #[arg(short = 'H', long = "height", value_name = "PX", allow_negative_numbers = true)]
    pub height: Option<i32>,
}

impl ScaleParams {
    pub fn width(&self) -> i32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn height(&self) -> i32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }
}

fn check_dimension(name: &'static str, value: i32) -> CoreResult<()> {
    if value == 0 || value < -2 {
        return Err(invalid_setting(name, format!("{value} is neither a size nor -1/-2")));
    }
    Ok(())
}

pub struct Scale;

impl Operation for Scale {
    const NAME: &'static str = "ff_scale";
    const ABOUT: &'static str = "Resize a video";
    const DEFAULT_OUTPUT: &'static str = "scaled.mp4";

    type Params = ScaleParams;

    fn check_params(params: &ScaleParams) -> CoreResult<()> {
        check_dimension("width", params.width())?;
        check_dimension("height", params.height())?;
        if params.width() < 0 && params.height() < 0 {
            return Err(invalid_setting("width", "width and height cannot both be derived"));
        }
        Ok(())
    }

    fn prepare(settings: &ResolvedSettings<ScaleParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let params = &settings.params;

        let invocation = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input(input)
            .video_filter(
                VideoFilterChain::new().add_filter(format!("scale={}:{}", params.width(), params.height())),
            )
            .args(["-c:a", "copy"])
            .deterministic()
            .output(&settings.output);

        Ok(PreparedCommand::new(invocation, vec![settings.output.clone()]))
    }
}
