//! `ff_pad`: fit a video inside a fixed canvas, letterboxing with a colour.

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::{CoreResult, invalid_setting};
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::settings::ResolvedSettings;

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_COLOUR: &str = "black";

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PadParams {
    /// Canvas width
    #[arg(short = 'W', long = "width", value_name = "PX")]
    pub width: Option<u32>,

    /// Canvas height
    #[arg(short = 'H', long = "height", value_name = "PX")]
    pub height: Option<u32>,

    /// Padding colour (name or #RRGGBB)
    #[arg(short = 'c', long = "colour", value_name = "COLOUR")]
    pub colour: Option<String>,
}

impl PadParams {
    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    pub fn colour(&self) -> &str {
        self.colour.as_deref().unwrap_or(DEFAULT_COLOUR)
    }
}

pub struct Pad;

impl Operation for Pad {
    const NAME: &'static str = "ff_pad";
    const ABOUT: &'static str = "Fit a video into a fixed canvas, padding the rest";
    const DEFAULT_OUTPUT: &'static str = "padded.mp4";

    type Params = PadParams;

    fn check_params(params: &PadParams) -> CoreResult<()> {
        if params.width() == 0 || params.height() == 0 {
            return Err(invalid_setting("width", "canvas must be at least 1x1"));
        }
        // Separators would split the filter graph.
        let colour = params.colour();
        if colour.is_empty()
            || !colour
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '@' | '.' | '_'))
        {
            return Err(invalid_setting("colour", format!("'{colour}' is not a colour")));
        }
        Ok(())
    }

    fn prepare(settings: &ResolvedSettings<PadParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let params = &settings.params;

        let invocation = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input(input)
            .video_filter(VideoFilterChain::new().fit_to_canvas(
                params.width(),
                params.height(),
                params.colour(),
            ))
            .args(["-c:a", "copy"])
            .deterministic()
            .output(&settings.output);

        Ok(PreparedCommand::new(invocation, vec![settings.output.clone()]))
    }
}
