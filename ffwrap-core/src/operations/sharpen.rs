//! `ff_sharpen`: apply the `unsharp` filter to the luma plane.

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::{CoreResult, invalid_setting};
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::settings::ResolvedSettings;

pub const DEFAULT_SIZE: u32 = 5;
pub const DEFAULT_AMOUNT: f32 = 1.0;

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SharpenParams {
    /// Matrix size, odd, 3 to 23
    #[arg(short = 's', long = "size", value_name = "N")]
    pub size: Option<u32>,

    /// Strength, -1.5 (blur) to 1.5
    #[arg(short = 'a', long = "amount", value_name = "AMOUNT", allow_negative_numbers = true)]
    pub amount: Option<f32>,
}

impl SharpenParams {
    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_SIZE)
    }

    pub fn amount(&self) -> f32 {
        self.amount.unwrap_or(DEFAULT_AMOUNT)
    }
}

pub struct Sharpen;

impl Operation for Sharpen {
    const NAME: &'static str = "ff_sharpen";
    const ABOUT: &'static str = "Sharpen (or soften) a video";
    const DEFAULT_OUTPUT: &'static str = "sharpened.mp4";

    type Params = SharpenParams;

    fn check_params(params: &SharpenParams) -> CoreResult<()> {
        let size = params.size();
        if !(3..=23).contains(&size) || size % 2 == 0 {
            return Err(invalid_setting("size", format!("{size} is not an odd number from 3 to 23")));
        }
        let amount = params.amount();
        if !(-1.5..=1.5).contains(&amount) {
            return Err(invalid_setting("amount", format!("{amount} is outside -1.5..1.5")));
        }
        Ok(())
    }

    fn prepare(settings: &ResolvedSettings<SharpenParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let size = settings.params.size();
        let amount = settings.params.amount();

        let invocation = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input(input)
            .video_filter(
                VideoFilterChain::new().add_filter(format!("unsharp={size}:{size}:{amount}:{size}:{size}:0")),
            )
            .args(["-c:a", "copy"])
            .deterministic()
            .output(&settings.output);

        Ok(PreparedCommand::new(invocation, vec![settings.output.clone()]))
    }
}
