//! `ff_thumbnail`: pick representative frames with ffmpeg's `thumbnail` filter.

use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::{CoreResult, invalid_setting};
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::settings::ResolvedSettings;
use crate::utils::{numbered_path, numbered_pattern, with_default_extension};

pub const DEFAULT_COUNT: u32 = 1;
/// Frames the filter looks at before choosing one.
pub const DEFAULT_SAMPLE: u32 = 300;

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ThumbnailParams {
    /// Number of thumbnails to write
    #[arg(short = 'c', long = "count", value_name = "N")]
    pub count: Option<u32>,

    /// Frames examined per thumbnail
    #[arg(short = 's', long = "sample", value_name = "FRAMES")]
    pub sample: Option<u32>,
}

impl ThumbnailParams {
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_COUNT)
    }

    pub fn sample(&self) -> u32 {
        self.sample.unwrap_or(DEFAULT_SAMPLE)
    }
}

pub struct Thumbnail;

impl Operation for Thumbnail {
    const NAME: &'static str = "ff_thumbnail";
    const ABOUT: &'static str = "Extract representative thumbnail frames from a video";
    const DEFAULT_OUTPUT: &'static str = "thumbnail.png";

    type Params = ThumbnailParams;

    fn finalize_output(output: PathBuf) -> PathBuf {
        with_default_extension(output, "png")
    }

    fn check_params(params: &ThumbnailParams) -> CoreResult<()> {
        if params.count() == 0 {
            return Err(invalid_setting("count", "must be at least 1"));
        }
        if params.sample() == 0 {
            return Err(invalid_setting("sample", "must be at least 1"));
        }
        Ok(())
    }

    fn prepare(settings: &ResolvedSettings<ThumbnailParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let count = settings.params.count();

        // Several frames need an image2 sequence pattern.
        let (target, produces) = if count > 1 {
            let produces = (1..=count)
                .map(|index| numbered_path(&settings.output, index))
                .collect();
            (numbered_pattern(&settings.output), produces)
        } else {
            (settings.output.clone(), vec![settings.output.clone()])
        };

        let invocation = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input(input)
            .video_filter(
                VideoFilterChain::new().add_filter(format!("thumbnail={}", settings.params.sample())),
            )
            .arg("-frames:v")
            .arg(count.to_string())
            .args(["-vsync", "vfr"])
            .output(&target);

        Ok(PreparedCommand::new(invocation, produces))
    }
}
