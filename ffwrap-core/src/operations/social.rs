//! `ff_social`: reformat a clip for a social media platform.
//!
//! Each platform has a canvas size and, for most, a maximum duration. The
//! clip is fitted into the canvas, trimmed to the cap, and encoded as
//! H.264/AAC with the moov atom up front for streaming.

use clap::{Args, ValueEnum};
use serde::Deserialize;

use super::{Operation, PreparedCommand, require_input};
use crate::config::Environment;
use crate::error::CoreResult;
use crate::external::{FfmpegCommandBuilder, VideoFilterChain};
use crate::settings::ResolvedSettings;

/// Target platform.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    #[default]
    Instagram,
    InstagramStory,
    Tiktok,
    Youtube,
    YoutubeShorts,
    Twitter,
}

/// Canvas and length limits of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub width: u32,
    pub height: u32,
    /// Seconds; `None` when the platform does not cap length.
    pub max_duration: Option<u32>,
}

impl Platform {
    pub fn profile(self) -> PlatformProfile {
        let (width, height, max_duration) = match self {
            Platform::Instagram => (1080, 1080, Some(60)),
            Platform::InstagramStory => (1080, 1920, Some(15)),
            Platform::Tiktok => (1080, 1920, Some(180)),
            Platform::Youtube => (1920, 1080, None),
            Platform::YoutubeShorts => (1080, 1920, Some(60)),
            Platform::Twitter => (1280, 720, Some(140)),
        };
        PlatformProfile {
            width,
            height,
            max_duration,
        }
    }
}

#[derive(Args, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SocialParams {
    /// Target platform
    #[arg(short = 'p', long = "platform", value_name = "PLATFORM", value_enum)]
    pub platform: Option<Platform>,
}

impl SocialParams {
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_default()
    }
}

pub struct Social;

impl Operation for Social {
    const NAME: &'static str = "ff_social";
    const ABOUT: &'static str = "Reformat a video for a social media platform";
    const DEFAULT_OUTPUT: &'static str = "social.mp4";

    type Params = SocialParams;

    fn prepare(settings: &ResolvedSettings<SocialParams>, env: &Environment) -> CoreResult<PreparedCommand> {
        let input = require_input(settings)?;
        let profile = settings.params.platform().profile();

        let mut builder = FfmpegCommandBuilder::new(&env.ffmpeg, settings.log_level)
            .input(input)
            .video_filter(VideoFilterChain::new().fit_to_canvas(profile.width, profile.height, "black"))
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac"])
            .args(["-movflags", "+faststart"]);
        if let Some(max) = profile.max_duration {
            builder = builder.arg("-t").arg(max.to_string());
        }
        let invocation = builder.deterministic().output(&settings.output);

        Ok(PreparedCommand::new(invocation, vec![settings.output.clone()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LogLevel, SettingsSource};
    use std::path::PathBuf;

    fn args_for(platform: Platform) -> Vec<String> {
        let settings = ResolvedSettings {
            inputs: vec![PathBuf::from("in.mp4")],
            output: PathBuf::from("social.mp4"),
            log_level: LogLevel::Error,
            source: SettingsSource::CommandLine,
            params: SocialParams {
                platform: Some(platform),
            },
        };
        Social::prepare(&settings, &Environment::default())
            .unwrap()
            .invocation
            .args_lossy()
    }

    #[test]
    fn test_story_is_vertical_and_capped() {
        let args = args_for(Platform::InstagramStory);
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert!(args[vf + 1].starts_with("scale=1080:1920"));
        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "15"));
        assert!(args.contains(&"+faststart".to_string()));
    }

    #[test]
    fn test_youtube_has_no_duration_cap() {
        let args = args_for(Platform::Youtube);
        assert!(!args.contains(&"-t".to_string()));
    }

    #[test]
    fn test_platform_names_in_config() {
        let params: SocialParams = serde_json::from_str(r#"{"platform": "youtube-shorts"}"#).unwrap();
        assert_eq!(params.platform(), Platform::YoutubeShorts);
        assert_eq!(SocialParams::default().platform(), Platform::Instagram);
    }

    #[test]
    fn test_profiles() {
        assert_eq!(
            Platform::Twitter.profile(),
            PlatformProfile {
                width: 1280,
                height: 720,
                max_duration: Some(140)
            }
        );
        assert_eq!(Platform::Tiktok.profile().max_duration, Some(180));
    }
}
