//! Render request snapshot stored with each job.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output aspect ratio for the rendered video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum AspectRatio {
    /// Vertical (stories / reels)
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    /// Square feed
    #[serde(rename = "1:1")]
    Square,
    /// Horizontal
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
        }
    }

    /// The upstream provider writes ratios with an `x` separator.
    pub fn provider_format(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9x16",
            AspectRatio::Square => "1x1",
            AspectRatio::Landscape => "16x9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            "16:9" => Ok(AspectRatio::Landscape),
            other => Err(format!("unknown aspect ratio: {other}")),
        }
    }
}

/// How the spoken track is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoiceMode {
    /// Synthesize speech from `script_text`
    #[default]
    Tts,
    /// Lip-sync to a user-provided recording at `audio_url`
    UserAudio,
}

/// Caption rendering style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionStyle {
    /// Provider style identifier (e.g. "normal-black")
    pub style: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            style: "normal-black".to_string(),
        }
    }
}

/// Everything needed to render one short product video.
///
/// This is the opaque snapshot persisted with the job at intake; workers
/// pass it to the provider verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VideoRequest {
    /// Script to speak (required when `voice_mode = tts`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_text: Option<String>,

    /// Pre-recorded audio (required when `voice_mode = user_audio`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// How the spoken track is produced
    #[serde(default)]
    pub voice_mode: VoiceMode,

    /// Presenter avatar
    pub avatar_id: String,

    /// Voice/accent identifier for TTS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    /// Product image shown in the video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,

    /// Product name overlay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Output aspect ratio
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Whether burned-in captions are rendered
    #[serde(default = "default_captions_enabled")]
    pub captions_enabled: bool,

    /// Caption style, when captions are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_style: Option<CaptionStyle>,

    /// Visual style / scene template identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,
}

fn default_captions_enabled() -> bool {
    true
}

impl VideoRequest {
    /// Validate the voice-mode constraints enforced at intake.
    pub fn validate(&self) -> Result<(), String> {
        match self.voice_mode {
            VoiceMode::Tts => {
                if self
                    .script_text
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .is_none()
                {
                    return Err("scriptText is required when voiceMode is tts".to_string());
                }
            }
            VoiceMode::UserAudio => {
                if self
                    .audio_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .is_none()
                {
                    return Err("audioUrl is required when voiceMode is user_audio".to_string());
                }
            }
        }
        Ok(())
    }
}
