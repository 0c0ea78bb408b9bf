//! Adapter I/O types and the Creatify wire shapes.

use serde::{Deserialize, Serialize};

use adgen_models::JobStatus;

// ============================================================================
// Adapter outputs (internal vocabulary)
// ============================================================================

/// Result of a successful job creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderJob {
    /// Provider-assigned identifier, the key for later status polls
    pub provider_job_id: String,
    /// Initial status, already normalized
    pub status: JobStatus,
}

/// Result of one status poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderJobStatus {
    pub status: JobStatus,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub credits_used: Option<i32>,
    pub error_message: Option<String>,
    /// Render progress 0-100 when the provider reports it
    pub progress: Option<u8>,
}

impl Default for ProviderJob {
    fn default() -> Self {
        Self {
            provider_job_id: String::new(),
            status: JobStatus::Submitted,
        }
    }
}

// ============================================================================
// Creatify wire shapes
// ============================================================================

/// Body for `POST /api/lipsyncs/`.
#[derive(Debug, Serialize)]
pub struct CreateLipsyncRequest {
    pub aspect_ratio: String,

    pub creator: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_asset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub no_captions: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,
}

/// Response body for lipsync create and status reads.
#[derive(Debug, Deserialize)]
pub struct LipsyncResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub video_thumbnail: Option<String>,
    #[serde(default)]
    pub credits_used: Option<i32>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub progress: Option<f32>,
}

/// One avatar entry from `GET /api/personas/`.
#[derive(Debug, Deserialize)]
pub struct PersonaResponse {
    pub id: String,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub preview_image_16_9: Option<String>,
    #[serde(default)]
    pub preview_image_9_16: Option<String>,
}

/// One voice entry from `GET /api/voices/`, with nested accents.
#[derive(Debug, Deserialize)]
pub struct VoiceResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub accents: Vec<AccentResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AccentResponse {
    pub id: String,
    #[serde(default)]
    pub accent_name: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// Response body for `GET /api/remaining_credits/`.
#[derive(Debug, Deserialize)]
pub struct RemainingCreditsResponse {
    pub remaining_credits: i64,
}
