//! Video generation intake.
//!
//! Validates the partial request, fills configured defaults, and persists a
//! `pending` job. The provider is never called here; the submit worker picks
//! the row up on its next tick.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use adgen_models::{AspectRatio, CaptionStyle, VideoJob, VideoRequest, VoiceMode};

use crate::config::IntakeDefaults;
use crate::error::{ApiError, ApiResult};
use crate::handlers::user_id_or_anonymous;
use crate::state::AppState;

/// Request body for `POST /generate-video`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub script_text: Option<String>,
    pub audio_url: Option<String>,
    pub voice_mode: Option<VoiceMode>,
    pub avatar_id: Option<String>,
    pub voice_id: Option<String>,
    pub product_image_url: Option<String>,
    pub product_name: Option<String>,
    pub aspect_ratio: Option<AspectRatio>,
    pub captions_enabled: Option<bool>,
    pub visual_style: Option<String>,
}

/// Response body for `POST /generate-video`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    pub job_id: String,
    pub status: &'static str,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Merge the partial body with the configured defaults.
pub(crate) fn build_request(
    body: GenerateVideoRequest,
    defaults: &IntakeDefaults,
) -> VideoRequest {
    let voice_mode = body.voice_mode.unwrap_or_default();
    let captions_enabled = body.captions_enabled.unwrap_or(defaults.captions_enabled);

    VideoRequest {
        script_text: non_empty(body.script_text)
            .or_else(|| non_empty(Some(defaults.script_text.clone()))),
        audio_url: non_empty(body.audio_url),
        voice_mode,
        avatar_id: non_empty(body.avatar_id).unwrap_or_else(|| defaults.avatar_id.clone()),
        voice_id: non_empty(body.voice_id)
            .or_else(|| non_empty(Some(defaults.voice_id.clone()))),
        product_image_url: non_empty(body.product_image_url)
            .or_else(|| non_empty(Some(defaults.product_image_url.clone()))),
        product_name: non_empty(body.product_name),
        aspect_ratio: body.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        captions_enabled,
        caption_style: captions_enabled.then(|| CaptionStyle {
            style: defaults.caption_style.clone(),
        }),
        visual_style: non_empty(body.visual_style),
    }
}

/// POST /generate-video
pub async fn generate_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GenerateVideoRequest>,
) -> ApiResult<(StatusCode, Json<GenerateVideoResponse>)> {
    let user_id = user_id_or_anonymous(&headers);

    let request = build_request(body, &state.config.defaults);
    request.validate().map_err(ApiError::validation)?;

    let job = VideoJob::pending(&user_id, request);
    state.store.insert(&job).await?;

    info!(job_id = %job.id, user_id = %user_id, "Accepted video request");

    Ok((
        StatusCode::CREATED,
        Json(GenerateVideoResponse {
            job_id: job.id.to_string(),
            status: "pending",
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> IntakeDefaults {
        IntakeDefaults {
            avatar_id: "default-avatar".to_string(),
            voice_id: "default-voice".to_string(),
            script_text: "Hello from the default script".to_string(),
            product_image_url: "https://placehold.co/600x600/png".to_string(),
            aspect_ratio: AspectRatio::Portrait,
            captions_enabled: true,
            caption_style: "normal-black".to_string(),
        }
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let request = build_request(GenerateVideoRequest::default(), &defaults());
        assert_eq!(request.avatar_id, "default-avatar");
        assert_eq!(request.voice_id.as_deref(), Some("default-voice"));
        assert_eq!(
            request.script_text.as_deref(),
            Some("Hello from the default script")
        );
        assert_eq!(request.aspect_ratio, AspectRatio::Portrait);
        assert!(request.captions_enabled);
        assert!(request.caption_style.is_some());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_explicit_fields_win_over_defaults() {
        let body = GenerateVideoRequest {
            script_text: Some("Buy the lamp".to_string()),
            avatar_id: Some("avatar-9".to_string()),
            aspect_ratio: Some(AspectRatio::Landscape),
            captions_enabled: Some(false),
            ..Default::default()
        };
        let request = build_request(body, &defaults());
        assert_eq!(request.script_text.as_deref(), Some("Buy the lamp"));
        assert_eq!(request.avatar_id, "avatar-9");
        assert_eq!(request.aspect_ratio, AspectRatio::Landscape);
        assert!(!request.captions_enabled);
        assert!(request.caption_style.is_none());
    }

    #[test]
    fn test_user_audio_without_recording_fails_validation() {
        let body = GenerateVideoRequest {
            voice_mode: Some(VoiceMode::UserAudio),
            ..Default::default()
        };
        let request = build_request(body, &defaults());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_tts_without_script_or_default_fails_validation() {
        let mut no_script_default = defaults();
        no_script_default.script_text = String::new();

        let request = build_request(GenerateVideoRequest::default(), &no_script_default);
        assert!(request.validate().is_err());
    }
}
