//! Creatify HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use adgen_models::{Avatar, CreditBalance, VideoRequest, VoiceMode, VoiceOption};

use crate::error::{ProviderError, ProviderResult};
use crate::status::normalize_status;
use crate::types::{
    CreateLipsyncRequest, LipsyncResponse, PersonaResponse, ProviderJob, ProviderJobStatus,
    RemainingCreditsResponse, VoiceResponse,
};
use crate::VideoProvider;

// ============================================================================
// Configuration
// ============================================================================

/// Creatify client configuration.
#[derive(Debug, Clone)]
pub struct CreatifyConfig {
    /// API base URL
    pub base_url: String,
    /// Workspace API id (sent as `X-API-ID`)
    pub api_id: String,
    /// Workspace API key (sent as `X-API-KEY`)
    pub api_key: String,
    /// Request timeout for create calls. A timed-out create loses the
    /// provider id and cannot be safely retried, so this deadline is much
    /// longer than the poll one.
    pub create_timeout: Duration,
    /// Request timeout for polls and catalog reads
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl CreatifyConfig {
    /// Create config from environment variables. Missing credentials fail
    /// fast with a descriptive error.
    pub fn from_env() -> ProviderResult<Self> {
        let api_id = std::env::var("CREATIFY_API_ID")
            .map_err(|_| ProviderError::config("CREATIFY_API_ID must be set"))?;
        let api_key = std::env::var("CREATIFY_API_KEY")
            .map_err(|_| ProviderError::config("CREATIFY_API_KEY must be set"))?;

        if api_id.is_empty() || api_key.is_empty() {
            return Err(ProviderError::config(
                "CREATIFY_API_ID and CREATIFY_API_KEY cannot be empty",
            ));
        }

        Ok(Self {
            base_url: std::env::var("CREATIFY_BASE_URL")
                .unwrap_or_else(|_| "https://api.creatify.ai".to_string()),
            api_id,
            api_key,
            create_timeout: Duration::from_secs(
                std::env::var("CREATIFY_CREATE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(90),
            ),
            timeout: Duration::from_secs(
                std::env::var("CREATIFY_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
            connect_timeout: Duration::from_secs(5),
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP adapter for the Creatify lipsync API.
pub struct CreatifyProvider {
    http: Client,
    config: CreatifyConfig,
}

impl CreatifyProvider {
    /// Create a new adapter.
    pub fn new(config: CreatifyConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("adgen-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ProviderResult<Self> {
        Self::new(CreatifyConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-ID", &self.config.api_id)
            .header("X-API-KEY", &self.config.api_key)
    }

    /// Turn a non-success response into the matching error kind.
    async fn error_for(response: Response) -> ProviderError {
        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let message = response.text().await.unwrap_or_default();
        ProviderError::from_http_status(status.as_u16(), message, retry_after_secs)
    }

    fn lipsync_to_status(body: LipsyncResponse) -> ProviderJobStatus {
        ProviderJobStatus {
            status: normalize_status(&body.status),
            video_url: body.output,
            thumbnail_url: body.video_thumbnail,
            credits_used: body.credits_used,
            error_message: body.error_message,
            progress: body.progress.map(|p| (p.clamp(0.0, 100.0)) as u8),
        }
    }
}

/// Build the lipsync payload from a render request.
///
/// Aspect ratios cross the boundary in the provider's `9x16` form. With
/// `user_audio` and a recording present, the audio field is sent; otherwise
/// the script text goes out with the accent when one is chosen.
pub(crate) fn build_payload(request: &VideoRequest) -> CreateLipsyncRequest {
    let use_audio =
        request.voice_mode == VoiceMode::UserAudio && request.audio_url.is_some();

    CreateLipsyncRequest {
        aspect_ratio: request.aspect_ratio.provider_format().to_string(),
        creator: request.avatar_id.clone(),
        text: if use_audio {
            None
        } else {
            request.script_text.clone()
        },
        accent: if use_audio {
            None
        } else {
            request.voice_id.clone()
        },
        audio: if use_audio {
            request.audio_url.clone()
        } else {
            None
        },
        product_asset: request.product_image_url.clone(),
        name: request.product_name.clone(),
        no_captions: !request.captions_enabled,
        caption_style: request
            .caption_style
            .as_ref()
            .filter(|_| request.captions_enabled)
            .map(|c| c.style.clone()),
        visual_style: request.visual_style.clone(),
    }
}

#[async_trait]
impl VideoProvider for CreatifyProvider {
    async fn create_job(&self, request: &VideoRequest) -> ProviderResult<ProviderJob> {
        let payload = build_payload(request);
        debug!(avatar_id = %request.avatar_id, "Creating provider render");

        let response = self
            .auth(self.http.post(self.url("/api/lipsyncs/")))
            .timeout(self.config.create_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: LipsyncResponse = response.json().await.map_err(ProviderError::Network)?;
        if body.id.is_empty() {
            return Err(ProviderError::invalid_response(
                "create response missing job id",
            ));
        }

        Ok(ProviderJob {
            provider_job_id: body.id,
            status: normalize_status(&body.status),
        })
    }

    async fn check_job_status(&self, provider_job_id: &str) -> ProviderResult<ProviderJobStatus> {
        let response = self
            .auth(
                self.http
                    .get(self.url(&format!("/api/lipsyncs/{provider_job_id}/"))),
            )
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::invalid_response(format!(
                "provider job {provider_job_id} not found"
            )));
        }
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: LipsyncResponse = response.json().await.map_err(ProviderError::Network)?;
        Ok(Self::lipsync_to_status(body))
    }

    async fn list_avatars(&self) -> ProviderResult<Vec<Avatar>> {
        let response = self
            .auth(self.http.get(self.url("/api/personas/")))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let personas: Vec<PersonaResponse> = response.json().await.map_err(ProviderError::Network)?;
        Ok(personas
            .into_iter()
            .map(|p| Avatar {
                name: p.creator_name.unwrap_or_else(|| p.id.clone()),
                id: p.id,
                gender: p.gender,
                preview_url: p.preview_image_9_16.or(p.preview_image_16_9),
            })
            .collect())
    }

    async fn list_voices(&self) -> ProviderResult<Vec<VoiceOption>> {
        let response = self
            .auth(self.http.get(self.url("/api/voices/")))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let voices: Vec<VoiceResponse> = response.json().await.map_err(ProviderError::Network)?;
        Ok(flatten_voices(voices))
    }

    async fn credit_balance(&self) -> ProviderResult<CreditBalance> {
        let response = self
            .auth(self.http.get(self.url("/api/remaining_credits/")))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: RemainingCreditsResponse = response.json().await.map_err(ProviderError::Network)?;
        Ok(CreditBalance {
            remaining_credits: body.remaining_credits,
        })
    }
}

/// Flatten each `(voice, accent)` pair into one selectable option keyed by
/// the accent id. Voices with no accents are dropped: there is nothing to
/// send to the create call for them.
pub(crate) fn flatten_voices(voices: Vec<VoiceResponse>) -> Vec<VoiceOption> {
    let mut options = Vec::new();
    for voice in voices {
        let name = voice.name.unwrap_or_else(|| "Unnamed voice".to_string());
        if voice.accents.is_empty() {
            warn!(voice = %name, "Voice has no accents, skipping");
            continue;
        }
        for accent in voice.accents {
            options.push(VoiceOption {
                id: accent.id,
                name: name.clone(),
                gender: voice.gender.clone(),
                accent_name: accent.accent_name,
                preview_url: accent.preview_url,
            });
        }
    }
    options
}
