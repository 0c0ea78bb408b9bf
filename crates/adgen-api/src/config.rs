//! API configuration.

use std::time::Duration;

use adgen_models::AspectRatio;

/// Defaults filled in by intake when the client omits a field.
#[derive(Debug, Clone)]
pub struct IntakeDefaults {
    pub avatar_id: String,
    pub voice_id: String,
    pub script_text: String,
    pub product_image_url: String,
    pub aspect_ratio: AspectRatio,
    pub captions_enabled: bool,
    pub caption_style: String,
}

impl Default for IntakeDefaults {
    fn default() -> Self {
        Self {
            avatar_id: String::new(),
            voice_id: String::new(),
            script_text: "Check out this amazing product!".to_string(),
            product_image_url: "https://placehold.co/600x600/png".to_string(),
            aspect_ratio: AspectRatio::Portrait,
            captions_enabled: true,
            caption_style: "normal-black".to_string(),
        }
    }
}

impl IntakeDefaults {
    /// Create defaults from environment variables.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            avatar_id: std::env::var("DEFAULT_AVATAR_ID").unwrap_or(base.avatar_id),
            voice_id: std::env::var("DEFAULT_VOICE_ID").unwrap_or(base.voice_id),
            script_text: std::env::var("DEFAULT_SCRIPT_TEXT").unwrap_or(base.script_text),
            product_image_url: std::env::var("DEFAULT_PRODUCT_IMAGE_URL")
                .unwrap_or(base.product_image_url),
            aspect_ratio: std::env::var("DEFAULT_ASPECT_RATIO")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(base.aspect_ratio),
            captions_enabled: std::env::var("DEFAULT_CAPTIONS_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(base.captions_enabled),
            caption_style: std::env::var("DEFAULT_CAPTION_STYLE").unwrap_or(base.caption_style),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Per-IP rate limit, requests per second
    pub rate_limit_rps: u32,
    /// Catalog cache TTL (avatars, voices, credit balance)
    pub catalog_cache_ttl: Duration,
    /// Cap applied to list-jobs responses
    pub list_jobs_limit: i64,
    /// Environment (development/production)
    pub environment: String,
    /// Intake defaults
    pub defaults: IntakeDefaults,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            catalog_cache_ttl: Duration::from_secs(3600),
            list_jobs_limit: 100,
            environment: "development".to_string(),
            defaults: IntakeDefaults::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            catalog_cache_ttl: Duration::from_secs(
                std::env::var("CATALOG_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            list_jobs_limit: std::env::var("LIST_JOBS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            defaults: IntakeDefaults::from_env(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
