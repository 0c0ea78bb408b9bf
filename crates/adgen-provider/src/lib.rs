//! Upstream video-provider adapter.
//!
//! This crate provides:
//! - The `VideoProvider` capability trait every internal component codes
//!   against
//! - The Creatify HTTP adapter with status-vocabulary normalization
//! - A programmable fake for tests and keyless local development

use async_trait::async_trait;

use adgen_models::{Avatar, CreditBalance, VideoRequest, VoiceOption};

pub mod creatify;
pub mod error;
pub mod fake;
pub mod status;
pub mod types;

pub use creatify::{CreatifyConfig, CreatifyProvider};
pub use error::{ProviderError, ProviderResult};
pub use fake::FakeProvider;
pub use types::{ProviderJob, ProviderJobStatus};

/// Capability set of an upstream AI video service.
///
/// One implementation exists today; the trait is the seam a second vendor
/// would plug into. Implementations normalize the vendor's status
/// vocabulary so everything behind this trait sees only the internal
/// `JobStatus` set.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Submit a render. Returns the provider's job id and initial status.
    async fn create_job(&self, request: &VideoRequest) -> ProviderResult<ProviderJob>;

    /// Read the current state of a previously created render.
    async fn check_job_status(&self, provider_job_id: &str) -> ProviderResult<ProviderJobStatus>;

    /// Available presenter avatars.
    async fn list_avatars(&self) -> ProviderResult<Vec<Avatar>>;

    /// Available voices, flattened to one option per `(voice, accent)`.
    async fn list_voices(&self) -> ProviderResult<Vec<VoiceOption>>;

    /// Remaining credits on the account.
    async fn credit_balance(&self) -> ProviderResult<CreditBalance>;
}
