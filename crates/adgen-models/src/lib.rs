//! Shared domain types for the adgen backend.
//!
//! This crate defines the video job lifecycle, the render request snapshot,
//! and the catalog types returned by the upstream provider. It has no I/O.

pub mod catalog;
pub mod job;
pub mod request;

pub use catalog::{Avatar, CreditBalance, VoiceOption};
pub use job::{JobId, JobPatch, JobStatus, StatusParseError, VideoJob};
pub use request::{AspectRatio, CaptionStyle, VideoRequest, VoiceMode};
