//! Error types for pipeline orchestration.

use thiserror::Error;

use clipcue_media::MediaError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors surfaced by the clip pipeline.
///
/// Collaborator failures propagate unchanged; the only locally absorbed
/// condition is per-frame decode exhaustion, which never becomes an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Media(#[from] MediaError),
}
