//! Domain-level error taxonomy for the build pipeline.

use siteforge_store::StoreError;
use thiserror::Error;

use crate::domain::state::{BuildPipelineState, BuildStage};

/// Errors produced by `AiProvider` adapters.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider endpoint returned a non-success status.
    #[error("provider api error: {0}")]
    Api(String),

    /// The response body could not be decoded.
    #[error("provider response decode failed: {0}")]
    Decode(String),

    /// The request never completed (connect, TLS, timeout).
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The adapter is missing required configuration.
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// A collaborator or serialization failure inside a stage executor,
/// before the orchestrator tags it with the owning stage.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("bundle serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stage execution failure: code `"{STAGE}_FAILED"` plus the original
/// message.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct StageError {
    pub code: String,
    pub message: String,
}

impl StageError {
    /// Wrap an executor failure with the owning stage's code.
    pub fn new(stage: BuildStage, message: impl std::fmt::Display) -> Self {
        Self {
            code: format!("{}_FAILED", stage.name().to_uppercase()),
            message: message.to_string(),
        }
    }
}

/// Terminal pipeline failure.
///
/// Carries the full [`BuildPipelineState`] so callers can inspect exactly
/// which stage failed and why; durable side effects of earlier stages are
/// not rolled back.
#[derive(Debug, Error)]
#[error("build {build_id} failed at stage {stage}: {error}")]
pub struct PipelineFailure {
    pub build_id: String,
    pub stage: BuildStage,
    pub error: StageError,
    pub state: Box<BuildPipelineState>,
}

/// Result type for pipeline execution.
pub type PipelineResult<T> = std::result::Result<T, PipelineFailure>;

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_code_format() {
        let err = StageError::new(BuildStage::Pages, "provider timed out");
        assert_eq!(err.code, "PAGES_FAILED");
        assert!(err.to_string().contains("PAGES_FAILED"));
        assert!(err.to_string().contains("provider timed out"));
    }

    #[test]
    fn test_build_error_wraps_store() {
        let err: BuildError = StoreError::Backend("connection reset".to_string()).into();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_build_error_wraps_provider() {
        let err: BuildError = ProviderError::Api("502 Bad Gateway".to_string()).into();
        assert!(err.to_string().contains("502"));
    }
}
