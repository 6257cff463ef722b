//! Structured observability hooks for build lifecycle events.
//!
//! Emission functions for build start/finish and stage start/skip/
//! complete/fail, plus a build-scoped tracing span via the [`BuildSpan`]
//! RAII guard. Events are emitted at `info!` level.

use tracing::info;

/// RAII guard that enters a build-scoped tracing span for the duration of
/// a run.
pub struct BuildSpan {
    _span: tracing::span::EnteredSpan,
}

impl BuildSpan {
    /// Create and enter a span tagged with the build_id.
    pub fn enter(build_id: &str) -> Self {
        let span = tracing::info_span!("siteforge.build", build_id = %build_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: build started.
pub fn emit_build_started(build_id: &str, site_id: &str, mode: &str) {
    info!(event = "build.started", build_id = %build_id, site_id = %site_id, mode = %mode);
}

/// Emit event: build finished with duration and success status.
pub fn emit_build_finished(build_id: &str, duration_ms: u64, success: bool) {
    info!(
        event = "build.finished",
        build_id = %build_id,
        duration_ms = duration_ms,
        success = success,
    );
}

/// Emit event: stage started.
pub fn emit_stage_started(build_id: &str, stage: &str) {
    info!(event = "stage.started", build_id = %build_id, stage = %stage);
}

/// Emit event: stage skipped (mode did not require it).
pub fn emit_stage_skipped(build_id: &str, stage: &str) {
    info!(event = "stage.skipped", build_id = %build_id, stage = %stage);
}

/// Emit event: stage completed.
pub fn emit_stage_completed(build_id: &str, stage: &str) {
    info!(event = "stage.completed", build_id = %build_id, stage = %stage);
}

/// Emit event: stage failed (warning level).
pub fn emit_stage_failed(build_id: &str, stage: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "stage.failed", build_id = %build_id, stage = %stage, error = %error);
}
