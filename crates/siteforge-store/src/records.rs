//! Durable row schemas for SiteForge storage.
//!
//! Three tables back the pipeline:
//! - `sites`: one row per site, status-tracked across builds
//! - `builds`: one row per pipeline run
//! - `bundles`: the serialized artifact, one row per (site, build)
//!
//! Earlier pipeline stages only touch `sites`/`builds`; the full bundle is
//! written exactly once, by the persist stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a site row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SiteRowStatus {
    Draft,
    Preview,
    Published,
}

impl SiteRowStatus {
    /// Stable string form used in queries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteRowStatus::Draft => "draft",
            SiteRowStatus::Preview => "preview",
            SiteRowStatus::Published => "published",
        }
    }
}

/// Lifecycle status of a build row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuildRowStatus {
    Running,
    Completed,
    Failed,
}

/// One generated site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteRecord {
    /// Unique identifier for this site.
    pub site_id: String,

    /// Business entity the site belongs to.
    pub business_id: String,

    /// Owning user.
    pub owner_id: String,

    /// Display name (brand name once branding has run).
    pub name: String,

    /// Current lifecycle status.
    pub status: SiteRowStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One pipeline run against a site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildRecord {
    /// Unique identifier for this build.
    pub build_id: String,

    /// Site this build targets.
    pub site_id: String,

    /// Build mode string (e.g. "systems_ai", "template").
    pub mode: String,

    /// The prompt the run was started from.
    pub prompt: String,

    /// Current run status.
    pub status: BuildRowStatus,

    /// Number of warnings accumulated by the run.
    pub warnings_count: u32,

    /// Number of non-fatal errors accumulated by the run.
    pub errors_count: u32,

    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running).
    pub finished_at: Option<DateTime<Utc>>,
}

impl BuildRecord {
    /// Transition this row to completed with final counters.
    pub fn complete(
        mut self,
        warnings_count: u32,
        errors_count: u32,
        finished_at: DateTime<Utc>,
    ) -> Self {
        self.status = BuildRowStatus::Completed;
        self.warnings_count = warnings_count;
        self.errors_count = errors_count;
        self.finished_at = Some(finished_at);
        self
    }

    /// Transition this row to failed.
    pub fn fail(mut self, errors_count: u32, finished_at: DateTime<Utc>) -> Self {
        self.status = BuildRowStatus::Failed;
        self.errors_count = errors_count;
        self.finished_at = Some(finished_at);
        self
    }
}

/// The persisted bundle artifact.
///
/// `bundle_json` is the full `SiteBundle` serialized by the persist stage;
/// the store treats it as opaque JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleRecord {
    pub site_id: String,
    pub build_id: String,

    /// Bundle schema version (fixed per pipeline release).
    pub version: String,

    /// Serialized `SiteBundle`.
    pub bundle_json: serde_json::Value,

    pub created_at: DateTime<Utc>,
}
