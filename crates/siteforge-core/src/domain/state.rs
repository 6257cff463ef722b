//! Pipeline run state: stages, statuses, and the state object the
//! orchestrator hands back to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::blueprint::BusinessBlueprint;
use crate::domain::bundle::SiteBundle;
use crate::domain::context::BuildMode;
use crate::domain::error::StageError;

/// The eight fixed pipeline stages, in execution order.
///
/// `Ord` follows declaration order, so a `BTreeMap<BuildStage, _>` iterates
/// in pipeline order.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
    Init,
    Blueprint,
    Brand,
    Pages,
    Intents,
    Automations,
    Entitlements,
    Persist,
}

impl BuildStage {
    /// Fixed execution order. Stage order is linear, not data-driven.
    pub const ORDER: [BuildStage; 8] = [
        BuildStage::Init,
        BuildStage::Blueprint,
        BuildStage::Brand,
        BuildStage::Pages,
        BuildStage::Intents,
        BuildStage::Automations,
        BuildStage::Entitlements,
        BuildStage::Persist,
    ];

    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BuildStage::Init => "init",
            BuildStage::Blueprint => "blueprint",
            BuildStage::Brand => "brand",
            BuildStage::Pages => "pages",
            BuildStage::Intents => "intents",
            BuildStage::Automations => "automations",
            BuildStage::Entitlements => "entitlements",
            BuildStage::Persist => "persist",
        }
    }
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Status of a single stage within a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

/// Error detail captured on a failed stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageErrorDetail {
    /// Error code, `"{STAGE}_FAILED"`.
    pub code: String,
    pub message: String,
}

impl From<&StageError> for StageErrorDetail {
    fn from(err: &StageError) -> Self {
        Self {
            code: err.code.clone(),
            message: err.message.clone(),
        }
    }
}

/// Result record for one stage of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildStageResult {
    pub stage: BuildStage,
    pub status: StageStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<StageErrorDetail>,
}

impl BuildStageResult {
    fn pending(stage: BuildStage) -> Self {
        Self {
            stage,
            status: StageStatus::Pending,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    /// Transition to running and record the start timestamp.
    pub fn start(&mut self) {
        self.status = StageStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Transition to completed.
    pub fn complete(&mut self) {
        self.status = StageStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Transition to skipped.
    pub fn skip(&mut self) {
        self.status = StageStatus::Skipped;
        self.completed_at = Some(Utc::now());
    }

    /// Transition to failed, capturing the error detail.
    pub fn fail(&mut self, err: &StageError) {
        self.status = StageStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(StageErrorDetail::from(err));
    }
}

/// Orchestration-only state for one pipeline run.
///
/// Created at run start, mutated stage-by-stage, returned to the caller at
/// run end (on failure, inside the error). Exactly one instance exists per
/// run; it is never shared across concurrent runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildPipelineState {
    pub build_id: String,
    pub site_id: String,
    pub mode: BuildMode,

    /// Stage currently executing (None before start and after completion).
    pub current_stage: Option<BuildStage>,

    /// Per-stage results, keyed by stage.
    pub stages: BTreeMap<BuildStage, BuildStageResult>,

    /// The bundle under construction.
    pub bundle: SiteBundle,

    /// Blueprint resolved by the blueprint stage; `None` means the local
    /// default applies.
    pub blueprint: Option<BusinessBlueprint>,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BuildPipelineState {
    /// Create run state with every stage pending.
    pub fn new(site_id: String, build_id: String, mode: BuildMode, bundle: SiteBundle) -> Self {
        let stages = BuildStage::ORDER
            .iter()
            .map(|s| (*s, BuildStageResult::pending(*s)))
            .collect();

        Self {
            build_id,
            site_id,
            mode,
            current_stage: None,
            stages,
            bundle,
            blueprint: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Immutable view of one stage's result.
    pub fn stage(&self, stage: BuildStage) -> &BuildStageResult {
        // All eight keys are inserted at construction.
        &self.stages[&stage]
    }

    /// Mutable view of one stage's result.
    pub fn stage_mut(&mut self, stage: BuildStage) -> &mut BuildStageResult {
        self.stages
            .get_mut(&stage)
            .expect("all stages initialized at construction")
    }
}
