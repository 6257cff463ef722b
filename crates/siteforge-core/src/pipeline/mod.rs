//! Build pipeline orchestration.
//!
//! [`BuildPipeline`] drives the eight fixed stages in order, owns the
//! per-run [`BuildPipelineState`], decides skip vs. execute, and converts
//! executor failures into stage-failure records. There is no rollback:
//! durable side effects of completed stages survive a later failure.

mod stages;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::automations::AutomationCatalog;
use crate::domain::bundle::SiteBundle;
use crate::domain::context::{BuildContext, BuildMode};
use crate::domain::error::{BuildError, PipelineFailure, PipelineResult, StageError};
use crate::domain::state::{BuildPipelineState, BuildStage};
use crate::intents::catalog::{default_catalog, CATALOG_VERSION};
use crate::intents::rules::RuleEngine;
use crate::intents::wiring::WiringEngine;
use crate::obs::{
    emit_build_finished, emit_build_started, emit_stage_completed, emit_stage_failed,
    emit_stage_skipped, emit_stage_started,
};
use crate::provider::AiProvider;
use siteforge_store::SiteStore;

/// Version string stamped into every persisted bundle row.
pub const BUNDLE_SCHEMA_VERSION: &str = "1.0.0";

/// The staged build pipeline orchestrator.
///
/// One instance can serve many runs, but each run gets its own state
/// object; nothing here is shared mutable across runs.
pub struct BuildPipeline {
    store: Arc<dyn SiteStore>,
    provider: Arc<dyn AiProvider>,
    wiring: WiringEngine,
    automations: AutomationCatalog,
}

impl BuildPipeline {
    /// Pipeline with the default rule table and automation catalog.
    pub fn new(store: Arc<dyn SiteStore>, provider: Arc<dyn AiProvider>) -> Self {
        Self {
            store,
            provider,
            wiring: WiringEngine::with_defaults(),
            automations: AutomationCatalog::with_defaults(),
        }
    }

    /// Replace the deterministic rule table.
    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.wiring = WiringEngine::new(rules);
        self
    }

    /// Replace the automation catalog.
    pub fn with_automations(mut self, automations: AutomationCatalog) -> Self {
        self.automations = automations;
        self
    }

    /// Execute one build run.
    ///
    /// Stages run strictly sequentially in fixed order. The first stage
    /// failure aborts the run; the error carries the full state so callers
    /// can see exactly which stage failed and why.
    pub async fn execute(&self, ctx: BuildContext) -> PipelineResult<BuildPipelineState> {
        let run_start = Instant::now();
        let site_id = format!("site-{}", Uuid::new_v4());
        let build_id = format!("bld-{}", Uuid::new_v4());

        let bundle = SiteBundle::skeleton(&ctx, &site_id, &build_id, CATALOG_VERSION, default_catalog());
        let mut state = BuildPipelineState::new(site_id.clone(), build_id.clone(), ctx.mode, bundle);

        emit_build_started(&build_id, &site_id, ctx.mode.as_str());

        for stage in BuildStage::ORDER {
            // Blueprint generation is only meaningful when an AI-authored
            // blueprint was requested; other modes use the local default.
            if stage == BuildStage::Blueprint && ctx.mode != BuildMode::SystemsAi {
                state.stage_mut(stage).skip();
                state
                    .bundle
                    .build
                    .info(stage.name(), format!("stage skipped (mode {})", ctx.mode));
                emit_stage_skipped(&build_id, stage.name());
                continue;
            }

            state.current_stage = Some(stage);
            state.stage_mut(stage).start();
            state
                .bundle
                .build
                .info(stage.name(), format!("stage {} started", stage.name()));
            emit_stage_started(&build_id, stage.name());

            match self.dispatch(stage, &mut state, &ctx).await {
                Ok(()) => {
                    state.stage_mut(stage).complete();
                    state
                        .bundle
                        .build
                        .info(stage.name(), format!("stage {} completed", stage.name()));
                    emit_stage_completed(&build_id, stage.name());
                }
                Err(err) => {
                    let stage_err = StageError::new(stage, &err);
                    state.stage_mut(stage).fail(&stage_err);
                    state.bundle.build.error(stage.name(), stage_err.to_string());
                    emit_stage_failed(&build_id, stage.name(), &stage_err);
                    emit_build_finished(&build_id, run_start.elapsed().as_millis() as u64, false);
                    return Err(PipelineFailure {
                        build_id,
                        stage,
                        error: stage_err,
                        state: Box::new(state),
                    });
                }
            }
        }

        state.current_stage = None;
        state.completed_at = Some(Utc::now());
        emit_build_finished(&build_id, run_start.elapsed().as_millis() as u64, true);
        Ok(state)
    }

    async fn dispatch(
        &self,
        stage: BuildStage,
        state: &mut BuildPipelineState,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        match stage {
            BuildStage::Init => self.stage_init(state).await,
            BuildStage::Blueprint => self.stage_blueprint(state, ctx).await,
            BuildStage::Brand => self.stage_brand(state, ctx).await,
            BuildStage::Pages => self.stage_pages(state, ctx).await,
            BuildStage::Intents => self.stage_intents(state).await,
            BuildStage::Automations => self.stage_automations(state, ctx).await,
            BuildStage::Entitlements => self.stage_entitlements(state, ctx).await,
            BuildStage::Persist => self.stage_persist(state).await,
        }
    }
}
