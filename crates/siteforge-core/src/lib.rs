//! SiteForge Core Library
//!
//! The staged build pipeline that turns a natural-language business
//! description into a deployable, multi-page site bundle:
//!
//! - `domain`: the bundle/state data model
//! - `intents`: deterministic rule engine, element extraction, AI-fallback
//!   wiring
//! - `automations`: recipe tables and entitlement-gated installation
//! - `pipeline`: the stage orchestrator
//! - `provider`: the `AiProvider` trait and its adapters

pub mod automations;
pub mod domain;
pub mod intents;
pub mod obs;
pub mod pipeline;
pub mod provider;
pub mod telemetry;

pub use domain::{
    default_blueprint, BlueprintPage, BrandKit, BuildContext, BuildError, BuildLog, BuildMode,
    BuildPipelineState, BuildStage, BuildStageResult, BusinessBlueprint, Entitlements,
    HandlerDescriptor, IntentBinding, IntentDefinition, IntentWiringResult, IntentWiringRule,
    IntentsBlock, NavItem, PageBundle, PipelineFailure, PipelineResult, Provenance, ProviderError,
    ProviderResult, RouteDef, SiteBundle, SiteManifest, SiteStatus, StageError, StageStatus,
    TraceEntry, TraceLevel,
};

pub use automations::{AutomationCatalog, RecipeDef};
pub use intents::{
    default_catalog, default_rules, ElementExtractor, InteractiveElement, PageWiring, RuleEngine,
    WiringEngine, CATALOG_VERSION,
};
pub use obs::{
    emit_build_finished, emit_build_started, emit_stage_completed, emit_stage_failed,
    emit_stage_skipped, emit_stage_started, BuildSpan,
};
pub use pipeline::{BuildPipeline, BUNDLE_SCHEMA_VERSION};
pub use provider::{AiProvider, HostedProvider, HostedProviderConfig, TemplateProvider};
pub use telemetry::{init_tracing, LogFormat};

/// SiteForge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
