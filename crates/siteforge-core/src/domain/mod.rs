//! Domain models for the build pipeline.
//!
//! Canonical definitions for the core entities:
//! - `BuildContext`: immutable input for one run
//! - `SiteBundle`: the artifact being assembled
//! - `IntentDefinition` / `IntentBinding`: the intent model
//! - `BuildPipelineState`: per-run orchestration state

pub mod blueprint;
pub mod bundle;
pub mod context;
pub mod error;
pub mod intent;
pub mod state;

// Re-export main types and errors
pub use blueprint::{
    default_blueprint, BlueprintPage, BrandKit, BusinessBlueprint, ColorTokens, Typography,
};
pub use bundle::{
    AutomationInstall, AutomationsBlock, BuildLog, EntitlementLimits, Entitlements, EntryPoint,
    NavItem, PageBundle, RouteDef, RuntimeBlock, SecretRequirement, SiteBundle, SiteManifest,
    SiteMeta, SiteStatus, TraceEntry, TraceLevel,
};
pub use context::{BuildContext, BuildMode};
pub use error::{
    BuildError, PipelineFailure, PipelineResult, ProviderError, ProviderResult, StageError,
};
pub use intent::{
    BindingTarget, HandlerDescriptor, IntentBinding, IntentDefinition, IntentWiringResult,
    IntentWiringRule, IntentsBlock, ParamKind, ParamSpec, Provenance, TargetStrategy,
};
pub use state::{
    BuildPipelineState, BuildStage, BuildStageResult, StageErrorDetail, StageStatus,
};
