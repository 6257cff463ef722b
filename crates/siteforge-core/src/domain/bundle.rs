//! The site bundle: the complete generated-site artifact.
//!
//! A bundle is assembled in memory across the pipeline stages and written
//! out once, by the persist stage. Invariants maintained throughout:
//! - `manifest.routes[0].is_home` whenever at least one route exists
//! - `runtime.entry.page_id` equals `manifest.routes[0].page_id`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::blueprint::BrandKit;
use crate::domain::context::{BuildContext, BuildMode};
use crate::domain::intent::{IntentBinding, IntentDefinition, IntentsBlock};

/// Lifecycle status of the site within a bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Draft,
    Preview,
    Published,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Draft => "draft",
            SiteStatus::Preview => "preview",
            SiteStatus::Published => "published",
        }
    }
}

/// Identity block of a bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteMeta {
    pub site_id: String,
    pub business_id: String,
    pub owner_id: String,
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Severity of a trace entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraceLevel {
    Info,
    Warn,
    Error,
}

/// One line of the build trace log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEntry {
    pub level: TraceLevel,
    pub stage: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// The `build` block: run identity plus accumulated trace/warning/error
/// output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildLog {
    pub build_id: String,
    pub mode: BuildMode,
    pub prompt: String,
    pub trace: Vec<TraceEntry>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BuildLog {
    /// Append an info-level trace entry.
    pub fn info(&mut self, stage: &str, message: impl Into<String>) {
        self.trace.push(TraceEntry {
            level: TraceLevel::Info,
            stage: stage.to_string(),
            message: message.into(),
            at: Utc::now(),
        });
    }

    /// Append a warn-level trace entry and record the warning.
    pub fn warn(&mut self, stage: &str, message: impl Into<String>) {
        let message = message.into();
        self.warnings.push(message.clone());
        self.trace.push(TraceEntry {
            level: TraceLevel::Warn,
            stage: stage.to_string(),
            message,
            at: Utc::now(),
        });
    }

    /// Append an error-level trace entry and record the error.
    pub fn error(&mut self, stage: &str, message: impl Into<String>) {
        let message = message.into();
        self.errors.push(message.clone());
        self.trace.push(TraceEntry {
            level: TraceLevel::Error,
            stage: stage.to_string(),
            message,
            at: Utc::now(),
        });
    }
}

/// One route in the manifest. Index 0 is always the home route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteDef {
    pub page_id: String,
    pub path: String,
    pub title: String,
    pub is_home: bool,
}

/// One navigation entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub path: String,
    pub order: u32,
}

/// The `manifest` block: ordered routes, navigation, layouts, metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteManifest {
    pub routes: Vec<RouteDef>,
    pub nav: Vec<NavItem>,
    pub layouts: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Generated content for one page, plus the bindings scoped to it.
///
/// Owned exclusively by the bundle; never shared across pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageBundle {
    pub page_id: String,
    pub title: String,

    /// Rendered page markup.
    pub markup: String,

    /// Section names in render order.
    pub sections: Vec<String>,

    /// Bindings whose `page_id` is this page.
    pub intent_bindings: Vec<IntentBinding>,
}

/// One installed automation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationInstall {
    pub id: String,
    pub recipe: String,

    /// False when the recipe needs secrets that are not yet configured.
    pub enabled: bool,

    pub installed_at: DateTime<Utc>,
}

/// A secret the owner must supply before a disabled automation can run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretRequirement {
    /// Secret provider name (deduplication key).
    pub provider: String,

    /// Environment key the deployment expects.
    pub key: String,

    /// Human-readable reason the secret is needed.
    pub reason: String,
}

/// The `automations` block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AutomationsBlock {
    pub installed: Vec<AutomationInstall>,
    pub secrets_required: Vec<SecretRequirement>,
}

/// Numeric plan limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitlementLimits {
    pub pages_max: u32,
    pub automations_max: u32,
    pub bindings_max: u32,
}

/// The `entitlements` block: plan, feature flags, numeric limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entitlements {
    pub plan: String,
    pub features: BTreeMap<String, bool>,
    pub limits: EntitlementLimits,
}

impl Entitlements {
    /// The fixed free-tier default applied by the entitlements stage.
    pub fn free_tier() -> Self {
        let mut features = BTreeMap::new();
        features.insert("custom_domain".to_string(), false);
        features.insert("ai_rebuild".to_string(), true);
        features.insert("form_capture".to_string(), true);
        features.insert("analytics".to_string(), false);

        Self {
            plan: "free".to_string(),
            features,
            limits: EntitlementLimits {
                pages_max: 5,
                automations_max: 10,
                bindings_max: 50,
            },
        }
    }
}

/// Entry page pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryPoint {
    pub page_id: String,
}

/// The `runtime` block: execution engine preferences and entry page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeBlock {
    pub preferred_engine: String,
    pub allowed_engines: Vec<String>,
    pub entry: EntryPoint,
}

/// The complete generated-site artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteBundle {
    pub site: SiteMeta,
    pub build: BuildLog,
    pub brand: BrandKit,
    pub manifest: SiteManifest,
    pub pages: BTreeMap<String, PageBundle>,
    pub intents: IntentsBlock,
    pub automations: AutomationsBlock,
    pub entitlements: Entitlements,
    pub runtime: RuntimeBlock,
}

impl SiteBundle {
    /// Build the skeleton bundle a run starts from: draft site, one home
    /// route, the default intent catalog, free-tier entitlements.
    pub fn skeleton(
        ctx: &BuildContext,
        site_id: &str,
        build_id: &str,
        catalog_version: &str,
        catalog: BTreeMap<String, IntentDefinition>,
    ) -> Self {
        let now = Utc::now();
        let home = RouteDef {
            page_id: "home".to_string(),
            path: "/".to_string(),
            title: "Home".to_string(),
            is_home: true,
        };

        Self {
            site: SiteMeta {
                site_id: site_id.to_string(),
                business_id: ctx.business_id.clone(),
                owner_id: ctx.owner_id.clone(),
                status: SiteStatus::Draft,
                created_at: now,
                updated_at: now,
            },
            build: BuildLog {
                build_id: build_id.to_string(),
                mode: ctx.mode,
                prompt: ctx.prompt.clone(),
                trace: Vec::new(),
                warnings: Vec::new(),
                errors: Vec::new(),
                started_at: now,
                finished_at: None,
            },
            brand: BrandKit::placeholder(),
            manifest: SiteManifest {
                nav: vec![NavItem {
                    label: home.title.clone(),
                    path: home.path.clone(),
                    order: 0,
                }],
                routes: vec![home],
                layouts: vec!["standard".to_string()],
                metadata: BTreeMap::new(),
            },
            pages: BTreeMap::new(),
            intents: IntentsBlock {
                catalog_version: catalog_version.to_string(),
                catalog,
                bindings: Vec::new(),
            },
            automations: AutomationsBlock::default(),
            entitlements: Entitlements::free_tier(),
            runtime: RuntimeBlock {
                preferred_engine: "static".to_string(),
                allowed_engines: vec!["static".to_string(), "hydrated".to_string()],
                entry: EntryPoint {
                    page_id: "home".to_string(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> BuildContext {
        BuildContext::new("a bakery in Lisbon", "biz-1", "owner-1", BuildMode::Template)
    }

    #[test]
    fn test_skeleton_invariants() {
        let bundle = SiteBundle::skeleton(&ctx(), "s1", "b1", "1.0.0", BTreeMap::new());
        assert_eq!(bundle.site.status, SiteStatus::Draft);
        assert!(bundle.manifest.routes[0].is_home);
        assert_eq!(
            bundle.runtime.entry.page_id,
            bundle.manifest.routes[0].page_id
        );
        assert_eq!(bundle.entitlements.plan, "free");
        assert_eq!(bundle.entitlements.limits.pages_max, 5);
    }

    #[test]
    fn test_build_log_warn_accumulates() {
        let mut bundle = SiteBundle::skeleton(&ctx(), "s1", "b1", "1.0.0", BTreeMap::new());
        bundle.build.info("init", "stage init started");
        bundle.build.warn("automations", "missing secret RESEND_API_KEY");
        bundle.build.error("persist", "PERSIST_FAILED: boom");

        assert_eq!(bundle.build.trace.len(), 3);
        assert_eq!(bundle.build.warnings.len(), 1);
        assert_eq!(bundle.build.errors.len(), 1);
        assert_eq!(bundle.build.trace[1].level, TraceLevel::Warn);
    }

    #[test]
    fn test_free_tier_features() {
        let ent = Entitlements::free_tier();
        assert_eq!(ent.features.get("custom_domain"), Some(&false));
        assert_eq!(ent.features.get("ai_rebuild"), Some(&true));
        assert_eq!(ent.limits.bindings_max, 50);
    }

    #[test]
    fn test_bundle_serializes_to_stable_json() {
        let bundle = SiteBundle::skeleton(&ctx(), "s1", "b1", "1.0.0", BTreeMap::new());
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["site"]["status"], "draft");
        assert_eq!(value["build"]["mode"], "template");
        assert_eq!(value["runtime"]["entry"]["page_id"], "home");
    }
}
