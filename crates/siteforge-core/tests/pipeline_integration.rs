//! Integration tests for the full build pipeline with in-memory storage.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use siteforge_core::{
    default_blueprint, AiProvider, BrandKit, BuildContext, BuildMode, BuildPipeline, BuildStage,
    BusinessBlueprint, IntentDefinition, IntentWiringResult, PageBundle, ProviderError,
    ProviderResult, RouteDef, SiteStatus, StageStatus, TemplateProvider,
};
use siteforge_store::fakes::{FailingOp, FailingSiteStore, MemorySiteStore};
use siteforge_store::{BuildRowStatus, SiteStore};

/// Provider whose blueprint/page/inference behavior is scripted per test.
#[derive(Default)]
struct ScriptedProvider {
    blueprint_calls: AtomicU32,
    infer_calls: AtomicU32,
    fail_blueprint: bool,
    infer_fails: bool,
    /// page_id -> markup override; pages not listed get inert markup.
    page_markup: BTreeMap<String, String>,
}

impl ScriptedProvider {
    fn with_markup(page_id: &str, markup: &str) -> Self {
        let mut page_markup = BTreeMap::new();
        page_markup.insert(page_id.to_string(), markup.to_string());
        Self {
            page_markup,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    async fn generate_blueprint(&self, ctx: &BuildContext) -> ProviderResult<BusinessBlueprint> {
        self.blueprint_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_blueprint {
            return Err(ProviderError::Api("blueprint backend down".to_string()));
        }
        Ok(default_blueprint(ctx.industry.as_deref()))
    }

    async fn generate_brand_kit(
        &self,
        blueprint: &BusinessBlueprint,
        ctx: &BuildContext,
    ) -> ProviderResult<BrandKit> {
        TemplateProvider::new().generate_brand_kit(blueprint, ctx).await
    }

    async fn generate_page(
        &self,
        route: &RouteDef,
        _blueprint: &BusinessBlueprint,
        _brand: &BrandKit,
        _ctx: &BuildContext,
    ) -> ProviderResult<PageBundle> {
        let markup = self
            .page_markup
            .get(&route.page_id)
            .cloned()
            .unwrap_or_else(|| format!("<section><h2>{}</h2></section>", route.title));
        Ok(PageBundle {
            page_id: route.page_id.clone(),
            title: route.title.clone(),
            markup,
            sections: vec!["content".to_string()],
            intent_bindings: Vec::new(),
        })
    }

    async fn infer_intent(
        &self,
        _text: &str,
        _role: &str,
        _catalog: &[IntentDefinition],
    ) -> ProviderResult<Option<IntentWiringResult>> {
        self.infer_calls.fetch_add(1, Ordering::SeqCst);
        if self.infer_fails {
            return Err(ProviderError::Api("inference backend down".to_string()));
        }
        Ok(None)
    }
}

fn template_ctx() -> BuildContext {
    BuildContext::new(
        "a family bakery, fresh bread daily",
        "biz-1",
        "owner-1",
        BuildMode::Template,
    )
}

/// Scenario 1: template mode, no constraints.
#[tokio::test]
async fn test_template_mode_end_to_end() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store.clone(), provider);

    let state = pipeline.execute(template_ctx()).await.expect("build failed");

    assert_eq!(state.stage(BuildStage::Blueprint).status, StageStatus::Skipped);
    assert_eq!(state.bundle.manifest.routes.len(), 4);
    assert!(state.bundle.manifest.routes[0].is_home);
    assert_eq!(state.bundle.entitlements.plan, "free");
    assert_eq!(state.bundle.entitlements.limits.pages_max, 5);
    assert_eq!(state.bundle.site.status, SiteStatus::Preview);
    assert!(state.completed_at.is_some());
}

/// The stages map holds exactly the eight fixed stages, and everything
/// before a running-or-later stage is completed or skipped.
#[tokio::test]
async fn test_stage_map_shape_and_ordering() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store, provider);

    let state = pipeline.execute(template_ctx()).await.unwrap();

    let keys: Vec<BuildStage> = state.stages.keys().copied().collect();
    assert_eq!(keys, BuildStage::ORDER.to_vec());

    for stage in BuildStage::ORDER {
        let status = state.stage(stage).status;
        assert!(
            matches!(status, StageStatus::Completed | StageStatus::Skipped),
            "stage {stage} ended as {status:?}"
        );
    }
}

/// Scenario 2: one button "Schedule Appointment" and one link "Learn More"
/// produce exactly two deterministic bindings, in that order, with zero
/// fallback calls.
#[tokio::test]
async fn test_deterministic_wiring_scenario() {
    let markup = r#"
        <section>
            <button class="cta">Schedule Appointment</button>
            <a href="/about">Learn More</a>
        </section>
    "#;
    let provider = Arc::new(ScriptedProvider::with_markup("home", markup));
    let store = Arc::new(MemorySiteStore::new());
    let pipeline = BuildPipeline::new(store, provider.clone());

    let state = pipeline.execute(template_ctx()).await.unwrap();

    let home = &state.bundle.pages["home"];
    assert_eq!(home.intent_bindings.len(), 2);
    assert_eq!(home.intent_bindings[0].intent_id, "booking.request");
    assert_eq!(home.intent_bindings[1].intent_id, "nav.go");
    assert_eq!(provider.infer_calls.load(Ordering::SeqCst), 0);
}

/// Scenario 3: restaurant industry installs base plus industry recipes;
/// secret-gated recipes are disabled with the secret surfaced.
#[tokio::test]
async fn test_restaurant_automations() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store, provider);

    let ctx = template_ctx().with_industry("restaurant");
    let state = pipeline.execute(ctx).await.unwrap();

    let automations = &state.bundle.automations;
    let recipes: Vec<&str> = automations.installed.iter().map(|i| i.recipe.as_str()).collect();
    assert!(recipes.contains(&"reservation-handler"));
    assert!(recipes.contains(&"menu-update"));
    assert!(recipes.contains(&"lead-capture"));

    for install in &automations.installed {
        if install.recipe == "welcome-email" {
            assert!(!install.enabled);
        } else {
            assert!(install.enabled, "{} should be enabled", install.recipe);
        }
    }
    assert!(automations
        .secrets_required
        .iter()
        .any(|s| s.provider == "resend"));
    assert!(!state.bundle.build.warnings.is_empty());
}

/// Failure scenario: save_bundle fails during persist; all prior stages
/// stay completed and the durable init-stage rows survive.
#[tokio::test]
async fn test_persist_failure_leaves_prior_stages_completed() {
    let store = Arc::new(FailingSiteStore::new(FailingOp::SaveBundle));
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store.clone(), provider);

    let failure = pipeline.execute(template_ctx()).await.unwrap_err();

    assert_eq!(failure.stage, BuildStage::Persist);
    assert_eq!(failure.error.code, "PERSIST_FAILED");

    let state = &failure.state;
    assert_eq!(state.stage(BuildStage::Persist).status, StageStatus::Failed);
    for stage in BuildStage::ORDER {
        if stage == BuildStage::Persist {
            continue;
        }
        let status = state.stage(stage).status;
        assert!(
            matches!(status, StageStatus::Completed | StageStatus::Skipped),
            "stage {stage} ended as {status:?}"
        );
    }

    // No rollback: the init-stage rows are still there.
    assert!(store.get_site(&state.site_id).await.is_ok());
    assert!(store.get_build(&state.build_id).await.is_ok());
    assert_eq!(store.inner().bundle_count(), 0);
}

/// systems_ai mode runs the blueprint stage through the provider.
#[tokio::test]
async fn test_systems_ai_mode_runs_blueprint() {
    let provider = Arc::new(ScriptedProvider::default());
    let store = Arc::new(MemorySiteStore::new());
    let pipeline = BuildPipeline::new(store, provider.clone());

    let ctx = BuildContext::new("a law firm", "biz-2", "owner-2", BuildMode::SystemsAi);
    let state = pipeline.execute(ctx).await.unwrap();

    assert_eq!(provider.blueprint_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        state.stage(BuildStage::Blueprint).status,
        StageStatus::Completed
    );
    assert!(state.blueprint.is_some());
}

/// A blueprint failure aborts the run with the stage tagged, leaving init
/// completed and everything after pending.
#[tokio::test]
async fn test_blueprint_failure_aborts_run() {
    let provider = Arc::new(ScriptedProvider {
        fail_blueprint: true,
        ..Default::default()
    });
    let store = Arc::new(MemorySiteStore::new());
    let pipeline = BuildPipeline::new(store.clone(), provider);

    let ctx = BuildContext::new("a law firm", "biz-2", "owner-2", BuildMode::SystemsAi);
    let failure = pipeline.execute(ctx).await.unwrap_err();

    assert_eq!(failure.stage, BuildStage::Blueprint);
    assert_eq!(failure.error.code, "BLUEPRINT_FAILED");
    assert!(failure.error.message.contains("blueprint backend down"));

    let state = &failure.state;
    assert_eq!(state.stage(BuildStage::Init).status, StageStatus::Completed);
    assert_eq!(state.stage(BuildStage::Brand).status, StageStatus::Pending);
    assert_eq!(state.stage(BuildStage::Persist).status, StageStatus::Pending);

    // Durable rows from init survive the abort.
    assert!(store.get_site(&state.site_id).await.is_ok());
}

/// Per-element inference failures never fail the run; they accumulate as
/// warnings.
#[tokio::test]
async fn test_inference_failures_are_warnings_not_errors() {
    let markup = r#"<button>Frobnicate Widget</button><button>Book Now</button>"#;
    let provider = Arc::new(ScriptedProvider {
        infer_fails: true,
        ..ScriptedProvider::with_markup("home", markup)
    });
    let store = Arc::new(MemorySiteStore::new());
    let pipeline = BuildPipeline::new(store, provider.clone());

    let state = pipeline.execute(template_ctx()).await.expect("run must survive");

    assert_eq!(provider.infer_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        state.stage(BuildStage::Intents).status,
        StageStatus::Completed
    );
    assert!(state
        .bundle
        .build
        .warnings
        .iter()
        .any(|w| w.contains("Frobnicate Widget")));
    assert!(state.bundle.build.errors.is_empty());

    // The matched element still got its binding.
    assert_eq!(state.bundle.pages["home"].intent_bindings.len(), 1);
}

/// Binding sequence numbers are strictly increasing in document-scan order
/// across all pages, with no reuse.
#[tokio::test]
async fn test_binding_sequence_monotonic_across_pages() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store, provider);

    let state = pipeline.execute(template_ctx()).await.unwrap();
    let bindings = &state.bundle.intents.bindings;
    assert!(!bindings.is_empty());

    let mut last = 0u32;
    for binding in bindings {
        let seq: u32 = binding
            .binding_id
            .rsplit('-')
            .next()
            .unwrap()
            .parse()
            .expect("binding id ends in a sequence number");
        assert!(seq > last, "sequence numbers must strictly increase");
        last = seq;
    }

    // Page subsets are exactly the run-wide list filtered by page.
    for (page_id, page) in &state.bundle.pages {
        let expected: Vec<_> = bindings.iter().filter(|b| &b.page_id == page_id).collect();
        assert_eq!(page.intent_bindings.len(), expected.len());
    }
}

/// The pages_max constraint overrides the free-tier limit.
#[tokio::test]
async fn test_pages_max_override() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store, provider);

    let ctx = template_ctx().with_constraint("pages_max", serde_json::json!(3));
    let state = pipeline.execute(ctx).await.unwrap();
    assert_eq!(state.bundle.entitlements.limits.pages_max, 3);
}

/// Persist writes the bundle row with the fixed schema version, and the
/// build row carries final counters.
#[tokio::test]
async fn test_persisted_artifact_shape() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store.clone(), provider);

    let state = pipeline.execute(template_ctx()).await.unwrap();

    let bundle_row = store
        .get_bundle(&state.site_id, &state.build_id)
        .await
        .expect("bundle row written");
    assert_eq!(bundle_row.version, "1.0.0");
    assert_eq!(bundle_row.bundle_json["site"]["status"], "preview");
    assert_eq!(
        bundle_row.bundle_json["runtime"]["entry"]["page_id"],
        bundle_row.bundle_json["manifest"]["routes"][0]["page_id"]
    );

    let latest = store.get_latest_bundle(&state.site_id).await.unwrap();
    assert_eq!(latest.build_id, state.build_id);

    let build_row = store.get_build(&state.build_id).await.unwrap();
    assert_eq!(build_row.status, BuildRowStatus::Completed);
    assert_eq!(
        build_row.warnings_count as usize,
        state.bundle.build.warnings.len()
    );
    assert!(build_row.finished_at.is_some());
}

/// Entry page always tracks the first route, and route ids derive from
/// blueprint titles.
#[tokio::test]
async fn test_manifest_route_derivation() {
    let store = Arc::new(MemorySiteStore::new());
    let provider = Arc::new(TemplateProvider::new());
    let pipeline = BuildPipeline::new(store, provider);

    let state = pipeline.execute(template_ctx()).await.unwrap();
    let routes = &state.bundle.manifest.routes;

    assert_eq!(routes[0].page_id, "home");
    assert_eq!(routes[0].path, "/");
    assert_eq!(routes[2].page_id, "services");
    assert_eq!(routes[2].path, "/services");
    assert_eq!(state.bundle.runtime.entry.page_id, "home");
    assert_eq!(state.bundle.manifest.nav.len(), routes.len());
}
