//! The eight stage executors.
//!
//! Each executor mutates the shared run state and returns a collaborator
//! error on failure; the orchestrator tags it with the owning stage. Only
//! the persist stage writes the full bundle; everything before it mutates
//! the in-memory copy.

use chrono::Utc;
use tracing::debug;

use crate::domain::blueprint::{default_blueprint, BusinessBlueprint};
use crate::domain::bundle::{NavItem, RouteDef, SiteStatus};
use crate::domain::context::BuildContext;
use crate::domain::error::{BuildError, ProviderError};
use crate::domain::intent::IntentDefinition;
use crate::domain::state::BuildPipelineState;
use crate::domain::Entitlements;
use crate::pipeline::{BuildPipeline, BUNDLE_SCHEMA_VERSION};
use siteforge_store::{BuildRecord, BuildRowStatus, BundleRecord, SiteRecord, SiteRowStatus};

/// Derive a page id from a page title: lower-cased, hyphenated.
fn page_id_for(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            id.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            id.push('-');
            last_dash = true;
        }
    }
    while id.ends_with('-') {
        id.pop();
    }
    if id.is_empty() {
        "page".to_string()
    } else {
        id
    }
}

/// The blueprint in effect: AI-generated when the blueprint stage ran,
/// else the local default.
fn effective_blueprint(state: &BuildPipelineState, ctx: &BuildContext) -> BusinessBlueprint {
    state
        .blueprint
        .clone()
        .unwrap_or_else(|| default_blueprint(ctx.industry.as_deref()))
}

fn site_row_status(status: SiteStatus) -> SiteRowStatus {
    match status {
        SiteStatus::Draft => SiteRowStatus::Draft,
        SiteStatus::Preview => SiteRowStatus::Preview,
        SiteStatus::Published => SiteRowStatus::Published,
    }
}

impl BuildPipeline {
    /// init: create the durable site and build rows. These survive any
    /// later stage failure.
    pub(super) async fn stage_init(
        &self,
        state: &mut BuildPipelineState,
    ) -> Result<(), BuildError> {
        let site = SiteRecord {
            site_id: state.site_id.clone(),
            business_id: state.bundle.site.business_id.clone(),
            owner_id: state.bundle.site.owner_id.clone(),
            name: state.bundle.brand.name.clone(),
            status: SiteRowStatus::Draft,
            created_at: state.bundle.site.created_at,
            updated_at: state.bundle.site.updated_at,
        };
        self.store.create_site(site).await?;

        let build = BuildRecord {
            build_id: state.build_id.clone(),
            site_id: state.site_id.clone(),
            mode: state.mode.as_str().to_string(),
            prompt: state.bundle.build.prompt.clone(),
            status: BuildRowStatus::Running,
            warnings_count: 0,
            errors_count: 0,
            started_at: state.bundle.build.started_at,
            finished_at: None,
        };
        self.store.create_build(build).await?;
        Ok(())
    }

    /// blueprint: AI-authored business blueprint. Only entered in
    /// `systems_ai` mode.
    pub(super) async fn stage_blueprint(
        &self,
        state: &mut BuildPipelineState,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        let blueprint = self.provider.generate_blueprint(ctx).await?;
        state.bundle.build.info(
            "blueprint",
            format!(
                "blueprint: industry {}, {} pages",
                blueprint.industry,
                blueprint.pages.len()
            ),
        );
        state.blueprint = Some(blueprint);
        Ok(())
    }

    /// brand: overwrite the skeleton brand block in place.
    pub(super) async fn stage_brand(
        &self,
        state: &mut BuildPipelineState,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        let blueprint = effective_blueprint(state, ctx);
        let brand = self.provider.generate_brand_kit(&blueprint, ctx).await?;
        state
            .bundle
            .build
            .info("brand", format!("brand kit: {} ({})", brand.name, brand.tone));
        state.bundle.brand = brand;
        Ok(())
    }

    /// pages: rebuild the manifest from the blueprint, then generate each
    /// page sequentially in blueprint order.
    pub(super) async fn stage_pages(
        &self,
        state: &mut BuildPipelineState,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        let blueprint = effective_blueprint(state, ctx);
        if blueprint.pages.is_empty() {
            return Err(ProviderError::Api("blueprint produced no pages".to_string()).into());
        }

        let mut routes = Vec::with_capacity(blueprint.pages.len());
        let mut nav = Vec::with_capacity(blueprint.pages.len());
        for (index, page) in blueprint.pages.iter().enumerate() {
            let page_id = page_id_for(&page.title);
            let path = if index == 0 {
                "/".to_string()
            } else {
                format!("/{page_id}")
            };
            routes.push(RouteDef {
                page_id,
                path: path.clone(),
                title: page.title.clone(),
                is_home: index == 0,
            });
            nav.push(NavItem {
                label: page.title.clone(),
                path,
                order: index as u32,
            });
        }

        state.bundle.manifest.routes = routes.clone();
        state.bundle.manifest.nav = nav;
        state.bundle.runtime.entry.page_id = routes[0].page_id.clone();

        // Sequential generation: page N's prompt context may assume pages
        // 0..N-1 already exist in the bundle.
        let brand = state.bundle.brand.clone();
        for route in &routes {
            let mut page = self
                .provider
                .generate_page(route, &blueprint, &brand, ctx)
                .await?;
            page.page_id = route.page_id.clone();
            debug!(page_id = %page.page_id, "page generated");
            state.bundle.pages.insert(route.page_id.clone(), page);
        }

        state
            .bundle
            .build
            .info("pages", format!("{} pages generated", routes.len()));
        Ok(())
    }

    /// intents: wire every interactive element of every page, in page
    /// order, sharing one run-wide sequence counter.
    pub(super) async fn stage_intents(
        &self,
        state: &mut BuildPipelineState,
    ) -> Result<(), BuildError> {
        let catalog: Vec<IntentDefinition> =
            state.bundle.intents.catalog.values().cloned().collect();
        let routes = state.bundle.manifest.routes.clone();

        let mut seq = 0u32;
        let mut all_bindings = Vec::new();

        for route in &routes {
            let markup = state
                .bundle
                .pages
                .get(&route.page_id)
                .map(|p| p.markup.clone())
                .unwrap_or_default();

            let wiring = self
                .wiring
                .wire_page(&route.page_id, &markup, &catalog, self.provider.as_ref(), &mut seq)
                .await;

            for warning in wiring.warnings {
                state.bundle.build.warn("intents", warning);
            }

            if let Some(page) = state.bundle.pages.get_mut(&route.page_id) {
                page.intent_bindings = wiring.bindings.clone();
            }
            all_bindings.extend(wiring.bindings);
        }

        state
            .bundle
            .build
            .info("intents", format!("{} bindings wired", all_bindings.len()));
        state.bundle.intents.bindings = all_bindings;
        Ok(())
    }

    /// automations: install base plus industry recipes; missing secrets
    /// disable a recipe and surface a warning, never omit it.
    pub(super) async fn stage_automations(
        &self,
        state: &mut BuildPipelineState,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        let industry = state
            .blueprint
            .as_ref()
            .map(|b| b.industry.clone())
            .or_else(|| ctx.industry.clone())
            .unwrap_or_else(|| "general".to_string());

        let block = self.automations.install_for(&industry);
        for secret in &block.secrets_required {
            state.bundle.build.warn(
                "automations",
                format!(
                    "secret {} ({}) required: {}",
                    secret.key, secret.provider, secret.reason
                ),
            );
        }
        state.bundle.build.info(
            "automations",
            format!(
                "{} automations installed for industry {}",
                block.installed.len(),
                industry
            ),
        );
        state.bundle.automations = block;
        Ok(())
    }

    /// entitlements: apply the free-tier default plus the optional
    /// `pages_max` override, then move the site to preview.
    pub(super) async fn stage_entitlements(
        &self,
        state: &mut BuildPipelineState,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        let mut entitlements = Entitlements::free_tier();
        if let Some(pages_max) = ctx.pages_max() {
            state
                .bundle
                .build
                .info("entitlements", format!("pages_max override: {pages_max}"));
            entitlements.limits.pages_max = pages_max;
        }
        state.bundle.entitlements = entitlements;
        state.bundle.site.status = SiteStatus::Preview;
        state.bundle.site.updated_at = Utc::now();
        Ok(())
    }

    /// persist: stamp `finished_at`, update the durable rows, write the
    /// full bundle. The only stage that serializes the whole artifact.
    pub(super) async fn stage_persist(
        &self,
        state: &mut BuildPipelineState,
    ) -> Result<(), BuildError> {
        let now = Utc::now();
        state.bundle.build.finished_at = Some(now);

        let build_row = self.store.get_build(&state.build_id).await?.complete(
            state.bundle.build.warnings.len() as u32,
            state.bundle.build.errors.len() as u32,
            now,
        );
        self.store.update_build(build_row).await?;

        let mut site_row = self.store.get_site(&state.site_id).await?;
        site_row.name = state.bundle.brand.name.clone();
        site_row.status = site_row_status(state.bundle.site.status);
        site_row.updated_at = state.bundle.site.updated_at;
        self.store.update_site(site_row).await?;

        let bundle_json = serde_json::to_value(&state.bundle)?;
        self.store
            .save_bundle(BundleRecord {
                site_id: state.site_id.clone(),
                build_id: state.build_id.clone(),
                version: BUNDLE_SCHEMA_VERSION.to_string(),
                bundle_json,
                created_at: now,
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_for_hyphenates() {
        assert_eq!(page_id_for("Home"), "home");
        assert_eq!(page_id_for("Our Services"), "our-services");
        assert_eq!(page_id_for("FAQ & Pricing"), "faq-pricing");
        assert_eq!(page_id_for("  "), "page");
    }

    #[test]
    fn test_site_row_status_mapping() {
        assert_eq!(site_row_status(SiteStatus::Draft), SiteRowStatus::Draft);
        assert_eq!(site_row_status(SiteStatus::Preview), SiteRowStatus::Preview);
        assert_eq!(
            site_row_status(SiteStatus::Published),
            SiteRowStatus::Published
        );
    }
}
