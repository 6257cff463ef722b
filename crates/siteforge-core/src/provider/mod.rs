//! Content-generation provider abstraction.
//!
//! [`AiProvider`] is the only inference surface the pipeline sees. Two
//! adapters ship with the crate:
//! - [`TemplateProvider`]: deterministic, in-process generation
//! - [`HostedProvider`]: HTTP client for a hosted generation endpoint

pub mod hosted;
pub mod template;

use async_trait::async_trait;

use crate::domain::blueprint::{BrandKit, BusinessBlueprint};
use crate::domain::bundle::{PageBundle, RouteDef};
use crate::domain::context::BuildContext;
use crate::domain::error::ProviderResult;
use crate::domain::intent::{IntentDefinition, IntentWiringResult};

pub use hosted::{HostedProvider, HostedProviderConfig};
pub use template::TemplateProvider;

/// Content-generation capability consumed by the pipeline.
///
/// Blueprint, brand, and page failures abort their stage (and the run);
/// `infer_intent` failures are handled per element by the wiring engine.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Produce a business blueprint from the build context.
    async fn generate_blueprint(&self, ctx: &BuildContext) -> ProviderResult<BusinessBlueprint>;

    /// Produce brand primitives for a blueprint.
    async fn generate_brand_kit(
        &self,
        blueprint: &BusinessBlueprint,
        ctx: &BuildContext,
    ) -> ProviderResult<BrandKit>;

    /// Produce one page's content. Pages are generated sequentially in
    /// blueprint order, so earlier pages already exist in the bundle.
    async fn generate_page(
        &self,
        route: &RouteDef,
        blueprint: &BusinessBlueprint,
        brand: &BrandKit,
        ctx: &BuildContext,
    ) -> ProviderResult<PageBundle>;

    /// Infer an intent for an element no deterministic rule matched.
    /// `Ok(None)` means "no binding for this element".
    async fn infer_intent(
        &self,
        text: &str,
        role: &str,
        catalog: &[IntentDefinition],
    ) -> ProviderResult<Option<IntentWiringResult>>;
}
