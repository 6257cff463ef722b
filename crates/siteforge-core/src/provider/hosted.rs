//! Hosted generation endpoint client.
//!
//! Thin JSON-over-HTTP adapter for the hosted content-generation service.
//! All calls are typed request/response pairs; the pipeline never sees
//! transport details, only `ProviderError` values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::blueprint::{BrandKit, BusinessBlueprint};
use crate::domain::bundle::{PageBundle, RouteDef};
use crate::domain::context::BuildContext;
use crate::domain::error::{ProviderError, ProviderResult};
use crate::domain::intent::{IntentDefinition, IntentWiringResult, Provenance};
use crate::provider::AiProvider;

/// Hosted provider configuration.
#[derive(Debug, Clone)]
pub struct HostedProviderConfig {
    /// Generation endpoint base URL.
    pub base_url: String,
    /// Bearer token (optional for self-hosted deployments).
    pub api_token: Option<String>,
    /// Model identifier passed with every request.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HostedProviderConfig {
    fn default() -> Self {
        HostedProviderConfig {
            base_url: std::env::var("SITEFORGE_AI_URL")
                .unwrap_or_else(|_| "https://api.siteforge.dev/ai".to_string()),
            api_token: std::env::var("SITEFORGE_AI_TOKEN").ok(),
            model: std::env::var("SITEFORGE_AI_MODEL").unwrap_or_else(|_| "sf-gen-1".to_string()),
            timeout_secs: 60,
        }
    }
}

impl HostedProviderConfig {
    /// Create a config from environment variables.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Config for a specific endpoint.
    pub fn new(base_url: &str) -> Self {
        HostedProviderConfig {
            base_url: base_url.to_string(),
            api_token: None,
            model: "sf-gen-1".to_string(),
            timeout_secs: 60,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

/// HTTP client for the hosted generation endpoint.
pub struct HostedProvider {
    config: HostedProviderConfig,
    http_client: reqwest::Client,
}

impl HostedProvider {
    /// Create a new hosted provider.
    pub fn new(config: HostedProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("siteforge/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        HostedProvider {
            config,
            http_client,
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Self {
        Self::new(HostedProviderConfig::from_env())
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> ProviderResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(url = %url, "calling generation endpoint");

        let mut request = self.http_client.post(&url).json(body);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api(format!("{path} returned {status}")));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

// --- wire types -------------------------------------------------------------

#[derive(Serialize)]
struct BlueprintRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    business_id: &'a str,
    industry: Option<&'a str>,
}

#[derive(Serialize)]
struct BrandRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    blueprint: &'a BusinessBlueprint,
}

#[derive(Serialize)]
struct PageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    route: &'a RouteDef,
    blueprint: &'a BusinessBlueprint,
    brand: &'a BrandKit,
}

#[derive(Serialize)]
struct InferIntentRequest<'a> {
    model: &'a str,
    text: &'a str,
    role: &'a str,
    intents: Vec<IntentSummary<'a>>,
}

#[derive(Serialize)]
struct IntentSummary<'a> {
    id: &'a str,
    category: &'a str,
    description: &'a str,
}

#[derive(Deserialize)]
struct InferIntentResponse {
    /// None means the model declined to bind the element.
    intent_id: Option<String>,
    #[serde(default)]
    params: BTreeMap<String, serde_json::Value>,
}

#[async_trait]
impl AiProvider for HostedProvider {
    async fn generate_blueprint(&self, ctx: &BuildContext) -> ProviderResult<BusinessBlueprint> {
        self.post_json(
            "v1/blueprint",
            &BlueprintRequest {
                model: &self.config.model,
                prompt: &ctx.prompt,
                business_id: &ctx.business_id,
                industry: ctx.industry.as_deref(),
            },
        )
        .await
    }

    async fn generate_brand_kit(
        &self,
        blueprint: &BusinessBlueprint,
        ctx: &BuildContext,
    ) -> ProviderResult<BrandKit> {
        self.post_json(
            "v1/brand",
            &BrandRequest {
                model: &self.config.model,
                prompt: &ctx.prompt,
                blueprint,
            },
        )
        .await
    }

    async fn generate_page(
        &self,
        route: &RouteDef,
        blueprint: &BusinessBlueprint,
        brand: &BrandKit,
        ctx: &BuildContext,
    ) -> ProviderResult<PageBundle> {
        self.post_json(
            "v1/page",
            &PageRequest {
                model: &self.config.model,
                prompt: &ctx.prompt,
                route,
                blueprint,
                brand,
            },
        )
        .await
    }

    async fn infer_intent(
        &self,
        text: &str,
        role: &str,
        catalog: &[IntentDefinition],
    ) -> ProviderResult<Option<IntentWiringResult>> {
        let request = InferIntentRequest {
            model: &self.config.model,
            text,
            role,
            intents: catalog
                .iter()
                .map(|def| IntentSummary {
                    id: &def.id,
                    category: &def.category,
                    description: &def.description,
                })
                .collect(),
        };

        let response: InferIntentResponse = self.post_json("v1/infer-intent", &request).await?;

        Ok(response.intent_id.map(|intent_id| IntentWiringResult {
            intent_id,
            params: response.params,
            provenance: Provenance::Ai,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = HostedProviderConfig::new("https://ai.internal/")
            .with_token("tok-1")
            .with_model("sf-gen-2");
        assert_eq!(config.base_url, "https://ai.internal/");
        assert_eq!(config.api_token.as_deref(), Some("tok-1"));
        assert_eq!(config.model, "sf-gen-2");
    }

    #[test]
    fn test_infer_response_decodes_decline() {
        let json = r#"{"intent_id": null}"#;
        let resp: InferIntentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.intent_id.is_none());
        assert!(resp.params.is_empty());
    }

    #[test]
    fn test_infer_response_decodes_result() {
        let json = r#"{"intent_id": "lead.capture", "params": {"email": "required"}}"#;
        let resp: InferIntentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.intent_id.as_deref(), Some("lead.capture"));
        assert_eq!(resp.params.len(), 1);
    }
}
