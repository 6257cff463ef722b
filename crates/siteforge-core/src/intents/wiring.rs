//! Intent wiring: deterministic rules first, AI fallback second.
//!
//! For each interactive element of a page the engine tries the rule table;
//! only a zero-rule miss reaches the provider's `infer_intent`. Inference
//! failures are swallowed per element (no binding, a warning), never
//! escalated to a stage failure.
//!
//! Sequence numbers are stamped in document-scan order before any
//! inference call is dispatched, so binding ids stay stable even if
//! inference were made concurrent later.

use std::collections::BTreeMap;

use crate::domain::intent::{
    BindingTarget, IntentBinding, IntentDefinition, TargetStrategy,
};
use crate::intents::extract::{ElementExtractor, InteractiveElement};
use crate::intents::rules::RuleEngine;
use crate::provider::AiProvider;

/// Wiring output for one page.
#[derive(Debug, Default)]
pub struct PageWiring {
    /// Bindings in document-scan order.
    pub bindings: Vec<IntentBinding>,

    /// Per-element problems that did not abort the page.
    pub warnings: Vec<String>,
}

/// Combines the rule engine and the AI fallback into one binding producer.
pub struct WiringEngine {
    rules: RuleEngine,
    extractor: ElementExtractor,
}

impl WiringEngine {
    pub fn new(rules: RuleEngine) -> Self {
        Self {
            rules,
            extractor: ElementExtractor::new(),
        }
    }

    /// Engine over the default rule table.
    pub fn with_defaults() -> Self {
        Self::new(RuleEngine::with_defaults())
    }

    /// Wire every interactive element of one page.
    ///
    /// `seq` is the run-wide binding counter, shared across all pages and
    /// never reset. Each scanned element consumes one sequence number.
    pub async fn wire_page(
        &self,
        page_id: &str,
        markup: &str,
        catalog: &[IntentDefinition],
        provider: &dyn AiProvider,
        seq: &mut u32,
    ) -> PageWiring {
        // Index-stamping pass: assign sequence numbers in document-scan
        // order, before any inference call.
        let stamped: Vec<(u32, InteractiveElement)> = self
            .extractor
            .extract(markup)
            .map(|element| {
                *seq += 1;
                (*seq, element)
            })
            .collect();

        let mut wiring = PageWiring::default();

        for (number, element) in stamped {
            if let Some(intent_id) = self.rules.match_intent(&element.text) {
                let params = default_params(intent_id, &element);
                wiring.bindings.push(make_binding(
                    page_id,
                    number,
                    intent_id.to_string(),
                    params,
                    &element,
                ));
                continue;
            }

            // AI fallback, one call per unmatched element.
            match provider
                .infer_intent(&element.text, &element.role, catalog)
                .await
            {
                Ok(Some(result)) => {
                    if catalog.iter().any(|def| def.id == result.intent_id) {
                        wiring.bindings.push(make_binding(
                            page_id,
                            number,
                            result.intent_id,
                            result.params,
                            &element,
                        ));
                    } else {
                        wiring.warnings.push(format!(
                            "inference returned unknown intent '{}' for \"{}\" on page {}",
                            result.intent_id, element.text, page_id
                        ));
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    wiring.warnings.push(format!(
                        "intent inference failed for \"{}\" on page {}: {}",
                        element.text, page_id, err
                    ));
                }
            }
        }

        wiring
    }
}

/// Default parameter values a deterministic match can derive from the
/// element itself.
fn default_params(
    intent_id: &str,
    element: &InteractiveElement,
) -> BTreeMap<String, serde_json::Value> {
    let mut params = BTreeMap::new();
    if intent_id == "nav.go" {
        if let Some(href) = &element.href {
            params.insert("path".to_string(), serde_json::json!(href));
        }
    }
    params
}

fn make_binding(
    page_id: &str,
    number: u32,
    intent_id: String,
    params: BTreeMap<String, serde_json::Value>,
    element: &InteractiveElement,
) -> IntentBinding {
    let binding_id = format!("ut-{page_id}-{number}");
    let selector = format!("[data-sf-intent=\"{binding_id}\"]");
    IntentBinding {
        binding_id,
        page_id: page_id.to_string(),
        target: BindingTarget {
            strategy: TargetStrategy::CssAttribute,
            selector,
        },
        intent_id,
        params,
        label: element.text.clone(),
    }
}
