//! Intent data model.
//!
//! An intent is an abstract user-triggerable action with a defined handler,
//! independent of which UI element triggers it. A binding associates one
//! page element with one intent, with concrete parameter values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar kind of an intent parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    Url,
}

/// Structural schema for a single intent parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParamSpec {
    pub kind: ParamKind,
    pub required: bool,
}

/// How an intent is fulfilled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandlerDescriptor {
    /// Remote-callable endpoint.
    Endpoint { method: String, path: String },

    /// Client-side action executed in the visitor's browser.
    ClientAction { action: String },
}

/// One entry in the intent catalog. Immutable once the catalog is built
/// for a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentDefinition {
    /// Dotted intent id, e.g. "booking.request".
    pub id: String,

    /// Coarse grouping, e.g. "booking", "navigation".
    pub category: String,

    /// Human description, surfaced to the inference fallback.
    pub description: String,

    /// Parameter name -> structural schema.
    pub params: BTreeMap<String, ParamSpec>,

    pub handler: HandlerDescriptor,
}

/// Element-selection strategy for a binding target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetStrategy {
    /// CSS attribute selector keyed to the binding id.
    CssAttribute,
}

/// Where on a page a binding attaches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BindingTarget {
    pub strategy: TargetStrategy,
    pub selector: String,
}

/// Concrete association between one page element and one intent.
///
/// Created only during the intents stage; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentBinding {
    /// Globally unique binding id (`ut-{page_id}-{seq}`).
    pub binding_id: String,

    /// Page the bound element lives on.
    pub page_id: String,

    pub target: BindingTarget,

    /// Catalog id of the bound intent.
    pub intent_id: String,

    /// Concrete parameter values.
    pub params: BTreeMap<String, serde_json::Value>,

    /// Element label the binding was derived from.
    pub label: String,
}

/// Where a wiring decision came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Deterministic,
    Ai,
}

/// One deterministic text-pattern-to-intent rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentWiringRule {
    /// Case-insensitive regex matched against element text.
    pub pattern: String,

    /// Intent the rule maps to.
    pub intent_id: String,

    /// Higher wins; ties keep table order.
    pub priority: i32,

    pub provenance: Provenance,
}

impl IntentWiringRule {
    pub fn new(pattern: impl Into<String>, intent_id: impl Into<String>, priority: i32) -> Self {
        Self {
            pattern: pattern.into(),
            intent_id: intent_id.into(),
            priority,
            provenance: Provenance::Deterministic,
        }
    }
}

/// Outcome of a wiring decision (deterministic or inferred).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentWiringResult {
    pub intent_id: String,
    pub params: BTreeMap<String, serde_json::Value>,
    pub provenance: Provenance,
}

/// The `intents` block of a bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentsBlock {
    /// Version string of the catalog the run used.
    pub catalog_version: String,

    /// Full intent catalog, keyed by intent id.
    pub catalog: BTreeMap<String, IntentDefinition>,

    /// All bindings produced by the run, in document-scan order.
    pub bindings: Vec<IntentBinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_descriptor_tagged_json() {
        let endpoint = HandlerDescriptor::Endpoint {
            method: "POST".to_string(),
            path: "/api/intents/booking".to_string(),
        };
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["type"], "endpoint");
        assert_eq!(json["method"], "POST");

        let action = HandlerDescriptor::ClientAction {
            action: "navigate".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "client_action");
    }

    #[test]
    fn test_provenance_wire_form() {
        assert_eq!(
            serde_json::to_value(Provenance::Deterministic).unwrap(),
            serde_json::json!("deterministic")
        );
        assert_eq!(
            serde_json::to_value(Provenance::Ai).unwrap(),
            serde_json::json!("ai")
        );
    }

    #[test]
    fn test_binding_roundtrip() {
        let binding = IntentBinding {
            binding_id: "ut-home-1".to_string(),
            page_id: "home".to_string(),
            target: BindingTarget {
                strategy: TargetStrategy::CssAttribute,
                selector: "[data-sf-intent=\"ut-home-1\"]".to_string(),
            },
            intent_id: "booking.request".to_string(),
            params: BTreeMap::new(),
            label: "Schedule Appointment".to_string(),
        };
        let json = serde_json::to_string(&binding).unwrap();
        let back: IntentBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, binding);
    }
}
