//! Default intent catalog.
//!
//! The catalog is built once per run and is immutable afterwards. Handlers
//! are either remote endpoints (form-like intents) or client-side actions
//! (navigation, dialing).

use std::collections::BTreeMap;

use crate::domain::intent::{
    HandlerDescriptor, IntentDefinition, ParamKind, ParamSpec,
};

/// Version string stamped into `bundle.intents.catalog_version`.
pub const CATALOG_VERSION: &str = "1.0.0";

fn param(kind: ParamKind, required: bool) -> ParamSpec {
    ParamSpec { kind, required }
}

fn endpoint(method: &str, path: &str) -> HandlerDescriptor {
    HandlerDescriptor::Endpoint {
        method: method.to_string(),
        path: path.to_string(),
    }
}

fn client_action(action: &str) -> HandlerDescriptor {
    HandlerDescriptor::ClientAction {
        action: action.to_string(),
    }
}

fn intent(
    id: &str,
    category: &str,
    description: &str,
    params: Vec<(&str, ParamSpec)>,
    handler: HandlerDescriptor,
) -> (String, IntentDefinition) {
    (
        id.to_string(),
        IntentDefinition {
            id: id.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            handler,
        },
    )
}

/// The default intent catalog for a run.
pub fn default_catalog() -> BTreeMap<String, IntentDefinition> {
    BTreeMap::from([
        intent(
            "nav.go",
            "navigation",
            "Navigate the visitor to another page of the site",
            vec![("path", param(ParamKind::Url, true))],
            client_action("navigate"),
        ),
        intent(
            "booking.request",
            "booking",
            "Request an appointment or reservation",
            vec![
                ("service", param(ParamKind::String, false)),
                ("notes", param(ParamKind::String, false)),
            ],
            endpoint("POST", "/api/intents/booking"),
        ),
        intent(
            "contact.submit",
            "contact",
            "Send a message to the business",
            vec![
                ("email", param(ParamKind::String, true)),
                ("message", param(ParamKind::String, true)),
            ],
            endpoint("POST", "/api/intents/contact"),
        ),
        intent(
            "lead.capture",
            "growth",
            "Capture a visitor as a lead",
            vec![("email", param(ParamKind::String, true))],
            endpoint("POST", "/api/intents/lead"),
        ),
        intent(
            "newsletter.subscribe",
            "growth",
            "Subscribe the visitor to the newsletter",
            vec![("email", param(ParamKind::String, true))],
            endpoint("POST", "/api/intents/newsletter"),
        ),
        intent(
            "commerce.order",
            "commerce",
            "Start an order or purchase",
            vec![
                ("sku", param(ParamKind::String, false)),
                ("quantity", param(ParamKind::Number, false)),
            ],
            endpoint("POST", "/api/intents/order"),
        ),
        intent(
            "call.phone",
            "contact",
            "Dial the business phone number",
            vec![("number", param(ParamKind::String, false))],
            client_action("dial"),
        ),
        intent(
            "form.submit",
            "forms",
            "Submit a generic page form",
            vec![("form_id", param(ParamKind::String, false))],
            endpoint("POST", "/api/intents/form"),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_core_intents() {
        let catalog = default_catalog();
        for id in [
            "nav.go",
            "booking.request",
            "contact.submit",
            "lead.capture",
            "newsletter.subscribe",
            "commerce.order",
            "call.phone",
            "form.submit",
        ] {
            assert!(catalog.contains_key(id), "missing intent {id}");
            assert_eq!(catalog[id].id, id);
        }
    }

    #[test]
    fn test_nav_go_is_client_side() {
        let catalog = default_catalog();
        match &catalog["nav.go"].handler {
            HandlerDescriptor::ClientAction { action } => assert_eq!(action, "navigate"),
            other => panic!("expected client action, got {other:?}"),
        }
    }

    #[test]
    fn test_booking_is_endpoint() {
        let catalog = default_catalog();
        match &catalog["booking.request"].handler {
            HandlerDescriptor::Endpoint { method, path } => {
                assert_eq!(method, "POST");
                assert!(path.starts_with("/api/intents/"));
            }
            other => panic!("expected endpoint, got {other:?}"),
        }
    }
}
