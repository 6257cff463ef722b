//! Intent wiring subsystem.
//!
//! - `catalog`: the default intent catalog
//! - `rules`: deterministic text-pattern rules and the rule engine
//! - `extract`: interactive-element extraction from page markup
//! - `wiring`: deterministic-first / AI-fallback binding production

pub mod catalog;
pub mod extract;
pub mod rules;
pub mod wiring;

pub use catalog::{default_catalog, CATALOG_VERSION};
pub use extract::{ElementExtractor, InteractiveElement};
pub use rules::{default_rules, RuleEngine};
pub use wiring::{PageWiring, WiringEngine};
