//! Deterministic intent-wiring rules.
//!
//! The rule table maps free-text element labels to intents with no external
//! calls. Rules are evaluated in descending priority; ties keep table order
//! (stable sort). Matching is a pure function of the element text.

use regex::{Regex, RegexBuilder};

use crate::domain::intent::IntentWiringRule;

/// The static rule table.
///
/// Patterns are case-insensitive regexes. Higher priority wins; the first
/// match after sorting decides the intent.
pub fn default_rules() -> Vec<IntentWiringRule> {
    vec![
        IntentWiringRule::new(
            r"\b(book|schedule|appointment|reserve|reservation)\b",
            "booking.request",
            90,
        ),
        IntentWiringRule::new(
            r"\b(contact us|get in touch|send (us )?(a )?message|reach out)\b",
            "contact.submit",
            80,
        ),
        IntentWiringRule::new(
            r"\b(subscribe|newsletter|join (our )?(mailing )?list)\b",
            "newsletter.subscribe",
            80,
        ),
        IntentWiringRule::new(
            r"\b(buy|order|purchase|add to cart|shop now)\b",
            "commerce.order",
            80,
        ),
        IntentWiringRule::new(r"\b(call|phone)\b", "call.phone", 70),
        IntentWiringRule::new(
            r"\b(sign ?up|get started|join now|start free|try (it )?free)\b",
            "lead.capture",
            60,
        ),
        IntentWiringRule::new(r"\b(submit|send)\b", "form.submit", 40),
        IntentWiringRule::new(
            r"\b(learn more|read more|more info|see more|view|explore|about|details|our (story|services|menu|work))\b",
            "nav.go",
            30,
        ),
    ]
}

struct CompiledRule {
    regex: Regex,
    intent_id: String,
    priority: i32,
}

/// Rule engine over a compiled, priority-sorted rule table.
///
/// Owns its table; multiple concurrent runs can share one engine through a
/// reference because matching never mutates.
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// Compile a rule table. Rules are sorted by descending priority with a
    /// stable sort, so equal-priority rules keep their table order.
    pub fn new(table: Vec<IntentWiringRule>) -> Result<Self, regex::Error> {
        let mut rules = table
            .into_iter()
            .map(|rule| {
                Ok(CompiledRule {
                    regex: RegexBuilder::new(&rule.pattern)
                        .case_insensitive(true)
                        .build()?,
                    intent_id: rule.intent_id,
                    priority: rule.priority,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(Self { rules })
    }

    /// Engine over the default rule table.
    pub fn with_defaults() -> Self {
        Self::new(default_rules()).expect("default rule table compiles")
    }

    /// Match an element label to an intent id. Returns the first hit in
    /// priority order, or `None` when no rule matches.
    pub fn match_intent(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(text))
            .map(|rule| rule.intent_id.as_str())
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_labels() {
        let engine = RuleEngine::with_defaults();
        assert_eq!(engine.match_intent("Schedule Appointment"), Some("booking.request"));
        assert_eq!(engine.match_intent("Learn More"), Some("nav.go"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let engine = RuleEngine::with_defaults();
        assert_eq!(engine.match_intent("BOOK NOW"), Some("booking.request"));
        assert_eq!(engine.match_intent("subscribe"), Some("newsletter.subscribe"));
    }

    #[test]
    fn test_no_match_returns_none() {
        let engine = RuleEngine::with_defaults();
        assert_eq!(engine.match_intent("Frobnicate the widget"), None);
        assert_eq!(engine.match_intent(""), None);
    }

    #[test]
    fn test_priority_beats_table_order() {
        // "send" alone is a form.submit (40), but "send us a message" must
        // hit contact.submit (80) first.
        let engine = RuleEngine::with_defaults();
        assert_eq!(engine.match_intent("Send us a message"), Some("contact.submit"));
        assert_eq!(engine.match_intent("Send"), Some("form.submit"));
    }

    #[test]
    fn test_equal_priority_ties_keep_table_order() {
        let table = vec![
            IntentWiringRule::new(r"alpha", "first.intent", 50),
            IntentWiringRule::new(r"alpha", "second.intent", 50),
        ];
        let engine = RuleEngine::new(table).unwrap();
        assert_eq!(engine.match_intent("alpha"), Some("first.intent"));
    }

    #[test]
    fn test_same_text_same_result() {
        let engine = RuleEngine::with_defaults();
        let a = engine.match_intent("Book a table");
        let b = engine.match_intent("Book a table");
        assert_eq!(a, b);
        assert_eq!(a, Some("booking.request"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let table = vec![IntentWiringRule::new(r"(unclosed", "bad.intent", 1)];
        assert!(RuleEngine::new(table).is_err());
    }
}
