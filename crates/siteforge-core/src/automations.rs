//! Automation recipes and installation.
//!
//! A small fixed table of base recipes applies to every site; industry
//! tables add more. A recipe whose secrets are missing is installed but
//! disabled, never omitted, and each missing secret is surfaced once per
//! provider.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::domain::bundle::{AutomationInstall, AutomationsBlock, SecretRequirement};

/// One recipe definition: id plus the secrets it needs to run.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub recipe: String,
    pub secrets: Vec<SecretRequirement>,
}

impl RecipeDef {
    fn open(recipe: &str) -> Self {
        Self {
            recipe: recipe.to_string(),
            secrets: Vec::new(),
        }
    }

    fn gated(recipe: &str, provider: &str, key: &str, reason: &str) -> Self {
        Self {
            recipe: recipe.to_string(),
            secrets: vec![SecretRequirement {
                provider: provider.to_string(),
                key: key.to_string(),
                reason: reason.to_string(),
            }],
        }
    }
}

/// Immutable recipe configuration owned by the pipeline.
///
/// Injected at construction so concurrent runs never share mutable tables.
pub struct AutomationCatalog {
    base: Vec<RecipeDef>,
    by_industry: BTreeMap<String, Vec<RecipeDef>>,
}

impl Default for AutomationCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AutomationCatalog {
    /// The fixed default recipe tables.
    pub fn with_defaults() -> Self {
        let base = vec![
            RecipeDef::open("lead-capture"),
            RecipeDef::gated(
                "welcome-email",
                "resend",
                "RESEND_API_KEY",
                "sends the post-signup welcome email",
            ),
            RecipeDef::open("form-forward"),
        ];

        let mut by_industry = BTreeMap::new();
        by_industry.insert(
            "restaurant".to_string(),
            vec![
                RecipeDef::open("reservation-handler"),
                RecipeDef::open("menu-update"),
            ],
        );
        by_industry.insert(
            "salon".to_string(),
            vec![RecipeDef::gated(
                "booking-reminder",
                "twilio",
                "TWILIO_AUTH_TOKEN",
                "sends SMS booking reminders",
            )],
        );
        by_industry.insert(
            "clinic".to_string(),
            vec![RecipeDef::gated(
                "booking-reminder",
                "twilio",
                "TWILIO_AUTH_TOKEN",
                "sends SMS booking reminders",
            )],
        );
        by_industry.insert(
            "retail".to_string(),
            vec![RecipeDef::gated(
                "abandoned-cart",
                "stripe",
                "STRIPE_API_KEY",
                "recovers abandoned checkout sessions",
            )],
        );

        Self { base, by_industry }
    }

    /// Build a catalog from explicit tables.
    pub fn new(base: Vec<RecipeDef>, by_industry: BTreeMap<String, Vec<RecipeDef>>) -> Self {
        Self { base, by_industry }
    }

    /// Install base plus industry recipes.
    ///
    /// Every recipe is installed; `enabled` is false exactly when the
    /// recipe requires at least one secret. Secret requirements are
    /// deduplicated by provider name.
    pub fn install_for(&self, industry: &str) -> AutomationsBlock {
        let now = Utc::now();
        let mut installed = Vec::new();
        let mut secrets: BTreeMap<String, SecretRequirement> = BTreeMap::new();

        let industry_recipes = self
            .by_industry
            .get(industry)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for def in self.base.iter().chain(industry_recipes) {
            installed.push(AutomationInstall {
                id: format!("auto-{}", def.recipe),
                recipe: def.recipe.clone(),
                enabled: def.secrets.is_empty(),
                installed_at: now,
            });

            for secret in &def.secrets {
                secrets
                    .entry(secret.provider.clone())
                    .or_insert_with(|| secret.clone());
            }
        }

        AutomationsBlock {
            installed,
            secrets_required: secrets.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_recipes_always_installed() {
        let catalog = AutomationCatalog::with_defaults();
        let block = catalog.install_for("general");

        let recipes: Vec<&str> = block.installed.iter().map(|i| i.recipe.as_str()).collect();
        assert!(recipes.contains(&"lead-capture"));
        assert!(recipes.contains(&"welcome-email"));
        assert!(recipes.contains(&"form-forward"));
    }

    #[test]
    fn test_restaurant_gets_industry_recipes() {
        let catalog = AutomationCatalog::with_defaults();
        let block = catalog.install_for("restaurant");

        let recipes: Vec<&str> = block.installed.iter().map(|i| i.recipe.as_str()).collect();
        assert!(recipes.contains(&"reservation-handler"));
        assert!(recipes.contains(&"menu-update"));
        assert_eq!(block.installed.len(), 5);
    }

    #[test]
    fn test_secret_gated_recipe_installed_but_disabled() {
        let catalog = AutomationCatalog::with_defaults();
        let block = catalog.install_for("general");

        let welcome = block
            .installed
            .iter()
            .find(|i| i.recipe == "welcome-email")
            .unwrap();
        assert!(!welcome.enabled, "missing secret must disable, not omit");

        let lead = block
            .installed
            .iter()
            .find(|i| i.recipe == "lead-capture")
            .unwrap();
        assert!(lead.enabled);

        assert!(block
            .secrets_required
            .iter()
            .any(|s| s.provider == "resend" && s.key == "RESEND_API_KEY"));
    }

    #[test]
    fn test_secrets_deduplicated_by_provider() {
        let base = vec![
            RecipeDef::gated("a", "twilio", "TWILIO_AUTH_TOKEN", "first"),
            RecipeDef::gated("b", "twilio", "TWILIO_AUTH_TOKEN", "second"),
        ];
        let catalog = AutomationCatalog::new(base, BTreeMap::new());
        let block = catalog.install_for("general");

        assert_eq!(block.installed.len(), 2);
        assert_eq!(block.secrets_required.len(), 1);
        assert_eq!(block.secrets_required[0].reason, "first");
    }

    #[test]
    fn test_unknown_industry_installs_base_only() {
        let catalog = AutomationCatalog::with_defaults();
        let block = catalog.install_for("submarine-repair");
        assert_eq!(block.installed.len(), 3);
    }
}
