//! Build context and run mode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a build run sources its business blueprint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    /// AI-authored blueprint: the blueprint stage calls the provider.
    SystemsAi,

    /// Deterministic default blueprint; the blueprint stage is skipped.
    Template,
}

impl BuildMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::SystemsAi => "systems_ai",
            BuildMode::Template => "template",
        }
    }
}

impl std::str::FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "systems_ai" => Ok(BuildMode::SystemsAi),
            "template" => Ok(BuildMode::Template),
            other => Err(format!("unknown build mode: {other}")),
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable input for one pipeline run.
///
/// Created once by the caller; read-only for the run's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildContext {
    /// Natural-language business description.
    pub prompt: String,

    /// Business entity the site belongs to.
    pub business_id: String,

    /// Owning user.
    pub owner_id: String,

    /// Run mode.
    pub mode: BuildMode,

    /// Optional industry hint (used when the blueprint carries none).
    pub industry: Option<String>,

    /// Free-form constraints (e.g. "pages_max": 3).
    pub constraints: BTreeMap<String, serde_json::Value>,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(
        prompt: impl Into<String>,
        business_id: impl Into<String>,
        owner_id: impl Into<String>,
        mode: BuildMode,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            business_id: business_id.into(),
            owner_id: owner_id.into(),
            mode,
            industry: None,
            constraints: BTreeMap::new(),
        }
    }

    /// Set the industry hint.
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Add a single constraint.
    pub fn with_constraint(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.constraints.insert(key.into(), value);
        self
    }

    /// The `pages_max` constraint override, when present and numeric.
    pub fn pages_max(&self) -> Option<u32> {
        self.constraints
            .get("pages_max")
            .and_then(|v| v.as_u64())
            .map(|n| n as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_strings() {
        assert_eq!(BuildMode::SystemsAi.as_str(), "systems_ai");
        assert_eq!(BuildMode::Template.as_str(), "template");
        assert_eq!("systems_ai".parse::<BuildMode>().unwrap(), BuildMode::SystemsAi);
        assert!("dag".parse::<BuildMode>().is_err());
    }

    #[test]
    fn test_pages_max_constraint() {
        let ctx = BuildContext::new("a bakery", "biz-1", "owner-1", BuildMode::Template)
            .with_constraint("pages_max", serde_json::json!(3));
        assert_eq!(ctx.pages_max(), Some(3));

        let ctx = BuildContext::new("a bakery", "biz-1", "owner-1", BuildMode::Template)
            .with_constraint("pages_max", serde_json::json!("three"));
        assert_eq!(ctx.pages_max(), None);
    }

    #[test]
    fn test_context_defaults() {
        let ctx = BuildContext::new("a gym", "biz-2", "owner-2", BuildMode::SystemsAi);
        assert!(ctx.industry.is_none());
        assert!(ctx.constraints.is_empty());
    }
}
