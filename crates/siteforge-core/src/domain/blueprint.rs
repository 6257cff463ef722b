//! Business blueprint and brand primitives.

use serde::{Deserialize, Serialize};

/// One candidate page in a blueprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlueprintPage {
    /// Page title (page ids are derived from this).
    pub title: String,

    /// What the page is for, in one line.
    pub purpose: String,
}

impl BlueprintPage {
    pub fn new(title: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            purpose: purpose.into(),
        }
    }
}

/// Structured business description driving page and brand generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessBlueprint {
    /// Industry the business operates in (e.g. "restaurant").
    pub industry: String,

    /// Primary goal of the site (e.g. "generate leads").
    pub primary_goal: String,

    /// BCP-47 locale tag.
    pub locale: String,

    /// Candidate pages, in presentation order.
    pub pages: Vec<BlueprintPage>,
}

/// The fixed four-page blueprint used when no AI blueprint was requested.
pub fn default_blueprint(industry: Option<&str>) -> BusinessBlueprint {
    BusinessBlueprint {
        industry: industry.unwrap_or("general").to_string(),
        primary_goal: "present the business and capture inquiries".to_string(),
        locale: "en-US".to_string(),
        pages: vec![
            BlueprintPage::new("Home", "introduce the business and its main offer"),
            BlueprintPage::new("About", "tell the business story"),
            BlueprintPage::new("Services", "list what the business offers"),
            BlueprintPage::new("Contact", "let visitors get in touch"),
        ],
    }
}

/// Brand color tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorTokens {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
}

/// Brand typography choices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Typography {
    pub heading: String,
    pub body: String,
}

/// Brand primitives applied to every generated page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandKit {
    /// Display name of the business.
    pub name: String,

    pub colors: ColorTokens,
    pub typography: Typography,

    /// Voice for generated copy (e.g. "warm", "professional").
    pub tone: String,
}

impl BrandKit {
    /// Neutral placeholder brand used in the skeleton bundle until the
    /// brand stage overwrites it.
    pub fn placeholder() -> Self {
        Self {
            name: "Untitled Site".to_string(),
            colors: ColorTokens {
                primary: "#1f2937".to_string(),
                secondary: "#6b7280".to_string(),
                accent: "#2563eb".to_string(),
                background: "#ffffff".to_string(),
            },
            typography: Typography {
                heading: "Inter".to_string(),
                body: "Inter".to_string(),
            },
            tone: "neutral".to_string(),
        }
    }
}
