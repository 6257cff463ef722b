//! Deterministic in-process provider.
//!
//! Serves `template` mode end-to-end with zero network calls: blueprint,
//! brand, and page content all come from fixed tables keyed by industry
//! and page. Inference always declines, so only deterministic rules
//! produce bindings in this mode.

use async_trait::async_trait;

use crate::domain::blueprint::{
    default_blueprint, BrandKit, BusinessBlueprint, ColorTokens, Typography,
};
use crate::domain::bundle::{PageBundle, RouteDef};
use crate::domain::context::BuildContext;
use crate::domain::error::ProviderResult;
use crate::domain::intent::{IntentDefinition, IntentWiringResult};
use crate::provider::AiProvider;

/// Deterministic content provider.
#[derive(Debug, Default, Clone)]
pub struct TemplateProvider;

impl TemplateProvider {
    pub fn new() -> Self {
        Self
    }

    /// Derive a display name from the prompt's leading clause.
    fn derive_name(prompt: &str) -> String {
        let clause = prompt
            .split(['.', ',', ';', '\n'])
            .next()
            .unwrap_or(prompt)
            .trim();

        let words: Vec<String> = clause
            .split_whitespace()
            .filter(|w| !matches!(w.to_lowercase().as_str(), "a" | "an" | "the" | "for" | "my"))
            .take(4)
            .map(titlecase)
            .collect();

        if words.is_empty() {
            "New Business".to_string()
        } else {
            words.join(" ")
        }
    }

    fn palette_for(industry: &str) -> ColorTokens {
        match industry {
            "restaurant" => ColorTokens {
                primary: "#7c2d12".to_string(),
                secondary: "#b45309".to_string(),
                accent: "#f59e0b".to_string(),
                background: "#fffbeb".to_string(),
            },
            "salon" | "clinic" => ColorTokens {
                primary: "#134e4a".to_string(),
                secondary: "#0f766e".to_string(),
                accent: "#2dd4bf".to_string(),
                background: "#f0fdfa".to_string(),
            },
            "retail" => ColorTokens {
                primary: "#581c87".to_string(),
                secondary: "#7e22ce".to_string(),
                accent: "#c084fc".to_string(),
                background: "#faf5ff".to_string(),
            },
            _ => ColorTokens {
                primary: "#1e3a5f".to_string(),
                secondary: "#334e68".to_string(),
                accent: "#2563eb".to_string(),
                background: "#f8fafc".to_string(),
            },
        }
    }

    fn tone_for(industry: &str) -> &'static str {
        match industry {
            "restaurant" => "warm",
            "salon" | "clinic" => "caring",
            "retail" => "energetic",
            _ => "professional",
        }
    }
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[async_trait]
impl AiProvider for TemplateProvider {
    async fn generate_blueprint(&self, ctx: &BuildContext) -> ProviderResult<BusinessBlueprint> {
        Ok(default_blueprint(ctx.industry.as_deref()))
    }

    async fn generate_brand_kit(
        &self,
        blueprint: &BusinessBlueprint,
        ctx: &BuildContext,
    ) -> ProviderResult<BrandKit> {
        Ok(BrandKit {
            name: Self::derive_name(&ctx.prompt),
            colors: Self::palette_for(&blueprint.industry),
            typography: Typography {
                heading: "Fraunces".to_string(),
                body: "Inter".to_string(),
            },
            tone: Self::tone_for(&blueprint.industry).to_string(),
        })
    }

    async fn generate_page(
        &self,
        route: &RouteDef,
        _blueprint: &BusinessBlueprint,
        brand: &BrandKit,
        _ctx: &BuildContext,
    ) -> ProviderResult<PageBundle> {
        let name = &brand.name;
        let (markup, sections): (String, Vec<&str>) = match route.page_id.as_str() {
            "home" => (
                format!(
                    r#"<section class="hero"><h1>{name}</h1>
<p>Welcome to {name}.</p>
<button class="cta">Get Started</button>
<a href="/about">Learn More</a></section>"#
                ),
                vec!["hero"],
            ),
            "about" => (
                format!(
                    r#"<section class="story"><h2>About {name}</h2>
<p>{name} was built around one idea: do the work well.</p>
<a href="/services">Our Services</a></section>"#
                ),
                vec!["story"],
            ),
            "services" => (
                format!(
                    r#"<section class="services"><h2>What {name} Offers</h2>
<ul><li>Core service</li><li>Premium service</li></ul>
<button class="cta">Book Now</button></section>"#
                ),
                vec!["services"],
            ),
            "contact" => (
                format!(
                    r#"<section class="contact"><h2>Contact {name}</h2>
<form method="post">
<input type="email" name="email" placeholder="you@example.com">
<textarea name="message"></textarea>
<input type="submit" value="Send Message">
</form></section>"#
                ),
                vec!["contact-form"],
            ),
            _ => (
                format!(
                    r#"<section class="content"><h2>{title}</h2>
<p>{name}: {title}.</p>
<a href="/">Back to Home</a></section>"#,
                    title = route.title,
                ),
                vec!["content"],
            ),
        };

        Ok(PageBundle {
            page_id: route.page_id.clone(),
            title: route.title.clone(),
            markup,
            sections: sections.into_iter().map(String::from).collect(),
            intent_bindings: Vec::new(),
        })
    }

    async fn infer_intent(
        &self,
        _text: &str,
        _role: &str,
        _catalog: &[IntentDefinition],
    ) -> ProviderResult<Option<IntentWiringResult>> {
        // Template mode never infers; unmatched elements stay unbound.
        Ok(None)
    }
}
