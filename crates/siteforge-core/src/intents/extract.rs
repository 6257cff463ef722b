//! Interactive-element extraction from generated page markup.
//!
//! Three independent passes scan the markup in a fixed order: button
//! elements, then non-external anchors, then submit-typed form inputs.
//! Within a pass, elements are yielded in document order. The combined
//! sequence is lazy and finite.

use regex::Regex;

/// One candidate interactive element found in page markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveElement {
    /// Normalized label text.
    pub text: String,

    /// DOM role ("button" or "link").
    pub role: String,

    /// Source tag ("button", "a", or "input").
    pub tag: String,

    /// Anchor href, when the element is a link.
    pub href: Option<String>,
}

/// Markup scanner with pre-compiled patterns.
pub struct ElementExtractor {
    button_re: Regex,
    anchor_re: Regex,
    submit_re: Regex,
    value_re: Regex,
    strip_re: Regex,
}

impl Default for ElementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementExtractor {
    pub fn new() -> Self {
        Self {
            button_re: Regex::new(r"(?is)<button[^>]*>(.*?)</button>")
                .expect("button pattern compiles"),
            anchor_re: Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
                .expect("anchor pattern compiles"),
            submit_re: Regex::new(r#"(?is)<input[^>]*type\s*=\s*["']submit["'][^>]*>"#)
                .expect("submit pattern compiles"),
            value_re: Regex::new(r#"(?i)value\s*=\s*["']([^"']*)["']"#)
                .expect("value pattern compiles"),
            strip_re: Regex::new(r"(?s)<[^>]*>").expect("strip pattern compiles"),
        }
    }

    /// Scan markup and yield candidate elements lazily, pass by pass.
    pub fn extract<'a>(
        &'a self,
        markup: &'a str,
    ) -> impl Iterator<Item = InteractiveElement> + 'a {
        let buttons = self.button_re.captures_iter(markup).filter_map(move |cap| {
            let text = self.normalize(cap.get(1).map(|m| m.as_str()).unwrap_or(""));
            if text.is_empty() {
                return None;
            }
            Some(InteractiveElement {
                text,
                role: "button".to_string(),
                tag: "button".to_string(),
                href: None,
            })
        });

        let anchors = self.anchor_re.captures_iter(markup).filter_map(move |cap| {
            let href = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            if is_external(href) {
                return None;
            }
            let text = self.normalize(cap.get(2).map(|m| m.as_str()).unwrap_or(""));
            if text.is_empty() {
                return None;
            }
            Some(InteractiveElement {
                text,
                role: "link".to_string(),
                tag: "a".to_string(),
                href: Some(href.to_string()),
            })
        });

        let submits = self.submit_re.find_iter(markup).map(move |m| {
            let label = self
                .value_re
                .captures(m.as_str())
                .and_then(|cap| cap.get(1))
                .map(|v| v.as_str().trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "Submit".to_string());
            InteractiveElement {
                text: label,
                role: "button".to_string(),
                tag: "input".to_string(),
                href: None,
            }
        });

        buttons.chain(anchors).chain(submits)
    }

    /// Strip nested tags and collapse whitespace.
    fn normalize(&self, raw: &str) -> String {
        let stripped = self.strip_re.replace_all(raw, " ");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Whether an href leaves the site (those anchors are not wired).
fn is_external(href: &str) -> bool {
    href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("//")
}
