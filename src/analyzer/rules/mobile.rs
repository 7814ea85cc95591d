//! Mobile friendliness proxies that can be read from markup alone.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{find_elements, find_tags, global_pattern_cache, has_attr, meta_content, Document};
use crate::{CategoryKey, Impact, Issue, Severity};

const VIEWPORT: RuleSpec = RuleSpec::new("mobile-1", CategoryKey::Mobile, 30, Impact::High);
const TOUCH_TARGETS: RuleSpec = RuleSpec::new("mobile-2", CategoryKey::Mobile, 15, Impact::Low);
const FONT_SIZE: RuleSpec = RuleSpec::new("mobile-3", CategoryKey::Mobile, 20, Impact::Medium);
const RESPONSIVE_IMAGES: RuleSpec =
    RuleSpec::new("mobile-4", CategoryKey::Mobile, 15, Impact::Medium);
const MEDIA_QUERIES: RuleSpec = RuleSpec::new("mobile-5", CategoryKey::Mobile, 20, Impact::Medium);

pub const RULES: &[RuleSpec] = &[
    VIEWPORT,
    TOUCH_TARGETS,
    FONT_SIZE,
    RESPONSIVE_IMAGES,
    MEDIA_QUERIES,
];

/// Smallest legible font size, in CSS pixels
const MIN_FONT_PX: f64 = 12.0;

/// Rule set for mobile rendering
pub struct MobileRule;

impl MobileRule {
    pub fn new() -> Self {
        Self
    }

    fn viewport(&self, doc: &Document) -> Issue {
        let Some(content) = meta_content(doc.markup(), "viewport") else {
            return VIEWPORT
                .verdict(
                    Severity::Critical,
                    0,
                    "No viewport configuration",
                    "Without a viewport meta tag mobile browsers render a zoomed-out desktop page.",
                )
                .with_fix(
                    "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
                );
        };
        let normalized: String = content
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if normalized.contains("width=device-width") {
            VIEWPORT.pass("Responsive viewport", format!("Viewport is \"{}\".", content))
        } else {
            VIEWPORT
                .verdict(
                    Severity::Warning,
                    15,
                    "Viewport not device-width",
                    format!("Viewport is \"{}\".", content),
                )
                .with_fix("Include width=device-width in the viewport content.")
        }
    }

    fn touch_targets(&self) -> Issue {
        TOUCH_TARGETS.note(
            "Touch target sizing",
            "Interactive elements should be at least 44x44px with enough spacing.",
        )
    }

    fn font_size(&self, doc: &Document) -> Issue {
        let smallest = small_font_sizes(doc.markup())
            .into_iter()
            .fold(None, |acc: Option<f64>, px| Some(acc.map_or(px, |a| a.min(px))));
        match smallest {
            Some(px) => FONT_SIZE
                .verdict(
                    Severity::Warning,
                    10,
                    "Small font sizes",
                    format!("Found font-size as small as {}px.", px),
                )
                .with_fix("Use at least 12px (16px for body text) on mobile."),
            None => FONT_SIZE.pass("Legible font sizes", "No font sizes below 12px were found."),
        }
    }

    fn responsive_images(&self, doc: &Document) -> Issue {
        let images = find_tags(doc.markup(), "img");
        let responsive = images
            .iter()
            .chain(find_tags(doc.markup(), "source").iter())
            .any(|tag| has_attr(tag, "srcset") || has_attr(tag, "sizes"));
        if responsive {
            RESPONSIVE_IMAGES.pass("Responsive images", "Images provide srcset or sizes.")
        } else if images.is_empty() {
            RESPONSIVE_IMAGES.note("No images to adapt", "The page has no images.")
        } else {
            RESPONSIVE_IMAGES
                .verdict(
                    Severity::Info,
                    8,
                    "Images are not responsive",
                    "No image uses srcset or sizes.",
                )
                .with_fix("Offer multiple resolutions with srcset and sizes.")
        }
    }

    fn media_queries(&self, doc: &Document) -> Issue {
        let found = find_elements(doc.markup(), "style")
            .iter()
            .any(|el| el.inner.to_ascii_lowercase().contains("@media"));
        if found {
            MEDIA_QUERIES.pass("Media queries found", "Inline styles adapt to screen size.")
        } else {
            MEDIA_QUERIES
                .verdict(
                    Severity::Info,
                    10,
                    "No inline media queries",
                    "No @media rule was found in inline <style> blocks; external stylesheets are not inspected.",
                )
                .with_fix("Use @media queries to adapt layout to small screens.")
        }
    }
}

/// Pixel sizes below the legibility floor in `font-size: Npx` declarations
fn small_font_sizes(markup: &str) -> Vec<f64> {
    let Some(re) = global_pattern_cache().get(r"(?i)font-size\s*:\s*(\d+(?:\.\d+)?)px") else {
        return Vec::new();
    };
    re.captures_iter(markup)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|px| *px < MIN_FONT_PX)
        .collect()
}

impl Default for MobileRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for MobileRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Mobile
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        log::debug!("mobile: analyzing {} bytes", doc.byte_size());
        vec![
            self.viewport(doc),
            self.touch_targets(),
            self.font_size(doc),
            self.responsive_images(doc),
            self.media_queries(doc),
        ]
    }
}
