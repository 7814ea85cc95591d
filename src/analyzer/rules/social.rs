//! Open Graph and Twitter Card metadata.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{meta_content, Document};
use crate::{CategoryKey, Impact, Issue, Severity};

const OPEN_GRAPH: RuleSpec = RuleSpec::new("social-1", CategoryKey::Social, 40, Impact::Medium);
const TWITTER_CARD: RuleSpec = RuleSpec::new("social-2", CategoryKey::Social, 40, Impact::Medium);
const IMAGE_SIZE: RuleSpec = RuleSpec::new("social-3", CategoryKey::Social, 20, Impact::Low);

pub const RULES: &[RuleSpec] = &[OPEN_GRAPH, TWITTER_CARD, IMAGE_SIZE];

pub const OPEN_GRAPH_TAGS: &[&str] = &["og:title", "og:description", "og:image", "og:url", "og:type"];
pub const TWITTER_TAGS: &[&str] = &[
    "twitter:card",
    "twitter:title",
    "twitter:description",
    "twitter:image",
];

/// Rule set for social sharing metadata
pub struct SocialRule;

impl SocialRule {
    pub fn new() -> Self {
        Self
    }

    /// Score one tag family: each present tag is worth `spec.max_points / tags.len()`
    fn family(&self, doc: &Document, spec: &RuleSpec, label: &str, tags: &[&str]) -> Issue {
        let missing: Vec<&str> = tags
            .iter()
            .copied()
            .filter(|t| meta_content(doc.markup(), t).is_none())
            .collect();
        let found = tags.len() - missing.len();
        let per_tag = spec.max_points / tags.len() as u32;
        if missing.is_empty() {
            spec.pass(
                format!("{} tags complete", label),
                format!("All {} {} tags are present.", tags.len(), label),
            )
        } else {
            spec.verdict(
                Severity::Warning,
                per_tag * found as u32,
                format!("Incomplete {} tags", label),
                format!(
                    "{} of {} present; missing {}.",
                    found,
                    tags.len(),
                    missing.join(", ")
                ),
            )
            .with_fix(format!("Add the missing {} meta tags.", label))
        }
    }

    fn image_size(&self) -> Issue {
        IMAGE_SIZE.note(
            "Social image size",
            "Use a 1200x630px image so shared links render a large preview.",
        )
    }
}

impl Default for SocialRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for SocialRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Social
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        log::debug!("social: analyzing {} bytes", doc.byte_size());
        vec![
            self.family(doc, &OPEN_GRAPH, "Open Graph", OPEN_GRAPH_TAGS),
            self.family(doc, &TWITTER_CARD, "Twitter Card", TWITTER_TAGS),
            self.image_size(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(html: &str) -> Vec<Issue> {
        SocialRule::new().analyze(&Document::new(html, ""))
    }

    #[test]
    fn partial_open_graph_earns_eight_per_tag() {
        let html = r#"<meta property="og:title" content="T"><meta property="og:image" content="/i.png">"#;
        let issues = analyze(html);
        assert_eq!((issues[0].severity, issues[0].points), (Severity::Warning, 16));
        assert!(issues[0].description.contains("og:description"));
    }

    #[test]
    fn complete_twitter_card() {
        let html: String = TWITTER_TAGS
            .iter()
            .map(|t| format!(r#"<meta name="{}" content="x">"#, t))
            .collect();
        let issues = analyze(&html);
        assert_eq!((issues[1].severity, issues[1].points), (Severity::Success, 40));
    }

    #[test]
    fn no_social_tags() {
        let issues = analyze("");
        assert_eq!(issues[0].points, 0);
        assert_eq!(issues[1].points, 0);
        assert_eq!(issues[2].points, 20);
        let max: u32 = issues.iter().map(|i| i.max_points).sum();
        assert_eq!(max, 100);
    }
}
