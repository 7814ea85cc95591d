//! Title, meta description and other head-level tags.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{attr, find_meta, find_tags, links_with_rel, meta_content, Document};
use crate::{CategoryKey, Impact, Issue, Severity};

const TITLE: RuleSpec = RuleSpec::new("meta-1", CategoryKey::Meta, 20, Impact::High);
const DESCRIPTION: RuleSpec = RuleSpec::new("meta-2", CategoryKey::Meta, 20, Impact::High);
const CANONICAL: RuleSpec = RuleSpec::new("meta-3", CategoryKey::Meta, 15, Impact::Medium);
const KEYWORDS: RuleSpec = RuleSpec::new("meta-4", CategoryKey::Meta, 10, Impact::Low);
const ROBOTS: RuleSpec = RuleSpec::new("meta-5", CategoryKey::Meta, 15, Impact::Medium);
const LANG: RuleSpec = RuleSpec::new("meta-6", CategoryKey::Meta, 10, Impact::Medium);
const VIEWPORT: RuleSpec = RuleSpec::new("meta-7", CategoryKey::Meta, 10, Impact::High);

pub const RULES: &[RuleSpec] = &[
    TITLE,
    DESCRIPTION,
    CANONICAL,
    KEYWORDS,
    ROBOTS,
    LANG,
    VIEWPORT,
];

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 100;
const DESCRIPTION_MAX: usize = 160;

/// Rule set for head metadata
pub struct MetaTagsRule;

impl MetaTagsRule {
    pub fn new() -> Self {
        Self
    }

    fn title(&self, doc: &Document) -> Issue {
        let Some(title) = doc.title() else {
            return TITLE
                .verdict(
                    Severity::Critical,
                    0,
                    "Missing page title",
                    "The page has no <title> element.",
                )
                .with_fix("Add a descriptive <title> of 30-60 characters.");
        };
        let len = title.chars().count();
        if len < TITLE_MIN {
            TITLE
                .verdict(
                    Severity::Warning,
                    10,
                    "Title too short",
                    format!("Title is {} characters; aim for {}-{}.", len, TITLE_MIN, TITLE_MAX),
                )
                .with_fix("Expand the title with the page's main topic and brand.")
        } else if len > TITLE_MAX {
            TITLE
                .verdict(
                    Severity::Warning,
                    15,
                    "Title too long",
                    format!(
                        "Title is {} characters and may be truncated in search results.",
                        len
                    ),
                )
                .with_fix(format!("Shorten the title to at most {} characters.", TITLE_MAX))
        } else {
            TITLE.pass(
                "Title length is optimal",
                format!("Title is {} characters: \"{}\"", len, title),
            )
        }
    }

    fn description(&self, doc: &Document) -> Issue {
        let Some(desc) = doc.meta_description() else {
            return DESCRIPTION
                .verdict(
                    Severity::Critical,
                    0,
                    "Missing meta description",
                    "No <meta name=\"description\"> with content was found.",
                )
                .with_fix("Add a meta description of 100-160 characters summarizing the page.");
        };
        let len = desc.chars().count();
        if len < DESCRIPTION_MIN {
            DESCRIPTION
                .verdict(
                    Severity::Warning,
                    10,
                    "Meta description too short",
                    format!(
                        "Description is {} characters; aim for {}-{}.",
                        len, DESCRIPTION_MIN, DESCRIPTION_MAX
                    ),
                )
                .with_fix("Expand the description to summarize the page content.")
        } else if len > DESCRIPTION_MAX {
            DESCRIPTION
                .verdict(
                    Severity::Warning,
                    15,
                    "Meta description too long",
                    format!("Description is {} characters and may be truncated.", len),
                )
                .with_fix(format!(
                    "Trim the description to at most {} characters.",
                    DESCRIPTION_MAX
                ))
        } else {
            DESCRIPTION.pass(
                "Meta description length is optimal",
                format!("Description is {} characters.", len),
            )
        }
    }

    fn canonical(&self, doc: &Document) -> Issue {
        if links_with_rel(doc.markup(), "canonical").is_empty() {
            CANONICAL
                .verdict(
                    Severity::Warning,
                    0,
                    "Missing canonical link",
                    "No <link rel=\"canonical\"> was found.",
                )
                .with_fix("Declare the preferred URL with <link rel=\"canonical\" href=\"...\">.")
        } else {
            CANONICAL.pass("Canonical link present", "The page declares a canonical URL.")
        }
    }

    fn keywords(&self, doc: &Document) -> Issue {
        if meta_content(doc.markup(), "keywords").is_some() {
            KEYWORDS.note(
                "Meta keywords present",
                "Search engines ignore meta keywords; keep them consistent with the content or remove them.",
            )
        } else {
            KEYWORDS.pass("No meta keywords", "Meta keywords are not used, which is fine.")
        }
    }

    fn robots(&self, doc: &Document) -> Issue {
        let directive = meta_content(doc.markup(), "robots")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if directive.contains("noindex") || directive.contains("nofollow") {
            ROBOTS
                .verdict(
                    Severity::Critical,
                    0,
                    "Robots meta blocks crawling",
                    format!("Robots directive is \"{}\".", directive),
                )
                .with_fix("Remove noindex/nofollow unless the page must stay out of search results.")
        } else {
            ROBOTS.pass("Page is indexable", "No blocking robots directive found.")
        }
    }

    fn lang(&self, doc: &Document) -> Issue {
        let lang = find_tags(doc.markup(), "html")
            .first()
            .and_then(|tag| attr(tag, "lang"))
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        match lang {
            Some(lang) => LANG.pass(
                "Language declared",
                format!("The document language is \"{}\".", lang),
            ),
            None => LANG
                .verdict(
                    Severity::Warning,
                    0,
                    "Missing lang attribute",
                    "The <html> element does not declare a language.",
                )
                .with_fix("Add a lang attribute, e.g. <html lang=\"en\">."),
        }
    }

    fn viewport(&self, doc: &Document) -> Issue {
        if find_meta(doc.markup(), "viewport").is_some() {
            VIEWPORT.pass("Viewport meta present", "A viewport meta tag is declared.")
        } else {
            VIEWPORT
                .verdict(
                    Severity::Critical,
                    0,
                    "Missing viewport meta",
                    "No <meta name=\"viewport\"> was found.",
                )
                .with_fix(
                    "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
                )
        }
    }
}

impl Default for MetaTagsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for MetaTagsRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Meta
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        log::debug!("meta: analyzing {} bytes", doc.byte_size());
        vec![
            self.title(doc),
            self.description(doc),
            self.canonical(doc),
            self.keywords(doc),
            self.robots(doc),
            self.lang(doc),
            self.viewport(doc),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue<'a>(issues: &'a [Issue], id: &str) -> &'a Issue {
        issues.iter().find(|i| i.id == id).unwrap()
    }

    fn analyze(html: &str) -> Vec<Issue> {
        MetaTagsRule::new().analyze(&Document::new(html, "https://example.com"))
    }

    #[test]
    fn empty_markup_takes_missing_branches() {
        let issues = analyze("");
        assert_eq!(issues.len(), 7);
        assert_eq!(issue(&issues, "meta-1").severity, Severity::Critical);
        assert_eq!(issue(&issues, "meta-2").severity, Severity::Critical);
        assert_eq!(issue(&issues, "meta-7").severity, Severity::Critical);
        assert_eq!(issue(&issues, "meta-6").points, 0);
        let max: u32 = issues.iter().map(|i| i.max_points).sum();
        assert_eq!(max, 100);
    }

    #[test]
    fn title_length_tiers() {
        let short = analyze("<title>Short</title>");
        assert_eq!(issue(&short, "meta-1").points, 10);
        assert_eq!(issue(&short, "meta-1").severity, Severity::Warning);

        let long = format!("<title>{}</title>", "x".repeat(61));
        assert_eq!(issue(&analyze(&long), "meta-1").points, 15);

        let ok = format!("<title>{}</title>", "x".repeat(45));
        let ok = analyze(&ok);
        assert_eq!(issue(&ok, "meta-1").points, 20);
        assert_eq!(issue(&ok, "meta-1").severity, Severity::Success);
    }

    #[test]
    fn description_length_tiers() {
        let html = |n: usize| format!(r#"<meta name="description" content="{}">"#, "d".repeat(n));
        assert_eq!(issue(&analyze(&html(50)), "meta-2").points, 10);
        assert_eq!(issue(&analyze(&html(161)), "meta-2").points, 15);
        assert_eq!(issue(&analyze(&html(130)), "meta-2").points, 20);
    }

    #[test]
    fn robots_noindex_is_critical() {
        let issues = analyze(r#"<meta name="robots" content="NOINDEX, follow">"#);
        let robots = issue(&issues, "meta-5");
        assert_eq!(robots.severity, Severity::Critical);
        assert_eq!(robots.points, 0);
        assert!(robots.fix_guidance.is_some());
    }

    #[test]
    fn keywords_are_informational_with_full_credit() {
        let issues = analyze(r#"<meta name="keywords" content="a, b">"#);
        let kw = issue(&issues, "meta-4");
        assert_eq!(kw.severity, Severity::Info);
        assert_eq!(kw.points, 10);
    }

    #[test]
    fn canonical_lang_and_viewport_present() {
        let html = r#"<html lang="en"><head><link rel="canonical" href="https://example.com/">
            <meta name="viewport" content="width=device-width"></head></html>"#;
        let issues = analyze(html);
        assert_eq!(issue(&issues, "meta-3").points, 15);
        assert_eq!(issue(&issues, "meta-6").points, 10);
        assert_eq!(issue(&issues, "meta-7").points, 10);
    }
}
