//! Document-level technical signals: doctype, encoding, URL hygiene,
//! structured data.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{attr, count_matches, find_tags, is_match, links_with_rel, Document, PageUrl};
use crate::{CategoryKey, Impact, Issue, Severity};

const DOCTYPE: RuleSpec = RuleSpec::new("tech-1", CategoryKey::Technical, 15, Impact::Medium);
const CHARSET: RuleSpec = RuleSpec::new("tech-2", CategoryKey::Technical, 15, Impact::Medium);
const FAVICON: RuleSpec = RuleSpec::new("tech-3", CategoryKey::Technical, 10, Impact::Medium);
const HTTPS: RuleSpec = RuleSpec::new("tech-4", CategoryKey::Technical, 20, Impact::High);
const CLEAN_URL: RuleSpec = RuleSpec::new("tech-5", CategoryKey::Technical, 10, Impact::Medium);
const INLINE_STYLES: RuleSpec = RuleSpec::new("tech-6", CategoryKey::Technical, 15, Impact::Medium);
const JSON_LD: RuleSpec = RuleSpec::new("tech-7", CategoryKey::Technical, 15, Impact::Medium);

pub const RULES: &[RuleSpec] = &[
    DOCTYPE,
    CHARSET,
    FAVICON,
    HTTPS,
    CLEAN_URL,
    INLINE_STYLES,
    JSON_LD,
];

/// Query keys that expose internal identifiers or session state
pub const IDENTIFIER_PARAMS: &[&str] = &[
    "id",
    "pid",
    "cid",
    "uid",
    "itemid",
    "item_id",
    "productid",
    "product_id",
    "page_id",
    "sessionid",
    "session_id",
    "sid",
    "phpsessid",
    "jsessionid",
];

/// Query keys added by analytics and ad platforms
pub const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "dclid", "msclkid", "yclid", "mc_cid", "mc_eid", "_ga", "_gl", "igshid",
    "ref",
];

/// Any `utm_*` key counts as tracking
const TRACKING_PREFIX: &str = "utm_";

const INLINE_STYLE_LIMIT: usize = 10;

/// Rule set for technical SEO
pub struct TechnicalRule;

impl TechnicalRule {
    pub fn new() -> Self {
        Self
    }

    fn doctype(&self, doc: &Document) -> Issue {
        if is_match(r"(?i)<!doctype\s+html", doc.markup()) {
            DOCTYPE.pass("DOCTYPE declared", "The document starts in standards mode.")
        } else {
            DOCTYPE
                .verdict(
                    Severity::Warning,
                    0,
                    "Missing DOCTYPE",
                    "Without <!DOCTYPE html> browsers render in quirks mode.",
                )
                .with_fix("Add <!DOCTYPE html> as the first line.")
        }
    }

    fn charset(&self, doc: &Document) -> Issue {
        match declared_charset(doc.markup()) {
            Some(cs) if is_utf8(&cs) => {
                CHARSET.pass("UTF-8 encoding", "The character encoding is UTF-8.")
            }
            Some(cs) => CHARSET
                .verdict(
                    Severity::Warning,
                    10,
                    "Non-UTF-8 encoding",
                    format!("The page declares charset \"{}\".", cs),
                )
                .with_fix("Serve and declare the page as UTF-8."),
            None => CHARSET
                .verdict(
                    Severity::Warning,
                    0,
                    "Missing charset",
                    "No character encoding is declared.",
                )
                .with_fix("Add <meta charset=\"UTF-8\"> early in <head>."),
        }
    }

    fn favicon(&self, doc: &Document) -> Issue {
        if links_with_rel(doc.markup(), "icon").is_empty() {
            FAVICON
                .verdict(
                    Severity::Info,
                    5,
                    "No favicon",
                    "No <link rel=\"icon\"> was found.",
                )
                .with_fix("Add a favicon to improve recognition in tabs and results.")
        } else {
            FAVICON.pass("Favicon present", "The page declares a favicon.")
        }
    }

    fn https(&self, url: &PageUrl) -> Issue {
        if url.is_empty() {
            HTTPS.note("HTTPS not checked", "No URL was supplied.")
        } else if url.is_https() {
            HTTPS.pass("Served over HTTPS", "The page URL uses HTTPS.")
        } else {
            HTTPS
                .verdict(
                    Severity::Critical,
                    0,
                    "Not served over HTTPS",
                    format!("\"{}\" does not use HTTPS.", url.as_str()),
                )
                .with_fix("Serve the site over HTTPS and redirect HTTP traffic.")
        }
    }

    fn clean_url(&self, url: &PageUrl) -> Issue {
        if url.is_empty() {
            return CLEAN_URL.note("URL structure not checked", "No URL was supplied.");
        }
        let mut problems = Vec::new();
        let noisy: Vec<String> = url
            .query_keys()
            .into_iter()
            .filter(|k| is_noisy_param(k))
            .collect();
        if !noisy.is_empty() {
            problems.push(format!("query parameters {}", noisy.join(", ")));
        }
        if url.path_has_uppercase() {
            problems.push("uppercase characters in the path".to_string());
        }
        if problems.is_empty() {
            CLEAN_URL.pass("Clean URL", "The URL is short and readable.")
        } else {
            CLEAN_URL
                .verdict(
                    Severity::Warning,
                    5,
                    "URL could be cleaner",
                    format!("Found {}.", problems.join(" and ")),
                )
                .with_fix("Use lowercase, descriptive paths without IDs or tracking parameters.")
        }
    }

    fn inline_styles(&self, doc: &Document) -> Issue {
        let count = count_matches(r#"(?i)[\s"']style\s*="#, doc.markup());
        if count > INLINE_STYLE_LIMIT {
            INLINE_STYLES
                .verdict(
                    Severity::Warning,
                    5,
                    "Heavy use of inline styles",
                    format!("{} inline style attributes found.", count),
                )
                .with_fix("Move inline styles into a stylesheet.")
        } else {
            INLINE_STYLES.pass(
                "Inline styles under control",
                format!("{} inline style attribute(s).", count),
            )
        }
    }

    fn json_ld(&self, doc: &Document) -> Issue {
        let present = find_tags(doc.markup(), "script").iter().any(|tag| {
            attr(tag, "type")
                .map(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
                .unwrap_or(false)
        });
        if present {
            JSON_LD.pass("Structured data present", "JSON-LD structured data was found.")
        } else {
            JSON_LD
                .verdict(
                    Severity::Info,
                    5,
                    "No structured data",
                    "No JSON-LD block was found.",
                )
                .with_fix("Describe the page with schema.org JSON-LD for rich results.")
        }
    }
}

fn declared_charset(markup: &str) -> Option<String> {
    for tag in find_tags(markup, "meta") {
        if let Some(cs) = attr(tag, "charset") {
            return Some(cs.trim().to_string());
        }
        let is_content_type = attr(tag, "http-equiv")
            .map(|v| v.trim().eq_ignore_ascii_case("content-type"))
            .unwrap_or(false);
        if is_content_type {
            let content = attr(tag, "content").unwrap_or_default();
            let lower = content.to_ascii_lowercase();
            if let Some(idx) = lower.find("charset=") {
                return Some(content[idx + "charset=".len()..].trim().to_string());
            }
        }
    }
    None
}

fn is_utf8(charset: &str) -> bool {
    matches!(charset.to_ascii_lowercase().as_str(), "utf-8" | "utf8")
}

fn is_noisy_param(key: &str) -> bool {
    key.starts_with(TRACKING_PREFIX)
        || TRACKING_PARAMS.contains(&key)
        || IDENTIFIER_PARAMS.contains(&key)
}

impl Default for TechnicalRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for TechnicalRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Technical
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        log::debug!("technical: url={:?}", doc.url().as_str());
        vec![
            self.doctype(doc),
            self.charset(doc),
            self.favicon(doc),
            self.https(doc.url()),
            self.clean_url(doc.url()),
            self.inline_styles(doc),
            self.json_ld(doc),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(html: &str, url: &str) -> Vec<Issue> {
        TechnicalRule::new().analyze(&Document::new(html, url))
    }

    #[test]
    fn well_formed_head_scores_fully() {
        let html = r#"<!DOCTYPE html><html><head><meta charset="UTF-8">
            <link rel="icon" href="/favicon.ico">
            <script type="application/ld+json">{"@type":"WebPage"}</script></head></html>"#;
        let issues = analyze(html, "https://example.com/products/shoes");
        assert!(issues.iter().all(|i| i.severity == Severity::Success), "{:#?}", issues);
        let score: u32 = issues.iter().map(|i| i.points).sum();
        assert_eq!(score, 100);
    }

    #[test]
    fn charset_variants() {
        let other = analyze(r#"<meta charset="ISO-8859-1">"#, "");
        assert_eq!((other[1].severity, other[1].points), (Severity::Warning, 10));
        let legacy = analyze(
            r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#,
            "",
        );
        assert_eq!(legacy[1].points, 15);
        assert_eq!(analyze("", "")[1].points, 0);
    }

    #[test]
    fn url_rules_award_credit_without_url() {
        let issues = analyze("", "");
        assert_eq!((issues[3].severity, issues[3].points), (Severity::Info, 20));
        assert_eq!((issues[4].severity, issues[4].points), (Severity::Info, 10));
    }

    #[test]
    fn plain_http_is_critical() {
        let issues = analyze("", "http://example.com");
        assert_eq!((issues[3].severity, issues[3].points), (Severity::Critical, 0));
    }

    #[test]
    fn noisy_urls_are_flagged() {
        let tracked = analyze("", "https://example.com/shoes?utm_source=news");
        assert_eq!(tracked[4].points, 5);
        let ident = analyze("", "https://example.com/view?id=42");
        assert_eq!(ident[4].points, 5);
        let upper = analyze("", "https://example.com/Shoes/Red");
        assert_eq!(upper[4].points, 5);
        assert!(upper[4].description.contains("uppercase"));
        let clean = analyze("", "https://example.com/shoes?color=red");
        assert_eq!(clean[4].points, 10);
    }

    #[test]
    fn lowercase_non_ascii_paths_are_clean() {
        for url in ["https://example.com/café", "https://例え.jp/ページ"] {
            let issues = analyze("", url);
            assert_eq!((issues[4].severity, issues[4].points), (Severity::Success, 10), "{}", url);
        }
    }

    #[test]
    fn inline_style_threshold() {
        let ten = r#"<p style="a">"#.repeat(10);
        assert_eq!(analyze(&ten, "")[5].points, 15);
        let eleven = r#"<p style="a">"#.repeat(11);
        assert_eq!(analyze(&eleven, "")[5].points, 5);
    }
}
