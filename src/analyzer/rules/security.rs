//! Transport security signals visible in markup.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{attr, find_tags, Document, PageUrl};
use crate::{CategoryKey, Impact, Issue, Severity};

const HTTPS: RuleSpec = RuleSpec::new("security-1", CategoryKey::Security, 40, Impact::High);
const MIXED_CONTENT: RuleSpec =
    RuleSpec::new("security-2", CategoryKey::Security, 25, Impact::Medium);
const THIRD_PARTY: RuleSpec = RuleSpec::new("security-3", CategoryKey::Security, 15, Impact::Medium);
const FORM_ACTIONS: RuleSpec =
    RuleSpec::new("security-4", CategoryKey::Security, 20, Impact::Medium);

pub const RULES: &[RuleSpec] = &[HTTPS, MIXED_CONTENT, THIRD_PARTY, FORM_ACTIONS];

const THIRD_PARTY_LIMIT: usize = 5;

/// Elements whose `src` loads a subresource
const SRC_TAGS: &[&str] = &["img", "script", "iframe", "source", "video", "audio", "embed"];

/// Rule set for security
pub struct SecurityRule;

impl SecurityRule {
    pub fn new() -> Self {
        Self
    }

    fn https(&self, url: &PageUrl) -> Issue {
        if url.is_empty() {
            HTTPS.verdict(
                Severity::Info,
                20,
                "HTTPS not verified",
                "No URL was supplied, so the scheme could not be checked.",
            )
        } else if url.is_https() {
            HTTPS.pass("Secure connection", "The page is served over HTTPS.")
        } else {
            HTTPS
                .verdict(
                    Severity::Critical,
                    0,
                    "Insecure connection",
                    format!("\"{}\" is not served over HTTPS.", url.as_str()),
                )
                .with_fix("Install a TLS certificate and redirect all HTTP requests to HTTPS.")
        }
    }

    fn mixed_content(&self, doc: &Document) -> Issue {
        let markup = doc.markup();
        let from_src = SRC_TAGS
            .iter()
            .flat_map(|tag| find_tags(markup, tag))
            .filter_map(|tag| attr(tag, "src"));
        let from_links = find_tags(markup, "link")
            .into_iter()
            .filter_map(|tag| attr(tag, "href"));
        let insecure = from_src
            .chain(from_links)
            .filter(|v| v.trim().to_ascii_lowercase().starts_with("http://"))
            .count();
        if insecure == 0 {
            MIXED_CONTENT.pass("No mixed content", "All resources load over a secure scheme.")
        } else {
            MIXED_CONTENT
                .verdict(
                    Severity::Warning,
                    10,
                    "Mixed content",
                    format!("{} resource(s) are referenced over plain http://.", insecure),
                )
                .with_fix("Load every script, stylesheet and image over https://.")
        }
    }

    fn third_party_scripts(&self, doc: &Document) -> Issue {
        let count = find_tags(doc.markup(), "script")
            .into_iter()
            .filter_map(|tag| attr(tag, "src"))
            .filter(|src| is_cross_origin(doc.url(), src))
            .count();
        if count > THIRD_PARTY_LIMIT {
            THIRD_PARTY
                .verdict(
                    Severity::Info,
                    10,
                    "Many third-party scripts",
                    format!("{} scripts load from other origins.", count),
                )
                .with_fix("Audit third-party scripts and remove the ones you do not need.")
        } else {
            THIRD_PARTY.pass(
                "Third-party scripts limited",
                format!("{} cross-origin script(s).", count),
            )
        }
    }

    fn form_actions(&self, doc: &Document) -> Issue {
        let insecure = find_tags(doc.markup(), "form")
            .into_iter()
            .filter_map(|tag| attr(tag, "action"))
            .filter(|a| a.trim().to_ascii_lowercase().starts_with("http://"))
            .count();
        if insecure == 0 {
            FORM_ACTIONS.pass("Forms submit securely", "No form posts to an http:// URL.")
        } else {
            FORM_ACTIONS
                .verdict(
                    Severity::Warning,
                    0,
                    "Insecure form action",
                    format!("{} form(s) submit to an http:// URL.", insecure),
                )
                .with_fix("Point form actions at https:// endpoints.")
        }
    }
}

/// Absolute script sources on another host. Relative sources are same-origin.
fn is_cross_origin(page: &PageUrl, src: &str) -> bool {
    let lower = src.trim().to_ascii_lowercase();
    let absolute =
        lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//");
    absolute && !page.is_same_host(src.trim())
}

impl Default for SecurityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for SecurityRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Security
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        log::debug!("security: url={:?}", doc.url().as_str());
        vec![
            self.https(doc.url()),
            self.mixed_content(doc),
            self.third_party_scripts(doc),
            self.form_actions(doc),
        ]
    }
}
