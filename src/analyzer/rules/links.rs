//! Anchor classification: internal, external, invalid and nofollow.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{attr, find_tags, Document, LinkKind};
use crate::{CategoryKey, Impact, Issue, Severity};

const INTERNAL: RuleSpec = RuleSpec::new("link-1", CategoryKey::Links, 30, Impact::High);
const EXTERNAL: RuleSpec = RuleSpec::new("link-2", CategoryKey::Links, 20, Impact::Medium);
const INVALID: RuleSpec = RuleSpec::new("link-3", CategoryKey::Links, 20, Impact::Medium);
const NOFOLLOW: RuleSpec = RuleSpec::new("link-4", CategoryKey::Links, 10, Impact::Low);
const SUMMARY: RuleSpec = RuleSpec::new("link-5", CategoryKey::Links, 20, Impact::Low);

pub const RULES: &[RuleSpec] = &[INTERNAL, EXTERNAL, INVALID, NOFOLLOW, SUMMARY];

#[derive(Debug, Default, PartialEq, Eq)]
struct LinkTally {
    total: usize,
    internal: usize,
    external: usize,
    invalid: usize,
    nofollow: usize,
}

/// Rule set for `<a href>` elements
pub struct LinksRule;

impl LinksRule {
    pub fn new() -> Self {
        Self
    }

    fn tally(&self, doc: &Document) -> LinkTally {
        let mut tally = LinkTally::default();
        for tag in find_tags(doc.markup(), "a") {
            let Some(href) = attr(tag, "href") else {
                continue;
            };
            tally.total += 1;
            match doc.url().classify_href(&href) {
                LinkKind::Internal => tally.internal += 1,
                LinkKind::External => tally.external += 1,
                LinkKind::Invalid => tally.invalid += 1,
                LinkKind::Other => {}
            }
            let nofollow = attr(tag, "rel")
                .map(|rel| {
                    rel.split_whitespace()
                        .any(|r| r.eq_ignore_ascii_case("nofollow"))
                })
                .unwrap_or(false);
            if nofollow {
                tally.nofollow += 1;
            }
        }
        tally
    }

    fn internal(&self, t: &LinkTally) -> Issue {
        if t.internal > 0 {
            INTERNAL.pass("Internal links present", format!("{} internal link(s).", t.internal))
        } else {
            INTERNAL
                .verdict(
                    Severity::Warning,
                    0,
                    "No internal links",
                    "The page does not link to other pages on the same site.",
                )
                .with_fix("Link to related pages on your site to help crawlers and readers.")
        }
    }

    fn external(&self, t: &LinkTally) -> Issue {
        if t.external > 0 {
            EXTERNAL.pass("External links present", format!("{} external link(s).", t.external))
        } else {
            EXTERNAL
                .verdict(
                    Severity::Info,
                    10,
                    "No external links",
                    "Linking to authoritative sources can add credibility.",
                )
                .with_fix("Cite relevant external resources where appropriate.")
        }
    }

    fn invalid(&self, t: &LinkTally) -> Issue {
        if t.invalid == 0 {
            INVALID.pass("No broken link targets", "Every link has a real destination.")
        } else {
            INVALID
                .verdict(
                    Severity::Warning,
                    10,
                    "Invalid link targets",
                    format!(
                        "{} link(s) use an empty, \"#\" or javascript: href.",
                        t.invalid
                    ),
                )
                .with_fix("Point links at real URLs or use <button> for script actions.")
        }
    }

    fn nofollow(&self, t: &LinkTally) -> Issue {
        NOFOLLOW.note(
            "Nofollow usage",
            format!("{} of {} link(s) carry rel=\"nofollow\".", t.nofollow, t.total),
        )
    }

    fn summary(&self, t: &LinkTally) -> Issue {
        SUMMARY.note(
            "Link summary",
            format!(
                "Total: {} | Internal: {} | External: {} | Nofollow: {}",
                t.total, t.internal, t.external, t.nofollow
            ),
        )
    }
}

impl Default for LinksRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for LinksRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Links
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        let tally = self.tally(doc);
        log::debug!("links: {:?}", tally);
        vec![
            self.internal(&tally),
            self.external(&tally),
            self.invalid(&tally),
            self.nofollow(&tally),
            self.summary(&tally),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <a href="/about">About</a>
        <a href="https://example.com/blog">Blog</a>
        <a href="https://other.org" rel="nofollow noopener">Other</a>
        <a href="#">Top</a>
        <a href="javascript:void(0)">JS</a>
        <a href="mailto:hi@example.com">Mail</a>
        <a name="anchor">No href</a>
    "##;

    #[test]
    fn tally_classifies_each_href() {
        let doc = Document::new(PAGE, "https://example.com/page");
        let tally = LinksRule::new().tally(&doc);
        assert_eq!(
            tally,
            LinkTally {
                total: 6,
                internal: 2,
                external: 1,
                invalid: 2,
                nofollow: 1,
            }
        );
    }

    #[test]
    fn scores_presence_and_invalid_hrefs() {
        let issues = LinksRule::new().analyze(&Document::new(PAGE, "https://example.com/page"));
        assert_eq!(issues[0].points, 30);
        assert_eq!(issues[1].points, 20);
        assert_eq!((issues[2].severity, issues[2].points), (Severity::Warning, 10));
        assert_eq!(
            issues[4].description,
            "Total: 6 | Internal: 2 | External: 1 | Nofollow: 1"
        );
    }

    #[test]
    fn unparsable_url_makes_absolute_links_external() {
        let tally = LinksRule::new().tally(&Document::new(PAGE, "::bad::"));
        assert_eq!(tally.internal, 1);
        assert_eq!(tally.external, 2);
    }

    #[test]
    fn no_links() {
        let issues = LinksRule::new().analyze(&Document::new("", ""));
        assert_eq!((issues[0].severity, issues[0].points), (Severity::Warning, 0));
        assert_eq!((issues[1].severity, issues[1].points), (Severity::Info, 10));
        assert_eq!(issues[2].points, 20);
        let max: u32 = issues.iter().map(|i| i.max_points).sum();
        assert_eq!(max, 100);
    }
}
