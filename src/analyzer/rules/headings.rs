//! Heading structure (H1-H6).

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{count_tag, find_elements, Document};
use crate::{CategoryKey, Impact, Issue, Severity};

const NO_H1: RuleSpec = RuleSpec::new("heading-1", CategoryKey::Headings, 30, Impact::High);
const MULTIPLE_H1: RuleSpec = RuleSpec::new("heading-2", CategoryKey::Headings, 30, Impact::High);
const H1_LENGTH: RuleSpec = RuleSpec::new("heading-3", CategoryKey::Headings, 30, Impact::High);
const H2_COUNT: RuleSpec = RuleSpec::new("heading-4", CategoryKey::Headings, 25, Impact::Medium);
const HIERARCHY: RuleSpec = RuleSpec::new("heading-5", CategoryKey::Headings, 25, Impact::Medium);
const SUMMARY: RuleSpec = RuleSpec::new("heading-6", CategoryKey::Headings, 20, Impact::Low);

pub const RULES: &[RuleSpec] = &[NO_H1, MULTIPLE_H1, H1_LENGTH, H2_COUNT, HIERARCHY, SUMMARY];

const H1_MIN: usize = 20;
const H1_MAX: usize = 70;

/// Rule set for the heading outline
pub struct HeadingsRule;

impl HeadingsRule {
    pub fn new() -> Self {
        Self
    }

    fn h1(&self, doc: &Document, h1_count: usize) -> Issue {
        match h1_count {
            0 => NO_H1
                .verdict(
                    Severity::Critical,
                    0,
                    "Missing H1 heading",
                    "The page has no <h1> element.",
                )
                .with_fix("Add a single <h1> that states the page's main topic."),
            1 => self.h1_length(doc),
            n => MULTIPLE_H1
                .verdict(
                    Severity::Warning,
                    15,
                    "Multiple H1 headings",
                    format!("Found {} <h1> elements; one is recommended.", n),
                )
                .with_fix("Keep one <h1> and demote the others to <h2>."),
        }
    }

    fn h1_length(&self, doc: &Document) -> Issue {
        let text = find_elements(doc.markup(), "h1")
            .first()
            .map(|el| el.text())
            .unwrap_or_default();
        let len = text.chars().count();
        if len < H1_MIN {
            H1_LENGTH
                .verdict(
                    Severity::Warning,
                    20,
                    "H1 too short",
                    format!("H1 is {} characters; aim for {}-{}.", len, H1_MIN, H1_MAX),
                )
                .with_fix("Make the H1 more descriptive.")
        } else if len > H1_MAX {
            H1_LENGTH
                .verdict(
                    Severity::Warning,
                    25,
                    "H1 too long",
                    format!("H1 is {} characters; aim for at most {}.", len, H1_MAX),
                )
                .with_fix("Shorten the H1 to its essential message.")
        } else {
            H1_LENGTH.pass("H1 is well sized", format!("\"{}\" ({} characters)", text, len))
        }
    }

    fn h2(&self, h2_count: usize) -> Issue {
        match h2_count {
            0 => H2_COUNT
                .verdict(
                    Severity::Warning,
                    5,
                    "No H2 headings",
                    "Subheadings help readers and crawlers understand sections.",
                )
                .with_fix("Structure the content with <h2> subheadings."),
            1 => H2_COUNT
                .verdict(
                    Severity::Info,
                    15,
                    "Single H2 heading",
                    "Only one <h2> found; longer pages benefit from more sections.",
                )
                .with_fix("Consider adding more <h2> sections."),
            n => H2_COUNT.pass("Good use of H2 headings", format!("{} <h2> elements found.", n)),
        }
    }

    fn hierarchy(&self, counts: &[usize; 6]) -> Issue {
        if counts[0] >= 1 && counts[1] >= 1 {
            HIERARCHY.pass("Heading hierarchy present", "The page uses both H1 and H2 levels.")
        } else {
            HIERARCHY
                .verdict(
                    Severity::Warning,
                    10,
                    "Incomplete heading hierarchy",
                    "A page should have an H1 followed by H2 sections.",
                )
                .with_fix("Use H1 for the title and H2 for main sections.")
        }
    }

    fn summary(&self, counts: &[usize; 6]) -> Issue {
        let levels = counts
            .iter()
            .enumerate()
            .map(|(i, n)| format!("H{}: {}", i + 1, n))
            .collect::<Vec<_>>()
            .join(" | ");
        SUMMARY.note("Heading structure", levels)
    }
}

impl Default for HeadingsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for HeadingsRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Headings
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        let mut counts = [0usize; 6];
        for (level, count) in counts.iter_mut().enumerate() {
            *count = count_tag(doc.markup(), &format!("h{}", level + 1));
        }
        log::debug!("headings: {:?}", counts);
        vec![
            self.h1(doc, counts[0]),
            self.h2(counts[1]),
            self.hierarchy(&counts),
            self.summary(&counts),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(html: &str) -> Vec<Issue> {
        HeadingsRule::new().analyze(&Document::new(html, ""))
    }

    #[test]
    fn missing_h1_is_critical() {
        let issues = analyze("<p>no headings</p>");
        assert_eq!(issues[0].id, "heading-1");
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].points, 0);
        assert_eq!(issues[0].max_points, 30);
    }

    #[test]
    fn duplicate_h1_is_warning_with_half_credit() {
        let issues = analyze("<h1>First heading</h1><h1>Second heading</h1>");
        assert_eq!(issues[0].id, "heading-2");
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!((issues[0].points, issues[0].max_points), (15, 30));
    }

    #[test]
    fn single_h1_scored_by_length() {
        let short = analyze("<h1>Hi</h1>");
        assert_eq!((short[0].id.as_str(), short[0].points), ("heading-3", 20));
        let long = analyze(&format!("<h1>{}</h1>", "a".repeat(71)));
        assert_eq!(long[0].points, 25);
        let ok = analyze(&format!("<h1>{}</h1>", "a".repeat(40)));
        assert_eq!(ok[0].points, 30);
        assert_eq!(ok[0].severity, Severity::Success);
    }

    #[test]
    fn h2_tiers_and_hierarchy() {
        let none = analyze("<h1>Title of this page here</h1>");
        assert_eq!(none[1].points, 5);
        assert_eq!(none[2].points, 10);
        let one = analyze("<h1>x</h1><h2>a</h2>");
        assert_eq!((one[1].severity, one[1].points), (Severity::Info, 15));
        assert_eq!(one[2].points, 25);
        let two = analyze("<h2>a</h2><H2>b</H2>");
        assert_eq!(two[1].points, 25);
        assert_eq!(two[2].points, 10);
    }

    #[test]
    fn summary_lists_every_level() {
        let issues = analyze("<h1>a</h1><h2>b</h2><h2>c</h2><h4>d</h4>");
        let summary = issues.last().unwrap();
        assert_eq!(summary.id, "heading-6");
        assert_eq!(summary.description, "H1: 1 | H2: 2 | H3: 0 | H4: 1 | H5: 0 | H6: 0");
        assert_eq!(summary.points, 20);
    }

    #[test]
    fn category_maximum_is_one_hundred() {
        let max: u32 = analyze("").iter().map(|i| i.max_points).sum();
        assert_eq!(max, 100);
    }
}
