//! Body text volume, structure and keyword density.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{count_tag, Document};
use crate::{CategoryKey, Impact, Issue, Severity};
use std::collections::HashMap;

const WORD_COUNT: RuleSpec = RuleSpec::new("content-1", CategoryKey::Content, 25, Impact::High);
const PARAGRAPHS: RuleSpec = RuleSpec::new("content-2", CategoryKey::Content, 15, Impact::Medium);
const LISTS: RuleSpec = RuleSpec::new("content-3", CategoryKey::Content, 10, Impact::Medium);
const EMPHASIS: RuleSpec = RuleSpec::new("content-4", CategoryKey::Content, 10, Impact::Medium);
const READING_TIME: RuleSpec = RuleSpec::new("content-5", CategoryKey::Content, 15, Impact::Low);
const STUFFING: RuleSpec = RuleSpec::new("content-6", CategoryKey::Content, 25, Impact::Medium);

pub const RULES: &[RuleSpec] = &[
    WORD_COUNT,
    PARAGRAPHS,
    LISTS,
    EMPHASIS,
    READING_TIME,
    STUFFING,
];

const WORDS_PER_MINUTE: usize = 200;
/// Share of all words a single token may take before it counts as stuffing
const STUFFING_RATIO: f64 = 0.05;
/// Tokens this short are ignored by the density check
const MIN_KEYWORD_LEN: usize = 5;

/// Rule set for on-page content
pub struct ContentQualityRule;

impl ContentQualityRule {
    pub fn new() -> Self {
        Self
    }

    fn word_count(&self, words: usize) -> Issue {
        match words {
            0..=299 => WORD_COUNT
                .verdict(
                    Severity::Critical,
                    0,
                    "Thin content",
                    format!("Only {} words of content; at least 300 are recommended.", words),
                )
                .with_fix("Add substantive text that covers the topic in depth."),
            300..=499 => WORD_COUNT
                .verdict(
                    Severity::Warning,
                    15,
                    "Light content",
                    format!("{} words of content; 500 or more ranks better.", words),
                )
                .with_fix("Expand the page with more detail, examples or FAQs."),
            500..=999 => WORD_COUNT.verdict(
                Severity::Success,
                20,
                "Good content length",
                format!("{} words of content.", words),
            ),
            _ => WORD_COUNT.pass(
                "Comprehensive content",
                format!("{} words of content.", words),
            ),
        }
    }

    fn paragraphs(&self, doc: &Document) -> Issue {
        let count = count_tag(doc.markup(), "p");
        match count {
            0 => PARAGRAPHS
                .verdict(
                    Severity::Warning,
                    0,
                    "No paragraphs",
                    "Text is not organized in <p> elements.",
                )
                .with_fix("Break the content into paragraphs."),
            1 | 2 => PARAGRAPHS
                .verdict(
                    Severity::Warning,
                    8,
                    "Few paragraphs",
                    format!("Only {} paragraph(s) found.", count),
                )
                .with_fix("Split long text into at least three focused paragraphs."),
            _ => PARAGRAPHS.pass(
                "Well-structured paragraphs",
                format!("{} paragraphs found.", count),
            ),
        }
    }

    fn lists(&self, doc: &Document) -> Issue {
        let count = count_tag(doc.markup(), "ul") + count_tag(doc.markup(), "ol");
        if count > 0 {
            LISTS.pass("Lists used", format!("{} list(s) found.", count))
        } else {
            LISTS
                .verdict(
                    Severity::Info,
                    5,
                    "No lists",
                    "Bulleted or numbered lists make content easier to scan.",
                )
                .with_fix("Use <ul> or <ol> for enumerations and steps.")
        }
    }

    fn emphasis(&self, doc: &Document) -> Issue {
        let count: usize = ["strong", "b", "em", "i"]
            .iter()
            .map(|tag| count_tag(doc.markup(), tag))
            .sum();
        if count > 0 {
            EMPHASIS.pass("Emphasis used", format!("{} emphasized phrase(s).", count))
        } else {
            EMPHASIS
                .verdict(
                    Severity::Info,
                    5,
                    "No emphasized text",
                    "No <strong>, <b>, <em> or <i> elements were found.",
                )
                .with_fix("Highlight key phrases with <strong> or <em>.")
        }
    }

    fn reading_time(&self, words: usize) -> Issue {
        let minutes = words.div_ceil(WORDS_PER_MINUTE);
        READING_TIME.note(
            "Estimated reading time",
            format!("About {} minute(s) to read.", minutes),
        )
    }

    fn stuffing(&self, doc: &Document, words: usize) -> Issue {
        match stuffed_keyword(doc, words) {
            Some((token, count)) => STUFFING
                .verdict(
                    Severity::Warning,
                    10,
                    "Possible keyword stuffing",
                    format!(
                        "\"{}\" appears {} times ({:.1}% of all words).",
                        token,
                        count,
                        count as f64 * 100.0 / words as f64
                    ),
                )
                .with_fix("Use synonyms and natural phrasing instead of repeating keywords."),
            None => STUFFING.pass(
                "Natural keyword density",
                "No single word dominates the content.",
            ),
        }
    }
}

/// Most frequent long token whose share of the text exceeds the stuffing ratio.
/// Ties are broken alphabetically so the result is deterministic.
fn stuffed_keyword(doc: &Document, words: usize) -> Option<(String, usize)> {
    if words == 0 {
        return None;
    }
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in doc.words() {
        let token = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if token.chars().count() >= MIN_KEYWORD_LEN {
            *freq.entry(token).or_insert(0) += 1;
        }
    }
    freq.into_iter()
        .filter(|(_, count)| *count as f64 > words as f64 * STUFFING_RATIO)
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
}

impl Default for ContentQualityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for ContentQualityRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Content
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        let words = doc.word_count();
        log::debug!("content: {} words", words);
        vec![
            self.word_count(words),
            self.paragraphs(doc),
            self.lists(doc),
            self.emphasis(doc),
            self.reading_time(words),
            self.stuffing(doc, words),
        ]
    }
}
