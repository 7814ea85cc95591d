//! Image accessibility and loading hygiene.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{attr, find_tags, Document};
use crate::{CategoryKey, Impact, Issue, Severity};

const NO_IMAGES: RuleSpec = RuleSpec::new("image-1", CategoryKey::Images, 100, Impact::Low);
const ALT_TEXT: RuleSpec = RuleSpec::new("image-2", CategoryKey::Images, 35, Impact::High);
const LAZY_LOADING: RuleSpec = RuleSpec::new("image-3", CategoryKey::Images, 20, Impact::Medium);
const DIMENSIONS: RuleSpec = RuleSpec::new("image-4", CategoryKey::Images, 25, Impact::Medium);
const SUMMARY: RuleSpec = RuleSpec::new("image-5", CategoryKey::Images, 20, Impact::Low);

pub const RULES: &[RuleSpec] = &[NO_IMAGES, ALT_TEXT, LAZY_LOADING, DIMENSIONS, SUMMARY];

/// Lazy loading only matters past this many images
const LAZY_THRESHOLD: usize = 2;

/// Alt attribute state of one `<img>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AltState {
    Missing,
    Empty,
    Present,
}

#[derive(Debug, Default)]
struct ImageTally {
    total: usize,
    with_alt: usize,
    empty_alt: usize,
    no_alt: usize,
    lazy: usize,
    sized: usize,
}

impl ImageTally {
    fn collect(tags: &[&str]) -> Self {
        let mut tally = ImageTally {
            total: tags.len(),
            ..Default::default()
        };
        for tag in tags {
            match alt_state(tag) {
                AltState::Missing => tally.no_alt += 1,
                AltState::Empty => tally.empty_alt += 1,
                AltState::Present => tally.with_alt += 1,
            }
            if attr(tag, "loading")
                .map(|v| v.trim().eq_ignore_ascii_case("lazy"))
                .unwrap_or(false)
            {
                tally.lazy += 1;
            }
            if attr(tag, "width").is_some() && attr(tag, "height").is_some() {
                tally.sized += 1;
            }
        }
        tally
    }
}

fn alt_state(tag: &str) -> AltState {
    match attr(tag, "alt") {
        None => AltState::Missing,
        Some(v) if v.trim().is_empty() => AltState::Empty,
        Some(_) => AltState::Present,
    }
}

/// Rule set for `<img>` elements
pub struct ImagesRule;

impl ImagesRule {
    pub fn new() -> Self {
        Self
    }

    fn alt_text(&self, t: &ImageTally) -> Issue {
        if t.no_alt > 0 {
            ALT_TEXT
                .verdict(
                    Severity::Critical,
                    0,
                    "Images missing alt text",
                    format!("{} of {} images have no alt attribute.", t.no_alt, t.total),
                )
                .with_fix("Describe every meaningful image with an alt attribute.")
        } else if t.empty_alt > 0 {
            ALT_TEXT
                .verdict(
                    Severity::Warning,
                    20,
                    "Images with empty alt text",
                    format!("{} of {} images have an empty alt attribute.", t.empty_alt, t.total),
                )
                .with_fix("Use empty alt only for decorative images; describe the rest.")
        } else {
            ALT_TEXT.pass("All images have alt text", format!("{} images described.", t.total))
        }
    }

    fn lazy_loading(&self, t: &ImageTally) -> Issue {
        if t.total <= LAZY_THRESHOLD {
            LAZY_LOADING.pass(
                "Lazy loading optional",
                format!("Only {} image(s); lazy loading is not required.", t.total),
            )
        } else if t.lazy > 0 {
            LAZY_LOADING.pass(
                "Lazy loading in use",
                format!("{} of {} images load lazily.", t.lazy, t.total),
            )
        } else {
            LAZY_LOADING
                .verdict(
                    Severity::Warning,
                    10,
                    "No lazy loading",
                    format!("None of the {} images use loading=\"lazy\".", t.total),
                )
                .with_fix("Add loading=\"lazy\" to images below the fold.")
        }
    }

    fn dimensions(&self, t: &ImageTally) -> Issue {
        if t.sized == t.total {
            DIMENSIONS.pass(
                "Image dimensions specified",
                "Every image declares width and height.",
            )
        } else {
            DIMENSIONS
                .verdict(
                    Severity::Warning,
                    10,
                    "Missing image dimensions",
                    format!(
                        "{} of {} images lack explicit width and height.",
                        t.total - t.sized,
                        t.total
                    ),
                )
                .with_fix("Set width and height attributes to prevent layout shift.")
        }
    }

    fn summary(&self, t: &ImageTally) -> Issue {
        SUMMARY.note(
            "Image summary",
            format!(
                "Total: {} | With Alt: {} | Empty Alt: {} | No Alt: {}",
                t.total, t.with_alt, t.empty_alt, t.no_alt
            ),
        )
    }
}

impl Default for ImagesRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for ImagesRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Images
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        let tags = find_tags(doc.markup(), "img");
        log::debug!("images: {} <img> tags", tags.len());
        if tags.is_empty() {
            return vec![NO_IMAGES.verdict(
                Severity::Info,
                50,
                "No images",
                "The page has no images; consider adding relevant visuals.",
            )];
        }
        let tally = ImageTally::collect(&tags);
        vec![
            self.alt_text(&tally),
            self.lazy_loading(&tally),
            self.dimensions(&tally),
            self.summary(&tally),
        ]
    }
}
