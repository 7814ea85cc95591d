//! Static performance proxies. Nothing is timed; every signal is read from
//! the markup.

use super::{CategoryAnalyzer, RuleSpec};
use crate::parser::{attr, count_tag, find_tags, has_attr, links_with_rel, Document};
use crate::{CategoryKey, Impact, Issue, Severity};

const PAGE_SIZE: RuleSpec = RuleSpec::new("perf-1", CategoryKey::Performance, 30, Impact::Medium);
const INLINE_BLOCKS: RuleSpec =
    RuleSpec::new("perf-2", CategoryKey::Performance, 25, Impact::Medium);
const RENDER_BLOCKING: RuleSpec =
    RuleSpec::new("perf-3", CategoryKey::Performance, 25, Impact::Medium);
const COMPRESSION: RuleSpec = RuleSpec::new("perf-4", CategoryKey::Performance, 20, Impact::Low);

pub const RULES: &[RuleSpec] = &[PAGE_SIZE, INLINE_BLOCKS, RENDER_BLOCKING, COMPRESSION];

const KB: usize = 1024;
const SMALL_PAGE: usize = 50 * KB;
const MEDIUM_PAGE: usize = 100 * KB;
const INLINE_BLOCK_LIMIT: usize = 5;
const RENDER_BLOCKING_SOFT_LIMIT: usize = 3;

/// Rule set for page weight and render path
pub struct PerformanceRule;

impl PerformanceRule {
    pub fn new() -> Self {
        Self
    }

    fn page_size(&self, bytes: usize) -> Issue {
        let kb = bytes as f64 / KB as f64;
        if bytes < SMALL_PAGE {
            PAGE_SIZE.pass("Lightweight page", format!("Markup is {:.1} KB.", kb))
        } else if bytes < MEDIUM_PAGE {
            PAGE_SIZE
                .verdict(
                    Severity::Warning,
                    20,
                    "Moderate page size",
                    format!("Markup is {:.1} KB.", kb),
                )
                .with_fix("Trim unused markup and move inline assets to cached files.")
        } else {
            PAGE_SIZE
                .verdict(
                    Severity::Warning,
                    10,
                    "Heavy page",
                    format!("Markup is {:.1} KB; over 100 KB slows first render.", kb),
                )
                .with_fix("Reduce markup size, paginate long content and externalize assets.")
        }
    }

    fn inline_blocks(&self, doc: &Document) -> Issue {
        let inline_scripts = find_tags(doc.markup(), "script")
            .into_iter()
            .filter(|tag| attr(tag, "src").is_none())
            .count();
        let count = count_tag(doc.markup(), "style") + inline_scripts;
        if count > INLINE_BLOCK_LIMIT {
            INLINE_BLOCKS
                .verdict(
                    Severity::Warning,
                    10,
                    "Many inline blocks",
                    format!("{} inline <style>/<script> blocks found.", count),
                )
                .with_fix("Bundle inline code into external, cacheable files.")
        } else {
            INLINE_BLOCKS.pass(
                "Few inline blocks",
                format!("{} inline <style>/<script> block(s).", count),
            )
        }
    }

    fn render_blocking(&self, doc: &Document) -> Issue {
        let stylesheets = links_with_rel(doc.markup(), "stylesheet").len();
        let sync_scripts = find_tags(doc.markup(), "script")
            .into_iter()
            .filter(|tag| attr(tag, "src").is_some())
            .filter(|tag| !has_attr(tag, "async") && !has_attr(tag, "defer"))
            .count();
        let count = stylesheets + sync_scripts;
        let description = format!(
            "{} stylesheet(s) and {} synchronous script(s) block rendering.",
            stylesheets, sync_scripts
        );
        match count {
            0 => RENDER_BLOCKING.pass("No render-blocking resources", description),
            n if n <= RENDER_BLOCKING_SOFT_LIMIT => RENDER_BLOCKING
                .verdict(Severity::Info, 20, "Some render-blocking resources", description)
                .with_fix("Defer non-critical scripts and inline critical CSS."),
            _ => RENDER_BLOCKING
                .verdict(Severity::Warning, 10, "Many render-blocking resources", description)
                .with_fix("Add async or defer to scripts and load non-critical CSS asynchronously."),
        }
    }

    fn compression(&self) -> Issue {
        COMPRESSION.note(
            "Enable compression",
            "Serve HTML, CSS and JavaScript with gzip or Brotli compression.",
        )
    }
}

impl Default for PerformanceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryAnalyzer for PerformanceRule {
    fn key(&self) -> CategoryKey {
        CategoryKey::Performance
    }

    fn analyze(&self, doc: &Document) -> Vec<Issue> {
        log::debug!("performance: {} bytes", doc.byte_size());
        vec![
            self.page_size(doc.byte_size()),
            self.inline_blocks(doc),
            self.render_blocking(doc),
            self.compression(),
        ]
    }
}
