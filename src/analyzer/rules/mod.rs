//! Category analyzers and the declarative rule table

pub mod content_quality;
pub mod headings;
pub mod images;
pub mod links;
pub mod meta_tags;
pub mod mobile;
pub mod performance;
pub mod security;
pub mod social;
pub mod technical;

pub use content_quality::ContentQualityRule;
pub use headings::HeadingsRule;
pub use images::ImagesRule;
pub use links::LinksRule;
pub use meta_tags::MetaTagsRule;
pub use mobile::MobileRule;
pub use performance::PerformanceRule;
pub use security::SecurityRule;
pub use social::SocialRule;
pub use technical::TechnicalRule;

use crate::parser::Document;
use crate::{CategoryKey, CategoryScore, Impact, Issue, Severity};

/// Trait for category analyzers
pub trait CategoryAnalyzer {
    /// Category this analyzer scores
    fn key(&self) -> CategoryKey;

    /// Evaluate every rule of the category, in display order
    fn analyze(&self, doc: &Document) -> Vec<Issue>;

    /// Rollup of `analyze`; totals are derived from the issues
    fn score(&self, doc: &Document) -> CategoryScore {
        CategoryScore::from_issues(self.key(), self.analyze(doc))
    }
}

/// Static description of one rule branch: identity, weight and impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub id: &'static str,
    pub category: CategoryKey,
    pub max_points: u32,
    pub impact: Impact,
}

impl RuleSpec {
    pub const fn new(
        id: &'static str,
        category: CategoryKey,
        max_points: u32,
        impact: Impact,
    ) -> Self {
        Self {
            id,
            category,
            max_points,
            impact,
        }
    }

    /// Build the verdict for this rule; points are capped at `max_points`
    pub fn verdict(
        &self,
        severity: Severity,
        points: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Issue {
        Issue {
            id: self.id.to_string(),
            severity,
            title: title.into(),
            description: description.into(),
            fix_guidance: None,
            impact: self.impact,
            points: points.min(self.max_points),
            max_points: self.max_points,
        }
    }

    /// Full-credit verdict
    pub fn pass(&self, title: impl Into<String>, description: impl Into<String>) -> Issue {
        self.verdict(Severity::Success, self.max_points, title, description)
    }

    /// Informational verdict that still awards full credit
    pub fn note(&self, title: impl Into<String>, description: impl Into<String>) -> Issue {
        self.verdict(Severity::Info, self.max_points, title, description)
    }
}

/// Every rule branch known to the engine, across all categories
pub fn rule_table() -> Vec<&'static RuleSpec> {
    [
        meta_tags::RULES,
        content_quality::RULES,
        headings::RULES,
        images::RULES,
        links::RULES,
        technical::RULES,
        mobile::RULES,
        social::RULES,
        security::RULES,
        performance::RULES,
    ]
    .into_iter()
    .flat_map(|rules| rules.iter())
    .collect()
}

/// Look up a rule branch by issue id
pub fn find_rule(id: &str) -> Option<&'static RuleSpec> {
    rule_table().into_iter().find(|r| r.id == id)
}
