//! Sitegrade: rule-based SEO auditor for HTML pages
//!
//! This library evaluates raw page markup against a fixed taxonomy of quality
//! rules grouped into ten categories and produces a scored, graded report.
//! The engine never performs I/O and never fails: malformed or empty input
//! simply takes the "missing" branch of every rule.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod history;
pub mod parser;
pub mod reporter;
pub mod sample;

pub use error::AuditError;

use serde::{Deserialize, Serialize};

/// The full report for one analyzed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// URL the markup was analyzed for (may be empty)
    pub url: String,
    /// RFC 3339 timestamp of the analysis
    pub analyzed_at: String,
    /// Overall score (0-100)
    pub overall_score: u8,
    /// Letter grade derived from the overall score
    pub grade: Grade,
    /// Display color for the grade
    pub grade_color: String,
    /// Per-category rollups
    pub categories: Categories,
    /// Issue counts by severity across all categories
    pub summary: IssueSummary,
    /// Display metadata about the page
    pub page_info: PageInfo,
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Hex color used by reporting UIs for this grade
    pub fn color(self) -> &'static str {
        match self {
            Grade::APlus => "#10b981",
            Grade::A => "#22c55e",
            Grade::B => "#84cc16",
            Grade::C => "#eab308",
            Grade::D => "#f97316",
            Grade::F => "#ef4444",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::APlus => write!(f, "A+"),
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Severity of a rule verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks indexing or ranking
    Critical,
    /// Suboptimal
    Warning,
    /// Neutral or observational
    Info,
    /// Rule satisfied
    Success,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
        }
    }
}

/// Coarse weighting used for prioritization, independent of severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// The verdict of evaluating one rule against the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Stable identifier, unique within its category (e.g. "heading-2")
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Remediation text for non-success verdicts with a known fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_guidance: Option<String>,
    pub impact: Impact,
    /// Credit achieved (never above `max_points`)
    pub points: u32,
    /// Credit available
    pub max_points: u32,
}

impl Issue {
    /// Attach remediation text
    pub fn with_fix(mut self, guidance: impl Into<String>) -> Self {
        self.fix_guidance = Some(guidance.into());
        self
    }
}

/// Stable keys of the ten categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Meta,
    Content,
    Headings,
    Images,
    Links,
    Technical,
    Mobile,
    Social,
    Security,
    Performance,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 10] = [
        CategoryKey::Meta,
        CategoryKey::Content,
        CategoryKey::Headings,
        CategoryKey::Images,
        CategoryKey::Links,
        CategoryKey::Technical,
        CategoryKey::Mobile,
        CategoryKey::Social,
        CategoryKey::Security,
        CategoryKey::Performance,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            CategoryKey::Meta => "Meta Tags",
            CategoryKey::Content => "Content Quality",
            CategoryKey::Headings => "Headings",
            CategoryKey::Images => "Images",
            CategoryKey::Links => "Links",
            CategoryKey::Technical => "Technical SEO",
            CategoryKey::Mobile => "Mobile Friendliness",
            CategoryKey::Social => "Social Tags",
            CategoryKey::Security => "Security",
            CategoryKey::Performance => "Performance",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CategoryKey::Meta => "🏷️",
            CategoryKey::Content => "📝",
            CategoryKey::Headings => "📑",
            CategoryKey::Images => "🖼️",
            CategoryKey::Links => "🔗",
            CategoryKey::Technical => "⚙️",
            CategoryKey::Mobile => "📱",
            CategoryKey::Social => "📣",
            CategoryKey::Security => "🔒",
            CategoryKey::Performance => "⚡",
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            CategoryKey::Meta => "meta",
            CategoryKey::Content => "content",
            CategoryKey::Headings => "headings",
            CategoryKey::Images => "images",
            CategoryKey::Links => "links",
            CategoryKey::Technical => "technical",
            CategoryKey::Mobile => "mobile",
            CategoryKey::Social => "social",
            CategoryKey::Security => "security",
            CategoryKey::Performance => "performance",
        };
        write!(f, "{}", key)
    }
}

/// One category's rollup. Totals are always derived from `issues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub name: String,
    pub icon: String,
    /// Sum of issue points
    pub score: u32,
    /// Sum of issue max points
    pub max_score: u32,
    /// round(score / max_score * 100)
    pub percentage: u8,
    /// Verdicts in rule evaluation order
    pub issues: Vec<Issue>,
}

impl CategoryScore {
    /// Build a rollup by summing the verdicts of one category
    pub fn from_issues(key: CategoryKey, issues: Vec<Issue>) -> Self {
        let score: u32 = issues.iter().map(|i| i.points).sum();
        let max_score: u32 = issues.iter().map(|i| i.max_points).sum();
        Self {
            name: key.name().to_string(),
            icon: key.icon().to_string(),
            score,
            max_score,
            percentage: percentage(score, max_score),
            issues,
        }
    }
}

/// Rounded percentage of `part` over `whole`; 0 when `whole` is 0
pub fn percentage(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((part * 200 + whole) / (whole * 2)) as u8
}

/// Fixed mapping of the ten category keys to their rollups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub meta: CategoryScore,
    pub content: CategoryScore,
    pub headings: CategoryScore,
    pub images: CategoryScore,
    pub links: CategoryScore,
    pub technical: CategoryScore,
    pub mobile: CategoryScore,
    pub social: CategoryScore,
    pub security: CategoryScore,
    pub performance: CategoryScore,
}

impl Categories {
    pub fn get(&self, key: CategoryKey) -> &CategoryScore {
        match key {
            CategoryKey::Meta => &self.meta,
            CategoryKey::Content => &self.content,
            CategoryKey::Headings => &self.headings,
            CategoryKey::Images => &self.images,
            CategoryKey::Links => &self.links,
            CategoryKey::Technical => &self.technical,
            CategoryKey::Mobile => &self.mobile,
            CategoryKey::Social => &self.social,
            CategoryKey::Security => &self.security,
            CategoryKey::Performance => &self.performance,
        }
    }

    /// Iterate categories in their canonical order
    pub fn iter(&self) -> impl Iterator<Item = (CategoryKey, &CategoryScore)> + '_ {
        CategoryKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// All issues across categories, in canonical category order
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> + '_ {
        self.iter().flat_map(|(_, c)| c.issues.iter())
    }

    /// Rebuild every category by passing its issues through `f`
    pub fn map_issues<F>(self, mut f: F) -> Self
    where
        F: FnMut(CategoryKey, Vec<Issue>) -> Vec<Issue>,
    {
        let mut rebuild =
            |key: CategoryKey, cat: CategoryScore| CategoryScore::from_issues(key, f(key, cat.issues));
        Categories {
            meta: rebuild(CategoryKey::Meta, self.meta),
            content: rebuild(CategoryKey::Content, self.content),
            headings: rebuild(CategoryKey::Headings, self.headings),
            images: rebuild(CategoryKey::Images, self.images),
            links: rebuild(CategoryKey::Links, self.links),
            technical: rebuild(CategoryKey::Technical, self.technical),
            mobile: rebuild(CategoryKey::Mobile, self.mobile),
            social: rebuild(CategoryKey::Social, self.social),
            security: rebuild(CategoryKey::Security, self.security),
            performance: rebuild(CategoryKey::Performance, self.performance),
        }
    }
}

/// Issue counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub success: usize,
}

impl IssueSummary {
    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info + self.success
    }
}

/// Display metadata about the page, independent of scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Text of the first `<title>`, empty when absent
    pub title: String,
    /// Meta description content, empty when absent
    pub description: String,
    pub url: String,
    pub word_count: usize,
    /// Estimated load time in seconds (derived from page size, never measured)
    pub load_time: f64,
    /// Markup size in bytes
    pub page_size: usize,
}

/// Public API: analyze raw markup for a URL. Never fails; the URL may be empty.
pub fn analyze_page(markup: &str, url: &str) -> AnalysisResult {
    crate::analyzer::AuditEngine::new().analyze(markup, url)
}
