//! Audit engine - orchestrates the category analyzers

use crate::config::{Config, EffectiveConfig, RuleSeverity};
use crate::error::{AuditError, Result};
use crate::parser::Document;
use crate::{
    AnalysisResult, Categories, CategoryKey, CategoryScore, Grade, Issue, IssueSummary,
};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use super::page_info;
use super::rules::{
    CategoryAnalyzer, ContentQualityRule, HeadingsRule, ImagesRule, LinksRule, MetaTagsRule,
    MobileRule, PerformanceRule, SecurityRule, SocialRule, TechnicalRule,
};
use super::ScoreCalculator;

/// One document on disk and the URL it is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    pub path: PathBuf,
    pub url: String,
}

impl AuditTarget {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Main audit engine. Stateless: every call builds a fresh result.
pub struct AuditEngine;

impl AuditEngine {
    /// Create a new audit engine
    pub fn new() -> Self {
        Self
    }

    /// Analyze markup for a URL, stamped with the current time
    pub fn analyze(&self, markup: &str, url: &str) -> AnalysisResult {
        self.analyze_at(markup, url, Utc::now())
    }

    /// Analyze markup with an explicit timestamp. Identical input always
    /// yields an identical result.
    pub fn analyze_at(&self, markup: &str, url: &str, at: DateTime<Utc>) -> AnalysisResult {
        self.analyze_core(markup, url, at, None)
    }

    /// Analyze markup and apply the config's rule overrides
    pub fn analyze_with_config(&self, markup: &str, url: &str, config: &Config) -> AnalysisResult {
        self.analyze_core(markup, url, Utc::now(), Some(&config.effective()))
    }

    fn analyze_core(
        &self,
        markup: &str,
        url: &str,
        at: DateTime<Utc>,
        effective: Option<&EffectiveConfig>,
    ) -> AnalysisResult {
        let doc = Document::new(markup, url);
        log::debug!(
            "Analyzing {} bytes for {:?}",
            doc.byte_size(),
            doc.url().as_str()
        );

        let categories = self.categories(&doc);
        let categories = match effective {
            Some(effective) => apply_config_to_issues(categories, effective),
            None => categories,
        };

        let overall_score = ScoreCalculator::overall(&categories);
        let grade = Grade::from_score(overall_score);
        let summary = ScoreCalculator::summarize(categories.all_issues());

        AnalysisResult {
            url: doc.url().as_str().to_string(),
            analyzed_at: at.to_rfc3339(),
            overall_score,
            grade,
            grade_color: grade.color().to_string(),
            categories,
            summary,
            page_info: page_info::extract(&doc),
        }
    }

    /// Run every category analyzer over the document
    fn categories(&self, doc: &Document) -> Categories {
        Categories {
            meta: self.category(CategoryKey::Meta, doc),
            content: self.category(CategoryKey::Content, doc),
            headings: self.category(CategoryKey::Headings, doc),
            images: self.category(CategoryKey::Images, doc),
            links: self.category(CategoryKey::Links, doc),
            technical: self.category(CategoryKey::Technical, doc),
            mobile: self.category(CategoryKey::Mobile, doc),
            social: self.category(CategoryKey::Social, doc),
            security: self.category(CategoryKey::Security, doc),
            performance: self.category(CategoryKey::Performance, doc),
        }
    }

    /// Rollup of a single category
    pub fn category(&self, key: CategoryKey, doc: &Document) -> CategoryScore {
        match key {
            CategoryKey::Meta => MetaTagsRule::new().score(doc),
            CategoryKey::Content => ContentQualityRule::new().score(doc),
            CategoryKey::Headings => HeadingsRule::new().score(doc),
            CategoryKey::Images => ImagesRule::new().score(doc),
            CategoryKey::Links => LinksRule::new().score(doc),
            CategoryKey::Technical => TechnicalRule::new().score(doc),
            CategoryKey::Mobile => MobileRule::new().score(doc),
            CategoryKey::Social => SocialRule::new().score(doc),
            CategoryKey::Security => SecurityRule::new().score(doc),
            CategoryKey::Performance => PerformanceRule::new().score(doc),
        }
    }

    /// Read a document from disk and analyze it. Invalid UTF-8 is replaced,
    /// never rejected.
    pub fn audit_file(
        &self,
        path: &Path,
        url: &str,
        config: Option<&Config>,
    ) -> Result<AnalysisResult> {
        let bytes = fs::read(path).map_err(|source| AuditError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let markup = String::from_utf8_lossy(&bytes);
        let effective = config.map(|c| c.effective_for_file(path));
        Ok(self.analyze_core(&markup, url, Utc::now(), effective.as_ref()))
    }

    /// Audit multiple documents sequentially
    pub fn audit_many(
        &self,
        targets: &[AuditTarget],
        config: Option<&Config>,
    ) -> Vec<Result<AnalysisResult>> {
        targets
            .iter()
            .map(|t| self.audit_file(&t.path, &t.url, config))
            .collect()
    }

    /// Audit multiple documents in parallel using rayon
    pub fn audit_parallel(
        &self,
        targets: &[AuditTarget],
        config: Option<&Config>,
    ) -> Vec<Result<AnalysisResult>> {
        use rayon::prelude::*;

        log::info!("Auditing {} documents in parallel", targets.len());
        targets
            .par_iter()
            .map(|t| self.audit_file(&t.path, &t.url, config))
            .collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[AnalysisResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total_score: u32 = results.iter().map(|r| r.overall_score as u32).sum();
        let average_score = (total_score / results.len() as u32) as u8;

        let summary = results.iter().fold(IssueSummary::default(), |acc, r| IssueSummary {
            critical: acc.critical + r.summary.critical,
            warning: acc.warning + r.summary.warning,
            info: acc.info + r.summary.info,
            success: acc.success + r.summary.success,
        });

        AggregateStats {
            pages_analyzed: results.len(),
            average_score,
            average_grade: Grade::from_score(average_score),
            summary,
        }
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply rule overrides: `off` drops the issue, a severity override relabels
/// it. Points never change, and category totals are re-derived.
fn apply_config_to_issues(categories: Categories, effective: &EffectiveConfig) -> Categories {
    if effective.rules.is_empty() {
        return categories;
    }
    categories.map_issues(|_, issues| {
        issues
            .into_iter()
            .filter_map(|mut issue: Issue| match effective.rules.get(&issue.id) {
                Some(RuleSeverity::Off) => None,
                Some(rs) => {
                    if let Some(sev) = rs.to_severity() {
                        issue.severity = sev;
                    }
                    Some(issue)
                }
                None => Some(issue),
            })
            .collect()
    })
}

/// Aggregate statistics from multiple page audits
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of pages analyzed
    pub pages_analyzed: usize,
    /// Average overall score across all pages
    pub average_score: u8,
    /// Grade of the average score
    pub average_grade: Grade,
    /// Issue counts summed across pages
    pub summary: IssueSummary,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            pages_analyzed: 0,
            average_score: 0,
            average_grade: Grade::F,
            summary: IssueSummary::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PAGE: &str = r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8">
        <title>Handmade ceramic mugs and bowls for everyday use</title>
        <meta name="keywords" content="mugs, bowls">
        <meta name="viewport" content="width=device-width, initial-scale=1"></head>
        <body><h1>Handmade ceramic mugs and bowls</h1><p>Short text.</p></body></html>"#;

    fn make_page_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".html").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn config_with_rules(rules: &[(&str, RuleSeverity)]) -> Config {
        Config {
            rules: rules
                .iter()
                .map(|(id, sev)| (id.to_string(), *sev))
                .collect::<HashMap<_, _>>(),
            ..Config::default()
        }
    }

    #[test]
    fn test_analyze_is_deterministic_for_fixed_time() {
        let engine = AuditEngine::new();
        let a = engine.analyze_at(PAGE, "https://example.com/mugs", fixed_time());
        let b = engine.analyze_at(PAGE, "https://example.com/mugs", fixed_time());
        assert_eq!(a, b);
        assert_eq!(a.analyzed_at, "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_result_totals_are_consistent() {
        let result = AuditEngine::new().analyze(PAGE, "https://example.com/mugs");
        for (_, cat) in result.categories.iter() {
            assert_eq!(cat.score, cat.issues.iter().map(|i| i.points).sum::<u32>());
            assert!(cat.score <= cat.max_score);
        }
        assert_eq!(result.summary.total(), result.categories.all_issues().count());
        assert_eq!(result.grade, Grade::from_score(result.overall_score));
        assert_eq!(result.grade_color, result.grade.color());
    }

    #[test]
    fn test_rule_off_removes_issue_and_rederives_totals() {
        let engine = AuditEngine::new();
        let plain = engine.analyze(PAGE, "");
        let config = config_with_rules(&[("content-1", RuleSeverity::Off)]);
        let filtered = engine.analyze_with_config(PAGE, "", &config);

        assert!(plain.categories.content.issues.iter().any(|i| i.id == "content-1"));
        assert!(filtered.categories.content.issues.iter().all(|i| i.id != "content-1"));
        assert_eq!(
            filtered.categories.content.max_score,
            plain.categories.content.max_score - 25
        );
        assert_eq!(filtered.summary.total(), plain.summary.total() - 1);
    }

    #[test]
    fn test_severity_override_keeps_points() {
        let engine = AuditEngine::new();
        let config = config_with_rules(&[("meta-4", RuleSeverity::Warning)]);
        let result = engine.analyze_with_config(PAGE, "", &config);
        let kw = result
            .categories
            .meta
            .issues
            .iter()
            .find(|i| i.id == "meta-4")
            .unwrap();
        assert_eq!(kw.severity, Severity::Warning);
        assert_eq!(kw.points, 10);
        assert_eq!(result.categories.meta.score, engine.analyze(PAGE, "").categories.meta.score);
    }

    #[test]
    fn test_audit_file_and_missing_file() {
        let file = make_page_file(PAGE);
        let engine = AuditEngine::new();
        let result = engine
            .audit_file(file.path(), "https://example.com/mugs", None)
            .unwrap();
        assert_eq!(result.page_info.page_size, PAGE.len());

        let err = engine
            .audit_file(Path::new("/definitely/not/here.html"), "", None)
            .unwrap_err();
        assert!(matches!(err, AuditError::Read { .. }));
    }

    #[test]
    fn test_audit_file_tolerates_binary() {
        let mut file = NamedTempFile::with_suffix(".html").unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x3c, 0x68, 0x31]).unwrap();
        let result = AuditEngine::new().audit_file(file.path(), "", None).unwrap();
        assert!(result.overall_score <= 100);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let files: Vec<_> = (0..4).map(|_| make_page_file(PAGE)).collect();
        let targets: Vec<AuditTarget> = files
            .iter()
            .map(|f| AuditTarget::new(f.path(), "https://example.com"))
            .collect();
        let engine = AuditEngine::new();
        let seq: Vec<u8> = engine
            .audit_many(&targets, None)
            .into_iter()
            .map(|r| r.unwrap().overall_score)
            .collect();
        let par: Vec<u8> = engine
            .audit_parallel(&targets, None)
            .into_iter()
            .map(|r| r.unwrap().overall_score)
            .collect();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_aggregate_stats() {
        let engine = AuditEngine::new();
        let a = engine.analyze(PAGE, "https://example.com");
        let b = engine.analyze("", "");
        let stats = AuditEngine::aggregate_stats(&[a.clone(), b.clone()]);
        assert_eq!(stats.pages_analyzed, 2);
        assert_eq!(
            stats.average_score,
            ((a.overall_score as u32 + b.overall_score as u32) / 2) as u8
        );
        assert_eq!(stats.summary.critical, a.summary.critical + b.summary.critical);

        let empty = AuditEngine::aggregate_stats(&[]);
        assert_eq!(empty.pages_analyzed, 0);
    }

    #[test]
    fn test_category_matches_full_analysis() {
        let engine = AuditEngine::new();
        let doc = Document::new(PAGE, "https://example.com");
        let result = engine.analyze(PAGE, "https://example.com");
        for key in CategoryKey::ALL {
            assert_eq!(&engine.category(key, &doc), result.categories.get(key));
        }
    }
}
