//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::AnalysisResult;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.unwrap_or_else(|e| {
            log::warn!("Failed to serialize report: {}", e);
            fallback.to_string()
        })
    }

    /// Report a single analysis result as JSON
    pub fn report(&self, result: &AnalysisResult) -> String {
        self.render(result, "{}")
    }

    /// Report with summary
    pub fn report_with_summary(&self, results: &[AnalysisResult], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results,
            summary: stats,
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [AnalysisResult],
    summary: &'a AggregateStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AuditEngine;
    use chrono::{TimeZone, Utc};

    fn make_result(markup: &str, url: &str) -> AnalysisResult {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        AuditEngine::new().analyze_at(markup, url, at)
    }

    #[test]
    fn test_json_single_result_has_expected_keys() {
        let result = make_result("<title>Hi</title><img src=a.png>", "https://example.com");
        let json = JsonReporter::new().report(&result);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "url",
            "analyzedAt",
            "overallScore",
            "grade",
            "gradeColor",
            "categories",
            "summary",
            "pageInfo",
        ] {
            assert!(parsed.get(key).is_some(), "missing {}", key);
        }
        for key in [
            "meta",
            "content",
            "headings",
            "images",
            "links",
            "technical",
            "mobile",
            "social",
            "security",
            "performance",
        ] {
            assert!(parsed["categories"].get(key).is_some(), "missing category {}", key);
        }
        assert_eq!(parsed["analyzedAt"], "2024-01-02T03:04:05+00:00");
        assert_eq!(parsed["categories"]["images"]["maxScore"], 100);

        let issue = &parsed["categories"]["images"]["issues"][0];
        assert_eq!(issue["id"], "image-2");
        assert_eq!(issue["severity"], "critical");
        assert_eq!(issue["impact"], "high");
        assert_eq!(issue["maxPoints"], 35);
        assert!(issue.get("fixGuidance").is_some());
    }

    #[test]
    fn test_fix_guidance_omitted_when_absent() {
        let result = make_result("", "");
        let json = JsonReporter::new().report(&result);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let note = &parsed["categories"]["performance"]["issues"][3];
        assert_eq!(note["id"], "perf-4");
        assert!(note.get("fixGuidance").is_none());
    }

    #[test]
    fn test_grade_serializes_with_plus() {
        let mut result = make_result("", "");
        result.grade = crate::Grade::APlus;
        let json = JsonReporter::new().report(&result);
        assert!(json.contains(r#""grade":"A+""#));
    }

    #[test]
    fn test_json_pretty_output() {
        let result = make_result("", "");
        let json = JsonReporter::new().pretty().report(&result);
        assert!(json.contains('\n'), "pretty JSON should have newlines");
        assert!(json.contains("  "), "pretty JSON should have indentation");
    }

    #[test]
    fn test_json_report_with_summary() {
        let r1 = make_result("", "https://a.example");
        let r2 = make_result("<title>x</title>", "https://b.example");
        let stats = AuditEngine::aggregate_stats(&[r1.clone(), r2.clone()]);

        let json = JsonReporter::new().report_with_summary(&[r1, r2], &stats);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        let summary = &parsed["summary"];
        assert_eq!(summary["pagesAnalyzed"], 2);
        assert_eq!(summary["averageScore"], stats.average_score);
        assert!(summary["summary"].get("critical").is_some());

        let results = parsed["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["url"], "https://b.example");
    }

    #[test]
    fn test_json_result_round_trips() {
        let result = make_result("<h1>Title</h1>", "https://example.com");
        let json = JsonReporter::new().report(&result);
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
