//! Config schema and deserialization

use crate::analyzer::find_rule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Rule severity override (critical, warning, info, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Critical,
    Warning,
    Info,
    /// Drop the issue entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<crate::Severity> {
        match self {
            RuleSeverity::Critical => Some(crate::Severity::Critical),
            RuleSeverity::Warning => Some(crate::Severity::Warning),
            RuleSeverity::Info => Some(crate::Severity::Info),
            RuleSeverity::Off => None,
        }
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional threshold override for matched files
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Optional rule overrides for matched files
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,
}

/// Root config structure for .sitegraderc.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum overall score (exit 1 if below). Default: 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Per-issue severity overrides. Key is the issue id, e.g. "meta-4".
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rules: HashMap<String, RuleSeverity>,

    /// Glob patterns for files/directories to exclude from analysis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Site root used to derive page URLs for files audited from disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-path configuration overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>, cli_base_url: Option<&str>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if let Some(url) = cli_base_url {
            self.base_url = Some(url.to_string());
        }
        self
    }

    /// Rule ids named in `rules` (top level or overrides) that no analyzer emits, sorted
    pub fn unknown_rule_ids(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .rules
            .keys()
            .chain(self.overrides.iter().flat_map(|o| o.rules.keys()))
            .map(String::as_str)
            .filter(|id| find_rule(id).is_none())
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    /// Get effective config for a specific file path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            rules: self.rules.clone(),
        };

        // Later overrides win
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                for (rule, severity) in &override_cfg.rules {
                    effective.rules.insert(rule.clone(), *severity);
                }
            }
        }

        effective
    }

    /// Effective config when no file path is involved (stdin, in-memory markup)
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            threshold: self.threshold,
            rules: self.rules.clone(),
        }
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        for pattern in patterns {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
                {
                    return true;
                }
            }
        }
        false
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.base_url.is_none() {
            self.base_url = base.base_url;
        }

        for (rule, severity) in base.rules {
            self.rules.entry(rule).or_insert(severity);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveConfig {
    pub threshold: Option<u8>,
    pub rules: HashMap<String, RuleSeverity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_override() -> Config {
        serde_json::from_str(
            r#"{
                "threshold": 60,
                "rules": { "meta-4": "off" },
                "overrides": [
                    { "files": ["**/blog/**"], "threshold": 40, "rules": { "content-1": "info" } }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let config: Config =
            serde_json::from_str(r#"{ "baseUrl": "https://example.com", "ignore": ["drafts/**"] }"#)
                .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.ignore, vec!["drafts/**"]);
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn rejects_unknown_severity() {
        let parsed: Result<Config, _> = serde_json::from_str(r#"{ "rules": { "meta-1": "error" } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn override_applies_to_matching_files_only() {
        let config = with_override();
        let blog = config.effective_for_file(Path::new("site/blog/post.html"));
        assert_eq!(blog.threshold, Some(40));
        assert_eq!(blog.rules.get("content-1"), Some(&RuleSeverity::Info));
        assert_eq!(blog.rules.get("meta-4"), Some(&RuleSeverity::Off));

        let home = config.effective_for_file(Path::new("site/index.html"));
        assert_eq!(home.threshold, Some(60));
        assert!(!home.rules.contains_key("content-1"));
    }

    #[test]
    fn cli_values_take_precedence() {
        let config = with_override().merge_with_cli(Some(90), Some("https://cli.example"));
        assert_eq!(config.threshold, Some(90));
        assert_eq!(config.base_url.as_deref(), Some("https://cli.example"));
        assert_eq!(config.effective().threshold, Some(90));
    }

    #[test]
    fn merge_from_keeps_child_values() {
        let mut child: Config =
            serde_json::from_str(r#"{ "threshold": 80, "rules": { "meta-1": "warning" } }"#).unwrap();
        let base: Config = serde_json::from_str(
            r#"{ "threshold": 50, "baseUrl": "https://base.example",
                 "rules": { "meta-1": "info", "tech-7": "off" }, "ignore": ["a/**"] }"#,
        )
        .unwrap();
        child.merge_from(base);
        assert_eq!(child.threshold, Some(80));
        assert_eq!(child.base_url.as_deref(), Some("https://base.example"));
        assert_eq!(child.rules.get("meta-1"), Some(&RuleSeverity::Warning));
        assert_eq!(child.rules.get("tech-7"), Some(&RuleSeverity::Off));
        assert_eq!(child.ignore, vec!["a/**"]);
    }

    #[test]
    fn unknown_rule_ids_are_reported_once() {
        let config: Config = serde_json::from_str(
            r#"{
                "rules": { "meta-1": "off", "meta-99": "info" },
                "overrides": [ { "files": ["**"], "rules": { "speed-1": "off", "meta-99": "off" } } ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.unknown_rule_ids(), vec!["meta-99", "speed-1"]);
        assert!(with_override().unknown_rule_ids().is_empty());
    }
}
