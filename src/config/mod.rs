//! Configuration loading for Sitegrade

mod schema;

pub use schema::{Config, ConfigOverride, EffectiveConfig, RuleSeverity};

use crate::error::{AuditError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;

pub const CONFIG_FILENAME: &str = ".sitegraderc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if !path.exists() {
            return Err(AuditError::ConfigNotFound(path));
        }
        Some(path)
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            let config = load_config_with_extends(&path, &mut HashSet::new())?;
            for id in config.unknown_rule_ids() {
                log::warn!("{}: unknown rule id {:?} is ignored", path.display(), id);
            }
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AuditError::CircularExtends(config_path.to_path_buf()));
    }

    let content = fs::read_to_string(config_path).map_err(|source| AuditError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let mut config: Config =
        serde_json::from_str(&content).map_err(|source| AuditError::ConfigJson {
            path: config_path.to_path_buf(),
            source,
        })?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative to the referencing config) to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        return Err(AuditError::ConfigNotFound(extends_path));
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .sitegraderc.json in directory and its parents
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Page URL for a file audited from disk: `base_url` joined with the path
/// relative to the site root. Path separators become `/`.
pub fn page_url_for(base_url: &str, relative: &Path) -> Result<String> {
    let mut base = Url::parse(base_url.trim()).map_err(|source| AuditError::BaseUrl {
        url: base_url.to_string(),
        source,
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let joined = base
        .join(&segments.join("/"))
        .map_err(|source| AuditError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
    Ok(joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_is_ignored_drafts() {
        let set = build_ignore_set(&["**/drafts/**".to_string()]).unwrap();
        assert!(is_ignored(Path::new("site/drafts/new.html"), &set));
        assert!(!is_ignored(Path::new("site/index.html"), &set));
    }

    #[test]
    fn invalid_ignore_pattern_is_an_error() {
        let err = build_ignore_set(&["a/[".to_string()]).unwrap_err();
        assert!(matches!(err, AuditError::Glob(_)));
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("missing.json"))).unwrap_err();
        assert!(matches!(err, AuditError::ConfigNotFound(_)));
    }

    #[test]
    fn test_config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), CONFIG_FILENAME, r#"{ "threshold": 75 }"#);
        let nested = dir.path().join("pages/blog");
        fs::create_dir_all(&nested).unwrap();
        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.threshold, Some(75));
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "base.json",
            r#"{
                "threshold": 70,
                "rules": { "meta-4": "off" },
                "ignore": ["**/drafts/**"],
                "baseUrl": "https://example.com"
            }"#,
        );
        write(
            dir.path(),
            CONFIG_FILENAME,
            r#"{
                "extends": "./base",
                "threshold": 80,
                "rules": { "content-6": "info" }
            }"#,
        );

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.threshold, Some(80));
        assert!(config.rules.contains_key("content-6"));
        assert!(config.rules.contains_key("meta-4"));
        assert!(config.ignore.contains(&"**/drafts/**".to_string()));
        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_circular_extends_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{ "extends": "./b.json" }"#);
        write(dir.path(), "b.json", r#"{ "extends": "./a.json" }"#);
        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(matches!(err, AuditError::CircularExtends(_)));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), CONFIG_FILENAME, "{ not json");
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(matches!(err, AuditError::ConfigJson { .. }));
        assert!(err.to_string().contains(CONFIG_FILENAME));
    }

    #[test]
    fn test_page_url_for_joins_relative_path() {
        let url = page_url_for("https://example.com/docs", Path::new("guide/intro.html")).unwrap();
        assert_eq!(url, "https://example.com/docs/guide/intro.html");
        let root = page_url_for("https://example.com/", Path::new("index.html")).unwrap();
        assert_eq!(root, "https://example.com/index.html");
        assert!(matches!(
            page_url_for("not a url", Path::new("a.html")),
            Err(AuditError::BaseUrl { .. })
        ));
    }
}
