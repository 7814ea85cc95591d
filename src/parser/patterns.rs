//! Shared regex library for the markup extractor.
//!
//! Compiles each pattern once and reuses it (pattern compilation cache), the
//! same way for fixed patterns and for per-tag patterns built at runtime.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Cache of compiled patterns keyed by their source text
pub struct PatternCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self {
            compiled: Mutex::new(HashMap::new()),
        }
    }

    /// Return the compiled form of `pattern`, compiling on first use.
    /// An invalid pattern yields `None`, which callers treat as "no match".
    pub fn get(&self, pattern: &str) -> Option<Regex> {
        let mut guard = self
            .compiled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(re) = guard.get(pattern) {
            return Some(re.clone());
        }
        match Regex::new(pattern) {
            Ok(re) => {
                guard.insert(pattern.to_string(), re.clone());
                Some(re)
            }
            Err(e) => {
                log::warn!("Skipping invalid pattern {:?}: {}", pattern, e);
                None
            }
        }
    }

    /// Number of patterns compiled so far
    pub fn len(&self) -> usize {
        self.compiled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Global pattern cache (compile once per process).
pub fn global_pattern_cache() -> &'static PatternCache {
    static CACHE: OnceLock<PatternCache> = OnceLock::new();
    CACHE.get_or_init(PatternCache::new)
}

/// Run `pattern` against `haystack` through the global cache
pub fn is_match(pattern: &str, haystack: &str) -> bool {
    global_pattern_cache()
        .get(pattern)
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

/// Count non-overlapping matches of `pattern`
pub fn count_matches(pattern: &str, haystack: &str) -> usize {
    global_pattern_cache()
        .get(pattern)
        .map(|re| re.find_iter(haystack).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_once_and_reuses() {
        let cache = PatternCache::new();
        assert!(cache.is_empty());
        let a = cache.get(r"(?i)<title").unwrap();
        let b = cache.get(r"(?i)<title").unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn invalid_pattern_is_none() {
        let cache = PatternCache::new();
        assert!(cache.get("(unclosed").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn helpers_degrade_to_no_match() {
        assert!(!is_match("(unclosed", "anything"));
        assert_eq!(count_matches("(unclosed", "anything"), 0);
        assert_eq!(count_matches(r"(?i)<p\b", "<p>a</p><P>b</P>"), 2);
    }
}
