//! Tolerant wrapper around the analyzed page URL.
//!
//! The URL is an opaque identifier plus a hint for link classification. It may
//! be empty, relative or malformed; parse failures are absorbed here and turn
//! into "cannot determine" answers (external / insecure).

use url::Url;

/// How an `<a href>` relates to the analyzed page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Same host, or a relative / path-only href
    Internal,
    /// Different host, or host comparison impossible
    External,
    /// Empty, `#` or `javascript:` href
    Invalid,
    /// Another scheme such as `mailto:` or `tel:`
    Other,
}

#[derive(Debug, Clone)]
pub struct PageUrl {
    raw: String,
    parsed: Option<Url>,
}

impl PageUrl {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let parsed = if raw.is_empty() {
            None
        } else {
            match Url::parse(&raw) {
                Ok(u) => Some(u),
                Err(e) => {
                    log::debug!("Page URL {:?} is not absolute ({}); host checks disabled", raw, e);
                    None
                }
            }
        };
        Self { raw, parsed }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when no URL was supplied
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_https(&self) -> bool {
        self.raw.to_ascii_lowercase().starts_with("https://")
    }

    /// Lowercase host of the page, when the URL parses and has one
    pub fn host(&self) -> Option<String> {
        self.parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|h| h.to_ascii_lowercase())
    }

    /// Path component (without query), best effort for unparsable input
    pub fn path(&self) -> String {
        match &self.parsed {
            Some(u) => u.path().to_string(),
            None => {
                let without_query = self.raw.split(['?', '#']).next().unwrap_or("");
                match without_query.find("://") {
                    Some(idx) => {
                        let after = &without_query[idx + 3..];
                        after.find('/').map(|p| after[p..].to_string()).unwrap_or_default()
                    }
                    None => without_query.to_string(),
                }
            }
        }
    }

    /// Whether the path carries uppercase letters the author wrote.
    /// Percent escapes are skipped since the URL parser uppercases their hex digits.
    pub fn path_has_uppercase(&self) -> bool {
        let path = self.path();
        let mut chars = path.chars();
        while let Some(c) = chars.next() {
            if c == '%' {
                chars.next();
                chars.next();
            } else if c.is_uppercase() {
                return true;
            }
        }
        false
    }

    /// Lowercase query parameter names, best effort for unparsable input
    pub fn query_keys(&self) -> Vec<String> {
        match &self.parsed {
            Some(u) => u
                .query_pairs()
                .map(|(k, _)| k.to_ascii_lowercase())
                .collect(),
            None => {
                let query = self
                    .raw
                    .split_once('?')
                    .map(|(_, q)| q.split('#').next().unwrap_or(""))
                    .unwrap_or("");
                query
                    .split('&')
                    .filter(|p| !p.is_empty())
                    .map(|p| p.split('=').next().unwrap_or("").to_ascii_lowercase())
                    .collect()
            }
        }
    }

    /// Classify an href relative to this page
    pub fn classify_href(&self, href: &str) -> LinkKind {
        let href = href.trim();
        let lower = href.to_ascii_lowercase();
        if href.is_empty() || href == "#" || lower.starts_with("javascript:") {
            return LinkKind::Invalid;
        }
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//") {
            return if self.is_same_host(href) {
                LinkKind::Internal
            } else {
                LinkKind::External
            };
        }
        if has_scheme(&lower) {
            return LinkKind::Other;
        }
        LinkKind::Internal
    }

    /// Whether an absolute (or protocol-relative) URL points at this page's host.
    /// Unparsable input on either side counts as a different host.
    pub fn is_same_host(&self, absolute: &str) -> bool {
        let Some(page_host) = self.host() else {
            return false;
        };
        let candidate = if absolute.starts_with("//") {
            format!("https:{}", absolute)
        } else {
            absolute.to_string()
        };
        Url::parse(&candidate)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
            .map(|h| h == page_host)
            .unwrap_or(false)
    }
}

fn has_scheme(lower_href: &str) -> bool {
    match lower_href.find(':') {
        Some(idx) => {
            let scheme = &lower_href[..idx];
            !scheme.is_empty()
                && !scheme.contains('/')
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
