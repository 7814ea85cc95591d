//! Tag/attribute extraction over raw markup.
//!
//! Tolerant pattern matching (case-insensitive, whitespace-flexible,
//! attribute-order-agnostic) rather than a conformant parser. Nested or
//! overlapping tags, CDATA and comments get no special treatment. Absence of a
//! match is an empty result, never an error.

use super::patterns::global_pattern_cache;
use regex::escape;

/// A matched element: its opening tag and the raw text up to the first
/// matching close tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    pub open_tag: &'a str,
    pub inner: &'a str,
}

impl<'a> Element<'a> {
    pub fn attr(&self, name: &str) -> Option<String> {
        attr(self.open_tag, name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        has_attr(self.open_tag, name)
    }

    /// Inner content with tags removed and whitespace collapsed
    pub fn text(&self) -> String {
        inner_text(self.inner)
    }
}

fn open_tag_pattern(tag: &str) -> String {
    format!(r"(?is)<{}(?:\s[^>]*)?/?>", escape(tag))
}

/// Opening tags named `tag`, in document order
pub fn find_tags<'a>(markup: &'a str, tag: &str) -> Vec<&'a str> {
    match global_pattern_cache().get(&open_tag_pattern(tag)) {
        Some(re) => re.find_iter(markup).map(|m| m.as_str()).collect(),
        None => Vec::new(),
    }
}

/// Number of opening tags named `tag`
pub fn count_tag(markup: &str, tag: &str) -> usize {
    global_pattern_cache()
        .get(&open_tag_pattern(tag))
        .map(|re| re.find_iter(markup).count())
        .unwrap_or(0)
}

/// Elements named `tag` with their inner content. Unclosed elements are skipped.
pub fn find_elements<'a>(markup: &'a str, tag: &str) -> Vec<Element<'a>> {
    let tag = escape(tag);
    let pattern = format!(r"(?is)(<{tag}(?:\s[^>]*)?>)(.*?)</{tag}\s*>");
    let Some(re) = global_pattern_cache().get(&pattern) else {
        return Vec::new();
    };
    re.captures_iter(markup)
        .filter_map(|caps| {
            Some(Element {
                open_tag: caps.get(1)?.as_str(),
                inner: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// Value of attribute `name` in an opening tag, unquoted or quoted either way
pub fn attr(tag_text: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)[\s"'/]{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
        escape(name)
    );
    let re = global_pattern_cache().get(&pattern)?;
    let caps = re.captures(tag_text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

/// Whether attribute `name` appears in an opening tag, with or without a value
pub fn has_attr(tag_text: &str, name: &str) -> bool {
    let pattern = format!(r#"(?i)[\s"']{}(?:\s*=|[\s/>]|$)"#, escape(name));
    global_pattern_cache()
        .get(&pattern)
        .map(|re| re.is_match(tag_text))
        .unwrap_or(false)
}

/// First `<meta>` whose `name` or `property` equals `key` (case-insensitive)
pub fn find_meta<'a>(markup: &'a str, key: &str) -> Option<&'a str> {
    find_tags(markup, "meta").into_iter().find(|tag| {
        ["name", "property"].iter().any(|a| {
            attr(tag, a)
                .map(|v| v.trim().eq_ignore_ascii_case(key))
                .unwrap_or(false)
        })
    })
}

/// Trimmed `content` of the meta tag `key`; `None` when missing or blank
pub fn meta_content(markup: &str, key: &str) -> Option<String> {
    find_meta(markup, key)
        .and_then(|tag| attr(tag, "content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// `<link>` tags whose space-separated `rel` contains `token`
pub fn links_with_rel<'a>(markup: &'a str, token: &str) -> Vec<&'a str> {
    find_tags(markup, "link")
        .into_iter()
        .filter(|tag| {
            attr(tag, "rel")
                .map(|rel| {
                    rel.split_whitespace()
                        .any(|r| r.eq_ignore_ascii_case(token))
                })
                .unwrap_or(false)
        })
        .collect()
}

/// Remove whole `<tag>...</tag>` blocks for each of `tags`
pub fn strip_blocks(markup: &str, tags: &[&str]) -> String {
    let mut out = markup.to_string();
    for tag in tags {
        let tag = escape(tag);
        let pattern = format!(r"(?is)<{tag}(?:\s[^>]*)?>.*?</{tag}\s*>");
        if let Some(re) = global_pattern_cache().get(&pattern) {
            out = re.replace_all(&out, " ").into_owned();
        }
    }
    out
}

/// Text of a fragment: tags removed, common entities decoded, whitespace collapsed
pub fn inner_text(fragment: &str) -> String {
    let without_tags = match global_pattern_cache().get(r"(?s)<[^>]*>") {
        Some(re) => re.replace_all(fragment, " ").into_owned(),
        None => fragment.to_string(),
    };
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The `<body>` section, or the whole markup when no body tag is present.
/// An unclosed body runs to the end of the markup.
pub fn body_section(markup: &str) -> &str {
    let Some(re) = global_pattern_cache().get(&open_tag_pattern("body")) else {
        return markup;
    };
    let Some(open) = re.find(markup) else {
        return markup;
    };
    let rest = &markup[open.end()..];
    match rest.to_ascii_lowercase().find("</body") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Readable text of the page body: script and style blocks and all tags removed
pub fn visible_text(markup: &str) -> String {
    inner_text(&strip_blocks(body_section(markup), &["script", "style"]))
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn extraction_never_panics(ref input in ".{0,500}") {
            let _ = find_tags(input, "img");
            let _ = find_elements(input, "title");
            let _ = find_meta(input, "description");
            let _ = links_with_rel(input, "canonical");
            let text = visible_text(input);
            prop_assert!(!text.starts_with(' ') && !text.ends_with(' '));
        }

        #[test]
        fn attr_reads_any_quoting(ref value in "[a-zA-Z0-9._/-]{1,30}") {
            let double = format!(r#"<img alt="{}">"#, value);
            let single = format!("<img alt='{}'>", value);
            let bare = format!("<img alt={}>", value);
            for tag in [double, single, bare] {
                let read = attr(&tag, "alt");
                prop_assert_eq!(read.as_deref(), Some(value.as_str()));
            }
        }
    }
}
