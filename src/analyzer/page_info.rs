//! Display metadata about the analyzed page

use crate::parser::Document;
use crate::PageInfo;

/// Fixed connection latency of the load-time estimate, in seconds
const BASE_LATENCY_SECS: f64 = 0.2;
/// Seconds per megabyte of markup (roughly a 1 Mbit/s link)
const SECS_PER_MB: f64 = 8.0;

/// Extract title, description, size and the load-time estimate
pub fn extract(doc: &Document) -> PageInfo {
    let page_size = doc.byte_size();
    PageInfo {
        title: doc.title().unwrap_or_default(),
        description: doc.meta_description().unwrap_or_default(),
        url: doc.url().as_str().to_string(),
        word_count: doc.word_count(),
        load_time: estimate_load_time(page_size),
        page_size,
    }
}

/// Deterministic load-time estimate in seconds, rounded to two decimals
pub fn estimate_load_time(page_size: usize) -> f64 {
    let secs = BASE_LATENCY_SECS + page_size as f64 / 1_000_000.0 * SECS_PER_MB;
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_time_estimate() {
        assert_eq!(estimate_load_time(0), 0.2);
        assert_eq!(estimate_load_time(1_000_000), 8.2);
        assert_eq!(estimate_load_time(50_000), 0.6);
    }

    #[test]
    fn extracts_page_fields() {
        let html = r#"<title>Hello</title><meta name="description" content="Desc"><p>one two</p>"#;
        let info = extract(&Document::new(html, " https://example.com "));
        assert_eq!(info.title, "Hello");
        assert_eq!(info.description, "Desc");
        assert_eq!(info.url, "https://example.com");
        assert_eq!(info.word_count, 3);
        assert_eq!(info.page_size, html.len());
    }

    #[test]
    fn empty_document_has_empty_fields() {
        let info = extract(&Document::new("", ""));
        assert_eq!(info, PageInfo { load_time: 0.2, ..PageInfo::default() });
    }
}
