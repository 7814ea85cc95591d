//! Edge case tests: degenerate inputs must not panic.

use sitegrade::analyzer::AuditEngine;
use sitegrade::{analyze_page, AnalysisResult, AuditError, CategoryKey, Severity};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn audit_path(path: &Path) -> Result<AnalysisResult, AuditError> {
    AuditEngine::new().audit_file(path, "", None)
}

fn assert_consistent(r: &AnalysisResult) {
    assert!(r.overall_score <= 100);
    for (key, cat) in r.categories.iter() {
        assert!(cat.score <= cat.max_score, "{}", key);
        assert_eq!(cat.score, cat.issues.iter().map(|i| i.points).sum::<u32>(), "{}", key);
    }
}

#[test]
fn empty_markup_and_url_takes_missing_branches() {
    let r = analyze_page("", "");
    assert_consistent(&r);
    assert_eq!(r.page_info.word_count, 0);
    assert_eq!(r.page_info.page_size, 0);
    assert_eq!(r.page_info.title, "");

    let meta = &r.categories.get(CategoryKey::Meta).issues;
    assert_eq!(meta[0].severity, Severity::Critical);
    let images = &r.categories.get(CategoryKey::Images).issues;
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].id, "image-1");
    // No URL: HTTPS is unverified rather than failed
    let security = &r.categories.get(CategoryKey::Security).issues;
    assert_eq!((security[0].severity, security[0].points), (Severity::Info, 20));
}

#[test]
fn empty_file_no_panic() {
    let mut file = NamedTempFile::with_suffix(".html").unwrap();
    file.write_all(b"").unwrap();
    file.flush().unwrap();
    let r = audit_path(file.path()).unwrap();
    assert_consistent(&r);
    assert_eq!(r.page_info.word_count, 0);
}

#[test]
fn not_html_no_panic() {
    let r = analyze_page("hello world, this is just text", "not a url at all");
    assert_consistent(&r);
    assert_eq!(r.page_info.word_count, 6);
}

#[test]
fn binary_garbage_no_panic() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let mut file = NamedTempFile::with_suffix(".html").unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();
    let r = audit_path(file.path()).unwrap();
    assert_consistent(&r);
}

#[test]
fn unclosed_and_broken_tags_no_panic() {
    let markup = r#"<html><head><title>Unclosed<meta name="description" content="x
        <body><h1>Heading<img src="a.png" alt=<a href=>link<script>var x = "</h1>";"#;
    let r = analyze_page(markup, "https://example.com");
    assert_consistent(&r);
}

#[test]
fn malformed_urls_no_panic() {
    for url in ["::::", "http://", "https://[::1", "/relative/path", "ftp://example.com", "\u{0}"] {
        let r = analyze_page(r#"<a href="https://other.example">x</a><a href="/a">y</a>"#, url);
        assert_consistent(&r);
        assert_eq!(r.url, url);
    }
}

#[test]
fn unparsable_url_treats_absolute_links_as_external() {
    let r = analyze_page(
        r#"<a href="https://example.com/a">a</a><a href="/b">b</a>"#,
        "not a url",
    );
    let summary = r
        .categories
        .get(CategoryKey::Links)
        .issues
        .iter()
        .find(|i| i.id == "link-5")
        .unwrap();
    assert_eq!(
        summary.description,
        "Total: 2 | Internal: 1 | External: 1 | Nofollow: 0"
    );
}

#[test]
fn utf8_content_no_crash() {
    let r = analyze_page(
        "<html lang=\"ja\"><title>テスト ページ</title><body><h1>見出し</h1><p>日本語の本文 です</p></body></html>",
        "https://例え.jp/ページ",
    );
    assert_consistent(&r);
    assert_eq!(r.page_info.title, "テスト ページ");
}

#[test]
fn file_with_bom_parses() {
    let mut file = NamedTempFile::with_suffix(".html").unwrap();
    file.write_all(b"\xEF\xBB\xBF<!DOCTYPE html><title>Bom</title>")
        .unwrap();
    file.flush().unwrap();
    let r = audit_path(file.path()).unwrap();
    assert_eq!(r.page_info.title, "Bom");
}

#[test]
fn large_page_completes() {
    let mut markup = String::from("<html><body>");
    for i in 0..5_000 {
        markup.push_str(&format!(
            "<p>Paragraph {} <a href=\"/p/{}\">link</a> <img src=\"i{}.png\" alt=\"img\"></p>\n",
            i, i, i
        ));
    }
    markup.push_str("</body></html>");
    let r = analyze_page(&markup, "https://example.com");
    assert_consistent(&r);
    assert!(r.page_info.page_size > 100 * 1024);
    let perf = &r.categories.get(CategoryKey::Performance).issues;
    assert_eq!((perf[0].severity, perf[0].points), (Severity::Warning, 10));
}

#[test]
fn missing_file_is_a_read_error() {
    let err = audit_path(Path::new("does/not/exist.html")).unwrap_err();
    assert!(matches!(err, AuditError::Read { .. }));
    assert!(err.to_string().contains("exist.html"));
}
