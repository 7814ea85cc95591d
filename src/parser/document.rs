//! The unit of analysis: raw markup plus the URL it was served from.

use super::markup;
use super::page_url::PageUrl;
use std::cell::OnceCell;

/// Markup and URL for one analysis call. Derived text is computed lazily and
/// shared by every analyzer that needs it.
#[derive(Debug)]
pub struct Document<'a> {
    markup: &'a str,
    url: PageUrl,
    visible_text: OnceCell<String>,
}

impl<'a> Document<'a> {
    pub fn new(markup: &'a str, url: &str) -> Self {
        Self {
            markup,
            url: PageUrl::parse(url),
            visible_text: OnceCell::new(),
        }
    }

    pub fn markup(&self) -> &'a str {
        self.markup
    }

    pub fn url(&self) -> &PageUrl {
        &self.url
    }

    /// Body text without scripts, styles or tags
    pub fn visible_text(&self) -> &str {
        self.visible_text
            .get_or_init(|| markup::visible_text(self.markup))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.visible_text().split_whitespace()
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Text of the first non-empty `<title>`
    pub fn title(&self) -> Option<String> {
        markup::find_elements(self.markup, "title")
            .into_iter()
            .map(|el| el.text())
            .find(|t| !t.is_empty())
    }

    pub fn meta_description(&self) -> Option<String> {
        markup::meta_content(self.markup, "description")
    }

    /// Markup size in bytes
    pub fn byte_size(&self) -> usize {
        self.markup.len()
    }
}
