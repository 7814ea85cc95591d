//! Parser module: pattern-based extraction from raw HTML

pub mod document;
pub mod markup;
pub mod page_url;
pub mod patterns;

pub use document::Document;
pub use markup::{
    attr, body_section, count_tag, find_elements, find_meta, find_tags, has_attr, inner_text,
    links_with_rel, meta_content, strip_blocks, visible_text, Element,
};
pub use page_url::{LinkKind, PageUrl};
pub use patterns::{count_matches, global_pattern_cache, is_match, PatternCache};
