//! HTML link-tag extraction
//!
//! This module locates `<link rel="icon|shortcut icon|apple-touch-icon">`
//! declarations in raw HTML. Matching on the `rel` value is case-insensitive
//! and tolerant of attribute order, quoting style, and multiple tags sharing
//! one physical line; tags are returned in document order.
//!
//! Everything here is synchronous on purpose: the parsed DOM is not `Send`,
//! so drivers call in with a fetched body and get plain values back.

use crate::favicon::IconType;
use scraper::{Html, Selector};

/// `rel` values considered when resolving the single best icon.
const SINGLE_ICON_RELS: &[&str] = &["icon", "shortcut icon"];

/// `rel` values considered when resolving every icon. Apple touch icons are
/// only surfaced in the "all icons" mode.
const ALL_ICON_RELS: &[&str] = &["icon", "shortcut icon", "apple-touch-icon"];

/// A single icon `<link>` declaration extracted from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTag {
    /// The `href` attribute, possibly relative. Empty when the attribute is
    /// missing or malformed; callers must treat an empty href as "tag
    /// unusable", not crash.
    pub href: String,

    /// Icon classification derived from the `rel` attribute.
    pub icon_type: IconType,

    /// Declared pixel width from a `sizes="WxH"` attribute, if present.
    pub size: Option<u32>,
}

/// Finds every icon `<link>` declaration in the document, in document order.
///
/// Includes `apple-touch-icon` declarations; use [`find_first_link_tag`] for
/// single-icon resolution, which excludes them.
pub fn find_all_link_tags(html: &str) -> Vec<LinkTag> {
    collect_link_tags(html, ALL_ICON_RELS)
}

/// Finds the first `icon` or `shortcut icon` declaration in document order.
pub fn find_first_link_tag(html: &str) -> Option<LinkTag> {
    collect_link_tags(html, SINGLE_ICON_RELS).into_iter().next()
}

fn collect_link_tags(html: &str, accepted_rels: &[&str]) -> Vec<LinkTag> {
    let document = Html::parse_document(html);
    let mut tags = Vec::new();

    if let Ok(selector) = Selector::parse("link[rel]") {
        for element in document.select(&selector) {
            let rel = normalize_rel(element.value().attr("rel").unwrap_or(""));

            if !accepted_rels.contains(&rel.as_str()) {
                continue;
            }

            tags.push(LinkTag {
                href: element
                    .value()
                    .attr("href")
                    .unwrap_or("")
                    .trim()
                    .to_string(),
                icon_type: icon_type_from_rel(&rel),
                size: element
                    .value()
                    .attr("sizes")
                    .and_then(parse_size_hint),
            });
        }
    }

    tags
}

/// Lowercases a `rel` value and collapses runs of whitespace, so
/// `"Shortcut  Icon"` matches `"shortcut icon"`.
fn normalize_rel(rel: &str) -> String {
    rel.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Maps a normalized `rel` value to an [`IconType`].
pub fn icon_type_from_rel(rel: &str) -> IconType {
    match rel {
        "icon" => IconType::Icon,
        "shortcut icon" => IconType::ShortcutIcon,
        "apple-touch-icon" => IconType::AppleTouchIcon,
        _ => IconType::Unknown,
    }
}

/// Parses a `sizes` attribute value such as `"32x32"` into a pixel width.
///
/// Square icons are assumed, so only the width is kept. Multi-size values
/// (`"16x16 32x32"`) keep the first entry; non-numeric values such as
/// `"any"` yield `None`.
pub fn parse_size_hint(value: &str) -> Option<u32> {
    let first = value.split_whitespace().next()?;
    let width = first.split(['x', 'X']).next()?;
    width.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_basic_shortcut_icon() {
        let html = r#"<html><head><link rel="shortcut icon" href="/icon/is/here.ico" /></head></html>"#;
        let tag = find_first_link_tag(html).unwrap();

        assert_eq!(tag.href, "/icon/is/here.ico");
        assert_eq!(tag.icon_type, IconType::ShortcutIcon);
        assert_eq!(tag.size, None);
    }

    #[test]
    fn test_find_first_ignores_apple_touch_icon() {
        let html = r#"
            <link rel="apple-touch-icon" href="/apple.png">
            <link rel="icon" href="/plain.ico">
        "#;
        let tag = find_first_link_tag(html).unwrap();
        assert_eq!(tag.href, "/plain.ico");
    }

    #[test]
    fn test_find_first_none_when_no_icon_tags() {
        let html = r#"<link rel="stylesheet" href="/style.css">"#;
        assert!(find_first_link_tag(html).is_none());
    }

    #[test]
    fn test_rel_matching_is_case_insensitive() {
        let html = r#"<link rel="Shortcut Icon" href="/f.ico">"#;
        let tag = find_first_link_tag(html).unwrap();
        assert_eq!(tag.icon_type, IconType::ShortcutIcon);
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let html = r#"<link href="/f.ico" sizes="16x16" rel="icon">"#;
        let tag = find_first_link_tag(html).unwrap();
        assert_eq!(tag.href, "/f.ico");
        assert_eq!(tag.size, Some(16));
    }

    #[test]
    fn test_single_quoted_attributes() {
        let html = "<link rel='icon' href='/f.png' sizes='32x32'>";
        let tag = find_first_link_tag(html).unwrap();
        assert_eq!(tag.href, "/f.png");
        assert_eq!(tag.size, Some(32));
    }

    #[test]
    fn test_multiple_tags_on_one_line() {
        let html = r#"<link rel="icon" href="/a.ico"><link rel="icon" href="/b.ico"><link rel="apple-touch-icon" href="/c.png">"#;
        let tags = find_all_link_tags(html);

        let hrefs: Vec<_> = tags.iter().map(|t| t.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/a.ico", "/b.ico", "/c.png"]);
    }

    #[test]
    fn test_find_all_includes_apple_touch_icon() {
        let html = r#"
            <link rel="icon" href="/a.ico">
            <link rel="apple-touch-icon" href="/apple.png" sizes="180x180">
        "#;
        let tags = find_all_link_tags(html);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].icon_type, IconType::AppleTouchIcon);
        assert_eq!(tags[1].size, Some(180));
    }

    #[test]
    fn test_missing_href_yields_empty_string() {
        let html = r#"<link rel="icon" sizes="16x16">"#;
        let tag = find_first_link_tag(html).unwrap();
        assert_eq!(tag.href, "");
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <link rel="shortcut icon" href="/first.ico">
            <link rel="icon" href="/second.ico">
        "#;
        let tag = find_first_link_tag(html).unwrap();
        assert_eq!(tag.href, "/first.ico");
    }

    #[test]
    fn test_parse_size_hint() {
        assert_eq!(parse_size_hint("32x32"), Some(32));
        assert_eq!(parse_size_hint("180X180"), Some(180));
        assert_eq!(parse_size_hint("16x16 32x32"), Some(16));
        assert_eq!(parse_size_hint("any"), None);
        assert_eq!(parse_size_hint(""), None);
    }

    #[test]
    fn test_icon_type_from_rel() {
        assert_eq!(icon_type_from_rel("icon"), IconType::Icon);
        assert_eq!(icon_type_from_rel("shortcut icon"), IconType::ShortcutIcon);
        assert_eq!(
            icon_type_from_rel("apple-touch-icon"),
            IconType::AppleTouchIcon
        );
        assert_eq!(icon_type_from_rel("stylesheet"), IconType::Unknown);
    }
}
