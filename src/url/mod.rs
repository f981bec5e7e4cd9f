//! URL helpers for favicon resolution
//!
//! This module provides the URL validation and manipulation primitives that
//! the drivers rely on: validity checks, scheme stripping for cache keys,
//! site-root extraction, relative-href resolution, and the default
//! `/favicon.ico` path guess.

use crate::UrlError;
use url::Url;

/// Checks whether a string is a well-formed absolute URL with a host.
///
/// A scheme-less string like `"example.com"` is rejected: favicon resolution
/// needs an absolute base to work from. Pure predicate, no I/O.
///
/// # Examples
///
/// ```
/// use favicon_scout::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com"));
/// assert!(!is_valid_url("example.com"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

/// Strips a leading `http://` or `https://` from the given URL.
///
/// Used when building cache keys and when embedding a host into third-party
/// API URL templates. URLs differing only by scheme collapse to the same
/// stripped form on purpose.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Returns the scheme, host and port (if any) of the URL, discarding the
/// path, query and fragment.
///
/// Icons are resolved relative to the site root, not the requested page
/// path, so this is the base every relative href is joined against.
pub fn site_root(url: &str) -> Result<String, UrlError> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let mut root = format!("{}://{}", parsed.scheme(), host);

    if let Some(port) = parsed.port() {
        root.push_str(&format!(":{}", port));
    }

    Ok(root)
}

/// Resolves a possibly-relative favicon href to an absolute URL.
///
/// Absolute hrefs are returned unchanged. Relative hrefs are joined against
/// the site root of `base_url`, normalizing duplicate slashes at the join
/// point.
pub fn resolve_absolute(base_url: &str, href: &str) -> Result<String, UrlError> {
    if is_valid_url(href) {
        return Ok(href.to_string());
    }

    Ok(format!(
        "{}/{}",
        site_root(base_url)?,
        href.trim_start_matches('/')
    ))
}

/// Builds the conventional default favicon location for a site.
///
/// This is the last-resort guess when no usable `<link>` tag is found:
/// `scheme://host[:port]/favicon.ico`.
pub fn default_icon_path(url: &str) -> Result<String, UrlError> {
    Ok(format!("{}/favicon.ico", site_root(url)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_absolute_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/some/page?q=1"));
        assert!(is_valid_url("https://example.com:8080"));
    }

    #[test]
    fn test_scheme_less_url_is_invalid() {
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_host_less_url_is_invalid() {
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("data:text/plain,hello"));
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("https://example.com"), "example.com");
        assert_eq!(strip_scheme("http://example.com/page"), "example.com/page");
        assert_eq!(strip_scheme("example.com"), "example.com");
    }

    #[test]
    fn test_site_root_discards_path_and_query() {
        assert_eq!(
            site_root("https://example.com/deep/page?q=1").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_site_root_keeps_port() {
        assert_eq!(
            site_root("http://example.com:8080/page").unwrap(),
            "http://example.com:8080"
        );
    }

    #[test]
    fn test_site_root_rejects_invalid() {
        assert!(site_root("not a url").is_err());
    }

    #[test]
    fn test_resolve_absolute_keeps_absolute_href() {
        let resolved = resolve_absolute("https://example.com/page", "https://cdn.example.com/i.png");
        assert_eq!(resolved.unwrap(), "https://cdn.example.com/i.png");
    }

    #[test]
    fn test_resolve_absolute_joins_relative_href() {
        let resolved = resolve_absolute("https://example.com/deep/page", "/icon/is/here.ico");
        assert_eq!(resolved.unwrap(), "https://example.com/icon/is/here.ico");
    }

    #[test]
    fn test_resolve_absolute_normalizes_leading_slashes() {
        let resolved = resolve_absolute("https://example.com", "//icon.ico");
        assert_eq!(resolved.unwrap(), "https://example.com/icon.ico");
    }

    #[test]
    fn test_default_icon_path() {
        assert_eq!(
            default_icon_path("https://example.com/some/page").unwrap(),
            "https://example.com/favicon.ico"
        );
    }
}
