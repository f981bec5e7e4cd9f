//! unavatar.io driver
//!
//! Unavatar aggregates several avatar/icon sources behind one URL. The
//! `fallback=false` flag makes it answer with an error status instead of a
//! generic placeholder, which is what lets the not-found path work. Cannot
//! enumerate multiple icons.

use crate::drivers::{Context, Fetcher};
use crate::favicon::Favicon;
use crate::url::strip_scheme;
use async_trait::async_trait;

const BASE_URL: &str = "https://unavatar.io/";

/// Driver backed by the Unavatar API.
#[derive(Debug)]
pub struct UnavatarDriver {
    base_url: String,
}

impl UnavatarDriver {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Overrides the upstream endpoint; used to point at a test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn request_url(&self, url: &str) -> String {
        format!("{}{}?fallback=false", self.base_url, strip_scheme(url))
    }
}

impl Default for UnavatarDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for UnavatarDriver {
    fn name(&self) -> &str {
        "unavatar"
    }

    async fn resolve(&self, ctx: &Context, url: &str) -> crate::Result<Option<Favicon>> {
        let favicon_url = self.request_url(url);

        let response = ctx.get(&favicon_url).await?;

        if response.status().is_success() {
            Ok(Some(Favicon::new(url, favicon_url).with_driver(self.name())))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_name() {
        assert_eq!(UnavatarDriver::new().name(), "unavatar");
    }

    #[test]
    fn test_request_url_disables_placeholder_fallback() {
        let driver = UnavatarDriver::new();
        assert_eq!(
            driver.request_url("https://example.com"),
            "https://unavatar.io/example.com?fallback=false"
        );
    }
}
