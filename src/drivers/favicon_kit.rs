//! faviconkit.com driver
//!
//! The favicon is served directly from the templated API URL when the
//! request succeeds. Cannot enumerate multiple icons.

use crate::drivers::{Context, Fetcher};
use crate::favicon::Favicon;
use crate::url::strip_scheme;
use async_trait::async_trait;

const BASE_URL: &str = "https://api.faviconkit.com/";

/// Driver backed by the FaviconKit API.
#[derive(Debug)]
pub struct FaviconKitDriver {
    base_url: String,
}

impl FaviconKitDriver {
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
        format!("{}{}", self.base_url, strip_scheme(url))
    }
}

impl Default for FaviconKitDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for FaviconKitDriver {
    fn name(&self) -> &str {
        "favicon-kit"
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
