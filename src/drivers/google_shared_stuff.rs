//! Google Shared Stuff driver
//!
//! Asks Google's favicon service for the site's icon. A success status means
//! the templated request URL itself serves the icon; the API cannot
//! enumerate multiple icons, so `fetch_all` is unsupported.

use crate::drivers::{Context, Fetcher};
use crate::favicon::Favicon;
use crate::url::strip_scheme;
use async_trait::async_trait;

const BASE_URL: &str = "https://www.google.com/s2/favicons?domain=";

/// Driver backed by the Google Shared Stuff favicon API.
#[derive(Debug)]
pub struct GoogleSharedStuffDriver {
    base_url: String,
}

impl GoogleSharedStuffDriver {
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

impl Default for GoogleSharedStuffDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for GoogleSharedStuffDriver {
    fn name(&self) -> &str {
        "google-shared-stuff"
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
