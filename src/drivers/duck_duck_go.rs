//! DuckDuckGo icons driver
//!
//! DuckDuckGo's icon service serves the favicon directly from a templated
//! URL ending in `.ico`. A success status means the templated URL itself is
//! the icon. Cannot enumerate multiple icons.

use crate::drivers::{Context, Fetcher};
use crate::favicon::Favicon;
use crate::url::strip_scheme;
use async_trait::async_trait;

const BASE_URL: &str = "https://icons.duckduckgo.com/ip3/";

/// Driver backed by the DuckDuckGo icon service.
#[derive(Debug)]
pub struct DuckDuckGoDriver {
    base_url: String,
}

impl DuckDuckGoDriver {
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
        format!("{}{}.ico", self.base_url, strip_scheme(url))
    }
}

impl Default for DuckDuckGoDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for DuckDuckGoDriver {
    fn name(&self) -> &str {
        "duck-duck-go"
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
        assert_eq!(DuckDuckGoDriver::new().name(), "duck-duck-go");
    }

    #[test]
    fn test_request_url_appends_ico_suffix() {
        let driver = DuckDuckGoDriver::new();
        assert_eq!(
            driver.request_url("https://example.com"),
            "https://icons.duckduckgo.com/ip3/example.com.ico"
        );
    }
}
