//! favicongrabber.com driver
//!
//! Unlike the other remote APIs, FaviconGrabber answers with a JSON document
//! listing every icon it found rather than serving the icon itself. The
//! first listed icon is treated as the site's favicon. Cannot enumerate
//! multiple icons through `fetch_all` because the API reports neither type
//! nor size hints.

use crate::drivers::{Context, Fetcher};
use crate::favicon::Favicon;
use crate::url::strip_scheme;
use async_trait::async_trait;
use serde::Deserialize;

const BASE_URL: &str = "https://favicongrabber.com/api/grab/";

/// Driver backed by the FaviconGrabber API.
#[derive(Debug)]
pub struct FaviconGrabberDriver {
    base_url: String,
}

/// Shape of the API response; fields the driver does not use are ignored.
#[derive(Debug, Deserialize)]
struct GrabResponse {
    #[serde(default)]
    icons: Vec<GrabIcon>,
}

#[derive(Debug, Deserialize)]
struct GrabIcon {
    src: String,
}

impl FaviconGrabberDriver {
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

impl Default for FaviconGrabberDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for FaviconGrabberDriver {
    fn name(&self) -> &str {
        "favicon-grabber"
    }

    async fn resolve(&self, ctx: &Context, url: &str) -> crate::Result<Option<Favicon>> {
        let response = ctx.get(&self.request_url(url)).await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let grab: GrabResponse = response.json().await?;

        match grab.icons.into_iter().next() {
            Some(icon) => Ok(Some(Favicon::new(url, icon.src).with_driver(self.name()))),
            None => Ok(None),
        }
    }
}
