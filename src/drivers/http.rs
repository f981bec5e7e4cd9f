//! Local HTML driver
//!
//! Resolves favicons the direct way: fetch the page itself, look for icon
//! `<link>` declarations in its markup, and verify that the candidate icon
//! URL actually answers. When the page declares nothing usable, the
//! conventional `/favicon.ico` location is tried as a last resort.

use crate::drivers::{Context, Fetcher};
use crate::favicon::{Favicon, FaviconCollection};
use crate::html::{find_all_link_tags, find_first_link_tag};
use crate::url::{default_icon_path, resolve_absolute};
use async_trait::async_trait;
use futures::future::join_all;

/// Driver that parses the site's own HTML for icon declarations.
#[derive(Debug, Default)]
pub struct HttpDriver;

impl HttpDriver {
    pub fn new() -> Self {
        Self
    }

    /// Fetches the page body, treating an error status as not-found.
    /// Transport failures propagate.
    async fn page_body(&self, ctx: &Context, url: &str) -> crate::Result<Option<String>> {
        let response = ctx.get(url).await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl Fetcher for HttpDriver {
    fn name(&self) -> &str {
        "http"
    }

    async fn resolve(&self, ctx: &Context, url: &str) -> crate::Result<Option<Favicon>> {
        let body = match self.page_body(ctx, url).await? {
            Some(body) => body,
            None => return Ok(None),
        };

        if let Some(tag) = find_first_link_tag(&body) {
            if !tag.href.is_empty() {
                let favicon_url = resolve_absolute(url, &tag.href)?;

                if ctx.reachable(&favicon_url).await? {
                    return Ok(Some(
                        Favicon::new(url, favicon_url)
                            .with_icon_type(tag.icon_type)
                            .with_icon_size(tag.size)
                            .with_driver(self.name()),
                    ));
                }
            }
        }

        // No usable tag, or the declared icon did not answer: try the
        // conventional default location before giving up.
        let guess = default_icon_path(url)?;

        if ctx.reachable(&guess).await? {
            return Ok(Some(Favicon::new(url, guess).with_driver(self.name())));
        }

        Ok(None)
    }

    async fn resolve_all(
        &self,
        ctx: &Context,
        url: &str,
    ) -> crate::Result<Option<FaviconCollection>> {
        let body = match self.page_body(ctx, url).await? {
            Some(body) => body,
            None => return Ok(None),
        };

        let mut candidates = Vec::new();
        for tag in find_all_link_tags(&body) {
            if tag.href.is_empty() {
                continue;
            }

            let favicon_url = resolve_absolute(url, &tag.href)?;
            candidates.push(
                Favicon::new(url, favicon_url)
                    .with_icon_type(tag.icon_type)
                    .with_icon_size(tag.size)
                    .with_driver(self.name()),
            );
        }

        if candidates.is_empty() {
            candidates.push(Favicon::new(url, default_icon_path(url)?).with_driver(self.name()));
        }

        // Reachability checks are independent reads, so they run
        // concurrently; the zip below keeps document order regardless of
        // completion order.
        let checks = join_all(
            candidates
                .iter()
                .map(|favicon| ctx.reachable(favicon.favicon_url())),
        )
        .await;

        let mut favicons = FaviconCollection::new();
        for (favicon, reachable) in candidates.into_iter().zip(checks) {
            if reachable? {
                favicons.push(favicon);
            }
        }

        Ok(Some(favicons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_name() {
        assert_eq!(HttpDriver::new().name(), "http");
    }
}
