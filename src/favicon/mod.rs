//! Favicon value types
//!
//! This module defines the immutable [`Favicon`] record produced by a
//! resolution, the [`IconType`] classification of the `<link rel>` attribute
//! that produced it, and the [`FaviconCollection`] returned by the
//! "fetch all icons" mode.

mod collection;
mod storage;

pub use collection::FaviconCollection;
pub use storage::{BlobStorage, DiskStorage};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of the HTML `rel` attribute that produced an icon
/// reference.
///
/// Icons materialized from the cache's legacy format, or guessed from the
/// default `/favicon.ico` location, carry [`IconType::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconType {
    /// `<link rel="icon">`
    Icon,
    /// `<link rel="shortcut icon">`
    ShortcutIcon,
    /// `<link rel="apple-touch-icon">`
    AppleTouchIcon,
    /// No declaration, or an unrecognized one
    #[default]
    Unknown,
}

impl IconType {
    /// Returns the stable string form used in the cache wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            IconType::Icon => "icon",
            IconType::ShortcutIcon => "shortcut_icon",
            IconType::AppleTouchIcon => "apple_touch_icon",
            IconType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IconType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved favicon.
///
/// Immutable after construction: the builder-style `with_*` setters are only
/// used while a driver (or the cache bridge) is materializing the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favicon {
    /// The URL of the website that the favicon belongs to
    url: String,

    /// The resolved absolute URL of the favicon asset
    favicon_url: String,

    /// Which `rel` declaration produced this icon
    icon_type: IconType,

    /// Declared pixel dimension, if any (square icons assumed)
    icon_size: Option<u32>,

    /// Whether this instance was materialized from the cache rather than a
    /// live resolution
    retrieved_from_cache: bool,

    /// Name of the driver that resolved this icon. Provenance only; absent
    /// when the icon came from the cache.
    driver: Option<String>,
}

impl Favicon {
    /// Creates a favicon resolved live by a driver.
    pub fn new(url: impl Into<String>, favicon_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            favicon_url: favicon_url.into(),
            icon_type: IconType::Unknown,
            icon_size: None,
            retrieved_from_cache: false,
            driver: None,
        }
    }

    /// Creates a favicon materialized from the cache.
    pub fn from_cache(url: impl Into<String>, favicon_url: impl Into<String>) -> Self {
        Self {
            retrieved_from_cache: true,
            ..Self::new(url, favicon_url)
        }
    }

    /// Sets the icon type. Construction-time builder.
    pub fn with_icon_type(mut self, icon_type: IconType) -> Self {
        self.icon_type = icon_type;
        self
    }

    /// Sets the declared icon size. Construction-time builder.
    pub fn with_icon_size(mut self, icon_size: Option<u32>) -> Self {
        self.icon_size = icon_size;
        self
    }

    /// Records the name of the driver that resolved this icon.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    /// The URL of the website the favicon was requested for.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The resolved absolute URL of the favicon asset.
    pub fn favicon_url(&self) -> &str {
        &self.favicon_url
    }

    /// Which `rel` declaration produced this icon.
    pub fn icon_type(&self) -> IconType {
        self.icon_type
    }

    /// Declared pixel dimension, if the `<link>` tag carried one.
    pub fn icon_size(&self) -> Option<u32> {
        self.icon_size
    }

    /// True iff this instance came from the cache.
    pub fn retrieved_from_cache(&self) -> bool {
        self.retrieved_from_cache
    }

    /// Name of the driver that resolved this icon, if it was resolved live.
    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }
}
