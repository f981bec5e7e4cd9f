//! Ordered collections of favicons
//!
//! The "fetch all icons" mode returns every icon a page declares, in
//! document order. The collection remembers whether it was materialized from
//! the cache so the cache bridge can suppress redundant re-writes.

use crate::favicon::Favicon;
use std::cmp::Reverse;

/// An ordered sequence of favicons sharing the same source URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaviconCollection {
    items: Vec<Favicon>,
    retrieved_from_cache: bool,
}

impl FaviconCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection from favicons resolved live by a driver.
    pub fn from_items(items: Vec<Favicon>) -> Self {
        Self {
            items,
            retrieved_from_cache: false,
        }
    }

    /// Creates a collection materialized from the cache.
    pub fn make_from_cache(items: Vec<Favicon>) -> Self {
        Self {
            items,
            retrieved_from_cache: true,
        }
    }

    /// Appends a favicon, preserving insertion order.
    pub fn push(&mut self, favicon: Favicon) {
        self.items.push(favicon);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Favicon> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Favicon> {
        self.items.iter()
    }

    /// True iff every favicon in this collection came from the cache.
    pub fn retrieved_from_cache(&self) -> bool {
        self.retrieved_from_cache
    }

    /// Returns the favicon with the largest declared icon size.
    ///
    /// Icons with no declared size are treated as size 0. Ties keep the
    /// first-encountered element, so an entirely size-less collection yields
    /// its first favicon.
    pub fn largest(&self) -> Option<&Favicon> {
        // min_by_key keeps the first of equal elements; Reverse turns that
        // into a stable max.
        self.items
            .iter()
            .min_by_key(|favicon| Reverse(favicon.icon_size().unwrap_or(0)))
    }
}

impl IntoIterator for FaviconCollection {
    type Item = Favicon;
    type IntoIter = std::vec::IntoIter<Favicon>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a FaviconCollection {
    type Item = &'a Favicon;
    type IntoIter = std::slice::Iter<'a, Favicon>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Favicon> for FaviconCollection {
    fn from_iter<I: IntoIterator<Item = Favicon>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favicon_with_size(size: Option<u32>) -> Favicon {
        Favicon::new("https://example.com", format!("https://example.com/{:?}.png", size))
            .with_icon_size(size)
    }

    #[test]
    fn test_empty_collection() {
        let collection = FaviconCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.largest(), None);
    }

    #[test]
    fn test_largest_picks_max_size() {
        let sizes = [
            None,
            Some(57),
            Some(60),
            Some(72),
            Some(76),
            Some(114),
            Some(120),
            Some(144),
            Some(152),
            Some(180),
            Some(192),
        ];
        let collection: FaviconCollection =
            sizes.iter().map(|s| favicon_with_size(*s)).collect();

        assert_eq!(collection.largest().unwrap().icon_size(), Some(192));
    }

    #[test]
    fn test_largest_treats_missing_size_as_zero() {
        let collection: FaviconCollection =
            vec![favicon_with_size(None), favicon_with_size(Some(16))]
                .into_iter()
                .collect();

        assert_eq!(collection.largest().unwrap().icon_size(), Some(16));
    }

    #[test]
    fn test_largest_ties_keep_first_seen() {
        let first = Favicon::new("https://example.com", "https://example.com/a.png");
        let second = Favicon::new("https://example.com", "https://example.com/b.png");
        let collection = FaviconCollection::from_items(vec![first.clone(), second]);

        assert_eq!(collection.largest(), Some(&first));
    }

    #[test]
    fn test_make_from_cache_flags_collection() {
        let collection = FaviconCollection::make_from_cache(vec![favicon_with_size(Some(32))]);
        assert!(collection.retrieved_from_cache());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut collection = FaviconCollection::new();
        collection.push(favicon_with_size(Some(1)));
        collection.push(favicon_with_size(Some(2)));

        let sizes: Vec<_> = collection.iter().map(|f| f.icon_size()).collect();
        assert_eq!(sizes, vec![Some(1), Some(2)]);
    }
}
