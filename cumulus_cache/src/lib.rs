// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulus Cache: an in-memory cache for completed word-cloud layouts.
//!
//! Layout passes are randomized and relatively expensive, so a host that
//! revisits the same inputs (same words, container, font, and size category)
//! should replay the placements it already computed instead of rolling new
//! ones. The cache keys on exactly the inputs that shape a pass; any change
//! to them misses, including word order, since placement order follows input
//! order for equally sized words.
//!
//! Only complete layouts belong here. A pass that failed to place every word
//! reports `finished(false)`, and hosts are expected not to cache it.
//!
//! # Example
//!
//! ```rust
//! use cumulus_cache::{CacheKey, LayoutCache};
//! use cumulus_layout::{Color, Placement, SizeCategory, Word};
//! use kurbo::{Point, Size};
//!
//! let key = CacheKey::new(
//!     Size::new(420.0, 300.0),
//!     SizeCategory::Large,
//!     "sans-serif",
//!     vec![Word::new("cumulus", 2.0)],
//! );
//! let placements = vec![Placement {
//!     text: "cumulus".to_owned(),
//!     point_size: 24.0,
//!     color: Color::BLACK,
//!     center: Point::new(210.0, 150.0),
//!     vertical: false,
//! }];
//!
//! let mut cache = LayoutCache::new();
//! cache.put(key.clone(), placements.clone());
//! assert_eq!(cache.get(&key), Some(placements.as_slice()));
//! ```

use core::hash::{Hash, Hasher};

use cumulus_layout::{Placement, SizeCategory, Word};
use hashbrown::HashMap;
use kurbo::Size;

/// Everything that shapes a layout pass, bundled as a cache key.
///
/// Container dimensions participate by bit pattern, so a key built from the
/// same `f64` values always hashes the same way. The word list is ordered:
/// the same words in a different order are a different key.
#[derive(Clone, Debug)]
pub struct CacheKey {
    /// The container the layout was computed for.
    pub container_size: Size,
    /// The content-size category in effect.
    pub category: SizeCategory,
    /// The font the words were measured with.
    pub font_name: String,
    /// The input words, in input order.
    pub words: Vec<Word>,
}

impl CacheKey {
    /// Bundles the inputs of a layout pass into a key.
    #[must_use]
    pub fn new(
        container_size: Size,
        category: SizeCategory,
        font_name: impl Into<String>,
        words: Vec<Word>,
    ) -> Self {
        Self {
            container_size,
            category,
            font_name: font_name.into(),
            words,
        }
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.container_size.width.to_bits() == other.container_size.width.to_bits()
            && self.container_size.height.to_bits() == other.container_size.height.to_bits()
            && self.category == other.category
            && self.font_name == other.font_name
            && self.words == other.words
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.container_size.width.to_bits().hash(state);
        self.container_size.height.to_bits().hash(state);
        self.category.hash(state);
        self.font_name.hash(state);
        self.words.hash(state);
    }
}

/// A cache from layout inputs to the placements a completed pass produced.
#[derive(Clone, Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<CacheKey, Vec<Placement>>,
}

impl LayoutCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached placements for `key`, in placement order.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<&[Placement]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Stores the placements of a completed pass, replacing any previous
    /// entry for the same key.
    pub fn put(&mut self, key: CacheKey, placements: Vec<Placement>) {
        self.entries.insert(key, placements);
    }

    /// Drops every entry. Hosts call this on memory pressure.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The number of cached layouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_layout::Color;
    use kurbo::Point;

    fn words() -> Vec<Word> {
        vec![
            Word::with_color("Blue", 1.0, Color::BLUE),
            Word::with_color("Yellow", 1.0, Color::YELLOW),
        ]
    }

    fn key() -> CacheKey {
        CacheKey::new(Size::new(42.0, 42.0), SizeCategory::Large, "serif", words())
    }

    fn placements() -> Vec<Placement> {
        vec![
            Placement {
                text: "Yellow".to_owned(),
                point_size: 11.0,
                color: Color::YELLOW,
                center: Point::new(21.0, 21.0),
                vertical: false,
            },
            Placement {
                text: "Blue".to_owned(),
                point_size: 11.0,
                color: Color::BLUE,
                center: Point::new(21.0, 6.0),
                vertical: false,
            },
        ]
    }

    #[test]
    fn stores_and_replays_layouts() {
        let mut cache = LayoutCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key()), None);

        cache.put(key(), placements());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key()), Some(placements().as_slice()));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key()), None);
    }

    #[test]
    fn word_order_is_part_of_the_key() {
        let mut cache = LayoutCache::new();
        cache.put(key(), placements());

        let mut reversed = words();
        reversed.reverse();
        let other = CacheKey::new(
            Size::new(42.0, 42.0),
            SizeCategory::Large,
            "serif",
            reversed,
        );
        assert_eq!(cache.get(&other), None);
    }

    #[test]
    fn every_input_differentiates_keys() {
        let mut cache = LayoutCache::new();
        cache.put(key(), placements());

        let resized = CacheKey::new(Size::new(42.0, 43.0), SizeCategory::Large, "serif", words());
        assert_eq!(cache.get(&resized), None);

        let recategorized =
            CacheKey::new(Size::new(42.0, 42.0), SizeCategory::Small, "serif", words());
        assert_eq!(cache.get(&recategorized), None);

        let refonted = CacheKey::new(Size::new(42.0, 42.0), SizeCategory::Large, "mono", words());
        assert_eq!(cache.get(&refonted), None);

        let reweighted = CacheKey::new(
            Size::new(42.0, 42.0),
            SizeCategory::Large,
            "serif",
            vec![
                Word::with_color("Blue", 2.0, Color::BLUE),
                Word::with_color("Yellow", 1.0, Color::YELLOW),
            ],
        );
        assert_eq!(cache.get(&reweighted), None);
    }

    #[test]
    fn replacing_an_entry_keeps_one_copy() {
        let mut cache = LayoutCache::new();
        cache.put(key(), placements());
        let mut updated = placements();
        updated[1].center = Point::new(21.0, 36.0);
        cache.put(key(), updated.clone());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key()), Some(updated.as_slice()));
    }
}
