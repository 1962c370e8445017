// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable input words and weight normalization.

use core::hash::{Hash, Hasher};

use crate::types::Color;

/// An input word: text, a positive weight, and a render color.
///
/// Equality and hashing are structural over all three fields, and the weight
/// is compared and hashed by bit pattern. This makes `Word` usable in cache
/// keys: identical inputs hash identically across runs.
#[derive(Clone, Debug)]
pub struct Word {
    /// The text to render.
    pub text: String,
    /// The weight of the word; must be positive.
    pub weight: f32,
    /// The color the word should be rendered in.
    pub color: Color,
}

impl Word {
    /// Creates a black word.
    #[must_use]
    pub fn new(text: impl Into<String>, weight: f32) -> Self {
        Self::with_color(text, weight, Color::BLACK)
    }

    /// Creates a word with an explicit color.
    #[must_use]
    pub fn with_color(text: impl Into<String>, weight: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            weight,
            color,
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.weight.to_bits() == other.weight.to_bits()
            && self.color == other.color
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.weight.to_bits().hash(state);
        self.color.hash(state);
    }
}

/// Normalizes word weights to occurrence counts.
///
/// Each weight is scaled so the smallest weight maps to a count of 1:
/// `count = ceil(weight / min_weight)`. Non-finite or non-positive weights
/// degrade the whole set to counts of 1 rather than producing nonsense.
#[must_use]
pub fn occurrence_counts(words: &[Word]) -> Vec<usize> {
    let min_weight = words
        .iter()
        .map(|word| word.weight)
        .fold(f32::INFINITY, f32::min);

    if !min_weight.is_finite() || min_weight <= 0.0 {
        return words.iter().map(|_| 1).collect();
    }

    words
        .iter()
        .map(|word| {
            let count = (word.weight / min_weight).ceil();
            if count.is_finite() && count >= 1.0 {
                count as usize
            } else {
                1
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(word: &Word) -> u64 {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_is_structural() {
        let a = Word::with_color("rust", 2.0, Color::BLUE);
        let b = Word::with_color("rust", 2.0, Color::BLUE);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        assert_ne!(a, Word::with_color("rust", 2.5, Color::BLUE));
        assert_ne!(a, Word::with_color("rust", 2.0, Color::RED));
        assert_ne!(a, Word::with_color("ruts", 2.0, Color::BLUE));
    }

    #[test]
    fn counts_scale_to_smallest_weight() {
        let words = [
            Word::new("a", 0.5),
            Word::new("b", 1.0),
            Word::new("c", 1.2),
        ];
        assert_eq!(occurrence_counts(&words), vec![1, 2, 3]);
    }

    #[test]
    fn counts_degrade_on_bad_weights() {
        let words = [Word::new("a", 0.0), Word::new("b", 3.0)];
        assert_eq!(occurrence_counts(&words), vec![1, 1]);
        assert_eq!(occurrence_counts(&[]), Vec::<usize>::new());
    }
}
