// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass mutable word state and its derived geometry.

use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;

use crate::shaper::TextShaper;
use crate::types::Color;

/// Margin kept between a word and the container's narrow dimension when
/// deciding whether a proposed orientation fits.
const CONTAINER_MARGIN: f64 = 16.0;

/// Padding along the text's length axis, used in [`CloudWord::padded_frame`].
const LENGTH_PADDING: f64 = 5.0;
/// Padding across the text, used in [`CloudWord::padded_frame`].
const CROSS_PADDING: f64 = 2.0;

/// A word being laid out: mutable state for one layout pass.
///
/// Created fresh from the input [`Word`] list at the start of every pass,
/// mutated in place through normalization and placement search, and discarded
/// when the pass ends. Only the derived [`Placement`] outlives the pass.
///
/// [`Word`]: crate::Word
/// [`Placement`]: crate::Placement
#[derive(Clone, Debug)]
pub struct CloudWord {
    /// The text to place.
    pub text: String,
    /// Occurrence count this word's weight normalized to.
    pub count: usize,
    /// Render color, carried through to the placement.
    pub color: Color,
    /// Current font size, in points.
    pub point_size: f64,
    /// Current center of the word's bounds, in container coordinates.
    pub bounds_center: Point,
    /// Current oriented bounds. A vertical word is generally taller than wide.
    pub bounds_size: Size,
    /// Whether the word is currently oriented vertically.
    pub vertical: bool,
}

impl CloudWord {
    /// Creates an unsized, unplaced word.
    #[must_use]
    pub fn new(text: impl Into<String>, count: usize, color: Color) -> Self {
        Self {
            text: text.into(),
            count,
            color,
            point_size: 0.0,
            bounds_center: Point::ZERO,
            bounds_size: Size::ZERO,
            vertical: false,
        }
    }

    /// The area of the current bounds. Words are placed in descending area order.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.bounds_size.width * self.bounds_size.height
    }

    /// The word's frame: its bounds centered on [`bounds_center`](Self::bounds_center).
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::from_center_size(self.bounds_center, self.bounds_size)
    }

    /// The frame expanded by fixed margins, used for every collision test so
    /// words keep whitespace between each other and the container edge.
    #[must_use]
    pub fn padded_frame(&self) -> Rect {
        if self.vertical {
            self.frame().inflate(CROSS_PADDING, LENGTH_PADDING)
        } else {
            self.frame().inflate(LENGTH_PADDING, CROSS_PADDING)
        }
    }

    /// Picks a random orientation (1-in-10 vertical) and sizes the word for it.
    ///
    /// The proposal is overruled when it cannot fit the container's narrow
    /// dimension: a portrait container forces a too-wide horizontal word
    /// vertical, a landscape container forces a too-tall vertical word
    /// horizontal.
    pub fn assign_random_orientation<S, R>(
        &mut self,
        container: Size,
        scale: f64,
        font_name: &str,
        shaper: &S,
        rng: &mut R,
    ) where
        S: TextShaper + ?Sized,
        R: Rng + ?Sized,
    {
        self.size_for(rng.gen_range(0..10) == 0, scale, font_name, shaper);

        let portrait = container.height > container.width;
        if portrait
            && !self.vertical
            && self.bounds_size.width >= container.width - CONTAINER_MARGIN
        {
            self.size_for(true, scale, font_name, shaper);
        } else if !portrait
            && self.vertical
            && self.bounds_size.height >= container.height - CONTAINER_MARGIN
        {
            self.size_for(false, scale, font_name, shaper);
        }
    }

    /// Picks a random center, biased toward the container's middle.
    ///
    /// Uses a pair of standard-normal samples (rejection-sampled to ±5σ) so a
    /// word usually lands near the center with a small chance of a near-edge
    /// start.
    pub fn assign_random_placement<R: Rng + ?Sized>(
        &mut self,
        container: Size,
        scale: f64,
        rng: &mut R,
    ) {
        let gaussian = bounded_gaussian_pair(rng);
        let x = container.width / 2.0
            + gaussian.x * ((container.width - self.bounds_size.width) * 0.1);
        let y = container.height / 2.0
            + gaussian.y * ((container.height - self.bounds_size.height) * 0.1);
        self.bounds_center = Point::new(round_to_pixel(x, scale), round_to_pixel(y, scale));
    }

    /// Re-centers the word at `saved_center + offset`, pixel-rounded.
    pub fn place_at_offset(&mut self, saved_center: Point, offset: Vec2, scale: f64) {
        self.bounds_center = Point::new(
            round_to_pixel(saved_center.x + offset.x, scale),
            round_to_pixel(saved_center.y + offset.y, scale),
        );
    }

    /// Sizes the word for one orientation, rounding dimensions up to the
    /// nearest device pixel.
    fn size_for<S: TextShaper + ?Sized>(
        &mut self,
        vertical: bool,
        scale: f64,
        font_name: &str,
        shaper: &S,
    ) {
        self.vertical = vertical;
        let sized = shaper.word_size(&self.text, font_name, self.point_size, vertical);
        self.bounds_size = Size::new(
            ceil_to_pixel(sized.width, scale),
            ceil_to_pixel(sized.height, scale),
        );
    }
}

/// Rounds a coordinate to the nearest device pixel.
///
/// Integral device pixels are not necessarily integer coordinates: on a 2x
/// display, 1.5 is pixel-aligned.
pub(crate) fn round_to_pixel(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

/// Rounds a dimension up to the next device pixel.
pub(crate) fn ceil_to_pixel(value: f64, scale: f64) -> f64 {
    (value * scale).ceil() / scale
}

/// A standard-normal sample pair with both components within ±5σ.
fn bounded_gaussian_pair<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    loop {
        let pair = polar_gaussian_pair(rng);
        if pair.x.abs() <= 5.0 && pair.y.abs() <= 5.0 {
            return pair;
        }
    }
}

/// Two independent standard-normal samples via the polar Box-Muller method.
fn polar_gaussian_pair<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    loop {
        let x1 = 2.0 * rng.r#gen::<f64>() - 1.0;
        let x2 = 2.0 * rng.r#gen::<f64>() - 1.0;
        let w = x1 * x1 + x2 * x2;
        if w > 0.0 && w < 1.0 {
            let scale = ((-2.0 * w.ln()) / w).sqrt();
            return Vec2::new(x1 * scale, x2 * scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaper::MonospaceShaper;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    const FONT: &str = "any";

    #[test]
    fn pixel_rounding_respects_scale() {
        assert_eq!(round_to_pixel(1.2, 1.0), 1.0);
        assert_eq!(round_to_pixel(1.26, 2.0), 1.5);
        assert_eq!(ceil_to_pixel(1.01, 1.0), 2.0);
        assert_eq!(ceil_to_pixel(1.01, 2.0), 1.5);
    }

    #[test]
    fn padded_frame_pads_the_length_axis() {
        let mut word = CloudWord::new("pad", 1, Color::BLACK);
        word.bounds_center = Point::new(50.0, 50.0);
        word.bounds_size = Size::new(30.0, 10.0);

        let horizontal = word.padded_frame();
        assert_eq!(horizontal, Rect::new(30.0, 43.0, 70.0, 57.0));

        word.vertical = true;
        word.bounds_size = Size::new(10.0, 30.0);
        let vertical = word.padded_frame();
        assert_eq!(vertical, Rect::new(43.0, 30.0, 57.0, 70.0));
    }

    #[test]
    fn portrait_container_forces_wide_words_vertical() {
        let shaper = MonospaceShaper::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut word = CloudWord::new("extremely-wide-word", 1, Color::BLACK);
        word.point_size = 20.0;

        // 19 glyphs at 12pt advance: 228 wide, far past 100 - 16.
        let container = Size::new(100.0, 400.0);
        for _ in 0..32 {
            word.assign_random_orientation(container, 1.0, FONT, &shaper, &mut rng);
            assert!(word.vertical, "wide word must be forced vertical");
        }
    }

    #[test]
    fn landscape_container_forces_tall_words_horizontal() {
        let shaper = MonospaceShaper::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mut word = CloudWord::new("extremely-tall-word", 1, Color::BLACK);
        word.point_size = 20.0;

        let container = Size::new(400.0, 100.0);
        for _ in 0..32 {
            word.assign_random_orientation(container, 1.0, FONT, &shaper, &mut rng);
            assert!(!word.vertical, "tall word must be forced horizontal");
        }
    }

    #[test]
    fn random_placement_is_biased_toward_the_center() {
        let mut rng = StdRng::seed_from_u64(5);
        let container = Size::new(400.0, 400.0);
        let mut word = CloudWord::new("word", 1, Color::BLACK);
        word.bounds_size = Size::new(40.0, 12.0);

        for _ in 0..256 {
            word.assign_random_placement(container, 1.0, &mut rng);
            // ±5σ of (container - word) * 0.1 around the midpoint.
            assert!((word.bounds_center.x - 200.0).abs() <= 5.0 * 36.0);
            assert!((word.bounds_center.y - 200.0).abs() <= 5.0 * 38.8);
            assert_eq!(word.bounds_center.x, word.bounds_center.x.round());
        }
    }

    #[test]
    fn gaussian_pair_is_rejection_bounded() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..1024 {
            let pair = bounded_gaussian_pair(&mut rng);
            assert!(pair.x.abs() <= 5.0 && pair.y.abs() <= 5.0);
        }
    }
}
