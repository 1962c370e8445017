// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text-shaping seam between the engine and a real font stack.

use kurbo::{Rect, Size};

/// Measures words and decomposes them into per-glyph bounding rectangles.
///
/// The engine treats the shaper as authoritative ground truth for glyph
/// geometry and performs no shaping itself. Implementations typically wrap a
/// platform text stack; [`MonospaceShaper`] is a deterministic stand-in for
/// tests and hosts without one.
///
/// All results are in the word's local coordinate frame, with the origin at
/// the top-left of the word's bounds. For `vertical` words the axes are
/// transposed: the word reads along the y axis and the returned size and
/// rectangles must reflect that.
pub trait TextShaper {
    /// The bounding size of `text` set in `font_name` at `point_size`.
    fn word_size(&self, text: &str, font_name: &str, point_size: f64, vertical: bool) -> Size;

    /// The bounding rectangle of each rendered glyph, in word-local
    /// coordinates, oriented consistently with `vertical`.
    ///
    /// Whitespace and other empty glyphs are omitted: only rectangles that
    /// should block other words belong here.
    fn glyph_rects(&self, text: &str, font_name: &str, point_size: f64, vertical: bool)
    -> Vec<Rect>;
}

/// A fixed-advance shaper with synthetic glyph boxes.
///
/// Every glyph advances `advance × point_size` horizontally and occupies a
/// box inset a little from its cell, which leaves the inter-glyph gaps real
/// shapers produce. Deterministic by construction, so it also anchors the
/// engine's reproducibility tests.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceShaper {
    /// Per-glyph advance as a fraction of the point size.
    pub advance: f64,
}

impl MonospaceShaper {
    /// Horizontal inset of a glyph box from its cell, as a fraction of the cell.
    const CELL_INSET: f64 = 0.05;
    /// Top of a glyph box, as a fraction of the point size.
    const GLYPH_TOP: f64 = 0.1;
    /// Bottom of a glyph box, as a fraction of the point size.
    const GLYPH_BOTTOM: f64 = 0.9;

    /// Creates a shaper with the default 0.6 em advance.
    #[must_use]
    pub const fn new() -> Self {
        Self { advance: 0.6 }
    }
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper for MonospaceShaper {
    fn word_size(&self, text: &str, _font_name: &str, point_size: f64, vertical: bool) -> Size {
        let glyphs = text.chars().count() as f64;
        let length = self.advance * point_size * glyphs;
        if vertical {
            Size::new(point_size, length)
        } else {
            Size::new(length, point_size)
        }
    }

    fn glyph_rects(
        &self,
        text: &str,
        _font_name: &str,
        point_size: f64,
        vertical: bool,
    ) -> Vec<Rect> {
        let cell = self.advance * point_size;
        let inset = Self::CELL_INSET * cell;

        text.chars()
            .enumerate()
            .filter(|(_, ch)| !ch.is_whitespace())
            .map(|(i, _)| {
                let x0 = i as f64 * cell + inset;
                let x1 = (i + 1) as f64 * cell - inset;
                let y0 = Self::GLYPH_TOP * point_size;
                let y1 = Self::GLYPH_BOTTOM * point_size;
                if vertical {
                    // Rotate into the vertical word box, whose width is the
                    // horizontal line height.
                    Rect::new(point_size - y1, x0, point_size - y0, x1)
                } else {
                    Rect::new(x0, y0, x1, y1)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = "any";

    #[test]
    fn vertical_size_transposes_axes() {
        let shaper = MonospaceShaper::new();
        let horizontal = shaper.word_size("word", FONT, 10.0, false);
        let vertical = shaper.word_size("word", FONT, 10.0, true);
        assert_eq!(horizontal, Size::new(24.0, 10.0));
        assert_eq!(vertical, Size::new(10.0, 24.0));
    }

    #[test]
    fn glyph_rects_stay_inside_word_bounds() {
        let shaper = MonospaceShaper::new();
        for vertical in [false, true] {
            let size = shaper.word_size("cloud", FONT, 12.0, vertical);
            let bounds = size.to_rect();
            for glyph in shaper.glyph_rects("cloud", FONT, 12.0, vertical) {
                assert!(glyph.area() > 0.0, "glyph box must have area");
                assert!(
                    bounds.union(glyph) == bounds,
                    "glyph {glyph:?} escapes bounds {bounds:?} (vertical: {vertical})"
                );
            }
        }
    }

    #[test]
    fn whitespace_produces_no_glyphs() {
        let shaper = MonospaceShaper::new();
        let rects = shaper.glyph_rects("a b", FONT, 10.0, false);
        assert_eq!(rects.len(), 2);
        // The space still advances: the third cell starts past it.
        assert!(rects[1].x0 > 12.0);
    }
}
