// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared value types: colors, size categories, and placement results.

use kurbo::Point;

/// An RGBA color, 8 bits per channel.
///
/// The engine never interprets colors; they ride along from [`Word`] input to
/// [`Placement`] output so hosts can render and cache without a side table.
///
/// [`Word`]: crate::Word
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 is opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Opaque dark gray.
    pub const DARK_GRAY: Self = Self::rgb(85, 85, 85);

    /// Creates an opaque color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color from RGBA channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Content-size category, controlling an additive font-size offset.
///
/// Hosts map their platform's accessibility text-size setting onto one of
/// these categories; the engine applies [`font_delta`](Self::font_delta) on
/// top of every normalized font size. The category is also part of the layout
/// cache key, so a category change never replays stale geometry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizeCategory {
    /// Extra small text.
    ExtraSmall,
    /// Small text.
    Small,
    /// Medium text.
    Medium,
    /// The default text size.
    #[default]
    Large,
    /// Extra large text.
    ExtraLarge,
    /// Extra extra large text.
    ExtraExtraLarge,
    /// Extra extra extra large text.
    ExtraExtraExtraLarge,
    /// Accessibility medium text.
    AccessibilityMedium,
    /// Accessibility large text.
    AccessibilityLarge,
    /// Accessibility extra large text.
    AccessibilityExtraLarge,
    /// Accessibility extra extra large text.
    AccessibilityExtraExtraLarge,
    /// Accessibility extra extra extra large text.
    AccessibilityExtraExtraExtraLarge,
}

impl SizeCategory {
    /// The additive font-size offset for this category, in points.
    #[must_use]
    pub const fn font_delta(self) -> f64 {
        match self {
            Self::ExtraSmall => -3.0,
            Self::Small => -2.0,
            Self::Medium => -1.0,
            Self::Large => 0.0,
            Self::ExtraLarge => 1.0,
            Self::ExtraExtraLarge => 2.0,
            Self::ExtraExtraExtraLarge | Self::AccessibilityMedium => 3.0,
            Self::AccessibilityLarge | Self::AccessibilityExtraLarge => 4.0,
            Self::AccessibilityExtraExtraLarge => 5.0,
            Self::AccessibilityExtraExtraExtraLarge => 6.0,
        }
    }
}

/// A finalized word placement, as reported to the placement sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// The placed text.
    pub text: String,
    /// Final font size, in points.
    pub point_size: f64,
    /// Render color, carried through from the input word.
    pub color: Color,
    /// Center of the word's bounds, in container coordinates.
    pub center: Point,
    /// Whether the word reads bottom-to-top instead of left-to-right.
    pub vertical: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_delta_table() {
        assert_eq!(SizeCategory::ExtraSmall.font_delta(), -3.0);
        assert_eq!(SizeCategory::Large.font_delta(), 0.0);
        assert_eq!(SizeCategory::default().font_delta(), 0.0);
        assert_eq!(
            SizeCategory::AccessibilityExtraExtraExtraLarge.font_delta(),
            6.0
        );
    }

    #[test]
    fn default_color_is_black() {
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::BLACK.a, 255);
    }
}
