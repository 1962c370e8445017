// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine: a four-phase placement pipeline over one container.

use cumulus_quadtree::QuadTree;
use kurbo::{Rect, Size, Vec2};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, debug_span, trace};

use crate::cancel::CancelToken;
use crate::cloud_word::CloudWord;
use crate::shaper::TextShaper;
use crate::sink::PlacementSink;
use crate::types::{Placement, SizeCategory};
use crate::word::{Word, occurrence_counts};

/// Starting lower font bound, in points.
const FONT_START: f64 = 12.0;
/// Font sizes are quantized to multiples of this step.
const FONT_STEP: f64 = 3.0;
/// Upper bound on the max/min weight ratio.
const RATIO_CAP: f64 = 20.0;
/// The font-shrink loop never pushes the lower font bound below this floor.
///
/// The shrink loop's only exit is a pass that fits the container; for
/// pathological inputs (a word that cannot fit at any size) that never
/// happens, so the floor bounds the loop. Words still oversized at the floor
/// are reported unplaceable instead.
const FONT_MIN_FLOOR: f64 = 4.0;
/// Fraction of the container area the summed word areas may occupy.
const AREA_BUDGET: f64 = 0.9;
/// Retry cycles (re-rolled orientation + placement) per word before giving up.
const PLACEMENT_RETRIES: usize = 101;

/// Why a layout pass failed as a whole.
///
/// Per-word conditions (a word that cannot be placed, a glyph rectangle the
/// index rejects) are recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The pass observed its cancellation token and unwound. Nothing further
    /// was reported to the sink, and no completion signal was sent.
    #[error("layout pass cancelled")]
    Cancelled,
    /// Container dimensions were non-finite or not positive.
    #[error("container size must be finite and positive, got {width}x{height}")]
    InvalidContainer {
        /// The offending width.
        width: f64,
        /// The offending height.
        height: f64,
    },
    /// The device scale factor was non-finite or not positive.
    #[error("scale factor must be finite and positive, got {0}")]
    InvalidScale(f64),
}

/// Inputs that shape a layout pass, beyond the word list itself.
#[derive(Clone, Debug)]
pub struct LayoutParams {
    /// The container the words must fit in.
    pub container_size: Size,
    /// Device scale factor; geometry is rounded to `1 / scale` units.
    pub scale: f64,
    /// Font name handed to the text shaper.
    pub font_name: String,
    /// Content-size category applied during font normalization.
    pub category: SizeCategory,
}

impl LayoutParams {
    /// Parameters for `container_size` at scale 1 with a generic font and the
    /// default size category.
    #[must_use]
    pub fn new(container_size: Size) -> Self {
        Self {
            container_size,
            scale: 1.0,
            font_name: "sans-serif".to_owned(),
            category: SizeCategory::default(),
        }
    }
}

/// One layout pass: normalizes font sizes, assigns preferred placements,
/// sorts, and places words, streaming results to a [`PlacementSink`].
///
/// The engine owns all per-pass state — the [`CloudWord`] arena and the glyph
/// quadtree — exclusively; nothing is shared across passes. Phases run
/// strictly in order on the calling thread:
///
/// 1. Normalize font sizes (the self-correcting capacity-fitting loop).
/// 2. Assign center-biased random preferred placements.
/// 3. Sort by descending area, descending font size as tie-break.
/// 4. Place each word, falling back to a concentric search and re-rolled
///    placements; accepted words' glyphs enter the quadtree.
///
/// ```rust
/// use cumulus_layout::{
///     CancelToken, CollectSink, LayoutEngine, LayoutParams, MonospaceShaper, Word,
/// };
/// use kurbo::Size;
/// use rand::SeedableRng as _;
/// use rand::rngs::StdRng;
///
/// let words = [Word::new("cumulus", 3.0), Word::new("nimbus", 1.0)];
/// let shaper = MonospaceShaper::new();
/// let mut engine = LayoutEngine::new(
///     &words,
///     LayoutParams::new(Size::new(400.0, 300.0)),
///     &shaper,
///     CancelToken::new(),
/// )
/// .unwrap();
///
/// let mut sink = CollectSink::default();
/// engine.run(&mut StdRng::seed_from_u64(1), &mut sink).unwrap();
/// assert_eq!(sink.complete, Some(true));
/// assert_eq!(sink.placements.len(), 2);
/// ```
#[derive(Debug)]
pub struct LayoutEngine<'a, S: TextShaper + ?Sized> {
    params: LayoutParams,
    words: Vec<CloudWord>,
    index: QuadTree,
    shaper: &'a S,
    cancel: CancelToken,
}

impl<'a, S: TextShaper + ?Sized> LayoutEngine<'a, S> {
    /// Creates an engine for one pass over `words`.
    ///
    /// Validates the container geometry up front; a malformed container is
    /// the one input error that fails the pass before any phase runs.
    pub fn new(
        words: &[Word],
        params: LayoutParams,
        shaper: &'a S,
        cancel: CancelToken,
    ) -> Result<Self, LayoutError> {
        let Size { width, height } = params.container_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(LayoutError::InvalidContainer { width, height });
        }
        if !(params.scale.is_finite() && params.scale > 0.0) {
            return Err(LayoutError::InvalidScale(params.scale));
        }

        let counts = occurrence_counts(words);
        let cloud_words = words
            .iter()
            .zip(counts)
            .map(|(word, count)| CloudWord::new(word.text.clone(), count, word.color))
            .collect();

        Ok(Self {
            index: QuadTree::new(params.container_size.to_rect()),
            params,
            words: cloud_words,
            shaper,
            cancel,
        })
    }

    /// Runs the pass to completion, streaming results into `sink`.
    ///
    /// On success the sink has received one `word_placed` or `word_failed`
    /// per word plus a final `finished(all_placed)`. On error the pipeline
    /// unwound mid-flight and `finished` was never called.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        sink: &mut dyn PlacementSink,
    ) -> Result<(), LayoutError> {
        let span = debug_span!("layout_pass", words = self.words.len());
        let _guard = span.enter();

        self.check_cancelled()?;
        self.normalize_font_sizes(rng)?;
        self.check_cancelled()?;
        self.assign_preferred_placements(rng)?;
        self.check_cancelled()?;
        self.sort_by_descending_area();
        self.check_cancelled()?;
        let all_placed = self.place_words(rng, sink)?;

        debug!(all_placed, "layout pass finished");
        sink.finished(all_placed);
        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), LayoutError> {
        if self.cancel.is_cancelled() {
            Err(LayoutError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Phase 1: the self-correcting capacity-fitting loop.
    ///
    /// Quantizes each word's font size along the count range within
    /// `[font_min, font_max]`, sizing words as it goes. Whenever the summed
    /// area exceeds the budget or a single word meets the container's size,
    /// the bounds shrink and the whole per-word pass restarts. `font_min`
    /// strictly decreases, bounded by [`FONT_MIN_FLOOR`].
    fn normalize_font_sizes<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), LayoutError> {
        if self.words.is_empty() {
            return Ok(());
        }

        // `words` is non-empty, so min/max exist.
        let min_count = self.words.iter().map(|w| w.count).min().unwrap_or(1) as f64;
        let max_count = self.words.iter().map(|w| w.count).max().unwrap_or(1) as f64;
        let count_delta = max_count - min_count;
        let ratio = if count_delta == 0.0 {
            RATIO_CAP
        } else {
            (max_count / min_count).min(RATIO_CAP)
        };

        let mut font_min = FONT_START;
        let mut font_max = font_min * ratio;
        let delta_offset = self.params.category.font_delta();
        let container = self.params.container_size;
        let area_budget = container.width * container.height * AREA_BUDGET;

        loop {
            let exceeded = self.size_all_words(
                rng,
                font_min,
                font_max,
                min_count,
                count_delta,
                delta_offset,
                Some(area_budget),
            )?;
            if !exceeded {
                return Ok(());
            }

            font_min -= 1.0;
            font_max = font_min * ratio;
            trace!(font_min, "word areas exceeded container; shrinking fonts");

            if font_min < FONT_MIN_FLOOR {
                // Some word cannot fit the container at any reasonable size.
                // Size everything once at the floor and let the placement
                // phase report the words that genuinely do not fit.
                font_min = FONT_MIN_FLOOR;
                font_max = font_min * ratio;
                debug!(font_min, "font floor reached; accepting oversized words");
                self.size_all_words(
                    rng,
                    font_min,
                    font_max,
                    min_count,
                    count_delta,
                    delta_offset,
                    None,
                )?;
                return Ok(());
            }
        }
    }

    /// One sizing pass over every word. With a budget, returns `true` as soon
    /// as the cumulative area or a single word exceeds the container.
    fn size_all_words<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        font_min: f64,
        font_max: f64,
        min_count: f64,
        count_delta: f64,
        delta_offset: f64,
        area_budget: Option<f64>,
    ) -> Result<bool, LayoutError> {
        let font_range = font_max - font_min;
        let container = self.params.container_size;
        let scale = self.params.scale;
        let font_name = self.params.font_name.as_str();
        let shaper = self.shaper;
        let mut word_area = 0.0;

        for word in &mut self.words {
            if self.cancel.is_cancelled() {
                return Err(LayoutError::Cancelled);
            }

            // Normalized position along the count range. With all counts
            // equal the range is degenerate; mapping to the low end keeps
            // equal-weight sets at `font_min` instead of the capped maximum.
            let position = if count_delta == 0.0 {
                0.0
            } else {
                (word.count as f64 - min_count) / count_delta
            };
            word.point_size =
                font_min + FONT_STEP * (position * (font_range / FONT_STEP)).floor() + delta_offset;
            word.assign_random_orientation(container, scale, font_name, shaper, rng);

            word_area += word.area();
            if let Some(budget) = area_budget
                && (word_area >= budget
                    || word.bounds_size.width >= container.width
                    || word.bounds_size.height >= container.height)
            {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Phase 2: center-biased random preferred placements.
    fn assign_preferred_placements<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(), LayoutError> {
        let container = self.params.container_size;
        let scale = self.params.scale;
        for word in &mut self.words {
            if self.cancel.is_cancelled() {
                return Err(LayoutError::Cancelled);
            }
            word.assign_random_placement(container, scale, rng);
        }
        Ok(())
    }

    /// Phase 3: descending area, descending font size as tie-break. Stable,
    /// so equally sized words keep their input order.
    fn sort_by_descending_area(&mut self) {
        self.words.sort_by(|a, b| {
            b.area()
                .total_cmp(&a.area())
                .then_with(|| b.point_size.total_cmp(&a.point_size))
        });
    }

    /// Phase 4: the greedy placement loop. Returns whether every word was placed.
    fn place_words<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        sink: &mut dyn PlacementSink,
    ) -> Result<bool, LayoutError> {
        let Self {
            params,
            words,
            index,
            shaper,
            cancel,
        } = self;
        let container = params.container_size;
        let mut all_placed = true;

        for word in words.iter_mut() {
            if cancel.is_cancelled() {
                return Err(LayoutError::Cancelled);
            }

            // A word the container cannot hold at all (possible only once the
            // font floor was hit) has no placement to search for.
            if word.bounds_size.width >= container.width
                || word.bounds_size.height >= container.height
            {
                debug!(text = %word.text, "word exceeds container; skipping");
                sink.word_failed(&word.text);
                all_placed = false;
                continue;
            }

            // The preferred location is free often enough to try it first.
            if try_place(index, params, *shaper, word, word.padded_frame(), sink) {
                continue;
            }

            let mut placed = false;
            for _ in 0..PLACEMENT_RETRIES {
                if concentric_search(index, params, *shaper, cancel, rng, word, sink)? {
                    placed = true;
                    break;
                }
                if cancel.is_cancelled() {
                    return Err(LayoutError::Cancelled);
                }

                // Nothing free around the current preferred location.
                // Re-roll orientation and preferred placement and try again.
                word.assign_random_orientation(
                    container,
                    params.scale,
                    &params.font_name,
                    *shaper,
                    rng,
                );
                word.assign_random_placement(container, params.scale, rng);
            }

            if !placed {
                debug!(text = %word.text, "no spot found; skipping word");
                sink.word_failed(&word.text);
                all_placed = false;
            }
        }

        Ok(all_placed)
    }
}

/// Accepts the word at its current center if its padded frame is free,
/// reporting the placement and indexing its glyphs.
///
/// The sink hears about the placement *before* the glyph rectangles enter the
/// index, preserving strict ordering between reporting and index mutation.
fn try_place<S: TextShaper + ?Sized>(
    index: &mut QuadTree,
    params: &LayoutParams,
    shaper: &S,
    word: &CloudWord,
    padded: Rect,
    sink: &mut dyn PlacementSink,
) -> bool {
    if index.intersects(padded) {
        return false;
    }

    trace!(text = %word.text, center = ?word.bounds_center, "placed word");
    sink.word_placed(&Placement {
        text: word.text.clone(),
        point_size: word.point_size,
        color: word.color,
        center: word.bounds_center,
        vertical: word.vertical,
    });
    insert_glyph_rects(index, params, shaper, word);
    true
}

/// Sweeps candidate centers on widening circles around the word's preferred
/// location, accepting the first free in-container spot.
///
/// Each revolution starts at a random angle and widens by one font size per
/// ring, with the angular step tightening (15° → 10° → 5°) as the ring grows.
/// The search ends when an entire revolution produces no candidate whose
/// padded frame stays inside the container — not merely no *free* candidate.
fn concentric_search<S, R>(
    index: &mut QuadTree,
    params: &LayoutParams,
    shaper: &S,
    cancel: &CancelToken,
    rng: &mut R,
    word: &mut CloudWord,
    sink: &mut dyn PlacementSink,
) -> Result<bool, LayoutError>
where
    S: TextShaper + ?Sized,
    R: Rng + ?Sized,
{
    let container_rect = params.container_size.to_rect();
    let saved_center = word.bounds_center;
    let mut radius_multiplier = 1_u32;

    loop {
        let initial_degree = f64::from(rng.gen_range(0_u32..360));
        let degree_step = match radius_multiplier {
            1 => 15.0,
            2 => 10.0,
            _ => 5.0,
        };
        let radius = f64::from(radius_multiplier) * word.point_size;
        let mut any_candidate_in_container = false;

        let mut degrees = initial_degree;
        while degrees < initial_degree + 360.0 {
            if cancel.is_cancelled() {
                return Err(LayoutError::Cancelled);
            }

            let radians = degrees.to_radians();
            let offset = Vec2::new(radians.cos() * radius, radians.sin() * radius);
            word.place_at_offset(saved_center, offset, params.scale);

            let padded = word.padded_frame();
            if rect_contains(&container_rect, &padded) {
                any_candidate_in_container = true;
                if try_place(index, params, shaper, word, padded, sink) {
                    return Ok(true);
                }
            }

            degrees += degree_step;
        }

        if !any_candidate_in_container {
            // The circle has outgrown the container.
            return Ok(false);
        }
        radius_multiplier += 1;
    }
}

/// Decomposes the word into glyph rectangles and inserts each into the index.
///
/// Glyph-level granularity is what lets irregular glyph shapes pack tightly
/// instead of being blocked by whole-word bounding boxes. Rectangles the
/// index rejects (out of frame after padding-free placement) are simply not
/// indexed.
fn insert_glyph_rects<S: TextShaper + ?Sized>(
    index: &mut QuadTree,
    params: &LayoutParams,
    shaper: &S,
    word: &CloudWord,
) {
    let origin = word.frame().origin().to_vec2();
    for glyph in shaper.glyph_rects(&word.text, &params.font_name, word.point_size, word.vertical) {
        let _ = index.insert((glyph + origin).abs());
    }
}

/// Inclusive rectangle containment, matching the quadtree's frame test.
fn rect_contains(outer: &Rect, inner: &Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}
