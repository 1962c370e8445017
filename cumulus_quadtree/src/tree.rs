// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadtree itself.

use kurbo::Rect;
use smallvec::SmallVec;

/// Number of rectangles a node holds directly before it subdivides.
pub const FAN_OUT: usize = 8;

/// A quadtree of axis-aligned rectangles over a bounded region.
///
/// Each node owns the rectangles that fit entirely within its frame but not
/// within any single child quadrant. Subdivision is lazy: a node splits into
/// four equal quadrants only once it holds more than [`FAN_OUT`] rectangles.
#[derive(Clone, Debug)]
pub struct QuadTree {
    frame: Rect,
    rects: SmallVec<[Rect; FAN_OUT]>,
    /// Child quadrants in fixed order: top-left, top-right, bottom-left,
    /// bottom-right. Either all four exist or none do.
    quads: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    /// Creates an empty quadtree covering `frame`.
    #[must_use]
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            rects: SmallVec::new(),
            quads: None,
        }
    }

    /// The region this tree covers.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Inserts a rectangle.
    ///
    /// Returns `false` (leaving the tree unchanged) iff `rect` is not fully
    /// contained in the tree's frame. Containment is inclusive: a rectangle
    /// flush against the frame edge still fits. Overlap with previously
    /// inserted rectangles never causes rejection.
    pub fn insert(&mut self, rect: Rect) -> bool {
        if !contains_rect(&self.frame, &rect) {
            return false;
        }

        // Pre-insert: subdivide once the fan-out threshold is exceeded and
        // re-home every held rectangle into whichever quadrant encloses it.
        if self.quads.is_none() && self.rects.len() > FAN_OUT {
            self.subdivide();
            self.migrate_held();
        }

        if self.quads.is_some() && self.migrate(rect) {
            return true;
        }

        // No quadrant fully encloses the rectangle. It stays at this node.
        self.rects.push(rect);
        true
    }

    /// Whether any stored rectangle intersects `query`.
    ///
    /// Intersection is strict: rectangles sharing only an edge or corner
    /// (zero-area overlap) are not reported.
    #[must_use]
    pub fn intersects(&self, query: Rect) -> bool {
        // Test the node's own rectangles first.
        if self
            .rects
            .iter()
            .any(|rect| strictly_intersects(rect, &query))
        {
            return true;
        }

        let Some(quads) = self.quads.as_ref() else {
            return false;
        };

        // Recurse in fixed quadrant order. Once a quadrant fully contains the
        // query, nothing outside its subtree can intersect it (the node's own
        // rectangles were already checked), so remaining siblings are skipped.
        // The containment check is pointless on the last quadrant.
        for (i, quad) in quads.iter().enumerate() {
            if strictly_intersects(&quad.frame, &query) {
                if quad.intersects(query) {
                    return true;
                }
                if i + 1 < quads.len() && contains_rect(&quad.frame, &query) {
                    return false;
                }
            }
        }

        false
    }

    /// Total number of stored rectangles across the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        let children = self
            .quads
            .as_ref()
            .map_or(0, |quads| quads.iter().map(Self::len).sum());
        self.rects.len() + children
    }

    /// Whether the tree holds no rectangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn subdivide(&mut self) {
        let mid_x = (self.frame.x0 + self.frame.x1) / 2.0;
        let mid_y = (self.frame.y0 + self.frame.y1) / 2.0;

        self.quads = Some(Box::new([
            Self::new(Rect::new(self.frame.x0, self.frame.y0, mid_x, mid_y)),
            Self::new(Rect::new(mid_x, self.frame.y0, self.frame.x1, mid_y)),
            Self::new(Rect::new(self.frame.x0, mid_y, mid_x, self.frame.y1)),
            Self::new(Rect::new(mid_x, mid_y, self.frame.x1, self.frame.y1)),
        ]));
    }

    /// Re-homes held rectangles into child quadrants where possible.
    fn migrate_held(&mut self) {
        let held = core::mem::take(&mut self.rects);
        for rect in held {
            if !self.migrate(rect) {
                self.rects.push(rect);
            }
        }
    }

    /// Pushes `rect` into the first quadrant that fully contains it.
    fn migrate(&mut self, rect: Rect) -> bool {
        let Some(quads) = self.quads.as_mut() else {
            return false;
        };
        quads.iter_mut().any(|quad| quad.insert(rect))
    }
}

/// Inclusive rectangle containment: edges of `outer` count as inside.
fn contains_rect(outer: &Rect, inner: &Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Strict intersection: boundary-only touches do not count.
fn strictly_intersects(a: &Rect, b: &Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}
