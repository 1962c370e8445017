// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulus Quadtree: a quadtree of axis-aligned rectangles for collision tests.
//!
//! This crate is the spatial index behind the Cumulus word-cloud layout engine.
//! It stores the bounding rectangles of already-placed glyphs over a bounded
//! region and answers one question fast: *does any stored rectangle intersect
//! this candidate rectangle?*
//!
//! Design points:
//!
//! - [`QuadTree::insert`] only accepts rectangles fully contained in the tree's
//!   frame. It never rejects on overlap: the tree is an intersection-test
//!   accelerator, not a collision-resolving structure.
//! - [`QuadTree::intersects`] uses a *strict* intersection test. Two rectangles
//!   sharing only an edge or a corner (zero-area overlap) do not intersect.
//!   Placed words may sit flush against each other.
//! - Nodes hold up to [`FAN_OUT`] rectangles directly and subdivide lazily into
//!   four equal quadrants once that threshold is exceeded. Rectangles that
//!   straddle a quadrant boundary stay at the parent node.
//!
//! # Example
//!
//! ```rust
//! use cumulus_quadtree::QuadTree;
//! use kurbo::Rect;
//!
//! let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! assert!(tree.insert(Rect::new(40.0, 40.0, 60.0, 60.0)));
//!
//! // Overlap is reported...
//! assert!(tree.intersects(Rect::new(50.0, 50.0, 70.0, 70.0)));
//! // ...but a shared edge is not.
//! assert!(!tree.intersects(Rect::new(60.0, 40.0, 80.0, 60.0)));
//!
//! // Rectangles outside the frame are rejected.
//! assert!(!tree.insert(Rect::new(90.0, 90.0, 110.0, 110.0)));
//! ```
//!
//! Coordinates are `f64` and assumed finite (no NaNs). Callers normalize
//! negative-extent rectangles (e.g. via [`kurbo::Rect::abs`]) before insertion.

mod tree;

pub use tree::{FAN_OUT, QuadTree};
