// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulus Layout: a word-cloud layout engine.
//!
//! Cumulus Layout turns a list of weighted words into non-overlapping
//! placements inside a container.
//!
//! - Weights normalize to occurrence counts, and counts to quantized font
//!   sizes that fit the container's area through a self-correcting shrink
//!   loop.
//! - Each word gets a random orientation (occasionally vertical) and a
//!   center-biased random preferred location, then the engine places words
//!   largest-first, sweeping concentric circles around spots that turn out
//!   to be taken.
//! - Collision is glyph-granular: placed words contribute per-glyph
//!   rectangles to a quadtree, so later words nest into the gaps whole-word
//!   bounding boxes would waste.
//!
//! Text measurement is behind the [`TextShaper`] trait; hosts plug in their
//! platform text stack, and [`MonospaceShaper`] serves tests and headless
//! use. Results stream through a [`PlacementSink`] as they are committed, and
//! [`LayoutWorker`] runs passes on a dedicated thread with last-writer-wins
//! semantics for interactive hosts.
//!
//! # Example
//!
//! ```rust
//! use cumulus_layout::{
//!     CancelToken, CollectSink, LayoutEngine, LayoutParams, MonospaceShaper, Word,
//! };
//! use kurbo::Size;
//! use rand::SeedableRng as _;
//! use rand::rngs::StdRng;
//!
//! let words = [
//!     Word::new("cumulus", 5.0),
//!     Word::new("stratus", 2.0),
//!     Word::new("cirrus", 1.0),
//! ];
//! let shaper = MonospaceShaper::new();
//! let mut engine = LayoutEngine::new(
//!     &words,
//!     LayoutParams::new(Size::new(480.0, 320.0)),
//!     &shaper,
//!     CancelToken::new(),
//! )?;
//!
//! let mut sink = CollectSink::default();
//! engine.run(&mut StdRng::seed_from_u64(42), &mut sink)?;
//! assert_eq!(sink.complete, Some(true));
//! # Ok::<(), cumulus_layout::LayoutError>(())
//! ```

mod cancel;
mod cloud_word;
mod engine;
mod shaper;
mod sink;
mod types;
mod word;
mod worker;

pub use cancel::CancelToken;
pub use cloud_word::CloudWord;
pub use engine::{LayoutEngine, LayoutError, LayoutParams};
pub use shaper::{MonospaceShaper, TextShaper};
pub use sink::{CollectSink, LayoutEvent, PlacementSink};
pub use types::{Color, Placement, SizeCategory};
pub use word::{Word, occurrence_counts};
pub use worker::{LayoutRequest, LayoutWorker};
