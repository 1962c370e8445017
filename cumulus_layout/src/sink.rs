// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivery of placement results to the caller.

use std::sync::mpsc::Sender;

use crate::types::Placement;

/// Receives placement results as the engine produces them.
///
/// The engine drives the sink synchronously: [`word_placed`] returns before
/// the word's glyph rectangles enter the spatial index, so a sink observes
/// placements in exactly the order they were committed. A cancelled pass
/// never calls [`finished`].
///
/// [`word_placed`]: Self::word_placed
/// [`finished`]: Self::finished
pub trait PlacementSink {
    /// A word was placed.
    fn word_placed(&mut self, placement: &Placement);

    /// A word exhausted its retry budget and was skipped.
    fn word_failed(&mut self, text: &str);

    /// The pass ran to completion. `complete` is true iff every word was
    /// placed; callers typically only cache complete passes.
    fn finished(&mut self, complete: bool);
}

/// A sink that collects results into vectors.
///
/// The placement list is ordered and matches what a host would hand to the
/// layout cache.
#[derive(Clone, Debug, Default)]
pub struct CollectSink {
    /// Placements, in placement order.
    pub placements: Vec<Placement>,
    /// Texts of words that could not be placed.
    pub failed: Vec<String>,
    /// The completion flag, once the pass finishes.
    pub complete: Option<bool>,
}

impl PlacementSink for CollectSink {
    fn word_placed(&mut self, placement: &Placement) {
        self.placements.push(placement.clone());
    }

    fn word_failed(&mut self, text: &str) {
        self.failed.push(text.to_owned());
    }

    fn finished(&mut self, complete: bool) {
        self.complete = Some(complete);
    }
}

/// A placement result as a plain event, for channel-based sinks.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutEvent {
    /// A word was placed.
    Placed(Placement),
    /// A word could not be placed.
    Failed(String),
    /// The pass finished; true iff every word was placed.
    Finished(bool),
}

/// Streams events over a channel. Send errors are ignored: a disconnected
/// receiver means nobody is interested in the rest of the pass.
impl PlacementSink for Sender<LayoutEvent> {
    fn word_placed(&mut self, placement: &Placement) {
        let _ = self.send(LayoutEvent::Placed(placement.clone()));
    }

    fn word_failed(&mut self, text: &str) {
        let _ = self.send(LayoutEvent::Failed(text.to_owned()));
    }

    fn finished(&mut self, complete: bool) {
        let _ = self.send(LayoutEvent::Finished(complete));
    }
}
