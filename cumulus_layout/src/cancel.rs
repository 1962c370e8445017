// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative cancellation for layout passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation flag.
///
/// The engine checks the token at every phase boundary and inside its
/// per-word and per-angle loops. Once cancelled, the in-flight pass unwinds
/// with [`LayoutError::Cancelled`] without reporting further placements or a
/// completion signal. Cancellation is one-way; a token is never reset.
///
/// [`LayoutError::Cancelled`]: crate::LayoutError::Cancelled
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. All clones observe the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
