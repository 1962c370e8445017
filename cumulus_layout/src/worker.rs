// Copyright 2025 the Cumulus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A dedicated layout thread with last-writer-wins request semantics.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use rand::SeedableRng as _;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::engine::{LayoutEngine, LayoutError, LayoutParams};
use crate::shaper::TextShaper;
use crate::sink::LayoutEvent;
use crate::word::Word;

/// One unit of work for a [`LayoutWorker`].
#[derive(Debug)]
pub struct LayoutRequest {
    /// The words to lay out.
    pub words: Vec<Word>,
    /// Layout parameters for the pass.
    pub params: LayoutParams,
    /// Seed for the pass's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Where the pass streams its events.
    pub events: Sender<LayoutEvent>,
}

/// Runs layout passes off the caller's thread, one at a time.
///
/// Submitting a request cancels whatever pass the worker is currently on, so
/// a host that relayouts on every resize only ever pays for the newest
/// geometry; superseded passes unwind at their next cancellation check
/// without signalling completion. Dropping the worker cancels the in-flight
/// pass and joins the thread.
#[derive(Debug)]
pub struct LayoutWorker {
    jobs: Option<Sender<(LayoutRequest, CancelToken)>>,
    handle: Option<JoinHandle<()>>,
    current: Option<CancelToken>,
}

impl LayoutWorker {
    /// Spawns the layout thread.
    pub fn new(shaper: Arc<dyn TextShaper + Send + Sync>) -> io::Result<Self> {
        let (jobs, queue) = channel();
        let handle = std::thread::Builder::new()
            .name("cumulus-layout".into())
            .spawn(move || run_loop(&queue, shaper.as_ref()))?;
        Ok(Self {
            jobs: Some(jobs),
            handle: Some(handle),
            current: None,
        })
    }

    /// Queues `request`, cancelling the previously submitted pass.
    ///
    /// Returns the new pass's cancellation token, which the caller may
    /// cancel itself (tearing down a view, say) without submitting a
    /// replacement.
    pub fn submit(&mut self, request: LayoutRequest) -> CancelToken {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let token = CancelToken::new();
        self.current = Some(token.clone());
        if let Some(jobs) = &self.jobs {
            // A send failure means the thread is gone; the token still lets
            // the caller observe that nothing will run.
            let _ = jobs.send((request, token.clone()));
        }
        token
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        if let Some(current) = self.current.take() {
            current.cancel();
        }
        // Disconnect the queue so the loop drains and exits.
        drop(self.jobs.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(queue: &Receiver<(LayoutRequest, CancelToken)>, shaper: &(dyn TextShaper + Send)) {
    while let Ok((request, cancel)) = queue.recv() {
        if cancel.is_cancelled() {
            continue;
        }
        debug!(words = request.words.len(), "starting layout pass");

        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut events = request.events;

        let result = LayoutEngine::new(&request.words, request.params, shaper, cancel)
            .and_then(|mut engine| engine.run(&mut rng, &mut events));
        match result {
            Ok(()) => {}
            // A superseded pass unwinds quietly.
            Err(LayoutError::Cancelled) => {}
            Err(error) => {
                warn!(%error, "layout pass failed");
                use crate::sink::PlacementSink as _;
                events.finished(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaper::MonospaceShaper;
    use kurbo::Size;
    use std::sync::mpsc::channel;

    fn request(seed: u64, events: Sender<LayoutEvent>) -> LayoutRequest {
        LayoutRequest {
            words: vec![Word::new("alpha", 3.0), Word::new("beta", 1.0)],
            params: LayoutParams::new(Size::new(400.0, 300.0)),
            seed: Some(seed),
            events,
        }
    }

    #[test]
    fn worker_streams_a_complete_pass() {
        let mut worker = LayoutWorker::new(Arc::new(MonospaceShaper::new())).expect("spawn");
        let (tx, rx) = channel();
        worker.submit(request(1, tx));

        let mut placements = 0;
        loop {
            match rx.recv().expect("worker disconnected before finishing") {
                LayoutEvent::Placed(placement) => {
                    assert!(placement.point_size > 0.0);
                    placements += 1;
                }
                LayoutEvent::Failed(text) => panic!("unexpected failure for {text}"),
                LayoutEvent::Finished(complete) => {
                    assert!(complete);
                    break;
                }
            }
        }
        assert_eq!(placements, 2);
    }

    #[test]
    fn submitting_supersedes_the_previous_pass() {
        let mut worker = LayoutWorker::new(Arc::new(MonospaceShaper::new())).expect("spawn");
        let (first_tx, _first_rx) = channel();
        let (second_tx, second_rx) = channel();

        let first = worker.submit(request(2, first_tx));
        let second = worker.submit(request(3, second_tx));
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        // The second pass still runs to completion.
        let mut finished = None;
        while let Ok(event) = second_rx.recv() {
            if let LayoutEvent::Finished(complete) = event {
                finished = Some(complete);
                break;
            }
        }
        assert_eq!(finished, Some(true));
    }

    #[test]
    fn invalid_requests_report_incomplete() {
        let mut worker = LayoutWorker::new(Arc::new(MonospaceShaper::new())).expect("spawn");
        let (tx, rx) = channel();
        let mut bad = request(4, tx);
        bad.params.container_size = Size::new(0.0, 0.0);
        worker.submit(bad);

        loop {
            match rx.recv().expect("worker disconnected before finishing") {
                LayoutEvent::Finished(complete) => {
                    assert!(!complete);
                    break;
                }
                event => panic!("unexpected event {event:?}"),
            }
        }
    }
}
