//! Scan pipeline: gate -> decode -> select -> debounce -> lookup -> display
//!
//! `process_frame` runs on the analysis lane and never suspends. The lookup
//! is spawned onto the async runtime; its completion updates the display only
//! if the pipeline is still open and no reset happened in between.

use crate::catalog::LookupOutcome;
use crate::debouncer::{ScanDebouncer, ScanState, ScanTicket};
use crate::decode::Detector;
use crate::display::{detected_text, resolved_text, ResultSink, READY_TEXT};
use crate::frame::Frame;
use crate::gate::FrameGate;
use crate::lookup::LookupService;
use crate::selector::select;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// What happened to one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Dropped by the gate (no image, already scanned, or decoder busy)
    Rejected,
    /// Decoded, but nothing usable was found
    NoBarcode,
    /// A barcode was found but another frame won the lock first
    Suppressed(String),
    /// This frame triggered the lookup for `barcode`
    Dispatched(String),
}

pub struct ScanPipeline {
    debouncer: Arc<ScanDebouncer>,
    gate: FrameGate,
    detector: Box<dyn Detector>,
    lookups: Arc<LookupService>,
    sink: Arc<dyn ResultSink>,
    runtime: Handle,
    closed: Arc<AtomicBool>,
    in_flight: Mutex<Vec<JoinHandle<LookupOutcome>>>,
}

impl ScanPipeline {
    /// Build a pipeline. Lookups are spawned on `runtime`.
    pub fn new(
        detector: Box<dyn Detector>,
        lookups: Arc<LookupService>,
        sink: Arc<dyn ResultSink>,
        runtime: Handle,
    ) -> Self {
        let debouncer = Arc::new(ScanDebouncer::new());
        Self {
            gate: FrameGate::new(Arc::clone(&debouncer)),
            debouncer,
            detector,
            lookups,
            sink,
            runtime,
            closed: Arc::new(AtomicBool::new(false)),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Handle one frame from the capture surface
    pub fn process_frame(&self, frame: Frame) -> FrameOutcome {
        if self.is_closed() {
            return FrameOutcome::Rejected;
        }
        let Some(admitted) = self.gate.admit(frame) else {
            return FrameOutcome::Rejected;
        };

        let candidates = self
            .detector
            .detect(admitted.image(), admitted.rotation_degrees())
            .unwrap_or_else(|e| {
                log::debug!("Decoding frame {} failed: {}", admitted.sequence(), e);
                Vec::new()
            });
        // Decoding is done; free the slot and release the frame
        drop(admitted);

        let barcode = match select(&candidates) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return FrameOutcome::NoBarcode,
        };

        let Some(ticket) = self.debouncer.try_lock() else {
            return FrameOutcome::Suppressed(barcode);
        };

        log::info!("Scanned barcode {}", barcode);
        self.sink.show(&detected_text(&barcode));
        self.spawn_lookup(barcode.clone(), ticket);
        FrameOutcome::Dispatched(barcode)
    }

    fn spawn_lookup(&self, barcode: String, ticket: ScanTicket) {
        let lookups = Arc::clone(&self.lookups);
        let sink = Arc::clone(&self.sink);
        let debouncer = Arc::clone(&self.debouncer);
        let closed = Arc::clone(&self.closed);

        let task = self.runtime.spawn(async move {
            let outcome = lookups.lookup(&barcode).await;
            if closed.load(Ordering::Acquire) {
                log::debug!("Scanner closed, discarding result for {}", barcode);
            } else if !debouncer.is_current(ticket) {
                log::debug!("Scan was reset, discarding result for {}", barcode);
            } else {
                sink.show(&resolved_text(&barcode, &outcome));
            }
            outcome
        });

        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
    }

    /// Wait for every dispatched lookup that has not been awaited yet
    ///
    /// Outcomes are returned in dispatch order. A lookup whose task failed is
    /// logged and left out.
    pub async fn wait_for_lookups(&self) -> Vec<LookupOutcome> {
        let tasks = std::mem::take(
            &mut *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => log::warn!("Lookup task failed: {}", e),
            }
        }
        outcomes
    }

    /// Reset control: back to `Ready` and clear the display
    ///
    /// No-op when nothing has been scanned. Returns whether a reset happened.
    pub fn reset(&self) -> bool {
        if self.debouncer.reset() {
            log::info!("Scanner reset");
            self.sink.show(READY_TEXT);
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> ScanState {
        self.debouncer.state()
    }

    /// Tear down: later frames are rejected and results of lookups still
    /// running are no longer displayed
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
