//! Analysis lane: one worker thread decoding frames serially
//!
//! Frames reach the worker over a channel. When the worker wakes up it skips
//! to the newest queued frame and releases the older ones, so the decoder
//! always sees the latest frame and nothing piles up behind it.

use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::ScanPipeline;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Dedicated frame analysis thread
pub struct AnalysisLane {
    frames: Option<UnboundedSender<Frame>>,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AnalysisLane {
    /// Start the worker thread feeding frames into `pipeline`
    pub fn spawn(pipeline: Arc<ScanPipeline>) -> Result<Self> {
        let (tx, rx) = unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let worker_stop = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("scan-analysis".to_string())
            .spawn(move || run(rx, &worker_stop, &pipeline))?;

        Ok(Self {
            frames: Some(tx),
            stop,
            worker: Some(worker),
        })
    }

    /// Hand a frame to the lane without blocking
    ///
    /// Returns `false` if the lane no longer accepts frames; the frame is
    /// released in that case.
    pub fn offer(&self, frame: Frame) -> bool {
        match &self.frames {
            Some(frames) => frames.send(frame).is_ok(),
            None => false,
        }
    }

    /// Process the newest pending frame, if any, then stop the worker
    pub fn drain(mut self) {
        self.finish(false);
    }

    /// Stop the worker now. Pending, unprocessed frames are released.
    pub fn shutdown(mut self) {
        self.finish(true);
    }

    fn finish(&mut self, stop: bool) {
        if stop {
            self.stop.store(true, Ordering::Release);
        }
        // Closing the channel wakes the worker once the queue is empty
        self.frames.take();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Analysis thread panicked");
            }
            log::debug!("Analysis lane stopped");
        }
    }
}

impl Drop for AnalysisLane {
    fn drop(&mut self) {
        self.finish(true);
    }
}

fn run(mut frames: UnboundedReceiver<Frame>, stop: &AtomicBool, pipeline: &ScanPipeline) {
    while let Some(mut frame) = frames.blocking_recv() {
        while let Ok(newer) = frames.try_recv() {
            log::trace!("Skipping stale frame {}", frame.sequence());
            frame = newer;
        }
        if stop.load(Ordering::Acquire) {
            break;
        }

        let sequence = frame.sequence();
        let outcome = pipeline.process_frame(frame);
        log::trace!("Frame {}: {:?}", sequence, outcome);
    }
    // Dropping the receiver releases anything still queued
}
