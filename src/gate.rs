//! Frame gate: admission and keep-only-latest backpressure
//!
//! There is no queue. A frame is admitted only if it carries image data, the
//! debouncer is still `Ready`, and no other frame is being decoded. Every
//! other frame is released on the spot.

use crate::debouncer::ScanDebouncer;
use crate::frame::{Frame, ImageBuffer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Admission control in front of the decoder
#[derive(Debug)]
pub struct FrameGate {
    debouncer: Arc<ScanDebouncer>,
    in_flight: AtomicBool,
}

impl FrameGate {
    pub fn new(debouncer: Arc<ScanDebouncer>) -> Self {
        Self {
            debouncer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Admit a frame for decoding
    ///
    /// Returns `None` when the frame was rejected; it has already been
    /// released. An admitted frame holds the single decode slot until the
    /// returned guard is dropped, which also releases the frame.
    pub fn admit(&self, mut frame: Frame) -> Option<AdmittedFrame<'_>> {
        let Some(image) = frame.take_image() else {
            log::trace!("Frame {} has no image data, dropping", frame.sequence());
            return None;
        };

        if self.debouncer.is_locked() {
            log::trace!("Scan already handled, dropping frame {}", frame.sequence());
            return None;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::trace!("Decoder busy, dropping frame {}", frame.sequence());
            return None;
        }

        Some(AdmittedFrame {
            image,
            frame,
            slot: &self.in_flight,
        })
    }

    /// Whether a frame currently occupies the decode slot
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// A frame holding the gate's decode slot
#[derive(Debug)]
pub struct AdmittedFrame<'a> {
    image: ImageBuffer,
    frame: Frame,
    slot: &'a AtomicBool,
}

impl AdmittedFrame<'_> {
    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn rotation_degrees(&self) -> u16 {
        self.frame.rotation_degrees()
    }

    pub fn sequence(&self) -> u64 {
        self.frame.sequence()
    }
}

impl Drop for AdmittedFrame<'_> {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
