//! Camera frames and the release-exactly-once contract
//!
//! The upstream camera hands out frames from a bounded pool. A frame that is
//! never released stalls capture, so release is tied to `Drop`: whichever path
//! a frame takes through the scanner, it is returned to its pool once.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Callback invoked with the frame's sequence number when it is released
pub type ReleaseHook = Box<dyn FnOnce(u64) + Send>;

/// Raw image data as delivered by the capture surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// A single captured frame
pub struct Frame {
    image: Option<ImageBuffer>,
    rotation_degrees: u16,
    sequence: u64,
    release: Option<ReleaseHook>,
}

impl Frame {
    /// Create a frame. `image` is `None` when the capture surface produced a
    /// frame without decodable image data.
    pub fn new(image: Option<ImageBuffer>, rotation_degrees: u16, sequence: u64) -> Self {
        Self {
            image,
            rotation_degrees,
            sequence,
            release: None,
        }
    }

    /// Attach the hook that returns this frame to its pool
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.release = Some(Box::new(hook));
        self
    }

    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Move the image data out; the frame itself stays owned until dropped
    pub(crate) fn take_image(&mut self) -> Option<ImageBuffer> {
        self.image.take()
    }

    pub fn rotation_degrees(&self) -> u16 {
        self.rotation_degrees
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Release the frame now instead of at end of scope
    pub fn close(self) {}
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.sequence);
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &self.sequence)
            .field("rotation_degrees", &self.rotation_degrees)
            .field("has_image", &self.image.is_some())
            .finish()
    }
}

/// Bounded frame source mirroring the camera's buffer pool
///
/// Hands out at most `capacity` frames at a time; a slot comes back when the
/// frame is dropped.
#[derive(Debug, Clone)]
pub struct FramePool {
    capacity: usize,
    outstanding: Arc<AtomicUsize>,
    next_sequence: Arc<AtomicU64>,
}

impl FramePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            outstanding: Arc::new(AtomicUsize::new(0)),
            next_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Take a frame from the pool, or `None` if every slot is in use
    pub fn acquire(&self, image: Option<ImageBuffer>, rotation_degrees: u16) -> Option<Frame> {
        let reserved = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .is_ok();
        if !reserved {
            log::trace!("Frame pool exhausted ({} in use)", self.capacity);
            return None;
        }

        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let outstanding = Arc::clone(&self.outstanding);
        Some(
            Frame::new(image, rotation_degrees, sequence).on_release(move |_| {
                outstanding.fetch_sub(1, Ordering::AcqRel);
            }),
        )
    }

    /// Number of frames currently held outside the pool
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
