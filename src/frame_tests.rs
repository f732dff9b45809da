//! Tests for frame release and the bounded pool

use super::{Frame, FramePool, ImageBuffer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn image() -> ImageBuffer {
    ImageBuffer::new(2, 2, vec![0; 4])
}

#[test]
fn test_drop_releases_exactly_once() {
    let releases = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&releases);

    let frame = Frame::new(Some(image()), 90, 7).on_release(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(releases.load(Ordering::SeqCst), 0);

    drop(frame);
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_close_passes_sequence_to_hook() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    Frame::new(None, 0, 42)
        .on_release(move |seq| sink.lock().unwrap().push(seq))
        .close();

    assert_eq!(*seen.lock().unwrap(), vec![42]);
}

#[test]
fn test_taking_image_does_not_release() {
    let releases = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&releases);

    let mut frame = Frame::new(Some(image()), 0, 1).on_release(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(frame.take_image().is_some());
    assert!(!frame.has_image());
    assert_eq!(releases.load(Ordering::SeqCst), 0);

    drop(frame);
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_pool_is_bounded_and_slots_come_back() {
    let pool = FramePool::new(2);

    let a = pool.acquire(Some(image()), 0).unwrap();
    let b = pool.acquire(Some(image()), 0).unwrap();
    assert_eq!(pool.outstanding(), 2);
    assert!(pool.acquire(Some(image()), 0).is_none());

    drop(a);
    assert_eq!(pool.outstanding(), 1);
    let c = pool.acquire(None, 180).unwrap();
    assert!(c.sequence() > b.sequence());

    drop(b);
    drop(c);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn test_debug_output_omits_pixels() {
    let frame = Frame::new(Some(image()), 270, 3);
    let text = format!("{:?}", frame);
    assert!(text.contains("sequence: 3"));
    assert!(text.contains("has_image: true"));
}
