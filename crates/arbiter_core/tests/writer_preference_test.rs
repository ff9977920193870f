//! # Writer Preference Integration Test
//!
//! Proves a writer cannot be starved by a continuous stream of readers.

use arbiter_core::{AccessCoordinator, Phase, SharedResource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const READER_THREADS: usize = 4;

/// Test: a writer gets in while readers keep streaming through.
#[test]
fn test_writer_not_starved_by_reader_stream() {
    let coordinator = Arc::new(AccessCoordinator::new());
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..READER_THREADS)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let _read = coordinator.read();
                    thread::sleep(Duration::from_millis(2));
                }
            })
        })
        .collect();

    // Let the stream overlap so the exclusive lock never drops on its own.
    thread::sleep(Duration::from_millis(30));

    let writer = {
        let coordinator = Arc::clone(&coordinator);
        thread::spawn(move || {
            let start = Instant::now();
            coordinator.acquire_write();
            let granted_at = coordinator.stats().reads_granted;
            // Stay registered long enough for the main thread to look.
            thread::sleep(Duration::from_millis(20));
            coordinator.release_write();
            (start.elapsed(), granted_at)
        })
    };

    // Registration closes the turnstile.
    let deadline = Instant::now() + Duration::from_secs(2);
    while coordinator.snapshot().writers == 0 {
        assert!(Instant::now() < deadline, "writer never registered");
        thread::yield_now();
    }
    let granted_at_registration = coordinator.stats().reads_granted;

    let (waited, granted_at_admission) = writer.join().unwrap();
    stop.store(true, Ordering::Relaxed);
    for r in readers {
        r.join().unwrap();
    }

    println!("Writer waited {waited:?} behind a {READER_THREADS}-thread reader stream");
    assert!(waited < Duration::from_secs(2), "writer starved for {waited:?}");

    // Only readers already past the turnstile may finish entering.
    let overtaken = granted_at_admission.saturating_sub(granted_at_registration);
    assert!(
        overtaken <= READER_THREADS as u64,
        "{overtaken} readers were admitted after the writer registered"
    );

    let stats = coordinator.stats();
    assert!(stats.is_balanced());
    assert!(coordinator.snapshot().is_idle());
}

/// Test: readers admitted before a batch are not evicted.
#[test]
fn test_admitted_readers_finish_during_batch() {
    let resource = Arc::new(SharedResource::new(10u32));
    let read = resource.read();

    let writer = {
        let resource = Arc::clone(&resource);
        thread::spawn(move || {
            *resource.write() += 1;
        })
    };

    let deadline = Instant::now() + Duration::from_secs(2);
    while resource.coordinator().snapshot().writers == 0 {
        assert!(Instant::now() < deadline, "writer never registered");
        thread::yield_now();
    }

    // The reader still sees the old value while the writer waits.
    assert_eq!(*read, 10);
    assert_eq!(
        resource.coordinator().snapshot().phase(),
        Phase::WriterBatch { writers: 1, draining_readers: 1 }
    );

    drop(read);
    writer.join().unwrap();
    assert_eq!(*resource.read(), 11);
}
