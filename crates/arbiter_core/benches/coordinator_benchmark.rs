//! # Coordinator Benchmark
//!
//! Cost of the four coordinator operations, alone and under contention.
//!
//! Run with: `cargo bench --package arbiter_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use arbiter_core::{AccessCoordinator, SharedResource};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark: uncontended read and write round trips.
fn bench_uncontended(c: &mut Criterion) {
    let coordinator = AccessCoordinator::new();

    c.bench_function("read_round_trip", |b| {
        b.iter(|| {
            coordinator.acquire_read();
            coordinator.release_read();
        });
    });

    c.bench_function("write_round_trip", |b| {
        b.iter(|| {
            coordinator.acquire_write();
            coordinator.release_write();
        });
    });
}

/// Benchmark: reads while background threads keep reading.
fn bench_contended_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_reads");

    for background in [1usize, 4] {
        let resource = Arc::new(SharedResource::new(0u64));
        let stop = Arc::new(AtomicBool::new(false));

        let workers: Vec<_> = (0..background)
            .map(|_| {
                let resource = Arc::clone(&resource);
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        black_box(*resource.read());
                    }
                })
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(background),
            &background,
            |b, _| {
                b.iter(|| black_box(*resource.read()));
            },
        );

        stop.store(true, Ordering::Relaxed);
        for w in workers {
            w.join().unwrap();
        }
    }

    group.finish();
}

/// Benchmark: writes while a background reader keeps entering.
fn bench_write_against_readers(c: &mut Criterion) {
    let resource = Arc::new(SharedResource::new(0u64));
    let stop = Arc::new(AtomicBool::new(false));

    let reader = {
        let resource = Arc::clone(&resource);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                black_box(*resource.read());
            }
        })
    };

    c.bench_function("write_against_reader", |b| {
        b.iter(|| {
            *resource.write() += 1;
        });
    });

    stop.store(true, Ordering::Relaxed);
    reader.join().unwrap();
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_contended_reads,
    bench_write_against_readers,
);
criterion_main!(benches);
