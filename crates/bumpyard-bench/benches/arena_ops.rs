//! Criterion micro-benchmarks for arena allocation, reset, and typed access.

use std::hint::black_box;

use bumpyard_arena::{Arena, ArenaConfig, SyncArena};
use bumpyard_bench::{frame_arena, mixed_sizes, small_objects};
use bumpyard_test_utils::fixtures::Particle;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark: 10K small requests into a pre-sized arena, then reset.
fn bench_alloc_reset_10k(c: &mut Criterion) {
    let requests = small_objects(10_000, 0xB0B);
    let mut group = c.benchmark_group("alloc_reset_10k");
    for zero in [false, true] {
        let mut arena = frame_arena(&requests, zero).unwrap();
        group.bench_with_input(BenchmarkId::new("zero_on_alloc", zero), &zero, |b, _| {
            b.iter(|| {
                for r in &requests {
                    black_box(arena.alloc_aligned(r.size, r.align).unwrap());
                }
                arena.reset().unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark: growth path, with an oversized request every 100.
fn bench_alloc_with_growth(c: &mut Criterion) {
    let requests = mixed_sizes(10_000, 100, 256 * 1024, 0xB0B);
    let mut arena = Arena::new(ArenaConfig::new().with_chunk_size(64 * 1024)).unwrap();
    c.bench_function("alloc_with_growth_10k", |b| {
        b.iter(|| {
            for r in &requests {
                black_box(arena.alloc_aligned(r.size, r.align).unwrap());
            }
            arena.reset().unwrap();
        });
    });
}

/// Benchmark: 1K typed allocations (gate verdict cached after the first).
fn bench_alloc_typed_1k(c: &mut Criterion) {
    let mut arena = Arena::new(ArenaConfig::default()).unwrap();
    c.bench_function("alloc_typed_1k", |b| {
        b.iter(|| {
            for i in 0..1_000u32 {
                let p = arena.alloc_typed::<Particle>().unwrap();
                p.id = i;
                black_box(p);
            }
            arena.reset().unwrap();
        });
    });
}

/// Benchmark: uncontended `SyncArena` to measure lock overhead.
fn bench_sync_alloc_10k(c: &mut Criterion) {
    let requests = small_objects(10_000, 0xB0B);
    let mut arena = SyncArena::from(frame_arena(&requests, false).unwrap());
    c.bench_function("sync_alloc_10k", |b| {
        b.iter(|| {
            for r in &requests {
                black_box(arena.alloc_aligned(r.size, r.align).unwrap());
            }
            arena.reset().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_alloc_reset_10k,
    bench_alloc_with_growth,
    bench_alloc_typed_1k,
    bench_sync_alloc_10k
);
criterion_main!(benches);
