//! Benchmark workloads for the bumpyard arena allocator.
//!
//! Provides deterministic request streams so that runs are comparable:
//!
//! - [`small_objects`]: many short requests with mixed alignment
//! - [`mixed_sizes`]: mostly small requests with periodic oversized ones
//!   that force chunk growth
//! - [`frame_arena`]: an arena sized for one frame of [`small_objects`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bumpyard_arena::{Arena, ArenaConfig, ArenaError};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One allocation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Bytes requested.
    pub size: usize,
    /// Alignment requested.
    pub align: usize,
}

/// `count` requests of 8..=64 bytes with alignments cycling through 1..=16.
///
/// The sequence depends only on `count` and `seed`.
pub fn small_objects(count: usize, seed: u64) -> Vec<Request> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let draw = rng.next_u64();
            Request {
                size: 8 + (draw % 57) as usize,
                align: 1 << (i % 5),
            }
        })
        .collect()
}

/// Like [`small_objects`], but every `every`-th request asks for
/// `oversized` bytes.
pub fn mixed_sizes(count: usize, every: usize, oversized: usize, seed: u64) -> Vec<Request> {
    let mut requests = small_objects(count, seed);
    for request in requests.iter_mut().step_by(every.max(1)).skip(1) {
        request.size = oversized;
        request.align = 64;
    }
    requests
}

/// Bytes the given requests consume when placed back to back, including
/// worst-case padding.
pub fn footprint(requests: &[Request]) -> usize {
    requests.iter().map(|r| r.size + r.align).sum()
}

/// An arena whose first chunk holds all of `requests` without growing.
pub fn frame_arena(requests: &[Request], zero_on_alloc: bool) -> Result<Arena, ArenaError> {
    Arena::new(
        ArenaConfig::new()
            .with_chunk_size(footprint(requests).max(1))
            .with_zero_on_alloc(zero_on_alloc),
    )
}
