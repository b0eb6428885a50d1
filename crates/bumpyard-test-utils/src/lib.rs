//! Test utilities for bumpyard development.
//!
//! Provides [`init_tracing`] for tests that want arena logs on the test
//! output, and a set of [`fixtures`] covering both sides of the
//! indirection gate.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness.
///
/// Honors `RUST_LOG`; defaults to `debug` for the bumpyard crates. Safe to
/// call from every test: only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bumpyard_arena=debug,bumpyard_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
