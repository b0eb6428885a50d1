//! Chunked bump allocation with epoch-based bulk reclamation.
//!
//! An [`Arena`] serves variable-size, aligned requests by advancing a
//! cursor through the last of a list of fixed chunks, growing the list when
//! a request does not fit. Individual regions are never freed; instead
//! [`Arena::reset`] reclaims everything at once and starts a new epoch.
//!
//! ```text
//! Arena
//! ├── Chunk[0]   (kept across resets)
//! ├── Chunk[1..] (grown on demand, freed on reset)
//! ├── cursor     (offset into the last chunk)
//! └── epoch      (bumped by reset/release; stamped into handles)
//! ```
//!
//! # Typed allocation
//!
//! [`Arena::alloc_typed`] only accepts [`Pod`] types, and additionally runs
//! the structural indirection check from [`bumpyard_core::gate`] on the
//! type's descriptor. A type holding a string, collection, pointer or
//! reference anywhere in its layout panics before any memory is reserved.
//!
//! # Sharing
//!
//! `Arena` is single-threaded. [`SyncArena`] wraps it in a mutex so that
//! concurrent allocators always receive disjoint regions.
//!
//! # Unsafe code
//!
//! Chunk memory is raw heap storage. Unsafe code is confined to `raw.rs`,
//! `chunk.rs` and the two modules that turn placements into references.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
mod chunk;
pub mod config;
pub mod error;
pub mod handle;
mod raw;
pub mod stats;
pub mod sync;

// Public re-exports for the primary API surface.
pub use arena::{Arena, DEFAULT_ALIGN};
pub use bumpyard_core::{describe_struct, Describe, Pod};
pub use chunk::CHUNK_ALIGN;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::{RegionHandle, TypedHandle};
pub use stats::ArenaStats;
pub use sync::SyncArena;
