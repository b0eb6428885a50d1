//! Bumpyard: a chunked bump arena for short-lived, pointer-free data.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the bumpyard sub-crates. For most users, adding `bumpyard` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use bumpyard::prelude::*;
//!
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Vertex {
//!     pos: [f32; 3],
//!     uv: [f32; 2],
//! }
//! describe_struct!(Vertex { pos: [f32; 3], uv: [f32; 2] });
//! // SAFETY: repr(C), f32 fields only, no padding.
//! unsafe impl Pod for Vertex {}
//!
//! let mut arena = Arena::new(ArenaConfig::default()).unwrap();
//!
//! // Raw bytes.
//! let scratch = arena.alloc_aligned(256, 16).unwrap();
//! scratch[0] = 1;
//!
//! // A typed value, checked for indirection on first use.
//! let v = arena.alloc_value(Vertex { pos: [0.0, 1.0, 0.0], uv: [0.5, 0.5] }).unwrap();
//! assert_eq!(v.pos[1], 1.0);
//!
//! // A handle survives the borrow but not the epoch.
//! let handle = arena.alloc_typed_handle::<Vertex>().unwrap();
//! arena.reset().unwrap();
//! assert!(matches!(arena.get(handle), Err(ArenaError::StaleHandle { .. })));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `bumpyard-arena` | `Arena`, `SyncArena`, handles, config, stats |
//! | [`types`] | `bumpyard-core` | Type descriptors, the indirection gate, `Pod` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena allocation, lifecycle, and handles (`bumpyard-arena`).
///
/// Most users only need [`arena::Arena`] and [`arena::ArenaConfig`]; both
/// are also available in the [`prelude`].
pub use bumpyard_arena as arena;

/// Type descriptors and the indirection gate (`bumpyard-core`).
///
/// Use [`types::gate::find_indirection`] to check a type ahead of time and
/// get a report naming the offending field.
pub use bumpyard_core as types;

/// Common imports for typical bumpyard usage.
///
/// ```rust
/// use bumpyard::prelude::*;
/// ```
pub mod prelude {
    // Arenas
    pub use bumpyard_arena::{Arena, ArenaConfig, ArenaStats, SyncArena};

    // Handles
    pub use bumpyard_arena::{RegionHandle, TypedHandle};

    // Errors
    pub use bumpyard_arena::ArenaError;

    // Typed allocation
    pub use bumpyard_core::{describe_struct, Describe, Pod};
}
