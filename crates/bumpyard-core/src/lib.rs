//! Type descriptors and the structural safety gate for bumpyard arenas.
//!
//! This is the leaf crate with zero internal dependencies. It answers one
//! question for the arena: may a value of type `T` live inside untraced
//! arena memory?
//!
//! Two layers answer it:
//!
//! - [`Pod`] is the compile-time constraint. It requires `Copy` (so no
//!   owning container and no destructor can ever be placed in an arena) and
//!   is an `unsafe` promise that every bit pattern is a valid `T`.
//! - [`gate`] is the runtime structural walk over the [`TypeDesc`] a type
//!   reports through [`Describe`]. It rejects any reference, pointer,
//!   sequence, map, channel, function, trait object or text handle at any
//!   nesting depth, which catches `Copy` indirection (`&'static str`, raw
//!   pointers, fn pointers) and wrong `unsafe impl Pod` blocks.
//!
//! ```
//! use bumpyard_core::{describe_struct, gate, Describe};
//!
//! #[derive(Clone, Copy)]
//! #[repr(C)]
//! struct Rgb {
//!     r: f32,
//!     g: f32,
//!     b: f32,
//! }
//! describe_struct!(Rgb { r: f32, g: f32, b: f32 });
//!
//! #[derive(Clone, Copy)]
//! struct Named {
//!     id: u64,
//!     name: &'static str,
//! }
//! describe_struct!(Named { id: u64, name: &'static str });
//!
//! assert!(gate::is_indirection_free(&Rgb::describe()));
//! assert!(!gate::is_indirection_free(&Named::describe()));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod desc;
pub mod gate;
mod macros;
pub mod pod;

pub use desc::{Describe, FieldDesc, Indirection, TypeDesc, TypeKind};
pub use gate::{find_indirection, is_indirection_free, IndirectionReport};
pub use pod::Pod;
