//! The [`Pod`] marker trait.

#![allow(unsafe_code)]

use crate::desc::Describe;

/// Plain-old-data types that may be placed in arena memory by value.
///
/// `Copy` rules out every owning container and every type with a
/// destructor at compile time. The arena never runs destructors, and a
/// `Copy` type has none to run.
///
/// Typed allocation also runs the runtime gate over
/// [`Describe::describe`]. `Copy` types can still carry indirection
/// (`&'static str`, raw pointers, fn pointers), and those are rejected
/// there.
///
/// # Safety
///
/// Implementors must guarantee that:
///
/// - every bit pattern of `size_of::<Self>()` bytes is a valid `Self`
///   (this excludes `bool`, `char`, enums and references);
/// - the type has no padding bytes (use `#[repr(C)]` and order fields so
///   that none is inserted);
/// - the type has no interior mutability;
/// - the [`Describe`] implementation lists every field with its real type.
///
/// # Example
///
/// ```
/// use bumpyard_core::{describe_struct, Pod};
///
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Sample {
///     t: f64,
///     value: f64,
/// }
/// describe_struct!(Sample { t: f64, value: f64 });
///
/// // SAFETY: two f64 fields, no padding, any bit pattern is valid.
/// unsafe impl Pod for Sample {}
/// ```
pub unsafe trait Pod: Copy + Describe {}

macro_rules! pod_primitives {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: primitive integers and floats accept every bit pattern
            // and have no padding.
            unsafe impl Pod for $t {}
        )*
    };
}

pod_primitives!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

// SAFETY: zero-sized; there are no bits to be invalid.
unsafe impl Pod for () {}

// SAFETY: arrays have no padding between elements and inherit validity
// from `T`.
unsafe impl<T: Pod, const N: usize> Pod for [T; N] {}
