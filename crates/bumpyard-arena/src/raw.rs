//! Low-level primitives for arena memory operations.
//!
//! Every dereference of chunk memory in this crate goes through one of
//! these functions. Callers uphold the contracts; each call site carries a
//! `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ptr::NonNull;

/// Fill `len` bytes at `ptr` with zero.
///
/// # Safety
///
/// `ptr..ptr + len` must be inside one live chunk and must not overlap any
/// reference handed out to a caller.
pub(crate) unsafe fn zero(ptr: NonNull<u8>, len: usize) {
    // SAFETY: forwarded from the caller.
    unsafe { ptr.as_ptr().write_bytes(0, len) }
}

/// Reborrow `len` bytes at `ptr` as a shared slice.
///
/// # Safety
///
/// `ptr..ptr + len` must be inside one live chunk (or `len == 0` with a
/// dangling `ptr`), and no mutable reference to it may exist for `'a`.
pub(crate) unsafe fn bytes<'a>(ptr: NonNull<u8>, len: usize) -> &'a [u8] {
    // SAFETY: forwarded from the caller; chunk memory is always initialised.
    unsafe { std::slice::from_raw_parts(ptr.as_ptr(), len) }
}

/// Reborrow `len` bytes at `ptr` as an exclusive slice.
///
/// # Safety
///
/// As [`bytes`], and no other reference to the range may exist for `'a`.
pub(crate) unsafe fn bytes_mut<'a>(ptr: NonNull<u8>, len: usize) -> &'a mut [u8] {
    // SAFETY: forwarded from the caller; chunk memory is always initialised.
    unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) }
}

/// Reinterpret the bytes at `ptr` as a shared `T`.
///
/// # Safety
///
/// `ptr` must be aligned for `T` and point to `max(size_of::<T>(), 1)`
/// bytes of one live chunk; `T` must accept any bit pattern; no mutable
/// reference to the range may exist for `'a`.
pub(crate) unsafe fn typed<'a, T>(ptr: NonNull<u8>) -> &'a T {
    // SAFETY: forwarded from the caller.
    unsafe { ptr.cast::<T>().as_ref() }
}

/// Reinterpret the bytes at `ptr` as an exclusive `T`.
///
/// # Safety
///
/// As [`typed`], and no other reference to the range may exist for `'a`.
pub(crate) unsafe fn typed_mut<'a, T>(ptr: NonNull<u8>) -> &'a mut T {
    // SAFETY: forwarded from the caller.
    unsafe { ptr.cast::<T>().as_mut() }
}
