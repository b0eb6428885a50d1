//! Fixed-capacity backing buffers.
//!
//! A [`Chunk`] is one zero-initialised heap allocation. It is never resized
//! or moved; its base address is stable for its whole life, which is what
//! lets the arena hand out references into it while the chunk list itself
//! grows.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::raw;

/// Alignment of every chunk's base address.
///
/// Requests aligned to at most this value are placed by padding the offset
/// alone; larger alignments pad against the absolute address.
pub const CHUNK_ALIGN: usize = 16;

/// A single contiguous, exclusively owned byte buffer.
pub(crate) struct Chunk {
    ptr: NonNull<u8>,
    capacity: usize,
}

// SAFETY: a chunk owns its allocation outright; moving it to another thread
// moves that ownership.
unsafe impl Send for Chunk {}

impl Chunk {
    /// Allocate a zero-filled chunk of `capacity` bytes.
    ///
    /// Returns `None` if `capacity` is zero or cannot be described as a
    /// layout. Aborts through [`alloc::handle_alloc_error`] if the system
    /// allocator fails.
    pub(crate) fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let layout = Layout::from_size_align(capacity, CHUNK_ALIGN).ok()?;
        // SAFETY: `layout` has non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };
        Some(Self { ptr, capacity })
    }

    /// Total capacity in bytes.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Find where a `size`-byte region aligned to `align` would start if
    /// placed at or after `offset`.
    ///
    /// Returns `None` if it would not end within the chunk. `align` must be
    /// a power of two.
    pub(crate) fn fit(&self, offset: usize, size: usize, align: usize) -> Option<usize> {
        debug_assert!(align.is_power_of_two());
        let cursor = (self.ptr.as_ptr() as usize).checked_add(offset)?;
        let aligned = cursor.checked_add(align - 1)? & !(align - 1);
        let start = offset + (aligned - cursor);
        let end = start.checked_add(size)?;
        (end <= self.capacity).then_some(start)
    }

    /// Pointer to the byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the chunk.
    pub(crate) fn ptr_at(&self, offset: usize) -> NonNull<u8> {
        assert!(
            offset <= self.capacity,
            "offset {offset} beyond chunk capacity {}",
            self.capacity
        );
        // SAFETY: `offset <= capacity` keeps the result inside (or one past)
        // the allocation.
        unsafe { self.ptr.add(offset) }
    }

    /// Zero the first `len` bytes.
    ///
    /// Takes `&mut self`: the arena only calls this while it holds exclusive
    /// access, so no region borrowed from the chunk is alive.
    pub(crate) fn zero_prefix(&mut self, len: usize) {
        let len = len.min(self.capacity);
        // SAFETY: in bounds, and `&mut self` rules out live borrows.
        unsafe { raw::zero(self.ptr, len) }
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        // SAFETY: the whole chunk is initialised; tests only call this while
        // no mutable region is alive.
        unsafe { raw::bytes(self.ptr, self.capacity) }
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // SAFETY: `new` validated this exact layout and allocated `ptr` with it.
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.capacity, CHUNK_ALIGN);
            alloc::dealloc(self.ptr.as_ptr(), layout);
        }
    }
}
