//! Epoch-tagged region handles.
//!
//! A [`RegionHandle`] records where an allocation lives instead of
//! borrowing it, so it can be stored in structures that outlive a borrow of
//! the arena. It carries the arena's identity and the epoch it was issued
//! in; resolving it after a Reset or Release fails with
//! [`ArenaError::StaleHandle`](crate::ArenaError::StaleHandle) instead of
//! reading reused memory.

use std::fmt;
use std::marker::PhantomData;

/// Location of a byte region within an arena, valid for one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct RegionHandle {
    /// Identity of the issuing arena.
    pub(crate) arena: u64,
    /// Arena epoch when this region was allocated.
    pub(crate) epoch: u64,
    /// Index of the chunk holding the region.
    pub(crate) chunk: usize,
    /// Byte offset within the chunk.
    pub(crate) offset: usize,
    /// Length in bytes.
    pub(crate) len: usize,
}

impl RegionHandle {
    pub(crate) fn new(arena: u64, epoch: u64, chunk: usize, offset: usize, len: usize) -> Self {
        Self {
            arena,
            epoch,
            chunk,
            offset,
            len,
        }
    }

    /// The epoch this handle belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Index of the chunk holding the region.
    pub fn chunk_index(&self) -> usize {
        self.chunk
    }

    /// Byte offset of the region within its chunk.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for RegionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RegionHandle(epoch={}, chunk={}, off={}, len={})",
            self.epoch, self.chunk, self.offset, self.len
        )
    }
}

/// A [`RegionHandle`] sized and aligned for one `T`.
#[must_use]
pub struct TypedHandle<T> {
    region: RegionHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    pub(crate) fn new(region: RegionHandle) -> Self {
        Self {
            region,
            _marker: PhantomData,
        }
    }

    /// The untyped region backing this handle.
    pub fn region(&self) -> RegionHandle {
        self.region
    }

    /// The epoch this handle belongs to.
    pub fn epoch(&self) -> u64 {
        self.region.epoch
    }
}

impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.region == other.region
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedHandle")
            .field("type", &std::any::type_name::<T>())
            .field("region", &self.region)
            .finish()
    }
}
