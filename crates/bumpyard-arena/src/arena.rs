//! The bump arena: aligned sequential allocation over a growing chunk list.
//!
//! [`Arena`] owns an append-only list of [`Chunk`]s and a cursor into the
//! last one. Every request is served from the last chunk if it fits there;
//! otherwise a new chunk is appended and the request is served from it.
//! Earlier chunks are never revisited.
//!
//! The lifecycle is:
//! 1. [`Arena::new`] allocates the first chunk.
//! 2. `alloc*` calls borrow regions from `&self`.
//! 3. [`Arena::reset`] (or [`Arena::release`]) takes `&mut self`, so it can
//!    only run once every borrowed region is gone. Each one starts a new
//!    epoch, which also invalidates stored [`RegionHandle`]s.

#![allow(unsafe_code)]

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem::{align_of, size_of};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

use bumpyard_core::{gate, Describe, Pod};
use indexmap::IndexSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::chunk::Chunk;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{RegionHandle, TypedHandle};
use crate::raw;
use crate::stats::ArenaStats;

/// Alignment used by [`Arena::alloc`], and the fallback for alignment
/// requests that are zero or not a power of two.
pub const DEFAULT_ALIGN: usize = 8;

/// Chunks stored inline before the list spills to the heap.
const INLINE_CHUNKS: usize = 4;

/// Counter for unique arena identities, checked when resolving handles.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Where a request landed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Placement {
    pub(crate) chunk: usize,
    pub(crate) offset: usize,
    pub(crate) len: usize,
    pub(crate) ptr: NonNull<u8>,
}

/// Single-threaded chunked bump allocator.
///
/// `Arena` is `Send` but not `Sync`. Use [`SyncArena`](crate::SyncArena)
/// to share one between threads.
///
/// # Example
///
/// ```
/// use bumpyard_arena::{Arena, ArenaConfig};
///
/// let mut arena = Arena::new(ArenaConfig::default()).unwrap();
/// let a = arena.alloc_aligned(100, 8).unwrap();
/// assert_eq!(a.len(), 100);
/// let b = arena.alloc_aligned(1, 16).unwrap();
/// assert_eq!(b.as_ptr() as usize % 16, 0);
/// assert_eq!(arena.stats().used, 113);
///
/// arena.reset().unwrap();
/// assert_eq!(arena.stats().used, 0);
/// ```
pub struct Arena {
    /// Identity stamped into handles.
    id: u64,
    /// Construction parameters.
    config: ArenaConfig,
    /// Owned chunks in allocation order. Empty once released.
    chunks: RefCell<SmallVec<[Chunk; INLINE_CHUNKS]>>,
    /// Next free byte in the last chunk.
    offset: Cell<usize>,
    /// Incremented by every Reset and Release.
    epoch: u64,
    /// Types that already passed the indirection gate.
    admitted: RefCell<IndexSet<TypeId>>,
}

impl Arena {
    /// Create an arena and allocate its first chunk.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` if `config` fails
    /// [`ArenaConfig::validate`].
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let first = new_chunk(config.chunk_size)?;
        let mut chunks = SmallVec::new();
        chunks.push(first);
        debug!(
            chunk_size = config.chunk_size,
            zero_on_alloc = config.zero_on_alloc,
            "arena created"
        );
        Ok(Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            config,
            chunks: RefCell::new(chunks),
            offset: Cell::new(0),
            epoch: 0,
            admitted: RefCell::new(IndexSet::new()),
        })
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Current epoch. Starts at 0; every Reset and Release increments it.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether [`release`](Arena::release) left the arena without storage.
    pub fn is_closed(&self) -> bool {
        self.chunks.borrow().is_empty()
    }

    // ── Raw allocation ──────────────────────────────────────────────

    /// Allocate `size` bytes aligned to [`DEFAULT_ALIGN`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc(&self, size: usize) -> Result<&mut [u8], ArenaError> {
        self.alloc_aligned(size, DEFAULT_ALIGN)
    }

    /// Allocate `size` bytes whose address is a multiple of `align`.
    ///
    /// - `size == 0` returns an empty slice and does not move the cursor.
    /// - An `align` that is zero or not a power of two is replaced by
    ///   [`DEFAULT_ALIGN`].
    /// - With `zero_on_alloc`, the returned bytes are zero.
    ///
    /// Returns `Err(ArenaError::Closed)` after [`release`](Arena::release),
    /// and `Err(ArenaError::CapacityOverflow)` if no chunk could ever hold
    /// the request.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_aligned(&self, size: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        let placement = self.place(size, align)?;
        // SAFETY: `place` reserved this range for the caller alone. It stays
        // allocated until Reset/Release, which need `&mut self` and so cannot
        // run while the returned borrow of `self` is alive.
        Ok(unsafe { raw::bytes_mut(placement.ptr, placement.len) })
    }

    /// Allocate a copy of `bytes`, unaligned.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_copy(&self, bytes: &[u8]) -> Result<&mut [u8], ArenaError> {
        let region = self.alloc_aligned(bytes.len(), 1)?;
        region.copy_from_slice(bytes);
        Ok(region)
    }

    // ── Typed allocation ────────────────────────────────────────────

    /// Allocate space for one `T` and return it as `&mut T`.
    ///
    /// The value is whatever the underlying bytes hold: zero with
    /// `zero_on_alloc`, otherwise possibly stale. Zero-sized types take a
    /// one-byte placeholder so the reference has a unique address.
    ///
    /// # Panics
    ///
    /// Panics if `T`'s descriptor contains any indirection. This happens
    /// before any memory is reserved.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_typed<T: Pod>(&self) -> Result<&mut T, ArenaError> {
        let placement = self.place_typed::<T>()?;
        // SAFETY: the placement is exclusive, aligned for `T` and at least
        // `size_of::<T>()` bytes of initialised chunk memory; `T: Pod`
        // accepts any bit pattern. Lifetime as in `alloc_aligned`.
        Ok(unsafe { raw::typed_mut(placement.ptr) })
    }

    /// Allocate space for `value` and move it in.
    ///
    /// # Panics
    ///
    /// As [`alloc_typed`](Arena::alloc_typed).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_value<T: Pod>(&self, value: T) -> Result<&mut T, ArenaError> {
        let slot = self.alloc_typed::<T>()?;
        *slot = value;
        Ok(slot)
    }

    // ── Handles ─────────────────────────────────────────────────────

    /// Allocate like [`alloc_aligned`](Arena::alloc_aligned) but return a
    /// handle instead of a borrow.
    pub fn alloc_handle(&self, size: usize, align: usize) -> Result<RegionHandle, ArenaError> {
        let placement = self.place(size, align)?;
        Ok(self.handle_for(&placement))
    }

    /// Allocate like [`alloc_typed`](Arena::alloc_typed) but return a handle.
    ///
    /// # Panics
    ///
    /// As [`alloc_typed`](Arena::alloc_typed).
    pub fn alloc_typed_handle<T: Pod>(&self) -> Result<TypedHandle<T>, ArenaError> {
        let placement = self.place_typed::<T>()?;
        Ok(TypedHandle::new(self.handle_for(&placement)))
    }

    /// Borrow the bytes behind `handle`.
    pub fn region(&self, handle: RegionHandle) -> Result<&[u8], ArenaError> {
        let ptr = self.resolve(&handle)?;
        // SAFETY: `resolve` checked identity, epoch and bounds. Handle
        // regions are never also handed out as `&mut` borrows from `&self`,
        // and `region_mut` needs `&mut self`.
        Ok(unsafe { raw::bytes(ptr, handle.len) })
    }

    /// Mutably borrow the bytes behind `handle`.
    pub fn region_mut(&mut self, handle: RegionHandle) -> Result<&mut [u8], ArenaError> {
        let ptr = self.resolve(&handle)?;
        // SAFETY: as `region`, and `&mut self` excludes every other borrow.
        Ok(unsafe { raw::bytes_mut(ptr, handle.len) })
    }

    /// Borrow the value behind `handle`.
    pub fn get<T: Pod>(&self, handle: TypedHandle<T>) -> Result<&T, ArenaError> {
        let ptr = self.resolve(&handle.region())?;
        // SAFETY: the handle was issued by `alloc_typed_handle::<T>` of this
        // arena in this epoch, so the range is aligned and sized for `T`.
        Ok(unsafe { raw::typed(ptr) })
    }

    /// Mutably borrow the value behind `handle`.
    pub fn get_mut<T: Pod>(&mut self, handle: TypedHandle<T>) -> Result<&mut T, ArenaError> {
        let ptr = self.resolve(&handle.region())?;
        // SAFETY: as `get`, and `&mut self` excludes every other borrow.
        Ok(unsafe { raw::typed_mut(ptr) })
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Rewind the arena to its first chunk and start a new epoch.
    ///
    /// With `zero_on_alloc`, the consumed part of the first chunk is zeroed.
    /// Every chunk after the first is freed. On a closed arena, a fresh
    /// first chunk is allocated and the arena reopens.
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        self.epoch = self.epoch.wrapping_add(1);
        let offset = self.offset.replace(0);
        let chunks = self.chunks.get_mut();

        if chunks.is_empty() {
            chunks.push(new_chunk(self.config.chunk_size)?);
            debug!(epoch = self.epoch, "closed arena reopened by reset");
            return Ok(());
        }

        if self.config.zero_on_alloc {
            // Earlier chunks count as fully consumed, so when the cursor has
            // moved on the whole first chunk is dirty.
            let consumed = if chunks.len() == 1 {
                offset
            } else {
                chunks[0].capacity()
            };
            if consumed > 0 {
                chunks[0].zero_prefix(consumed);
            }
        }

        let dropped = chunks.len() - 1;
        chunks.truncate(1);
        debug!(epoch = self.epoch, dropped_chunks = dropped, "arena reset");
        Ok(())
    }

    /// Free every chunk and close the arena.
    ///
    /// Allocation on a closed arena returns `Err(ArenaError::Closed)`
    /// until [`reset`](Arena::reset) reopens it.
    pub fn release(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.offset.set(0);
        let chunks = self.chunks.get_mut();
        let released_bytes: usize = chunks.iter().map(Chunk::capacity).sum();
        *chunks = SmallVec::new();
        debug!(epoch = self.epoch, released_bytes, "arena released");
    }

    // ── Introspection ───────────────────────────────────────────────

    /// Compute current usage. O(number of chunks).
    pub fn stats(&self) -> ArenaStats {
        let chunks = self.chunks.borrow();
        let Some((last, earlier)) = chunks.split_last() else {
            return ArenaStats::default();
        };
        let full: usize = earlier.iter().map(Chunk::capacity).sum();
        ArenaStats {
            used: full + self.offset.get(),
            capacity: full + last.capacity(),
            chunk_count: chunks.len(),
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Reserve `size` bytes aligned to `align`, growing if needed.
    pub(crate) fn place(&self, size: usize, align: usize) -> Result<Placement, ArenaError> {
        let mut chunks = self.chunks.borrow_mut();
        let last = chunks.len().checked_sub(1).ok_or(ArenaError::Closed)?;
        let offset = self.offset.get();

        if size == 0 {
            return Ok(Placement {
                chunk: last,
                offset,
                len: 0,
                ptr: NonNull::dangling(),
            });
        }

        let align = coerce_align(align);

        if let Some(start) = chunks[last].fit(offset, size, align) {
            let ptr = chunks[last].ptr_at(start);
            if self.config.zero_on_alloc {
                // SAFETY: `fit` kept the range inside the last chunk, and it
                // lies past the cursor, so nothing borrowed overlaps it.
                unsafe { raw::zero(ptr, size) };
            }
            self.offset.set(start + size);
            return Ok(Placement {
                chunk: last,
                offset: start,
                len: size,
                ptr,
            });
        }

        // Fresh chunks come from `alloc_zeroed`, so no zeroing below.
        let overflow = || ArenaError::CapacityOverflow {
            requested: size,
            align,
        };
        let capacity = size
            .checked_add(align)
            .ok_or_else(overflow)?
            .max(self.config.chunk_size);
        let chunk = Chunk::new(capacity).ok_or_else(overflow)?;
        let start = chunk.fit(0, size, align).ok_or_else(overflow)?;
        let ptr = chunk.ptr_at(start);
        chunks.push(chunk);
        let index = chunks.len() - 1;
        self.offset.set(start + size);
        debug!(
            chunk = index,
            capacity,
            requested = size,
            align,
            "arena grew a new chunk"
        );
        Ok(Placement {
            chunk: index,
            offset: start,
            len: size,
            ptr,
        })
    }

    /// Run the gate for `T`, then reserve a slot for it.
    pub(crate) fn place_typed<T: Pod>(&self) -> Result<Placement, ArenaError> {
        self.admit::<T>();
        self.place(size_of::<T>().max(1), align_of::<T>())
    }

    /// Panic unless `T` is indirection-free. Verdicts are cached per arena.
    fn admit<T: Describe>(&self) {
        let id = TypeId::of::<T>();
        if self.admitted.borrow().contains(&id) {
            return;
        }
        if let Some(report) = gate::find_indirection(&T::describe()) {
            panic!("typed arena allocation rejected: {report}");
        }
        self.admitted.borrow_mut().insert(id);
    }

    pub(crate) fn handle_for(&self, placement: &Placement) -> RegionHandle {
        RegionHandle::new(
            self.id,
            self.epoch,
            placement.chunk,
            placement.offset,
            placement.len,
        )
    }

    /// Validate `handle` against this arena and return its start address.
    pub(crate) fn resolve(&self, handle: &RegionHandle) -> Result<NonNull<u8>, ArenaError> {
        if handle.arena != self.id {
            return Err(ArenaError::InvalidHandle {
                reason: "handle was issued by a different arena".to_string(),
            });
        }
        if handle.epoch != self.epoch {
            return Err(ArenaError::StaleHandle {
                handle_epoch: handle.epoch,
                current_epoch: self.epoch,
            });
        }
        if handle.len == 0 {
            return Ok(NonNull::dangling());
        }
        let chunks = self.chunks.borrow();
        let chunk = chunks
            .get(handle.chunk)
            .ok_or_else(|| ArenaError::InvalidHandle {
                reason: format!("chunk {} does not exist", handle.chunk),
            })?;
        match handle.offset.checked_add(handle.len) {
            Some(end) if end <= chunk.capacity() => Ok(chunk.ptr_at(handle.offset)),
            _ => Err(ArenaError::InvalidHandle {
                reason: format!("{handle} is out of bounds"),
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn chunk_bytes(&mut self, index: usize) -> Vec<u8> {
        self.chunks.get_mut()[index].as_bytes().to_vec()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("config", &self.config)
            .field("epoch", &self.epoch)
            .field("stats", &self.stats())
            .finish()
    }
}

fn coerce_align(align: usize) -> usize {
    if align.is_power_of_two() {
        align
    } else {
        trace!(requested = align, fallback = DEFAULT_ALIGN, "alignment coerced");
        DEFAULT_ALIGN
    }
}

fn new_chunk(capacity: usize) -> Result<Chunk, ArenaError> {
    Chunk::new(capacity).ok_or_else(|| ArenaError::InvalidConfig {
        reason: format!("cannot allocate a chunk of {capacity} bytes"),
    })
}
