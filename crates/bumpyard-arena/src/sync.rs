//! A mutex-serialized arena for sharing between threads.
//!
//! [`SyncArena`] places every request under one lock, so concurrent callers
//! always receive disjoint regions. The lock covers only the cursor update;
//! the caller writes into its region after the lock is released.

#![allow(unsafe_code)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use bumpyard_core::Pod;

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{RegionHandle, TypedHandle};
use crate::raw;
use crate::stats::ArenaStats;

/// An [`Arena`] that can be shared by reference across threads.
///
/// Allocation takes `&self`. Reset and Release take `&mut self`, which a
/// shared `Arc<SyncArena>` cannot provide until every other owner is gone,
/// so no borrowed region outlives its epoch.
///
/// ```
/// use std::thread;
/// use bumpyard_arena::{ArenaConfig, SyncArena};
///
/// let arena = SyncArena::new(ArenaConfig::default()).unwrap();
/// thread::scope(|s| {
///     for i in 0..4u8 {
///         let arena = &arena;
///         s.spawn(move || arena.alloc(64).unwrap().fill(i));
///     }
/// });
/// assert_eq!(arena.stats().used, 256);
/// ```
pub struct SyncArena {
    inner: Mutex<Arena>,
}

// Compile-time assertion: SyncArena must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SyncArena>();
};

impl SyncArena {
    /// Create a shared arena. See [`Arena::new`].
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        Ok(Self::from(Arena::new(config)?))
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> ArenaConfig {
        self.lock().config().clone()
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch()
    }

    /// Whether the arena was released.
    pub fn is_closed(&self) -> bool {
        self.lock().is_closed()
    }

    /// Allocate `size` bytes aligned to [`DEFAULT_ALIGN`](crate::DEFAULT_ALIGN).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc(&self, size: usize) -> Result<&mut [u8], ArenaError> {
        self.alloc_aligned(size, crate::DEFAULT_ALIGN)
    }

    /// Allocate `size` bytes aligned to `align`. See [`Arena::alloc_aligned`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_aligned(&self, size: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        let placement = self.lock().place(size, align)?;
        // SAFETY: the placement was reserved under the lock for this caller
        // alone. Chunks never move and are only freed by Reset/Release,
        // which need `&mut self`.
        Ok(unsafe { raw::bytes_mut(placement.ptr, placement.len) })
    }

    /// Allocate a copy of `bytes`, unaligned.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_copy(&self, bytes: &[u8]) -> Result<&mut [u8], ArenaError> {
        let region = self.alloc_aligned(bytes.len(), 1)?;
        region.copy_from_slice(bytes);
        Ok(region)
    }

    /// Allocate one `T`. See [`Arena::alloc_typed`].
    ///
    /// # Panics
    ///
    /// Panics if `T` carries indirection.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_typed<T: Pod>(&self) -> Result<&mut T, ArenaError> {
        let placement = self.lock().place_typed::<T>()?;
        // SAFETY: as `alloc_aligned`; `place_typed` sized and aligned the
        // slot for `T`, and `T: Pod` accepts any bit pattern.
        Ok(unsafe { raw::typed_mut(placement.ptr) })
    }

    /// Allocate one `T` and move `value` in.
    ///
    /// # Panics
    ///
    /// Panics if `T` carries indirection.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_value<T: Pod>(&self, value: T) -> Result<&mut T, ArenaError> {
        let slot = self.alloc_typed::<T>()?;
        *slot = value;
        Ok(slot)
    }

    /// Allocate and return a handle. See [`Arena::alloc_handle`].
    pub fn alloc_handle(&self, size: usize, align: usize) -> Result<RegionHandle, ArenaError> {
        self.lock().alloc_handle(size, align)
    }

    /// Allocate one `T` and return a handle.
    ///
    /// # Panics
    ///
    /// Panics if `T` carries indirection.
    pub fn alloc_typed_handle<T: Pod>(&self) -> Result<TypedHandle<T>, ArenaError> {
        self.lock().alloc_typed_handle::<T>()
    }

    /// Copy the bytes behind `handle` out of the arena.
    ///
    /// Returns an owned buffer because the lock is released on return.
    pub fn read(&self, handle: RegionHandle) -> Result<Vec<u8>, ArenaError> {
        Ok(self.lock().region(handle)?.to_vec())
    }

    /// Borrow the bytes behind `handle`. Needs exclusive access.
    pub fn region_mut(&mut self, handle: RegionHandle) -> Result<&mut [u8], ArenaError> {
        self.arena_mut().region_mut(handle)
    }

    /// Copy the value behind `handle` out of the arena.
    pub fn get<T: Pod>(&self, handle: TypedHandle<T>) -> Result<T, ArenaError> {
        self.lock().get(handle).copied()
    }

    /// Mutably borrow the value behind `handle`. Needs exclusive access.
    pub fn get_mut<T: Pod>(&mut self, handle: TypedHandle<T>) -> Result<&mut T, ArenaError> {
        self.arena_mut().get_mut(handle)
    }

    /// Reset the arena. See [`Arena::reset`].
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        self.arena_mut().reset()
    }

    /// Release the arena. See [`Arena::release`].
    pub fn release(&mut self) {
        self.arena_mut().release();
    }

    /// Current usage.
    pub fn stats(&self) -> ArenaStats {
        self.lock().stats()
    }

    /// Unwrap into the single-threaded arena.
    pub fn into_inner(self) -> Arena {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A panic while holding the lock (the indirection gate) leaves the arena
    // consistent: the gate runs before any state changes.
    fn lock(&self) -> MutexGuard<'_, Arena> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arena_mut(&mut self) -> &mut Arena {
        self.inner.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Arena> for SyncArena {
    fn from(arena: Arena) -> Self {
        Self {
            inner: Mutex::new(arena),
        }
    }
}

impl std::fmt::Debug for SyncArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncArena")
            .field("inner", &*self.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    fn shared(chunk_size: usize) -> SyncArena {
        SyncArena::new(ArenaConfig::new().with_chunk_size(chunk_size)).unwrap()
    }

    #[test]
    fn concurrent_regions_are_disjoint() {
        let arena = shared(1024);
        let spans: Vec<(usize, usize)> = thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    let arena = &arena;
                    s.spawn(move || {
                        (0..50)
                            .map(|_| {
                                let r = arena.alloc_aligned(24, 8).unwrap();
                                let start = r.as_ptr() as usize;
                                (start, start + r.len())
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|w| w.join().unwrap())
                .collect()
        });
        let mut sorted = spans;
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
        assert_eq!(sorted.len(), 400);
    }

    #[test]
    fn concurrent_writes_do_not_interfere() {
        let arena = Arc::new(shared(256));
        let handles: Vec<_> = (0..4u8)
            .map(|tag| {
                let arena = Arc::clone(&arena);
                thread::spawn(move || {
                    let h = arena.alloc_handle(32, 8).unwrap();
                    (tag, h)
                })
            })
            .collect();
        let issued: Vec<_> = handles.into_iter().map(|j| j.join().unwrap()).collect();
        let mut arena = Arc::into_inner(arena).unwrap();
        for (tag, h) in issued {
            arena.region_mut(h).unwrap().fill(tag);
            assert!(arena.read(h).unwrap().iter().all(|&b| b == tag));
        }
    }

    #[test]
    fn reset_through_exclusive_access() {
        let mut arena = shared(64);
        let h = arena.alloc_typed_handle::<u64>().unwrap();
        *arena.get_mut(h).unwrap() = 9;
        assert_eq!(arena.get(h).unwrap(), 9);
        arena.reset().unwrap();
        assert_eq!(arena.epoch(), 1);
        assert!(matches!(
            arena.get(h).unwrap_err(),
            ArenaError::StaleHandle { .. }
        ));
    }

    #[test]
    fn release_closes_shared_arena() {
        let mut arena = shared(64);
        arena.release();
        assert!(arena.is_closed());
        assert_eq!(arena.alloc(8).unwrap_err(), ArenaError::Closed);
    }

    #[test]
    fn survives_gate_panic() {
        #[derive(Clone, Copy)]
        #[allow(dead_code)]
        struct Tagged {
            tag: &'static str,
        }
        bumpyard_core::describe_struct!(Tagged { tag: &'static str });
        // SAFETY: deliberately wrong; the gate must refuse it.
        unsafe impl Pod for Tagged {}

        let arena = shared(64);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _ = arena.alloc_typed::<Tagged>();
        }));
        assert!(result.is_err());
        assert_eq!(arena.alloc_value(5u32).map(|v| *v), Ok(5));
        assert_eq!(arena.stats().used, 4);
    }

    #[test]
    fn into_inner_keeps_state() {
        let arena = shared(64);
        arena.alloc(10).unwrap();
        let inner = arena.into_inner();
        assert_eq!(inner.stats().used, 10);
    }
}
