//! Arena usage statistics.

use std::fmt;

/// Snapshot of an arena's memory usage, recomputed on every call to
/// [`Arena::stats`](crate::Arena::stats).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Bytes consumed: every chunk but the last in full, plus the cursor
    /// offset in the last chunk. Alignment padding counts as used.
    pub used: usize,
    /// Sum of the capacities of every chunk currently owned.
    pub capacity: usize,
    /// Number of chunks currently owned.
    pub chunk_count: usize,
}

impl ArenaStats {
    /// Bytes owned but not yet consumed.
    pub fn free(&self) -> usize {
        self.capacity - self.used
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} bytes used across {} chunks",
            self.used, self.capacity, self.chunk_count
        )
    }
}
