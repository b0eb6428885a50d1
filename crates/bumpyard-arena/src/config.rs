//! Arena configuration parameters.

use std::alloc::Layout;

use crate::chunk::CHUNK_ALIGN;
use crate::error::ArenaError;

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity in bytes of the initial chunk and of every chunk grown for
    /// a request that fits in it.
    ///
    /// Default: 1 MiB. Must be non-zero. Larger requests get a dedicated
    /// chunk of `size + align` bytes instead.
    pub chunk_size: usize,

    /// Whether bytes are zeroed before they are handed out, and whether
    /// Reset scrubs the consumed part of the first chunk.
    ///
    /// Default: `true`.
    pub zero_on_alloc: bool,
}

impl ArenaConfig {
    /// Default chunk size: 1 MiB.
    pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

    /// Default zero policy.
    pub const DEFAULT_ZERO_ON_ALLOC: bool = true;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            zero_on_alloc: Self::DEFAULT_ZERO_ON_ALLOC,
        }
    }

    /// Set the chunk size in bytes.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the zero policy.
    #[must_use]
    pub fn with_zero_on_alloc(mut self, zero_on_alloc: bool) -> Self {
        self.zero_on_alloc = zero_on_alloc;
        self
    }

    /// Check that the config describes a chunk the system can allocate.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.chunk_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk_size must be non-zero".to_string(),
            });
        }
        if Layout::from_size_align(self.chunk_size, CHUNK_ALIGN).is_err() {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "chunk_size {} exceeds the largest allocatable size",
                    self.chunk_size
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
