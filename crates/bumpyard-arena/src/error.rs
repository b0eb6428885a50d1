//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// Typed allocation of a type that carries indirection is not an error
/// variant: it panics, because no caller can recover a safe handle from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena was released and has no backing storage.
    Closed,
    /// The configuration cannot be used to build an arena.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
    /// A request is too large to describe as an allocation layout.
    CapacityOverflow {
        /// Number of bytes requested.
        requested: usize,
        /// Alignment requested, after coercion.
        align: usize,
    },
    /// A handle from an epoch that ended with a Reset or Release.
    StaleHandle {
        /// The epoch encoded in the handle.
        handle_epoch: u64,
        /// The arena's current epoch.
        current_epoch: u64,
    },
    /// A handle that does not describe a region of this arena.
    InvalidHandle {
        /// Description of the mismatch.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "arena is closed"),
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::CapacityOverflow { requested, align } => {
                write!(
                    f,
                    "allocation of {requested} bytes aligned to {align} overflows the address space"
                )
            }
            Self::StaleHandle {
                handle_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale handle: epoch {handle_epoch}, current epoch {current_epoch}"
                )
            }
            Self::InvalidHandle { reason } => write!(f, "invalid handle: {reason}"),
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_epochs() {
        let err = ArenaError::StaleHandle {
            handle_epoch: 2,
            current_epoch: 5,
        };
        assert_eq!(err.to_string(), "stale handle: epoch 2, current epoch 5");
    }

    #[test]
    fn closed_display() {
        assert_eq!(ArenaError::Closed.to_string(), "arena is closed");
    }
}
