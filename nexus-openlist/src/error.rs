//! Error type shared by every fallible operation.

use crate::Allocator;

/// Errors reported by [`OpenList`](crate::OpenList), its builder and partitions.
///
/// Every variant reflects a caller contract violation or a resource limit.
/// Nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The builder was given [`Allocator::Unset`].
    #[error("invalid allocator: {0}")]
    InvalidAllocator(Allocator),

    /// The builder was never given a capacity.
    #[error("capacity was not set")]
    CapacityUnset,

    /// `capacity * slot_size` does not fit in the platform's address space.
    #[error("buffer size overflows: {capacity} slots of {slot_size} bytes")]
    SizeOverflow {
        /// Requested slot count.
        capacity: usize,
        /// Size of one record in bytes.
        slot_size: usize,
    },

    /// The capacity cannot be addressed by the chosen index type.
    #[error("capacity {capacity} exceeds index type maximum {max}")]
    CapacityExceedsIndex {
        /// Requested slot count.
        capacity: usize,
        /// Largest slot count the index type supports.
        max: usize,
    },

    /// The allocator returned no memory.
    #[error("memory allocation failed")]
    AllocationFailed,

    /// `mlock` was requested and refused (likely `RLIMIT_MEMLOCK`).
    #[error("mlock failed")]
    MlockFailed,

    /// `push` with every slot already written since the last clear.
    #[error("open list is full: all {capacity} slots used since last clear")]
    Full {
        /// Fixed capacity of the list.
        capacity: usize,
    },

    /// Index is negative or not below capacity.
    #[error("index {index} beyond capacity {capacity}")]
    OutOfBounds {
        /// The rejected index.
        index: i128,
        /// Fixed capacity of the list.
        capacity: usize,
    },

    /// Index is within capacity but outside the restricted window.
    #[error("index {index} outside restricted window [{min}, {max}]")]
    OutsideWindow {
        /// The rejected index.
        index: usize,
        /// Lowest accessible slot.
        min: usize,
        /// Highest accessible slot.
        max: usize,
    },

    /// Slot was never written and the buffer was not zero-initialized.
    #[error("slot {index} has not been written")]
    Uninitialized {
        /// The rejected index.
        index: usize,
    },

    /// Window bounds are empty or exceed capacity.
    #[error("invalid window [{min}, {max}] for capacity {capacity}")]
    InvalidWindow {
        /// Requested lowest slot.
        min: usize,
        /// Requested highest slot.
        max: usize,
        /// Fixed capacity of the list.
        capacity: usize,
    },

    /// Partition size of zero.
    #[error("partition chunk size must be non-zero")]
    ZeroChunk,

    /// The buffer has been released.
    #[error("open list used after release")]
    Released,

    /// `pop` or `peek` with no live records.
    #[error("open list is empty")]
    Empty,
}

impl Error {
    /// Returns `true` for both flavours of index-range violation.
    pub fn is_index_range(&self) -> bool {
        matches!(
            self,
            Error::OutOfBounds { .. } | Error::OutsideWindow { .. } | Error::Uninitialized { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_messages_are_distinct() {
        let hard = Error::OutOfBounds {
            index: 8,
            capacity: 8,
        };
        let window = Error::OutsideWindow {
            index: 5,
            min: 0,
            max: 3,
        };
        assert_eq!(hard.to_string(), "index 8 beyond capacity 8");
        assert_eq!(window.to_string(), "index 5 outside restricted window [0, 3]");
        assert!(hard.is_index_range());
        assert!(window.is_index_range());
        assert!(!Error::Empty.is_index_range());
    }

    #[test]
    fn allocator_in_message() {
        let err = Error::InvalidAllocator(Allocator::Unset);
        assert_eq!(err.to_string(), "invalid allocator: unset");
    }
}
