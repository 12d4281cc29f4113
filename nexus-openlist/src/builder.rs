//! Builder for [`OpenList`].

use crate::buffer::SlotBuffer;
use crate::{Allocator, Error, GraphNode, Index, OpenList};

/// Configures and allocates an [`OpenList`].
///
/// Capacity and allocator are required. Everything else defaults off.
///
/// # Example
///
/// ```
/// use nexus_openlist::{Allocator, OpenList, OpenListBuilder};
///
/// let list: OpenList<u32> = OpenListBuilder::default()
///     .capacity(256)
///     .allocator(Allocator::Task)
///     .zeroed(true)
///     .build()?;
///
/// assert_eq!(list.capacity(), 256);
/// assert!(!list.has_next());
/// # Ok::<(), nexus_openlist::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct OpenListBuilder {
    capacity: Option<usize>,
    allocator: Allocator,
    zeroed: bool,
    mlock: bool,
}

impl OpenListBuilder {
    /// Number of slots. Fixed for the life of the list.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = Some(slots);
        self
    }

    /// Allocation strategy. Required; [`Allocator::Unset`] is rejected.
    pub fn allocator(mut self, allocator: Allocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Initialize every slot to [`GraphNode::default`] so the whole
    /// capacity is readable through [`OpenList::get`]. Default: false.
    pub fn zeroed(mut self, enabled: bool) -> Self {
        self.zeroed = enabled;
        self
    }

    /// Lock the buffer in physical memory. Only honoured by
    /// [`Allocator::Persistent`]. Default: false.
    pub fn mlock(mut self, enabled: bool) -> Self {
        self.mlock = enabled;
        self
    }

    /// Allocates the list.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityUnset`] if no capacity was given
    /// - [`Error::InvalidAllocator`] for [`Allocator::Unset`]
    /// - [`Error::CapacityExceedsIndex`] if `Idx` cannot address every slot
    /// - [`Error::SizeOverflow`] if the byte size overflows
    /// - [`Error::AllocationFailed`] / [`Error::MlockFailed`] from the allocator
    pub fn build<I, Idx>(self) -> Result<OpenList<I, Idx>, Error>
    where
        I: Copy + Default,
        Idx: Index,
    {
        let capacity = self.capacity.ok_or(Error::CapacityUnset)?;

        if !self.allocator.is_valid() {
            return Err(Error::InvalidAllocator(self.allocator));
        }

        if capacity > Idx::MAX_SLOTS {
            return Err(Error::CapacityExceedsIndex {
                capacity,
                max: Idx::MAX_SLOTS,
            });
        }

        let mlock = self.mlock && self.allocator.uses_pages();
        let mut buffer = SlotBuffer::<GraphNode<I, Idx>>::allocate(capacity, self.allocator, mlock)?;

        if self.zeroed {
            for i in 0..capacity {
                // Safety: i < capacity
                unsafe { buffer.write(i, GraphNode::default()) };
            }
        }

        tracing::debug!(
            capacity,
            allocator = %self.allocator,
            bytes = buffer.bytes(),
            zeroed = self.zeroed,
            mlock,
            "open list allocated"
        );

        Ok(OpenList::from_buffer(buffer, self.allocator, self.zeroed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_required() {
        let result = OpenListBuilder::default()
            .allocator(Allocator::Task)
            .build::<u32, i32>();
        assert_eq!(result.err(), Some(Error::CapacityUnset));
    }

    #[test]
    fn allocator_required() {
        let result = OpenListBuilder::default().capacity(8).build::<u32, i32>();
        assert_eq!(result.err(), Some(Error::InvalidAllocator(Allocator::Unset)));
    }

    #[test]
    fn capacity_checked_against_index() {
        let result = OpenListBuilder::default()
            .capacity(i16::MAX as usize + 1)
            .allocator(Allocator::Scratch)
            .build::<u32, i16>();
        assert_eq!(
            result.err(),
            Some(Error::CapacityExceedsIndex {
                capacity: i16::MAX as usize + 1,
                max: i16::MAX as usize,
            })
        );
    }

    #[test]
    fn size_overflow_before_allocation() {
        let result = OpenListBuilder::default()
            .capacity(usize::MAX / 2)
            .allocator(Allocator::Task)
            .build::<u64, i64>();
        assert!(matches!(result, Err(Error::SizeOverflow { .. })));
    }

    #[test]
    fn zeroed_list_is_fully_readable() {
        let list: OpenList<u32> = OpenListBuilder::default()
            .capacity(4)
            .allocator(Allocator::Persistent)
            .zeroed(true)
            .build()
            .unwrap();
        assert!(list.is_zeroed());
        assert_eq!(list.get(3).unwrap(), &GraphNode::default());
    }

    #[test]
    fn mlock_ignored_for_heap_strategies() {
        let list: OpenList<u32> = OpenListBuilder::default()
            .capacity(4)
            .allocator(Allocator::Scratch)
            .mlock(true)
            .build()
            .unwrap();
        assert_eq!(list.allocator(), Allocator::Scratch);
    }
}
