//! Fixed-capacity sorted open list over a single slot buffer.
//!
//! Records are written to consecutive slots and threaded into a singly
//! linked list ordered by `f_cost`. Popping only moves the head; slots are
//! reclaimed all at once by [`OpenList::clear`].

use core::ops::Range;

use crate::buffer::SlotBuffer;
use crate::partition::Partitions;
use crate::{Allocator, Error, GraphNode, Index, OpenListBuilder};

/// A bounded priority queue of search nodes for A*-style open sets.
///
/// One buffer of exactly `capacity` records is allocated at construction
/// and never resized. `push` walks the sorted list to find the insertion
/// point (O(n)), `pop` returns the head in O(1). Ties keep push order.
///
/// # Capacity is consumed by pushes, not by live entries
///
/// [`len`](Self::len) counts slots written since the last clear and never
/// decreases on [`pop`](Self::pop). A list of capacity `N` accepts exactly
/// `N` pushes between clears, however many records were popped in between.
///
/// # Example
///
/// ```
/// use nexus_openlist::{Allocator, GraphNode, OpenList};
///
/// let mut open: OpenList<&str> = OpenList::new(4, Allocator::Task)?;
///
/// open.push(GraphNode::new("a", 6, 4))?;
/// open.push(GraphNode::new("b", 1, 2))?;
/// open.push(GraphNode::new("c", 3, 2))?;
///
/// let mut order = Vec::new();
/// while open.has_next() {
///     order.push(open.pop()?.id);
/// }
/// assert_eq!(order, ["b", "c", "a"]);
///
/// // Pops did not free capacity.
/// assert_eq!(open.len(), 3);
/// open.clear()?;
/// assert_eq!(open.len(), 0);
/// # Ok::<(), nexus_openlist::Error>(())
/// ```
///
/// # Concurrency
///
/// No internal locking. Mutation takes `&mut self`, so there is a single
/// writer at a time. Shared reads through [`get`](Self::get) may run on
/// many threads when `I: Sync`. For partitioned parallel work, split the
/// written slots with [`partitions_mut`](Self::partitions_mut).
pub struct OpenList<I: Copy, Idx: Index = i32> {
    buffer: Option<SlotBuffer<GraphNode<I, Idx>>>,
    allocator: Allocator,
    zeroed: bool,
    /// Slots written since the last clear; next free slot.
    len: usize,
    /// High-water mark of initialized slots.
    written: usize,
    head: Idx,
    /// Inclusive restricted read window.
    window: Option<(usize, usize)>,
}

impl<I: Copy + Default, Idx: Index> OpenList<I, Idx> {
    /// Creates a list with `capacity` slots from `allocator`.
    ///
    /// Shorthand for [`OpenListBuilder`] without zero-init.
    pub fn new(capacity: usize, allocator: Allocator) -> Result<Self, Error> {
        OpenListBuilder::default()
            .capacity(capacity)
            .allocator(allocator)
            .build()
    }

    /// Creates a task-scoped list with `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::new(capacity, Allocator::Task)
    }
}

impl<I: Copy, Idx: Index> OpenList<I, Idx> {
    pub(crate) fn from_buffer(
        buffer: SlotBuffer<GraphNode<I, Idx>>,
        allocator: Allocator,
        zeroed: bool,
    ) -> Self {
        let written = if zeroed { buffer.capacity() } else { 0 };
        Self {
            buffer: Some(buffer),
            allocator,
            zeroed,
            len: 0,
            written,
            head: Idx::NONE,
            window: None,
        }
    }

    /// Returns `true` if there is at least one live record to pop.
    ///
    /// A released list reports `false`.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.head.is_some()
    }

    /// Slots written since construction or the last [`clear`](Self::clear).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Fixed slot count. Zero once released.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, SlotBuffer::capacity)
    }

    /// Pushes left before the list is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Returns `true` if the next push would fail with [`Error::Full`].
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Slot of the current minimum, or `Idx::NONE`.
    #[inline]
    pub fn head(&self) -> Idx {
        self.head
    }

    /// Strategy the buffer was allocated with.
    #[inline]
    pub fn allocator(&self) -> Allocator {
        self.allocator
    }

    /// Returns `true` if every slot was initialized at construction.
    #[inline]
    pub fn is_zeroed(&self) -> bool {
        self.zeroed
    }

    /// Returns `true` once [`release`](Self::release) has run.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.buffer.is_none()
    }

    /// Inserts `node` in `f_cost` order and returns its slot.
    ///
    /// The record is written to slot [`len`](Self::len). Among equal
    /// `f_cost` values the new record goes after the existing ones.
    ///
    /// # Errors
    ///
    /// [`Error::Full`] when every slot has been written since the last
    /// clear (nothing is modified), [`Error::Released`] after release.
    pub fn push(&mut self, mut node: GraphNode<I, Idx>) -> Result<Idx, Error> {
        let buffer = self.buffer.as_mut().ok_or(Error::Released)?;
        let capacity = buffer.capacity();
        if self.len == capacity {
            tracing::warn!(capacity, "open list full, clear before pushing again");
            return Err(Error::Full { capacity });
        }

        let slot = self.len;
        let slot_idx = Idx::from_slot(slot);

        // Safety (all buffer reads below): links only ever point at slots
        // below `len`, and every such slot has been written.
        match self.head.to_slot() {
            None => {
                node.next = Idx::NONE;
                self.head = slot_idx;
            }
            Some(head) if node.f_cost < unsafe { buffer.get(head) }.f_cost => {
                node.next = self.head;
                self.head = slot_idx;
            }
            Some(head) => {
                let mut at = head;
                while let Some(next) = unsafe { buffer.get(at) }.next.to_slot() {
                    if unsafe { buffer.get(next) }.f_cost > node.f_cost {
                        break;
                    }
                    at = next;
                }
                let prev = unsafe { buffer.get_mut(at) };
                node.next = prev.next;
                prev.next = slot_idx;
            }
        }

        // Safety: slot < capacity
        unsafe { buffer.write(slot, node) };
        self.len += 1;
        self.written = self.written.max(self.len);

        Ok(slot_idx)
    }

    /// Removes and returns the record with the smallest `f_cost`.
    ///
    /// The slot keeps its contents and stays readable through
    /// [`get`](Self::get); it is not reused until [`clear`](Self::clear).
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] when [`has_next`](Self::has_next) is false,
    /// [`Error::Released`] after release.
    pub fn pop(&mut self) -> Result<GraphNode<I, Idx>, Error> {
        let buffer = self.buffer.as_ref().ok_or(Error::Released)?;
        let head = self.head.to_slot().ok_or(Error::Empty)?;

        // Safety: head < len
        let node = *unsafe { buffer.get(head) };
        self.head = node.next;

        Ok(node)
    }

    /// Returns the record [`pop`](Self::pop) would return.
    pub fn peek(&self) -> Result<&GraphNode<I, Idx>, Error> {
        let buffer = self.buffer.as_ref().ok_or(Error::Released)?;
        let head = self.head.to_slot().ok_or(Error::Empty)?;

        // Safety: head < len
        Ok(unsafe { buffer.get(head) })
    }

    /// Forgets every record and makes all slots available again.
    ///
    /// The buffer is neither freed nor zeroed. Later pushes overwrite stale
    /// records from slot 0 upward.
    pub fn clear(&mut self) -> Result<(), Error> {
        if self.buffer.is_none() {
            return Err(Error::Released);
        }

        tracing::debug!(len = self.len, "open list cleared");
        self.len = 0;
        self.head = Idx::NONE;
        Ok(())
    }

    /// Reads slot `index` directly, live or popped.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfBounds`] if `index` is negative or `>= capacity`
    /// - [`Error::OutsideWindow`] if a restricted window excludes `index`
    /// - [`Error::Uninitialized`] if the slot was never written
    /// - [`Error::Released`] after release
    pub fn get(&self, index: Idx) -> Result<&GraphNode<I, Idx>, Error> {
        let buffer = self.buffer.as_ref().ok_or(Error::Released)?;
        let capacity = buffer.capacity();

        let slot = match index.to_slot() {
            Some(slot) if slot < capacity => slot,
            _ => {
                return Err(Error::OutOfBounds {
                    index: index.widen(),
                    capacity,
                });
            }
        };

        if let Some((min, max)) = self.window {
            if slot < min || slot > max {
                return Err(Error::OutsideWindow {
                    index: slot,
                    min,
                    max,
                });
            }
        }

        if slot >= self.written {
            return Err(Error::Uninitialized { index: slot });
        }

        // Safety: slot < written <= capacity
        Ok(unsafe { buffer.get(slot) })
    }

    /// Restricts [`get`](Self::get) to slots `min..=max`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWindow`] if `min > max` or `max >= capacity`.
    pub fn restrict(&mut self, min: usize, max: usize) -> Result<(), Error> {
        let capacity = self.buffer.as_ref().ok_or(Error::Released)?.capacity();
        if min > max || max >= capacity {
            return Err(Error::InvalidWindow { min, max, capacity });
        }

        tracing::trace!(min, max, "open list window restricted");
        self.window = Some((min, max));
        Ok(())
    }

    /// Removes any restricted window.
    pub fn unrestrict(&mut self) {
        self.window = None;
    }

    /// Slots currently readable through [`get`](Self::get), ignoring
    /// initialization.
    pub fn window(&self) -> Range<usize> {
        match self.window {
            Some((min, max)) => min..max + 1,
            None => 0..self.capacity(),
        }
    }

    /// Live records in pop order, without removing them.
    pub fn iter(&self) -> Iter<'_, I, Idx> {
        Iter {
            buffer: self.buffer.as_ref(),
            at: self.head,
        }
    }

    /// Splits the written slots `0..len` into disjoint windows of at most
    /// `chunk` slots for parallel workers.
    ///
    /// The list is mutably borrowed while partitions exist, so no push,
    /// pop or clear can race with them.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroChunk`] for `chunk == 0`, [`Error::Released`] after
    /// release.
    pub fn partitions_mut(&mut self, chunk: usize) -> Result<Partitions<'_, I, Idx>, Error> {
        let buffer = self.buffer.as_mut().ok_or(Error::Released)?;
        if chunk == 0 {
            return Err(Error::ZeroChunk);
        }

        let capacity = buffer.capacity();
        tracing::trace!(len = self.len, chunk, "open list partitioned");

        // Safety: len <= capacity and slots below len are written
        let slots = unsafe { buffer.written_mut(self.len) };
        Ok(Partitions::new(slots, chunk, capacity))
    }

    /// Frees the buffer. Every later call fails with [`Error::Released`].
    ///
    /// Dropping a list releases it too; this makes the point of release
    /// explicit and detects double release.
    pub fn release(&mut self) -> Result<(), Error> {
        let buffer = self.buffer.take().ok_or(Error::Released)?;
        tracing::debug!(
            capacity = buffer.capacity(),
            allocator = %self.allocator,
            "open list released"
        );
        drop(buffer);

        self.len = 0;
        self.written = 0;
        self.head = Idx::NONE;
        self.window = None;
        Ok(())
    }
}

impl<I: Copy + core::fmt::Debug, Idx: Index> core::fmt::Debug for OpenList<I, Idx> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OpenList")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("head", &self.head)
            .field("allocator", &self.allocator)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Iterator over live records in priority order.
pub struct Iter<'a, I: Copy, Idx: Index> {
    buffer: Option<&'a SlotBuffer<GraphNode<I, Idx>>>,
    at: Idx,
}

impl<'a, I: Copy, Idx: Index> Iterator for Iter<'a, I, Idx> {
    type Item = &'a GraphNode<I, Idx>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let buffer = self.buffer?;
        let slot = self.at.to_slot()?;
        // Safety: reachable slots are below len
        let node = unsafe { buffer.get(slot) };
        self.at = node.next;
        Some(node)
    }
}

impl<'a, I: Copy, Idx: Index> IntoIterator for &'a OpenList<I, Idx> {
    type Item = &'a GraphNode<I, Idx>;
    type IntoIter = Iter<'a, I, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
