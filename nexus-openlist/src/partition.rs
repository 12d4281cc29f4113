//! Disjoint windows over the written slots for partitioned parallel work.
//!
//! [`OpenList::partitions_mut`](crate::OpenList::partitions_mut) hands out
//! one [`Partition`] per chunk of slots. Each partition owns its range
//! exclusively, so workers on different threads cannot touch each other's
//! slots, and the list itself stays borrowed until every partition is gone.
//!
//! ```
//! use nexus_openlist::{GraphNode, OpenList};
//!
//! let mut open: OpenList<u32> = OpenList::with_capacity(8)?;
//! for id in 0..8 {
//!     open.push(GraphNode::new(id, id as i32, 1))?;
//! }
//!
//! std::thread::scope(|s| {
//!     for mut part in open.partitions_mut(3).unwrap() {
//!         s.spawn(move || {
//!             for slot in part.window() {
//!                 *part.get_mut(slot as i32).unwrap().h_cost = 0;
//!             }
//!         });
//!     }
//! });
//!
//! assert!(open.iter().all(|n| n.h_cost == 0));
//! # Ok::<(), nexus_openlist::Error>(())
//! ```

use core::ops::Range;
use core::slice::ChunksMut;

use crate::{Error, GraphNode, Index};

/// Iterator over the partitions of an [`OpenList`](crate::OpenList).
pub struct Partitions<'a, I: Copy, Idx: Index> {
    chunks: ChunksMut<'a, GraphNode<I, Idx>>,
    chunk: usize,
    base: usize,
    capacity: usize,
}

impl<'a, I: Copy, Idx: Index> Partitions<'a, I, Idx> {
    pub(crate) fn new(slots: &'a mut [GraphNode<I, Idx>], chunk: usize, capacity: usize) -> Self {
        Self {
            chunks: slots.chunks_mut(chunk),
            chunk,
            base: 0,
            capacity,
        }
    }
}

impl<'a, I: Copy, Idx: Index> Iterator for Partitions<'a, I, Idx> {
    type Item = Partition<'a, I, Idx>;

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.chunks.next()?;
        let base = self.base;
        self.base += self.chunk;
        Some(Partition {
            slots,
            base,
            capacity: self.capacity,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<I: Copy, Idx: Index> ExactSizeIterator for Partitions<'_, I, Idx> {}

/// Exclusive view of a contiguous range of written slots.
///
/// Indices are global slot indices, the same ones
/// [`OpenList::get`](crate::OpenList::get) takes. Access outside the
/// window is reported rather than performed.
///
/// Editing `f_cost` of a record that is still linked leaves the priority
/// order stale until the list is cleared and refilled.
#[derive(Debug)]
pub struct Partition<'a, I: Copy, Idx: Index> {
    slots: &'a mut [GraphNode<I, Idx>],
    base: usize,
    capacity: usize,
}

impl<I: Copy, Idx: Index> Partition<'_, I, Idx> {
    /// Global slots covered by this partition.
    #[inline]
    pub fn window(&self) -> Range<usize> {
        self.base..self.base + self.slots.len()
    }

    /// Number of slots in the partition.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the partition covers no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reads global slot `index`.
    pub fn get(&self, index: Idx) -> Result<&GraphNode<I, Idx>, Error> {
        let offset = self.offset(index)?;
        Ok(&self.slots[offset])
    }

    /// Mutable access to the id and costs of global slot `index`.
    pub fn get_mut(&mut self, index: Idx) -> Result<NodeMut<'_, I>, Error> {
        let offset = self.offset(index)?;
        let node = &mut self.slots[offset];
        Ok(NodeMut {
            id: &mut node.id,
            g_cost: &mut node.g_cost,
            h_cost: &mut node.h_cost,
            f_cost: &mut node.f_cost,
        })
    }

    /// Overwrites the id and costs of global slot `index` with those of
    /// `node`. The slot keeps its own link; `node.next()` is ignored.
    pub fn set(&mut self, index: Idx, node: GraphNode<I, Idx>) -> Result<(), Error> {
        let offset = self.offset(index)?;
        let slot = &mut self.slots[offset];
        *slot = GraphNode {
            next: slot.next,
            ..node
        };
        Ok(())
    }

    /// Records in slot order.
    pub fn iter(&self) -> core::slice::Iter<'_, GraphNode<I, Idx>> {
        self.slots.iter()
    }

    fn offset(&self, index: Idx) -> Result<usize, Error> {
        let slot = match index.to_slot() {
            Some(slot) if slot < self.capacity => slot,
            _ => {
                return Err(Error::OutOfBounds {
                    index: index.widen(),
                    capacity: self.capacity,
                });
            }
        };

        let window = self.window();
        if !window.contains(&slot) {
            return Err(Error::OutsideWindow {
                index: slot,
                min: window.start,
                max: window.end - 1,
            });
        }

        Ok(slot - self.base)
    }
}

/// Writable fields of a record inside a [`Partition`].
///
/// The link to the successor stays with the list.
#[derive(Debug)]
pub struct NodeMut<'p, I> {
    /// Opaque node handle.
    pub id: &'p mut I,
    /// Accumulated cost from the search origin.
    pub g_cost: &'p mut i32,
    /// Heuristic estimate to the goal.
    pub h_cost: &'p mut i32,
    /// Total estimated cost. Changing it does not reorder the list.
    pub f_cost: &'p mut i32,
}

#[cfg(test)]
mod tests {
    use crate::{Error, GraphNode, OpenList};

    fn filled(n: u32) -> OpenList<u32> {
        let mut list = OpenList::with_capacity(16).unwrap();
        for id in 0..n {
            list.push(GraphNode::new(id, (n - id) as i32, 0)).unwrap();
        }
        list
    }

    #[test]
    fn splits_written_slots() {
        let mut list = filled(10);
        let windows: Vec<_> = list
            .partitions_mut(4)
            .unwrap()
            .map(|p| p.window())
            .collect();
        assert_eq!(windows, [0..4, 4..8, 8..10]);
    }

    #[test]
    fn exact_size() {
        let mut list = filled(10);
        assert_eq!(list.partitions_mut(3).unwrap().len(), 4);
    }

    #[test]
    fn zero_chunk_rejected() {
        let mut list = filled(2);
        assert!(matches!(list.partitions_mut(0), Err(Error::ZeroChunk)));
    }

    #[test]
    fn empty_list_has_no_partitions() {
        let mut list = filled(0);
        assert_eq!(list.partitions_mut(4).unwrap().count(), 0);
    }

    #[test]
    fn window_checks() {
        let mut list = filled(10);
        let mut parts = list.partitions_mut(4).unwrap();
        let _first = parts.next().unwrap();
        let mut second = parts.next().unwrap();

        assert_eq!(second.get(5).unwrap().id, 5);
        assert_eq!(
            second.get(3),
            Err(Error::OutsideWindow {
                index: 3,
                min: 4,
                max: 7
            })
        );
        // Inside capacity but past the written slots: still a window error.
        assert!(matches!(second.get(12), Err(Error::OutsideWindow { .. })));
        assert!(matches!(second.get_mut(16), Err(Error::OutOfBounds { .. })));
        assert!(matches!(second.get_mut(-1), Err(Error::OutOfBounds { index: -1, .. })));
    }

    #[test]
    fn edits_keep_links() {
        let mut list = filled(4);
        for mut part in list.partitions_mut(2).unwrap() {
            for slot in part.window() {
                *part.get_mut(slot as i32).unwrap().g_cost += 100;
            }
        }

        let ids: Vec<u32> = list.iter().map(|n| n.id).collect();
        assert_eq!(ids, [3, 2, 1, 0]);
        assert!(list.iter().all(|n| n.g_cost >= 100));
    }

    #[test]
    fn set_keeps_slot_link() {
        // Slots 0..4 linked 0 -> 1 -> 2 -> 3.
        let mut list: OpenList<u32> = OpenList::with_capacity(4).unwrap();
        for id in 0..4 {
            list.push(GraphNode::new(id, id as i32, 0)).unwrap();
        }
        let head = *list.get(0).unwrap();
        assert_eq!(head.next(), 1);

        // Copying the head into slot 1 must not make slot 1 point at itself.
        for mut part in list.partitions_mut(4).unwrap() {
            part.set(1, head).unwrap();
            assert!(matches!(part.set(4, head), Err(Error::OutOfBounds { .. })));
        }

        assert_eq!(list.get(1).unwrap().next(), 2);
        assert_eq!(list.iter().take(5).count(), 4);
        let mut ids = Vec::new();
        while list.has_next() {
            ids.push(list.pop().unwrap().id);
        }
        assert_eq!(ids, [0, 0, 2, 3]);
    }
}
