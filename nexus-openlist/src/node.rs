//! Search node record stored in each slot.

use core::hash::{Hash, Hasher};

use crate::Index;

/// A graph-search node as stored in an [`OpenList`](crate::OpenList) slot.
///
/// `f_cost` is the sort key. The list never checks that it equals
/// `g_cost + h_cost`; [`GraphNode::new`] computes it, [`GraphNode::with_costs`]
/// takes it as given.
///
/// The `next` link belongs to the list and is only readable from outside.
/// Equality and hashing ignore it.
///
/// # Example
///
/// ```
/// use nexus_openlist::{GraphNode, Index};
///
/// let node: GraphNode<u32> = GraphNode::new(7, 10, 4);
/// assert_eq!(node.f_cost, 14);
/// assert!(node.next().is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphNode<I, Idx: Index = i32> {
    /// Opaque node handle supplied by the driver.
    pub id: I,
    /// Accumulated cost from the search origin.
    pub g_cost: i32,
    /// Heuristic estimate to the goal.
    pub h_cost: i32,
    /// Total estimated cost, the priority key.
    pub f_cost: i32,
    pub(crate) next: Idx,
}

impl<I, Idx: Index> GraphNode<I, Idx> {
    /// Creates a node with `f_cost = g_cost + h_cost` (saturating).
    #[inline]
    pub fn new(id: I, g_cost: i32, h_cost: i32) -> Self {
        Self::with_costs(id, g_cost, h_cost, g_cost.saturating_add(h_cost))
    }

    /// Creates a node with an explicit `f_cost`.
    #[inline]
    pub fn with_costs(id: I, g_cost: i32, h_cost: i32, f_cost: i32) -> Self {
        Self {
            id,
            g_cost,
            h_cost,
            f_cost,
            next: Idx::NONE,
        }
    }

    /// Slot of the successor in priority order, or `Idx::NONE`.
    ///
    /// Only meaningful while the record is still reachable from the head.
    #[inline]
    pub fn next(&self) -> Idx {
        self.next
    }
}

impl<I: Default, Idx: Index> Default for GraphNode<I, Idx> {
    fn default() -> Self {
        Self::with_costs(I::default(), 0, 0, 0)
    }
}

impl<I: PartialEq, Idx: Index> PartialEq for GraphNode<I, Idx> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.g_cost == other.g_cost
            && self.h_cost == other.h_cost
            && self.f_cost == other.f_cost
    }
}

impl<I: Eq, Idx: Index> Eq for GraphNode<I, Idx> {}

impl<I: Hash, Idx: Index> Hash for GraphNode<I, Idx> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.g_cost.hash(state);
        self.h_cost.hash(state);
        self.f_cost.hash(state);
    }
}
