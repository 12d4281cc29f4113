//! Fixed-capacity open list for A*-style searches.
//!
//! An [`OpenList`] stores small [`GraphNode`] records (id, g/h/f costs) in a
//! single buffer allocated once at construction. Records are threaded into
//! a singly linked list sorted by `f_cost`, so the cheapest node is always
//! at the head.
//!
//! ```text
//! slots:  [0: f=10] [1: f=3] [2: f=7] [3: f=3]
//! head ──► 1 ──► 3 ──► 2 ──► 0 ──► NONE
//! ```
//!
//! Design choices:
//! - **No reallocation**: capacity is fixed, pushes beyond it fail
//! - **No relocation**: records never move; links are slot indices
//! - **Cheap teardown**: [`OpenList::clear`] resets two counters
//! - **Explicit lifetime**: [`OpenList::release`] frees the buffer and
//!   rejects any later use
//!
//! # Quick Start
//!
//! ```
//! use nexus_openlist::{Allocator, GraphNode, OpenList};
//!
//! let mut open: OpenList<u32> = OpenList::new(4, Allocator::Scratch)?;
//!
//! open.push(GraphNode::with_costs(0, 0, 10, 10))?;
//! open.push(GraphNode::with_costs(1, 0, 3, 3))?;
//! open.push(GraphNode::with_costs(2, 0, 7, 7))?;
//! open.push(GraphNode::with_costs(3, 0, 3, 3))?;
//!
//! // Ties pop in push order.
//! assert_eq!(open.pop()?.id, 1);
//! assert_eq!(open.pop()?.id, 3);
//! assert_eq!(open.pop()?.id, 2);
//! assert_eq!(open.pop()?.id, 0);
//! assert!(!open.has_next());
//!
//! open.release()?;
//! # Ok::<(), nexus_openlist::Error>(())
//! ```
//!
//! # Capacity Trap
//!
//! [`OpenList::pop`] does not give a slot back. A list of capacity `N`
//! takes `N` pushes between clears no matter how many records were popped.
//! Size the list for the total number of pushes a search can make.
//!
//! # Allocation Strategies
//!
//! | [`Allocator`] | Backing | Use Case |
//! |---------------|---------|----------|
//! | `Scratch` | global allocator | per-step scratch lists |
//! | `Task` | global allocator | one list per scheduled job |
//! | `Persistent` | page-aligned pages on unix, optional `mlock` | long-lived, reused lists |
//!
//! # Parallel Use
//!
//! The list does no locking. Mutation needs `&mut`, and
//! [`OpenList::partitions_mut`] splits the written slots into disjoint
//! [`Partition`]s for scoped worker threads. For callers that hand out
//! index ranges themselves, [`OpenList::restrict`] limits indexed reads to a
//! window and reports violations as [`Error::OutsideWindow`], distinct from
//! [`Error::OutOfBounds`].

#![warn(missing_docs)]

mod allocator;
mod buffer;
mod builder;
mod error;
pub mod index;
mod node;
pub mod partition;
pub mod queue;
#[cfg(unix)]
mod sys;

pub use allocator::Allocator;
pub use builder::OpenListBuilder;
pub use error::Error;
pub use index::Index;
pub use node::GraphNode;
pub use partition::{NodeMut, Partition, Partitions};
pub use queue::{Iter, OpenList};
