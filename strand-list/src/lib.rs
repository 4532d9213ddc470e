//! # strand-list
//!
//! Concurrent singly-linked-list primitives for building queues,
//! work-stealing structures, and freelists without a global mutex.
//!
//! ## Design
//!
//! Mutual exclusion is **per edge**: the only synchronization state in the
//! whole structure is each node's single atomic `next` slot. A thread claims
//! the edge leaving a node by exchanging the slot with the node's own
//! address — a self-reference any other thread recognizes as "held, retry" —
//! and releases it by storing any legal successor back:
//!
//! ```text
//! unlocked:  node.next == successor (or null)
//! locked:    node.next == &node
//! ```
//!
//! Traversals couple these locks — at most two adjacent edges held per
//! thread, trailing edge released as the window advances — so arbitrarily
//! many threads can scan, insert, remove, and bulk-transfer on the *same*
//! list concurrently, contending only when they need the same edge.
//!
//! ## Structures
//!
//! - [`List`] — single entry point. Append/prepend/insert, filtered
//!   removal and retrieval, bulk extraction, whole-list drain, and an
//!   O(1) two-list content swap.
//! - [`ShardedList`] — `N` pre-linked entry points over one physical chain.
//!   Threads working at different shards touch disjoint edges; a scan
//!   started at shard `m` crosses zone boundaries transparently; a zone's
//!   accumulated nodes can be handed off in bulk with
//!   [`ShardedList::drain`].
//! - [`Chain`] — the owned, null-terminated sub-chain handle through which
//!   every payload enters and leaves a list.
//!
//! ## Progress model
//!
//! Operations spin (via [`crossbeam_utils::Backoff`]) only while the one
//! edge they need is held elsewhere; work on other edges, shards, and lists
//! is never disturbed. This is blocking-free in the common case but **not
//! wait-free**: a thread that stalls while holding an edge stalls every
//! thread that later needs to cross that edge. There is no supervisory
//! recovery.
//!
//! ## Example
//!
//! ```
//! use std::thread;
//! use strand_list::{Chain, List};
//!
//! let list: List<u64> = List::new();
//!
//! // Any number of threads may work on the same list.
//! thread::scope(|s| {
//!     for tag in 0..4 {
//!         let list = &list;
//!         s.spawn(move || list.append(Chain::single(tag)));
//!     }
//! });
//!
//! let mut seen: Vec<u64> = Vec::new();
//! list.for_each(|&v| seen.push(v));
//! seen.sort_unstable();
//! assert_eq!(seen, vec![0, 1, 2, 3]);
//!
//! // Removal moves ownership back out.
//! assert_eq!(list.take(|&v| v == 2), Some(2));
//! assert_eq!(list.remove_where(|_| true), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod lifecycle;
mod list;
mod node;
mod sharded;

pub use list::List;
pub use node::{Chain, ChainIntoIter, ChainIter};
pub use sharded::ShardedList;
