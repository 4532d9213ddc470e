//! Single-entry edge-locking list.
//!
//! A [`List`] is a concurrent singly-linked chain hanging off one permanent
//! entry sentinel. Mutual exclusion is per *edge*, not per node and not
//! global: to inspect or change the link leaving a node, a thread claims
//! that one link slot by atomic exchange (see [`crate::node`]) and every
//! other thread needing a different edge proceeds undisturbed.
//!
//! # The sweep
//!
//! Every scanning operation is one traversal shape, a lock-coupling sweep:
//!
//! ```text
//!  entry ──▶ A ──▶ B ──▶ C ──▶ null
//!        └──┬──┘
//!     window: the thread holds the edge into the node under
//!     inspection (and, while deciding, the edge leaving it)
//! ```
//!
//! The trailing edge is re-released as the window advances, so a thread
//! holds at most two adjacent edges at any instant. A matched node is
//! spliced out while both surrounding edges are held, which makes it
//! exclusively owned by the sweeping thread the moment it is detached —
//! payload hand-off needs no further synchronization.
//!
//! Progress is per-edge: a stalled thread blocks only threads that need to
//! cross the edges it holds. There is no global linearization point; scans
//! observe coupled-lock consistency, edge by edge.
//!
//! # Ordering discipline
//!
//! Edge-acquiring exchanges use `Acquire`. Stores that publish a chain the
//! storing thread constructed use `Release`. Re-releases of pointers that
//! were already reachable through the same edge are bookkeeping and use
//! `Relaxed`.

use std::fmt;
use std::ptr::{self, NonNull};
use std::sync::atomic::Ordering;

use crate::lifecycle;
use crate::node::{Chain, Node};

/// A concurrent singly-linked list with per-edge locking.
///
/// All operations take `&self` and may be called from any number of threads
/// concurrently. Ownership of payloads moves *in* via [`Chain`] and moves
/// *out* through the removal operations.
///
/// Predicates and visitors receive `&T` only; they must not call back into
/// the same list — the calling thread holds edges for the duration, so
/// re-entry can self-deadlock.
///
/// # Example
///
/// ```
/// use std::thread;
/// use strand_list::{Chain, List};
///
/// let list: List<u64> = List::new();
///
/// thread::scope(|s| {
///     for tag in 0..4 {
///         let list = &list;
///         s.spawn(move || list.append(Chain::single(tag)));
///     }
/// });
///
/// // Every concurrently appended node is preserved exactly once.
/// let mut seen: Vec<u64> = Vec::new();
/// list.for_each(|&v| seen.push(v));
/// seen.sort_unstable();
/// assert_eq!(seen, vec![0, 1, 2, 3]);
/// ```
pub struct List<T> {
    entry: Node<T>,
}

// Safety: payloads are moved/destroyed from whichever thread's removal wins,
// and are never aliased across threads (a payload is only touched while its
// incoming edge is held, or after exclusive detachment) — so `T: Send`
// suffices for both sharing and sending the list.
unsafe impl<T: Send> Send for List<T> {}
unsafe impl<T: Send> Sync for List<T> {}

impl<T> List<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entry: Node::sentinel(),
        }
    }

    /// Returns `true` if the entry edge currently holds null.
    ///
    /// This is a racy snapshot: the answer may be stale by the time the
    /// caller acts on it. An edge mid-operation reads as non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry.next.load(Ordering::Acquire).is_null()
    }

    fn entry_ptr(&self) -> *mut Node<T> {
        ptr::from_ref(&self.entry).cast_mut()
    }

    /// Appends a chain at the true tail of the list.
    ///
    /// The walk to the tail is lock-coupled, so concurrent appends are all
    /// preserved; order among racing appenders is whichever wins the tail
    /// race. A single thread's successive appends land in call order (FIFO).
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::{Chain, List};
    ///
    /// let list: List<u32> = List::new();
    /// list.append(Chain::single(1));
    /// list.append(Chain::single(2));
    /// list.append((3..=4).collect());
    ///
    /// let mut seen = Vec::new();
    /// list.for_each(|&v| seen.push(v));
    /// assert_eq!(seen, vec![1, 2, 3, 4]);
    /// ```
    pub fn append(&self, chain: Chain<T>) {
        let Some((head, _tail, _len)) = chain.into_raw_parts() else {
            return;
        };
        let mut prev = self.entry_ptr();
        // Safety: prev starts at the entry; thereafter every node is held
        // through its incoming edge while we lock the edge leaving it.
        let mut curr = unsafe { Node::lock_edge(prev) };
        while !curr.is_null() {
            let next = unsafe { Node::lock_edge(curr) };
            unsafe { Node::release_edge(prev, curr, Ordering::Relaxed) };
            prev = curr;
            curr = next;
        }
        // Publishes the caller's chain: Release.
        unsafe { Node::release_edge(prev, head.as_ptr(), Ordering::Release) };
    }

    /// Prepends a chain at the head. Locks only the entry edge; O(1).
    pub fn prepend(&self, chain: Chain<T>) {
        let Some((head, tail, _len)) = chain.into_raw_parts() else {
            return;
        };
        let entry = self.entry_ptr();
        // Safety: the entry lives as long as `self`.
        let curr = unsafe { Node::lock_edge(entry) };
        unsafe {
            // The old head is already published; linking it behind the new
            // tail is bookkeeping. Publishing the new chain is not.
            Node::release_edge(tail.as_ptr(), curr, Ordering::Relaxed);
            Node::release_edge(entry, head.as_ptr(), Ordering::Release);
        }
    }

    /// Pushes a single value at the head. O(1).
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::List;
    ///
    /// let list: List<u32> = List::new();
    /// list.push_front(1);
    /// list.push_front(2);
    /// list.push_front(3);
    ///
    /// let mut seen = Vec::new();
    /// list.for_each(|&v| seen.push(v));
    /// assert_eq!(seen, vec![3, 2, 1]);
    /// ```
    pub fn push_front(&self, value: T) {
        self.prepend(Chain::single(value));
    }

    /// Appends a single value at the tail. O(n) — walks to the tail.
    pub fn push_back(&self, value: T) {
        self.append(Chain::single(value));
    }

    /// Splices `chain` in front of the first position where `pred` matches.
    ///
    /// The predicate sees the payloads either side of each candidate
    /// position: `pred(prev, curr)` where `prev` is `None` at the entry and
    /// `curr` is `None` at the end of the list. On a match the chain lands
    /// between the two and `Ok(())` is returned. If the scan exhausts the
    /// list without a match, the list is unchanged and the chain comes back
    /// as `Err`.
    ///
    /// # Errors
    ///
    /// Returns `Err(chain)` if no position matched.
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::{Chain, List};
    ///
    /// let list: List<u32> = List::new();
    /// list.append([10, 30].into_iter().collect());
    ///
    /// // Keep ascending order.
    /// let res = list.insert_where(Chain::single(20), |prev, curr| {
    ///     prev.map_or(true, |&p| p < 20) && curr.map_or(true, |&c| 20 < c)
    /// });
    /// assert!(res.is_ok());
    ///
    /// let mut seen = Vec::new();
    /// list.for_each(|&v| seen.push(v));
    /// assert_eq!(seen, vec![10, 20, 30]);
    /// ```
    pub fn insert_where<F>(&self, chain: Chain<T>, mut pred: F) -> Result<(), Chain<T>>
    where
        F: FnMut(Option<&T>, Option<&T>) -> bool,
    {
        let Some((head, tail, len)) = chain.into_raw_parts() else {
            return Ok(());
        };
        let entry = self.entry_ptr();
        let mut prev = entry;
        let mut prev_is_entry = true;
        loop {
            // Safety: prev is the entry, or a node pinned by the edge we
            // held when we advanced onto it.
            let curr = unsafe { Node::lock_edge(prev) };
            // Holding prev's outgoing edge pins prev itself (removal would
            // need this edge) and pins curr (removal would need prev's
            // edge), so both payload reads are race-free.
            let prev_data = (!prev_is_entry).then(|| unsafe { (*prev).data.assume_init_ref() });
            let curr_data = (!curr.is_null()).then(|| unsafe { (*curr).data.assume_init_ref() });
            if pred(prev_data, curr_data) {
                unsafe {
                    Node::release_edge(tail.as_ptr(), curr, Ordering::Relaxed);
                    Node::release_edge(prev, head.as_ptr(), Ordering::Release);
                }
                return Ok(());
            }
            unsafe { Node::release_edge(prev, curr, Ordering::Relaxed) };
            if curr.is_null() {
                // Safety: we still own the caller's untouched chain.
                return Err(unsafe { Chain::from_raw_parts(head.as_ptr(), tail.as_ptr(), len) });
            }
            prev = curr;
            prev_is_entry = false;
        }
    }

    /// Exchanges the entire contents of two lists without visiting any
    /// interior node.
    ///
    /// Both entry edges are locked (independently spun), then the two
    /// successor pointers are exchanged. Threads working deeper inside
    /// either list are unaffected.
    ///
    /// Swapping a list with itself is a no-op.
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::{Chain, List};
    ///
    /// let a: List<u32> = List::new();
    /// let b: List<u32> = List::new();
    /// a.append([1, 2].into_iter().collect());
    /// b.append([3, 4].into_iter().collect());
    ///
    /// a.swap(&b);
    ///
    /// let mut seen = Vec::new();
    /// a.for_each(|&v| seen.push(v));
    /// assert_eq!(seen, vec![3, 4]);
    /// ```
    pub fn swap(&self, other: &Self) {
        if ptr::eq(self, other) {
            return;
        }
        let a = self.entry_ptr();
        let b = other.entry_ptr();
        // Safety: both entries outlive their borrows; the two locks are on
        // disjoint nodes, so no acquisition order is needed.
        let a_head = unsafe { Node::lock_edge(a) };
        let b_head = unsafe { Node::lock_edge(b) };
        unsafe {
            Node::release_edge(a, b_head, Ordering::Release);
            Node::release_edge(b, a_head, Ordering::Release);
        }
    }

    /// The canonical lock-coupling sweep.
    ///
    /// Walks from the entry, evaluating `filt` on each payload while the
    /// node is pinned by the locked window. A matched node is spliced out
    /// and handed to `action` exclusively owned (its link slot dies with
    /// it); `continue_scan = false` stops after the first match. Unmatched
    /// nodes stay in place as the window advances.
    fn sweep<F, A>(&self, mut filt: F, mut action: A, continue_scan: bool)
    where
        F: FnMut(&T) -> bool,
        A: FnMut(NonNull<Node<T>>),
    {
        let mut prev = self.entry_ptr();
        // Safety: see `append` — the window invariant holds throughout.
        let mut curr = unsafe { Node::lock_edge(prev) };
        loop {
            if curr.is_null() {
                unsafe { Node::release_edge(prev, ptr::null_mut(), Ordering::Relaxed) };
                return;
            }
            // Safety: curr is pinned while we hold its incoming edge.
            let matched = filt(unsafe { (*curr).data.assume_init_ref() });
            let next = unsafe { Node::lock_edge(curr) };
            if matched {
                // Safety: both surrounding edges are held; curr is now
                // exclusively ours.
                action(unsafe { NonNull::new_unchecked(curr) });
                if !continue_scan {
                    unsafe { Node::release_edge(prev, next, Ordering::Relaxed) };
                    return;
                }
                // prev's edge stays held; it is released past every removed
                // node once a survivor (or the end) is found.
                curr = next;
            } else {
                unsafe { Node::release_edge(prev, curr, Ordering::Relaxed) };
                prev = curr;
                curr = next;
            }
        }
    }

    /// The sweep with one edge of lookahead: `filt` additionally sees
    /// whether the node has a successor, so predicates can depend on
    /// position ("is this the tail?").
    fn sweep_zip<F, A>(&self, mut filt: F, mut action: A, continue_scan: bool)
    where
        F: FnMut(&T, bool) -> bool,
        A: FnMut(NonNull<Node<T>>),
    {
        let mut prev = self.entry_ptr();
        let mut curr = unsafe { Node::lock_edge(prev) };
        loop {
            if curr.is_null() {
                unsafe { Node::release_edge(prev, ptr::null_mut(), Ordering::Relaxed) };
                return;
            }
            // Lookahead needs the edge leaving curr locked first.
            let next = unsafe { Node::lock_edge(curr) };
            let matched = filt(unsafe { (*curr).data.assume_init_ref() }, !next.is_null());
            if matched {
                action(unsafe { NonNull::new_unchecked(curr) });
                if !continue_scan {
                    unsafe { Node::release_edge(prev, next, Ordering::Relaxed) };
                    return;
                }
                curr = next;
            } else {
                unsafe { Node::release_edge(prev, curr, Ordering::Relaxed) };
                prev = curr;
                curr = next;
            }
        }
    }

    /// Removes the first payload matching `filt` and returns it, or `None`
    /// if nothing matched.
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::List;
    ///
    /// let list: List<u32> = List::new();
    /// list.append([1, 2, 3].into_iter().collect());
    ///
    /// assert_eq!(list.take(|&v| v == 2), Some(2));
    /// assert_eq!(list.take(|&v| v == 9), None);
    /// ```
    #[must_use = "the removed payload is dropped if unused"]
    pub fn take<F>(&self, filt: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut res = None;
        self.sweep(
            filt,
            |node| unsafe {
                // Safety: the node is exclusively ours; move the payload out
                // and free the shell.
                res = Some((*node.as_ptr()).data.assume_init_read());
                lifecycle::reclaim(node);
            },
            false,
        );
        res
    }

    /// Removes every payload matching `filt`, destroying each, and returns
    /// how many were removed.
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::List;
    ///
    /// let list: List<u32> = List::new();
    /// list.append([1, 2, 3].into_iter().collect());
    ///
    /// assert_eq!(list.remove_where(|&v| v == 2), 1);
    ///
    /// let mut seen = Vec::new();
    /// list.for_each(|&v| seen.push(v));
    /// assert_eq!(seen, vec![1, 3]);
    /// ```
    pub fn remove_where<F>(&self, filt: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        self.sweep(
            filt,
            |node| {
                // Safety: exclusively ours; destroy payload, free node.
                unsafe { lifecycle::dispose(node) };
                removed += 1;
            },
            true,
        );
        removed
    }

    /// Removes the tail node and returns its payload, or `None` if the list
    /// is empty.
    #[must_use = "the removed payload is dropped if unused"]
    pub fn take_last(&self) -> Option<T> {
        let mut res = None;
        self.sweep_zip(
            |_, has_next| !has_next,
            |node| unsafe {
                res = Some((*node.as_ptr()).data.assume_init_read());
                lifecycle::reclaim(node);
            },
            false,
        );
        res
    }

    /// Removes the tail node, destroying its payload. Returns whether a
    /// node was found.
    pub fn remove_last(&self) -> bool {
        let mut found = false;
        self.sweep_zip(
            |_, has_next| !has_next,
            |node| {
                unsafe { lifecycle::dispose(node) };
                found = true;
            },
            false,
        );
        found
    }

    /// Removes every node matching `filt` and returns them as a chain, in
    /// **reverse** encounter order. Ownership of the chain passes to the
    /// caller; nothing is destroyed.
    ///
    /// # Example
    ///
    /// ```
    /// use strand_list::List;
    ///
    /// let list: List<u32> = List::new();
    /// list.append([1, 2, 3].into_iter().collect());
    ///
    /// let matched = list.extract_where(|_| true);
    /// assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// assert!(list.is_empty());
    /// ```
    pub fn extract_where<F>(&self, filt: F) -> Chain<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut head: *mut Node<T> = ptr::null_mut();
        let mut tail: *mut Node<T> = ptr::null_mut();
        let mut len = 0;
        self.sweep(
            filt,
            |node| {
                let node = node.as_ptr();
                // The node is detached and exclusively ours; relinking it
                // onto the private accumulator is plain bookkeeping.
                unsafe { Node::release_edge(node, head, Ordering::Relaxed) };
                if head.is_null() {
                    tail = node;
                }
                head = node;
                len += 1;
            },
            true,
        );
        if head.is_null() {
            Chain::new()
        } else {
            // Safety: head..tail is the null-terminated accumulator we just
            // built from exclusively owned nodes.
            unsafe { Chain::from_raw_parts(head, tail, len) }
        }
    }

    /// Detaches the entire contents, re-terminating the entry at null, and
    /// returns them as a chain in list order.
    ///
    /// The detached chain is walked with the lock protocol before being
    /// returned, which serializes behind any thread still working inside it
    /// and leaves every interior slot holding a real pointer.
    pub fn drain(&self) -> Chain<T> {
        let entry = self.entry_ptr();
        // Safety: the entry lives as long as `self`.
        let head = unsafe { Node::lock_edge(entry) };
        unsafe { Node::release_edge(entry, ptr::null_mut(), Ordering::Relaxed) };
        if head.is_null() {
            return Chain::new();
        }
        let mut prev = head;
        let mut len = 1;
        loop {
            // Safety: nodes of the detached segment stay alive until the
            // chain we return frees them.
            let curr = unsafe { Node::lock_edge(prev) };
            unsafe { Node::release_edge(prev, curr, Ordering::Relaxed) };
            if curr.is_null() {
                // Safety: head..prev is now a normalized, null-terminated
                // chain owned by us.
                return unsafe { Chain::from_raw_parts(head, prev, len) };
            }
            prev = curr;
            len += 1;
        }
    }

    /// Visits every payload in list order without removing anything.
    ///
    /// Each payload is visited while its node is pinned by the locked
    /// window, so the visit never races a removal of that node.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.sweep(
            |data| {
                f(data);
                false
            },
            |_| {},
            true,
        );
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        // Exclusive access: no other thread can hold an edge here, so every
        // slot holds a real pointer.
        let mut curr = self.entry.next.load(Ordering::Relaxed);
        while let Some(node) = NonNull::new(curr) {
            unsafe {
                curr = (*node.as_ptr()).next.load(Ordering::Relaxed);
                lifecycle::dispose(node);
            }
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("empty", &self.is_empty())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::sync::Arc;
    use std::thread;

    fn contents<T: Copy>(list: &List<T>) -> Vec<T> {
        let mut seen = Vec::new();
        list.for_each(|&v| seen.push(v));
        seen
    }

    #[test]
    fn new_list_is_empty() {
        let list: List<u64> = List::new();
        assert!(list.is_empty());
        assert_eq!(contents(&list), Vec::<u64>::new());
    }

    #[test]
    fn append_is_fifo() {
        let list: List<u64> = List::new();
        list.append(Chain::single(1));
        list.append(Chain::single(2));
        list.append(Chain::single(3));
        assert_eq!(contents(&list), vec![1, 2, 3]);
    }

    #[test]
    fn push_front_is_lifo() {
        let list: List<u64> = List::new();
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);
        assert_eq!(contents(&list), vec![3, 2, 1]);
    }

    #[test]
    fn append_multi_node_chain() {
        let list: List<u64> = List::new();
        list.append((1..=3).collect());
        list.append((4..=5).collect());
        assert_eq!(contents(&list), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn push_back_appends_in_order() {
        let list: List<u64> = List::new();
        list.push_back(1);
        list.push_back(2);
        list.push_front(0);
        assert_eq!(contents(&list), vec![0, 1, 2]);
    }

    #[test]
    fn prepend_keeps_chain_order() {
        let list: List<u64> = List::new();
        list.push_front(9);
        list.prepend((1..=3).collect());
        assert_eq!(contents(&list), vec![1, 2, 3, 9]);
    }

    #[test]
    fn append_empty_chain_is_noop() {
        let list: List<u64> = List::new();
        list.append(Chain::new());
        assert!(list.is_empty());
        list.push_front(1);
        list.prepend(Chain::new());
        assert_eq!(contents(&list), vec![1]);
    }

    #[test]
    fn targeted_removal() {
        let list: List<u64> = List::new();
        list.append((1..=3).collect());

        assert_eq!(list.remove_where(|&v| v == 2), 1);
        assert_eq!(contents(&list), vec![1, 3]);
    }

    #[test]
    fn remove_where_counts_all_matches() {
        let list: List<u64> = List::new();
        list.append((0..10).collect());

        assert_eq!(list.remove_where(|&v| v % 2 == 0), 5);
        assert_eq!(contents(&list), vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn take_moves_payload_out() {
        let list: List<String> = List::new();
        list.append(["a", "b"].into_iter().map(String::from).collect());

        assert_eq!(list.take(|v| v == "b").as_deref(), Some("b"));
        let mut seen = Vec::new();
        list.for_each(|v| seen.push(v.clone()));
        assert_eq!(seen, vec!["a".to_string()]);
    }

    #[test]
    fn no_match_is_idempotent() {
        let list: List<u64> = List::new();
        list.append((1..=3).collect());

        assert_eq!(list.take(|_| false), None);
        assert_eq!(list.take(|_| false), None);
        assert_eq!(contents(&list), vec![1, 2, 3]);
    }

    #[test]
    fn take_last_removes_tail() {
        let list: List<u64> = List::new();
        list.append((1..=3).collect());

        assert_eq!(list.take_last(), Some(3));
        assert_eq!(list.take_last(), Some(2));
        assert_eq!(contents(&list), vec![1]);
        assert_eq!(list.take_last(), Some(1));
        assert_eq!(list.take_last(), None);
    }

    #[test]
    fn remove_last_reports_presence() {
        let list: List<u64> = List::new();
        list.push_front(7);

        assert!(list.remove_last());
        assert!(!list.remove_last());
        assert!(list.is_empty());
    }

    #[test]
    fn extract_reverses_encounter_order() {
        let list: List<u64> = List::new();
        list.append((1..=3).collect());

        let matched = list.extract_where(|_| true);
        assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert!(list.is_empty());
    }

    #[test]
    fn extract_partial_leaves_rest() {
        let list: List<u64> = List::new();
        list.append((0..6).collect());

        let odd = list.extract_where(|&v| v % 2 == 1);
        assert_eq!(odd.into_iter().collect::<Vec<_>>(), vec![5, 3, 1]);
        assert_eq!(contents(&list), vec![0, 2, 4]);
    }

    #[test]
    fn extract_no_match_returns_empty_chain() {
        let list: List<u64> = List::new();
        list.append((1..=2).collect());

        let matched = list.extract_where(|_| false);
        assert!(matched.is_empty());
        assert_eq!(contents(&list), vec![1, 2]);
    }

    #[test]
    fn insert_in_sorted_position() {
        let list: List<u64> = List::new();
        list.append([10, 30].into_iter().collect());

        let res = list.insert_where(Chain::single(20), |prev, curr| {
            prev.map_or(true, |&p| p < 20) && curr.map_or(true, |&c| 20 < c)
        });
        assert!(res.is_ok());
        assert_eq!(contents(&list), vec![10, 20, 30]);
    }

    #[test]
    fn insert_at_entry_when_prev_is_none() {
        let list: List<u64> = List::new();
        list.append((1..=2).collect());

        assert!(list
            .insert_where(Chain::single(0), |prev, _| prev.is_none())
            .is_ok());
        assert_eq!(contents(&list), vec![0, 1, 2]);
    }

    #[test]
    fn insert_at_end_when_curr_is_none() {
        let list: List<u64> = List::new();
        list.append((1..=2).collect());

        assert!(list
            .insert_where(Chain::single(3), |_, curr| curr.is_none())
            .is_ok());
        assert_eq!(contents(&list), vec![1, 2, 3]);
    }

    #[test]
    fn insert_no_match_returns_chain_unchanged() {
        let list: List<u64> = List::new();
        list.append((1..=2).collect());

        let chain: Chain<u64> = (10..=12).collect();
        let back = list.insert_where(chain, |_, _| false).unwrap_err();
        assert_eq!(back.len(), 3);
        assert_eq!(back.into_iter().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(contents(&list), vec![1, 2]);
    }

    #[test]
    fn swap_exchanges_contents() {
        let a: List<u64> = List::new();
        let b: List<u64> = List::new();
        a.append([1, 2].into_iter().collect());
        b.append([3, 4].into_iter().collect());

        a.swap(&b);

        assert_eq!(contents(&a), vec![3, 4]);
        assert_eq!(contents(&b), vec![1, 2]);
        assert_eq!(contents(&a).len() + contents(&b).len(), 4);
    }

    #[test]
    fn swap_with_empty() {
        let a: List<u64> = List::new();
        let b: List<u64> = List::new();
        a.push_front(1);

        a.swap(&b);

        assert!(a.is_empty());
        assert_eq!(contents(&b), vec![1]);
    }

    #[test]
    fn swap_with_self_is_noop() {
        let a: List<u64> = List::new();
        a.append((1..=2).collect());

        a.swap(&a);

        assert_eq!(contents(&a), vec![1, 2]);
    }

    #[test]
    fn drain_detaches_everything_in_order() {
        let list: List<u64> = List::new();
        list.append((1..=4).collect());

        let all = list.drain();
        assert_eq!(all.len(), 4);
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(list.is_empty());

        assert!(list.drain().is_empty());
    }

    #[test]
    fn drop_destroys_remaining_payloads() {
        struct DropCounter(Arc<AtomicUsize>);
        impl Drop for DropCounter {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let list: List<DropCounter> = List::new();
        for _ in 0..3 {
            list.push_front(DropCounter(Arc::clone(&drops)));
        }

        // Moving a payload out must not run its destructor.
        let taken = list.take(|_| true).unwrap();
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(taken);
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        drop(list);
        assert_eq!(drops.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn concurrent_appends_preserve_every_node() {
        const THREADS: u64 = 8;

        let list: List<u64> = List::new();
        thread::scope(|s| {
            for tag in 0..THREADS {
                let list = &list;
                s.spawn(move || list.append(Chain::single(tag)));
            }
        });

        let mut seen = contents(&list);
        seen.sort_unstable();
        assert_eq!(seen, (0..THREADS).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_push_and_remove_conserves_nodes() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 500;

        let list: List<usize> = List::new();
        let removed = AtomicUsize::new(0);

        thread::scope(|s| {
            for p in 0..PRODUCERS {
                let list = &list;
                s.spawn(move || {
                    for i in 0..PER_PRODUCER {
                        list.push_front(p * PER_PRODUCER + i);
                    }
                });
            }

            let list = &list;
            let removed = &removed;
            s.spawn(move || {
                while removed.load(Ordering::Relaxed) < PRODUCERS * PER_PRODUCER {
                    let n = list.remove_where(|_| true);
                    removed.fetch_add(n, Ordering::Relaxed);
                    std::hint::spin_loop();
                }
            });
        });

        assert_eq!(removed.load(Ordering::Relaxed), PRODUCERS * PER_PRODUCER);
        assert!(list.is_empty());
    }

    #[test]
    fn concurrent_swap_conserves_total() {
        const ROUNDS: usize = 200;

        let a: List<u64> = List::new();
        let b: List<u64> = List::new();
        a.append((0..50).collect());
        b.append((50..100).collect());

        thread::scope(|s| {
            let (a, b) = (&a, &b);
            s.spawn(move || {
                for _ in 0..ROUNDS {
                    a.swap(b);
                }
            });
            s.spawn(move || {
                for i in 100..150 {
                    a.push_front(i);
                }
            });
        });

        let total = contents(&a).len() + contents(&b).len();
        assert_eq!(total, 150);
    }

    #[test]
    fn edge_locks_never_overlap() {
        // Each payload carries an index into a shared "held" table. The
        // predicate marks the node's slot while the sweep has it pinned; if
        // two threads ever pin the same node at once, the swap observes the
        // marker and the overlap count goes up.
        const NODES: usize = 64;
        const SCANS: usize = 50;

        let list: List<usize> = List::new();
        list.append((0..NODES).collect());

        let held: Arc<Vec<AtomicBool>> = Arc::new((0..NODES).map(|_| AtomicBool::new(false)).collect());
        let overlaps = Arc::new(AtomicUsize::new(0));

        thread::scope(|s| {
            for _ in 0..4 {
                let list = &list;
                let held = Arc::clone(&held);
                let overlaps = Arc::clone(&overlaps);
                s.spawn(move || {
                    for _ in 0..SCANS {
                        list.for_each(|&idx| {
                            if held[idx].swap(true, Ordering::SeqCst) {
                                overlaps.fetch_add(1, Ordering::SeqCst);
                            }
                            std::hint::spin_loop();
                            held[idx].store(false, Ordering::SeqCst);
                        });
                    }
                });
            }
        });

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert_eq!(contents(&list).len(), NODES);
    }
}
