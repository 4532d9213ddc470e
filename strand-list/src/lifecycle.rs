//! Node allocation and reclamation.
//!
//! Every removal path frees a node through exactly one of two routes,
//! selected per payload type at compile time (monomorphization — there is no
//! per-call branch in the generated code):
//!
//! - [`dispose`]: destroy the payload in place, then free the node. For
//!   payload types without drop glue the destroy step compiles to nothing
//!   and this is a bare free.
//! - [`reclaim`]: free the node only, after the payload has been moved out
//!   (or for a node whose payload was never initialized).
//!
//! The remaining lifecycle capabilities map onto the language: construction
//! happens where values enter a [`Chain`](crate::Chain), relocation is a
//! Rust move, and deep copy is `Chain: Clone where T: Clone`.

use std::ptr::{self, NonNull};

use crate::node::Node;

/// Allocates an unlinked data node owning `value`.
pub(crate) fn alloc_node<T>(value: T) -> NonNull<Node<T>> {
    let node = Box::into_raw(Box::new(Node::with_data(value)));
    // Safety: Box never hands out null.
    unsafe { NonNull::new_unchecked(node) }
}

/// Destroys the payload in place, then frees the node.
///
/// # Safety
///
/// `node` must be exclusively owned, heap-allocated by [`alloc_node`], with
/// an initialized payload. The node must not be reachable from any list.
pub(crate) unsafe fn dispose<T>(node: NonNull<Node<T>>) {
    unsafe {
        ptr::drop_in_place((*node.as_ptr()).data.as_mut_ptr());
        reclaim(node);
    }
}

/// Frees the node without touching the payload slot.
///
/// # Safety
///
/// `node` must be exclusively owned and heap-allocated by [`alloc_node`],
/// and its payload must have been moved out already (or never initialized).
/// The node must not be reachable from any list.
pub(crate) unsafe fn reclaim<T>(node: NonNull<Node<T>>) {
    // Node has no drop glue of its own; this only releases the allocation.
    drop(unsafe { Box::from_raw(node.as_ptr()) });
}
