//! The seam between the engine and the host's node tree.
//!
//! The engine never allocates or destroys nodes; it reads ordering and
//! structure through a [`TreeAdapter`] and learns about structural edits
//! through [`MutationBatch`] values pushed by the host. The engine is
//! push-driven only: outside a sweep it never polls the adapter.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// Read-only view of the host tree.
///
/// `Node` is an opaque, copyable handle. All five primitives must agree
/// with one another (`order` must be the preorder induced by
/// `parent`/`first_child`/`next_sibling`), and must be consistent for the
/// duration of one engine call.
pub trait TreeAdapter {
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Total document-order (preorder) comparison. An ancestor orders
    /// before its descendants.
    fn order(&self, a: Self::Node, b: Self::Node) -> Ordering;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn prev_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    fn last_child(&self, node: Self::Node) -> Option<Self::Node> {
        let mut child = self.first_child(node)?;
        while let Some(next) = self.next_sibling(child) {
            child = next;
        }
        Some(child)
    }

    /// Whether `node` is `ancestor` itself or one of its descendants.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}

/// Where a node was removed from, captured before the edit.
///
/// `next` is the document-order successor the removed subtree used to
/// precede; hosts that can cheaply capture it should, since it lets the
/// dirty set stay minimal. Without it the collector over-approximates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalContext<N> {
    pub parent: N,
    pub prev_sibling: Option<N>,
    pub next: Option<N>,
}

/// One batch of structural tree edits, delivered to
/// [`CounterEngine::apply_batch`](crate::engine::CounterEngine::apply_batch).
/// One batch produces exactly one sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch<N> {
    pub added: Vec<N>,
    pub removals: Vec<RemovalContext<N>>,
}

impl<N> MutationBatch<N> {
    pub fn new() -> Self {
        MutationBatch { added: Vec::new(), removals: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removals.is_empty()
    }

    /// Fold another batch into this one, preserving delivery order.
    pub fn merge(&mut self, other: MutationBatch<N>) {
        self.added.extend(other.added);
        self.removals.extend(other.removals);
    }
}

impl<N> Default for MutationBatch<N> {
    fn default() -> Self {
        MutationBatch::new()
    }
}
