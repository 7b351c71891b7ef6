//! A small arena-backed ordered tree implementing [`TreeAdapter`].
//!
//! For hosts that have no node tree of their own (and for tests), this
//! crate ships a reference implementation: records live in a `Vec`, links
//! are `Option<NodeId>` indices, and every structural edit returns the
//! [`MutationBatch`] describing it, ready to feed to
//! [`CounterEngine::apply_batch`](crate::engine::CounterEngine::apply_batch).
//!
//! The tree is shared: cloning a [`SimpleTree`] clones a handle to the same
//! store, so the host can keep one handle for mutation while the engine
//! owns another as its adapter.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::adapter::{MutationBatch, RemovalContext, TreeAdapter};

/// Stable handle to one node in a [`SimpleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Default, Clone)]
struct Slot {
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first: Option<NodeId>,
    last: Option<NodeId>,
}

#[derive(Debug, Default)]
struct Store {
    slots: Vec<Slot>,
}

impl Store {
    fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id.0 as usize]
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id.0 as usize]
    }

    /// Path from the node's top-level ancestor down to the node itself.
    fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(p) = self.slot(current).parent {
            path.push(p);
            current = p;
        }
        path.reverse();
        path
    }

    /// Document-order successor of `id`, skipping its own subtree.
    fn subtree_successor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if let Some(next) = self.slot(current).next {
                return Some(next);
            }
            current = self.slot(current).parent?;
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let slot = self.slot(id);
            (slot.parent, slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slot_mut(p).next = next,
            None => {
                if let Some(parent) = parent {
                    self.slot_mut(parent).first = next;
                }
            }
        }
        match next {
            Some(n) => self.slot_mut(n).prev = prev,
            None => {
                if let Some(parent) = parent {
                    self.slot_mut(parent).last = prev;
                }
            }
        }
        let slot = self.slot_mut(id);
        slot.parent = None;
        slot.prev = None;
        slot.next = None;
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        let mut child = self.slot(id).first;
        while let Some(c) = child {
            self.collect_subtree(c, out);
            child = self.slot(c).next;
        }
    }
}

/// Shared handle to an arena-backed ordered tree.
#[derive(Debug, Clone, Default)]
pub struct SimpleTree {
    store: Rc<RefCell<Store>>,
}

impl SimpleTree {
    pub fn new() -> Self {
        SimpleTree::default()
    }

    /// Allocate a detached node.
    pub fn create_node(&self) -> NodeId {
        let mut store = self.store.borrow_mut();
        let id = NodeId(store.slots.len() as u32);
        store.slots.push(Slot::default());
        id
    }

    /// Insert `child` under `parent`, before `reference` (or at the end).
    /// `child` must be detached. Returns the mutation describing the edit;
    /// the whole inserted subtree is listed as added.
    pub fn insert_before(
        &self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> MutationBatch<NodeId> {
        let mut store = self.store.borrow_mut();
        debug_assert!(store.slot(child).parent.is_none(), "child must be detached");
        let prev = match reference {
            Some(r) => store.slot(r).prev,
            None => store.slot(parent).last,
        };
        {
            let slot = store.slot_mut(child);
            slot.parent = Some(parent);
            slot.prev = prev;
            slot.next = reference;
        }
        match prev {
            Some(p) => store.slot_mut(p).next = Some(child),
            None => store.slot_mut(parent).first = Some(child),
        }
        match reference {
            Some(r) => store.slot_mut(r).prev = Some(child),
            None => store.slot_mut(parent).last = Some(child),
        }
        let mut added = Vec::new();
        store.collect_subtree(child, &mut added);
        MutationBatch { added, removals: Vec::new() }
    }

    /// Insert `child` as the last child of `parent`.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> MutationBatch<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Detach `node` (with its subtree) from its parent. A detached node is
    /// left alone and the batch is empty.
    pub fn remove(&self, node: NodeId) -> MutationBatch<NodeId> {
        let mut store = self.store.borrow_mut();
        let Some(parent) = store.slot(node).parent else {
            return MutationBatch::new();
        };
        let context = RemovalContext {
            parent,
            prev_sibling: store.slot(node).prev,
            next: store.subtree_successor(node),
        };
        store.unlink(node);
        MutationBatch { added: Vec::new(), removals: vec![context] }
    }

    /// The nodes of `root`'s subtree in document order.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let store = self.store.borrow();
        let mut out = Vec::new();
        store.collect_subtree(root, &mut out);
        out
    }
}

impl TreeAdapter for SimpleTree {
    type Node = NodeId;

    fn order(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let store = self.store.borrow();
        let path_a = store.path_from_root(a);
        let path_b = store.path_from_root(b);
        let common = path_a.len().min(path_b.len());
        for i in 0..common {
            if path_a[i] == path_b[i] {
                continue;
            }
            // Diverged: the two entries are siblings; scan forward from one.
            let mut cursor = store.slot(path_a[i]).next;
            while let Some(n) = cursor {
                if n == path_b[i] {
                    return Ordering::Less;
                }
                cursor = store.slot(n).next;
            }
            return Ordering::Greater;
        }
        // One path is a prefix of the other: the ancestor orders first.
        if path_a.len() < path_b.len() {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.store.borrow().slot(node).parent
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.store.borrow().slot(node).prev
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.store.borrow().slot(node).next
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.store.borrow().slot(node).first
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.store.borrow().slot(node).last
    }
}
