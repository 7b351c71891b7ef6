//! Registration/subscription side tables.
//!
//! Per-node engine state lives in an arena of records addressed by stable
//! `u32` slots, with a `HashMap` from node handle to slot. Records are
//! created on demand and explicitly released once nothing refers to them —
//! no reliance on the host collecting anything. Listener callbacks are
//! stored per handle id and invoked by the engine after a sweep's walk
//! completes.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::action::{Actions, CounterId, CounterInstance, Stacks};

/// Listener invoked with a counter's freshly resolved stack; an empty
/// slice means the counter's scopes all closed and it reads as 0.
pub type ChangeCallback<N> = Box<dyn FnMut(&[CounterInstance<N>])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandleKind {
    Managed,
    Watch,
}

pub(crate) struct HandleRecord<N> {
    pub node: N,
    pub counter: CounterId,
    pub kind: HandleKind,
    pub callback: ChangeCallback<N>,
}

/// Engine-side state for one host node.
pub(crate) struct NodeRecord<N> {
    pub node: N,
    /// Compiled actions applied when this node is resolved.
    pub actions: Actions,
    /// Actions of the node's before-pseudo-node; empty when it has none.
    pub before_actions: Actions,
    /// Resolved counter stacks from the last sweep that visited this node.
    pub stacks: Stacks<N>,
    /// Lazily materialized secondary slot: the before-pseudo-node's
    /// resolved stacks, present only while it has actions.
    pub before_stacks: Option<Stacks<N>>,
    /// Managed registration handle per counter; at most one each.
    pub managed: IndexMap<CounterId, u64>,
    /// Watch handle ids observing this node (any counter).
    pub watchers: Vec<u64>,
}

impl<N> NodeRecord<N> {
    fn new(node: N) -> Self {
        NodeRecord {
            node,
            actions: Actions::new(),
            before_actions: Actions::new(),
            stacks: Stacks::new(),
            before_stacks: None,
            managed: IndexMap::new(),
            watchers: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.actions.is_empty()
            && self.before_actions.is_empty()
            && self.stacks.is_empty()
            && self.before_stacks.is_none()
            && self.managed.is_empty()
            && self.watchers.is_empty()
    }
}

pub(crate) struct RegistrationTable<N> {
    slots: Vec<Option<NodeRecord<N>>>,
    free: Vec<u32>,
    index: HashMap<N, u32>,
    handles: HashMap<u64, HandleRecord<N>>,
}

impl<N: Copy + Eq + Hash> RegistrationTable<N> {
    pub fn new() -> Self {
        RegistrationTable {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    pub fn slot_of(&self, node: N) -> Option<u32> {
        self.index.get(&node).copied()
    }

    /// Slot for `node`, allocating an empty record if needed.
    pub fn ensure(&mut self, node: N) -> u32 {
        if let Some(slot) = self.slot_of(node) {
            return slot;
        }
        let record = NodeRecord::new(node);
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(record);
                slot
            }
            None => {
                self.slots.push(Some(record));
                (self.slots.len() - 1) as u32
            }
        };
        self.index.insert(node, slot);
        slot
    }

    pub fn record(&self, slot: u32) -> &NodeRecord<N> {
        self.slots[slot as usize]
            .as_ref()
            .unwrap_or_else(|| unreachable!("live slot {slot} has no record"))
    }

    pub fn record_mut(&mut self, slot: u32) -> &mut NodeRecord<N> {
        self.slots[slot as usize]
            .as_mut()
            .unwrap_or_else(|| unreachable!("live slot {slot} has no record"))
    }

    pub fn record_of(&self, node: N) -> Option<&NodeRecord<N>> {
        self.slot_of(node).map(|slot| self.record(slot))
    }

    /// Release the record when nothing refers to it any more.
    pub fn maybe_release(&mut self, slot: u32) {
        let Some(record) = self.slots[slot as usize].as_ref() else {
            return;
        };
        if record.is_empty() {
            let node = record.node;
            self.slots[slot as usize] = None;
            self.free.push(slot);
            self.index.remove(&node);
        }
    }

    /// Clones of the node's action maps (own, before-pseudo).
    pub fn actions_of(&self, node: N) -> (Actions, Actions) {
        match self.record_of(node) {
            Some(record) => (record.actions.clone(), record.before_actions.clone()),
            None => (Actions::new(), Actions::new()),
        }
    }

    pub fn stacks_of(&self, node: N) -> Stacks<N> {
        self.record_of(node)
            .map(|record| record.stacks.clone())
            .unwrap_or_default()
    }

    pub fn before_stacks_of(&self, node: N) -> Option<Stacks<N>> {
        self.record_of(node).and_then(|record| record.before_stacks.clone())
    }

    pub fn add_handle(&mut self, id: u64, record: HandleRecord<N>) {
        self.handles.insert(id, record);
    }

    pub fn handle(&self, id: u64) -> Option<&HandleRecord<N>> {
        self.handles.get(&id)
    }

    pub fn take_handle(&mut self, id: u64) -> Option<HandleRecord<N>> {
        self.handles.remove(&id)
    }

    /// Invoke a listener with a resolved stack. Unknown ids are ignored;
    /// the handle may have been torn down between planning and delivery.
    pub fn invoke(&mut self, id: u64, stack: &[CounterInstance<N>]) {
        if let Some(handle) = self.handles.get_mut(&id) {
            (handle.callback)(stack);
        }
    }
}
