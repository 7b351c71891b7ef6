//! The counter propagation engine.
//!
//! Maintains, per counter identity, an ordered stack of `(origin, value)`
//! scopes on every node of each tracked subtree, and recomputes them
//! incrementally when the host tree mutates. One mutation batch produces
//! exactly one sweep: a forward preorder walk from each dirty node that
//! stops as soon as a node's resolved stacks come out unchanged, since
//! every later node's inputs derive only from its document-order
//! predecessor's output.
//!
//! Listener callbacks run after the walk finishes, never mid-walk, and must
//! not re-enter the engine's mutating API synchronously; defer any
//! resulting `register`/`set_actions` until the sweep has returned.

use std::cmp::Ordering;

use thiserror::Error;

use crate::action::{Action, Actions, CounterId, CounterInstance, CounterStack, Origin, Stacks};
use crate::adapter::{MutationBatch, TreeAdapter};
use crate::registry::{ChangeCallback, HandleKind, HandleRecord, RegistrationTable};

#[derive(Debug, Error)]
pub enum EngineError {
    /// A managed registration for this `(node, counter)` pair already
    /// exists. The call changes nothing.
    #[error("node already has a managed registration for this counter")]
    DuplicateRegistration,
    /// The proposed root equals, contains, or is contained by an already
    /// tracked root. The call changes nothing.
    #[error("tracked roots may not overlap")]
    OverlappingRoot,
}

/// Handle to a managed registration, returned by
/// [`CounterEngine::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationHandle(u64);

/// Handle to a read-only observer, returned by [`CounterEngine::watch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchHandle(u64);

/// Handle to a tracked subtree root, returned by
/// [`CounterEngine::track_root`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootHandle(u64);

/// Incremental counter propagation over one host tree.
pub struct CounterEngine<T: TreeAdapter> {
    tree: T,
    table: RegistrationTable<T::Node>,
    roots: Vec<(u64, T::Node)>,
    next_handle: u64,
    next_root: u64,
    in_sweep: bool,
}

impl<T: TreeAdapter> CounterEngine<T> {
    pub fn new(tree: T) -> Self {
        CounterEngine {
            tree,
            table: RegistrationTable::new(),
            roots: Vec::new(),
            next_handle: 1,
            next_root: 1,
            in_sweep: false,
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Declare `root` as the top of a tracked subtree and resolve every
    /// node inside it.
    pub fn track_root(&mut self, root: T::Node) -> Result<RootHandle, EngineError> {
        debug_assert!(!self.in_sweep, "track_root called from a sweep callback");
        for (_, existing) in &self.roots {
            if self.tree.contains(*existing, root) || self.tree.contains(root, *existing) {
                return Err(EngineError::OverlappingRoot);
            }
        }
        let id = self.next_root;
        self.next_root += 1;
        self.roots.push((id, root));
        let subtree = self.collect_subtree(root);
        self.sweep(subtree);
        Ok(RootHandle(id))
    }

    /// Stop tracking. Resolved state inside the subtree is kept but no
    /// longer maintained.
    pub fn untrack_root(&mut self, handle: RootHandle) {
        debug_assert!(!self.in_sweep, "untrack_root called from a sweep callback");
        self.roots.retain(|(id, _)| *id != handle.0);
    }

    /// Install a managed registration: `node` drives `counter` with
    /// `action`, and `on_change` observes its resolved stack. The callback
    /// is invoked at least once before this returns.
    pub fn register(
        &mut self,
        node: T::Node,
        counter: CounterId,
        action: Action,
        on_change: impl FnMut(&[CounterInstance<T::Node>]) + 'static,
    ) -> Result<RegistrationHandle, EngineError> {
        debug_assert!(!self.in_sweep, "register called from a sweep callback");
        let slot = self.table.ensure(node);
        if self.table.record(slot).managed.contains_key(&counter) {
            self.table.maybe_release(slot);
            return Err(EngineError::DuplicateRegistration);
        }
        let id = self.mint_handle();
        {
            let record = self.table.record_mut(slot);
            record.managed.insert(counter, id);
            record.actions.insert(counter, action);
        }
        self.table.add_handle(
            id,
            HandleRecord {
                node,
                counter,
                kind: HandleKind::Managed,
                callback: Box::new(on_change) as ChangeCallback<T::Node>,
            },
        );
        let notified = if self.root_of(node).is_some() {
            self.sweep(vec![node])
        } else {
            Vec::new()
        };
        if !notified.contains(&id) {
            // The sweep saw no stack change (or the node is untracked);
            // deliver the current resolution so the listener always hears
            // from us at least once.
            let stack = self.current_stack(node, counter);
            self.table.invoke(id, &stack);
        }
        Ok(RegistrationHandle(id))
    }

    /// Add a read-only observer for `(node, counter)`. If the node already
    /// has a resolved stack for the counter, `on_change` fires immediately.
    pub fn watch(
        &mut self,
        node: T::Node,
        counter: CounterId,
        on_change: impl FnMut(&[CounterInstance<T::Node>]) + 'static,
    ) -> WatchHandle {
        debug_assert!(!self.in_sweep, "watch called from a sweep callback");
        let id = self.mint_handle();
        let existing = self
            .table
            .record_of(node)
            .and_then(|record| record.stacks.get(&counter).cloned());
        let slot = self.table.ensure(node);
        self.table.record_mut(slot).watchers.push(id);
        self.table.add_handle(
            id,
            HandleRecord {
                node,
                counter,
                kind: HandleKind::Watch,
                callback: Box::new(on_change) as ChangeCallback<T::Node>,
            },
        );
        if let Some(stack) = existing {
            self.table.invoke(id, &stack);
        }
        WatchHandle(id)
    }

    /// Tear down a managed registration and restore default inheritance
    /// from the node onward. Unknown or repeated handles are a no-op.
    pub fn unregister(&mut self, handle: RegistrationHandle) {
        debug_assert!(!self.in_sweep, "unregister called from a sweep callback");
        let Some(record) = self.table.take_handle(handle.0) else {
            return;
        };
        debug_assert_eq!(record.kind, HandleKind::Managed);
        if let Some(slot) = self.table.slot_of(record.node) {
            let node_record = self.table.record_mut(slot);
            if node_record.managed.get(&record.counter) == Some(&handle.0) {
                node_record.managed.shift_remove(&record.counter);
                node_record.actions.shift_remove(&record.counter);
            }
            self.table.maybe_release(slot);
        }
        if self.root_of(record.node).is_some() {
            self.sweep(vec![record.node]);
        }
    }

    /// Remove an observer. Unknown or repeated handles are a no-op.
    pub fn unwatch(&mut self, handle: WatchHandle) {
        debug_assert!(!self.in_sweep, "unwatch called from a sweep callback");
        let Some(record) = self.table.take_handle(handle.0) else {
            return;
        };
        debug_assert_eq!(record.kind, HandleKind::Watch);
        if let Some(slot) = self.table.slot_of(record.node) {
            self.table.record_mut(slot).watchers.retain(|id| *id != handle.0);
            self.table.maybe_release(slot);
        }
    }

    /// Replace the node's compiled actions wholesale (its own and,
    /// optionally, its before-pseudo-node's). Sweeps only when the node
    /// lies inside a tracked subtree.
    pub fn set_actions(
        &mut self,
        node: T::Node,
        actions: Actions,
        before_actions: Option<Actions>,
    ) {
        debug_assert!(!self.in_sweep, "set_actions called from a sweep callback");
        let slot = self.table.ensure(node);
        {
            let record = self.table.record_mut(slot);
            record.actions = actions;
            record.before_actions = before_actions.unwrap_or_default();
        }
        self.table.maybe_release(slot);
        if self.root_of(node).is_some() {
            self.sweep(vec![node]);
        }
    }

    /// Feed one batch of structural edits through the dirty-set collector
    /// and run the resulting sweep.
    pub fn apply_batch(&mut self, batch: MutationBatch<T::Node>) {
        debug_assert!(!self.in_sweep, "apply_batch called from a sweep callback");
        let mut dirty = batch.added;
        for context in batch.removals {
            if let Some(next) = context.next {
                dirty.push(next);
                continue;
            }
            // No concrete successor reference: over-approximate. Every
            // remaining child of the former parent is re-resolved, plus the
            // first node after the parent's subtree — removing a last child
            // changes that node's value source.
            let mut child = self.tree.first_child(context.parent);
            while let Some(c) = child {
                dirty.push(c);
                child = self.tree.next_sibling(c);
            }
            if let Some(root) = self.root_of(context.parent) {
                if let Some(successor) = self.subtree_successor(context.parent, root) {
                    dirty.push(successor);
                }
            }
        }
        self.sweep(dirty);
    }

    /// The node's resolved stack for `counter`, if any.
    pub fn resolved_stack(&self, node: T::Node, counter: CounterId) -> Option<&[CounterInstance<T::Node>]> {
        self.table
            .record_of(node)
            .and_then(|record| record.stacks.get(&counter))
            .map(Vec::as_slice)
    }

    /// The counter's current value at `node`; unresolved counters read 0.
    pub fn counter_value(&self, node: T::Node, counter: CounterId) -> i32 {
        self.resolved_stack(node, counter)
            .and_then(|stack| stack.last())
            .map_or(0, |instance| instance.value)
    }

    /// The before-pseudo-node's resolved stack for `counter`, if any.
    pub fn before_stack(&self, node: T::Node, counter: CounterId) -> Option<&[CounterInstance<T::Node>]> {
        self.table
            .record_of(node)
            .and_then(|record| record.before_stacks.as_ref())
            .and_then(|stacks| stacks.get(&counter))
            .map(Vec::as_slice)
    }

    // --- sweep -------------------------------------------------------------

    /// Resolve every dirty node, walking forward in document order past
    /// each until the stacks stop changing, then fan out notifications.
    /// Returns the handle ids that were notified.
    fn sweep(&mut self, mut dirty: Vec<T::Node>) -> Vec<u64> {
        dirty.retain(|n| self.root_of(*n).is_some());
        if dirty.is_empty() {
            return Vec::new();
        }
        dirty.sort_by(|a, b| self.tree.order(*a, *b));
        dirty.dedup();

        self.in_sweep = true;
        let mut changed: Vec<(T::Node, CounterId)> = Vec::new();
        let mut i = 0;
        while i < dirty.len() {
            let start = dirty[i];
            i += 1;
            // retain() above guarantees a root.
            let Some(root) = self.root_of(start) else {
                continue;
            };
            let mut current = start;
            let last;
            loop {
                let node_changed = self.resolve_node(current, root, &mut changed);
                if !node_changed {
                    last = current;
                    break;
                }
                match self.preorder_next(current, root) {
                    Some(next) => current = next,
                    None => {
                        last = current;
                        break;
                    }
                }
            }
            // Everything up to `last` is freshly resolved; drop dirty
            // entries the walk already covered.
            while i < dirty.len() && self.tree.order(dirty[i], last) != Ordering::Greater {
                i += 1;
            }
        }
        let notified = self.notify(&changed);
        self.in_sweep = false;
        notified
    }

    /// Recompute one node's stacks (and its before-pseudo-node's) from its
    /// sources. Returns whether anything changed, which decides whether the
    /// walk continues past this node.
    fn resolve_node(
        &mut self,
        node: T::Node,
        root: T::Node,
        changed: &mut Vec<(T::Node, CounterId)>,
    ) -> bool {
        let scope_source = self.scope_source(node, root);
        let value_source = self.value_source(node, root);
        let (actions, before_actions) = self.table.actions_of(node);
        let new_stacks =
            self.compute_stacks(&scope_source, &value_source, &actions, node, false);
        // The before-pseudo-node reads its owner's fully post-action state:
        // both of its sources are the stacks just computed above.
        let new_before = if before_actions.is_empty() {
            None
        } else {
            Some(self.compute_stacks(&new_stacks, &new_stacks, &before_actions, node, true))
        };

        let has_record = self.table.slot_of(node).is_some();
        if !has_record && new_stacks.is_empty() && new_before.is_none() {
            return false;
        }
        let slot = self.table.ensure(node);
        let record = self.table.record_mut(slot);
        let mut diffs: Vec<CounterId> = Vec::new();
        for (counter, stack) in &new_stacks {
            if record.stacks.get(counter) != Some(stack) {
                diffs.push(*counter);
            }
        }
        for counter in record.stacks.keys() {
            if !new_stacks.contains_key(counter) {
                diffs.push(*counter);
            }
        }
        let before_changed = record.before_stacks != new_before;
        record.stacks = new_stacks;
        record.before_stacks = new_before;
        let own_changed = !diffs.is_empty();
        for counter in diffs {
            changed.push((node, counter));
        }
        self.table.maybe_release(slot);
        own_changed || before_changed
    }

    /// Scope source: previous sibling's stacks, else the parent's
    /// before-pseudo stacks, else the parent's own. Decides which ancestor
    /// scopes are still in frame.
    fn scope_source(&self, node: T::Node, root: T::Node) -> Stacks<T::Node> {
        if node == root {
            return Stacks::new();
        }
        if let Some(sibling) = self.tree.prev_sibling(node) {
            return self.table.stacks_of(sibling);
        }
        match self.tree.parent(node) {
            Some(parent) => self
                .table
                .before_stacks_of(parent)
                .unwrap_or_else(|| self.table.stacks_of(parent)),
            None => Stacks::new(),
        }
    }

    /// Value source: the document-order immediate predecessor's stacks,
    /// which may belong to a before-pseudo-node. Carries the most recently
    /// assigned values forward.
    fn value_source(&self, node: T::Node, root: T::Node) -> Stacks<T::Node> {
        if node == root {
            return Stacks::new();
        }
        if let Some(sibling) = self.tree.prev_sibling(node) {
            // Deepest last node of the sibling's subtree; a before-pseudo
            // is its owner's first child, so it is last only when the
            // owner has no real children.
            let mut current = sibling;
            loop {
                if let Some(child) = self.tree.last_child(current) {
                    current = child;
                    continue;
                }
                if let Some(before) = self.table.before_stacks_of(current) {
                    return before;
                }
                return self.table.stacks_of(current);
            }
        }
        match self.tree.parent(node) {
            Some(parent) => self
                .table
                .before_stacks_of(parent)
                .unwrap_or_else(|| self.table.stacks_of(parent)),
            None => Stacks::new(),
        }
    }

    /// Merge both sources and apply the node's actions, per counter.
    fn compute_stacks(
        &self,
        scope_source: &Stacks<T::Node>,
        value_source: &Stacks<T::Node>,
        actions: &Actions,
        owner: T::Node,
        before: bool,
    ) -> Stacks<T::Node> {
        let origin = if before { Origin::Before(owner) } else { Origin::Node(owner) };
        let mut out = Stacks::new();
        for counter in scope_source.keys().chain(value_source.keys()) {
            if out.contains_key(counter) {
                continue;
            }
            let merged = merge_stacks(
                scope_source.get(counter).map(Vec::as_slice).unwrap_or(&[]),
                value_source.get(counter).map(Vec::as_slice).unwrap_or(&[]),
            );
            if !merged.is_empty() {
                out.insert(*counter, merged);
            }
        }
        for (counter, action) in actions {
            if action.is_noop() {
                continue;
            }
            let stack = out.entry(*counter).or_default();
            self.apply_action(stack, action, origin, owner, before);
        }
        out.retain(|_, stack| !stack.is_empty());
        out
    }

    /// Apply one compiled action to a merged stack, in the order reset,
    /// increment, set.
    fn apply_action(
        &self,
        stack: &mut CounterStack<T::Node>,
        action: &Action,
        origin: Origin<T::Node>,
        owner: T::Node,
        before: bool,
    ) {
        if let Some(value) = action.reset {
            // A reset replaces the top entry when that entry's scope was
            // opened by this same origin, or by a real node that is an
            // order-preceding sibling of the owner (never an ancestor, and
            // never a before-pseudo origin). Otherwise it opens a nested
            // scope.
            let replace = match stack.last() {
                Some(top) if top.origin == origin => true,
                Some(top) => match top.origin {
                    Origin::Node(other) if !before && other != owner => {
                        self.tree.parent(other) == self.tree.parent(owner)
                            && self.tree.order(other, owner) == Ordering::Less
                    }
                    _ => false,
                },
                None => false,
            };
            let instance = CounterInstance { origin, value };
            if replace {
                if let Some(top) = stack.last_mut() {
                    *top = instance;
                }
            } else {
                stack.push(instance);
            }
        }
        if let Some(delta) = action.increment {
            match stack.last_mut() {
                Some(top) => top.value = top.value.wrapping_add(delta),
                // Implicit scope at value 0, then incremented.
                None => stack.push(CounterInstance { origin, value: delta }),
            }
        }
        if let Some(value) = action.set {
            match stack.last_mut() {
                Some(top) => top.value = value,
                None => stack.push(CounterInstance { origin, value }),
            }
        }
    }

    /// Deliver one callback per changed `(node, counter)` listener.
    fn notify(&mut self, changed: &[(T::Node, CounterId)]) -> Vec<u64> {
        let mut planned: Vec<(u64, CounterStack<T::Node>)> = Vec::new();
        for (node, counter) in changed {
            let Some(record) = self.table.record_of(*node) else {
                // Record released: the stack disappeared and nothing
                // listens there any more.
                continue;
            };
            let stack = record.stacks.get(counter).cloned().unwrap_or_default();
            if let Some(id) = record.managed.get(counter) {
                planned.push((*id, stack.clone()));
            }
            for id in &record.watchers {
                if let Some(handle) = self.table.handle(*id) {
                    if handle.counter == *counter {
                        planned.push((*id, stack.clone()));
                    }
                }
            }
        }
        let mut notified = Vec::with_capacity(planned.len());
        for (id, stack) in planned {
            self.table.invoke(id, &stack);
            notified.push(id);
        }
        notified
    }

    // --- helpers -----------------------------------------------------------

    fn mint_handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn root_of(&self, node: T::Node) -> Option<T::Node> {
        self.roots
            .iter()
            .find(|(_, root)| self.tree.contains(*root, node))
            .map(|(_, root)| *root)
    }

    fn current_stack(&self, node: T::Node, counter: CounterId) -> CounterStack<T::Node> {
        self.table
            .record_of(node)
            .and_then(|record| record.stacks.get(&counter).cloned())
            .unwrap_or_default()
    }

    /// Next node in preorder, not leaving `root`'s subtree.
    fn preorder_next(&self, node: T::Node, root: T::Node) -> Option<T::Node> {
        if let Some(child) = self.tree.first_child(node) {
            return Some(child);
        }
        self.subtree_successor(node, root)
    }

    /// First node after `node`'s subtree, not leaving `root`'s subtree.
    fn subtree_successor(&self, node: T::Node, root: T::Node) -> Option<T::Node> {
        let mut current = node;
        loop {
            if current == root {
                return None;
            }
            if let Some(sibling) = self.tree.next_sibling(current) {
                return Some(sibling);
            }
            current = self.tree.parent(current)?;
        }
    }

    fn collect_subtree(&self, root: T::Node) -> Vec<T::Node> {
        let mut out = Vec::new();
        let mut current = Some(root);
        while let Some(node) = current {
            out.push(node);
            current = self.preorder_next(node, root);
        }
        out
    }
}

/// Keep the longest common prefix of the two source stacks, matching
/// entries pairwise by origin and taking values from the value source.
/// Leaving a nested scope discards deeper counters while preserving shared
/// ancestors.
fn merge_stacks<N: Copy + Eq>(
    scope: &[CounterInstance<N>],
    value: &[CounterInstance<N>],
) -> CounterStack<N> {
    let mut out = Vec::new();
    for (scope_entry, value_entry) in scope.iter().zip(value.iter()) {
        if scope_entry.origin == value_entry.origin {
            out.push(*value_entry);
        } else {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct N(u8);

    fn inst(origin: Origin<N>, value: i32) -> CounterInstance<N> {
        CounterInstance { origin, value }
    }

    #[test]
    fn merge_keeps_common_origin_prefix_with_source_values() {
        let a = Origin::Node(N(1));
        let b = Origin::Node(N(2));
        let c = Origin::Node(N(3));
        let scope = vec![inst(a, 5), inst(b, 1)];
        let value = vec![inst(a, 9), inst(c, 7)];
        assert_eq!(merge_stacks(&scope, &value), vec![inst(a, 9)]);
    }

    #[test]
    fn merge_drops_scopes_deeper_than_the_scope_source() {
        let a = Origin::Node(N(1));
        let nested = Origin::Node(N(9));
        let scope = vec![inst(a, 5)];
        let value = vec![inst(a, 6), inst(nested, 3)];
        assert_eq!(merge_stacks(&scope, &value), vec![inst(a, 6)]);
    }

    #[test]
    fn merge_of_disjoint_stacks_is_empty() {
        let a = Origin::Node(N(1));
        let b = Origin::Node(N(2));
        assert_eq!(merge_stacks(&[inst(a, 1)], &[inst(b, 1)]), vec![]);
    }
}
