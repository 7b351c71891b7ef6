//! Counter identities, actions, and stack entries.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

static NEXT_COUNTER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque token naming one counter namespace.
///
/// Minted once per logical counter and used only as a map key; two tokens
/// are the same counter exactly when they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterId(u64);

impl CounterId {
    /// Mint a fresh, process-unique counter identity.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        CounterId(NEXT_COUNTER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Compiled counter actions for one node and one counter identity,
/// applied in the order reset, increment, set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Action {
    pub reset: Option<i32>,
    pub increment: Option<i32>,
    pub set: Option<i32>,
}

impl Action {
    pub fn reset(value: i32) -> Self {
        Action { reset: Some(value), ..Action::default() }
    }

    pub fn increment(delta: i32) -> Self {
        Action { increment: Some(delta), ..Action::default() }
    }

    pub fn set(value: i32) -> Self {
        Action { set: Some(value), ..Action::default() }
    }

    pub fn is_noop(&self) -> bool {
        self.reset.is_none() && self.increment.is_none() && self.set.is_none()
    }
}

/// The real node or before-pseudo-node that opened a counter scope.
///
/// A before-pseudo-node is a virtual, order-first child implicitly attached
/// to a real node; it never appears in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin<N> {
    Node(N),
    Before(N),
}

impl<N: Copy> Origin<N> {
    /// The real node carrying this origin.
    pub fn owner(&self) -> N {
        match self {
            Origin::Node(n) | Origin::Before(n) => *n,
        }
    }

    pub fn is_before(&self) -> bool {
        matches!(self, Origin::Before(_))
    }
}

/// One entry in a counter's stack: a scope opened at `origin`, currently
/// holding `value`. Instances are rebuilt every sweep and compared by
/// `(origin, value)` for change detection only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterInstance<N> {
    pub origin: Origin<N>,
    pub value: i32,
}

/// Ordered counter stack; the last entry is the counter's current value.
pub type CounterStack<N> = Vec<CounterInstance<N>>;

/// Per-counter action map compiled for one node.
pub type Actions = IndexMap<CounterId, Action>;

/// Per-counter resolved stacks for one node.
pub type Stacks<N> = IndexMap<CounterId, CounterStack<N>>;

/// Current value of a stack: the top entry, or 0 when no scope is open.
pub fn stack_value<N>(stack: &[CounterInstance<N>]) -> i32 {
    stack.last().map_or(0, |instance| instance.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_ids_are_unique() {
        let a = CounterId::new();
        let b = CounterId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_stack_reads_zero() {
        let stack: CounterStack<u32> = Vec::new();
        assert_eq!(stack_value(&stack), 0);
    }
}
