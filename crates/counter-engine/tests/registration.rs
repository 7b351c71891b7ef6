mod common;

use std::cell::RefCell;
use std::rc::Rc;

use counter_engine::{Action, CounterEngine, CounterId, EngineError, SimpleTree};

use common::logger;

#[test]
fn duplicate_registration_is_rejected_and_changes_nothing() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    tree.append_child(root, a);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let handle = engine.register(a, counter, Action::reset(9), logger(&log)).unwrap();

    let second = engine.register(a, counter, Action::reset(1), |_| {});
    assert!(matches!(second, Err(EngineError::DuplicateRegistration)));
    assert_eq!(engine.counter_value(a, counter), 9);
    assert_eq!(*log.borrow(), vec![9]);

    // The original handle is still live.
    engine.unregister(handle);
    assert_eq!(engine.counter_value(a, counter), 0);
}

#[test]
fn watch_fires_immediately_when_a_stack_exists() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(root, b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    engine.register(a, counter, Action::reset(5), |_| {}).unwrap();

    // b inherits a's scope without owning any registration.
    let log = Rc::new(RefCell::new(Vec::new()));
    engine.watch(b, counter, logger(&log));
    assert_eq!(*log.borrow(), vec![5]);

    engine.set_actions(a, counter_engine::Actions::from_iter([(counter, Action::reset(6))]), None);
    assert_eq!(*log.borrow(), vec![5, 6]);
}

#[test]
fn watch_on_an_unresolved_node_stays_silent_until_a_sweep() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    tree.append_child(root, a);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    engine.watch(a, counter, logger(&log));
    assert!(log.borrow().is_empty());

    engine.register(a, counter, Action::reset(3), |_| {}).unwrap();
    assert_eq!(*log.borrow(), vec![3]);
}

#[test]
fn unregister_restores_inheritance_downstream() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(root, b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    let handle = engine.register(a, counter, Action::reset(10), |_| {}).unwrap();
    engine.register(b, counter, Action::increment(1), |_| {}).unwrap();
    assert_eq!(engine.counter_value(b, counter), 11);

    engine.unregister(handle);
    assert_eq!(engine.counter_value(a, counter), 0);
    assert_eq!(engine.counter_value(b, counter), 1);

    // Tearing down twice is a no-op.
    engine.unregister(handle);
    assert_eq!(engine.counter_value(b, counter), 1);
}

#[test]
fn unwatch_stops_deliveries() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    tree.append_child(root, a);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    let handle_a = engine.register(a, counter, Action::reset(1), |_| {}).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let watch = engine.watch(a, counter, logger(&log));
    assert_eq!(*log.borrow(), vec![1]);

    engine.unwatch(watch);
    engine.set_actions(a, counter_engine::Actions::from_iter([(counter, Action::reset(2))]), None);
    assert_eq!(*log.borrow(), vec![1]);

    engine.unwatch(watch);
    engine.unregister(handle_a);
}

#[test]
fn overlapping_roots_are_rejected() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let left = tree.create_node();
    let left_leaf = tree.create_node();
    let right = tree.create_node();
    tree.append_child(root, left);
    tree.append_child(left, left_leaf);
    tree.append_child(root, right);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(left).unwrap();

    assert!(matches!(engine.track_root(left), Err(EngineError::OverlappingRoot)));
    assert!(matches!(engine.track_root(left_leaf), Err(EngineError::OverlappingRoot)));
    assert!(matches!(engine.track_root(root), Err(EngineError::OverlappingRoot)));

    // Disjoint subtrees may be tracked side by side.
    assert!(engine.track_root(right).is_ok());
}

#[test]
fn untracked_subtrees_stop_sweeping() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    tree.append_child(root, a);

    let mut engine = CounterEngine::new(tree.clone());
    let tracking = engine.track_root(root).unwrap();
    let counter = CounterId::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    engine.register(a, counter, Action::reset(1), logger(&log)).unwrap();
    assert_eq!(*log.borrow(), vec![1]);

    engine.untrack_root(tracking);
    engine.set_actions(a, counter_engine::Actions::from_iter([(counter, Action::reset(2))]), None);

    // The stale resolution is retained but no longer maintained.
    assert_eq!(*log.borrow(), vec![1]);
    assert_eq!(engine.counter_value(a, counter), 1);
}

#[test]
fn registering_outside_any_root_resolves_lazily() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    tree.append_child(root, a);

    let mut engine = CounterEngine::new(tree.clone());
    let counter = CounterId::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    engine.register(a, counter, Action::reset(4), logger(&log)).unwrap();
    // No tracked root yet: the listener hears the unresolved (empty) state.
    assert_eq!(*log.borrow(), vec![0]);

    engine.track_root(root).unwrap();
    assert_eq!(*log.borrow(), vec![0, 4]);
}
