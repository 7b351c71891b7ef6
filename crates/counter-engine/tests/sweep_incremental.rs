mod common;

use std::cell::RefCell;
use std::rc::Rc;

use counter_engine::{
    Action, Actions, CounterEngine, CounterId, MutationBatch, RemovalContext, SimpleTree,
};

use common::logger;

#[test]
fn insertion_renumbers_only_from_the_insertion_point() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let b = tree.create_node();
    let c = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(root, b);
    tree.append_child(root, c);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let item = CounterId::new();
    let log_a = Rc::new(RefCell::new(Vec::new()));
    let log_b = Rc::new(RefCell::new(Vec::new()));
    let log_c = Rc::new(RefCell::new(Vec::new()));
    engine.register(a, item, Action::increment(1), logger(&log_a)).unwrap();
    engine.register(b, item, Action::increment(1), logger(&log_b)).unwrap();
    engine.register(c, item, Action::increment(1), logger(&log_c)).unwrap();
    assert_eq!(*log_c.borrow(), vec![3]);

    // New item between a and b; registered while detached, then inserted.
    let d = tree.create_node();
    let log_d = Rc::new(RefCell::new(Vec::new()));
    engine.register(d, item, Action::increment(1), logger(&log_d)).unwrap();
    engine.apply_batch(tree.insert_before(root, d, Some(b)));

    assert_eq!(engine.counter_value(a, item), 1);
    assert_eq!(engine.counter_value(d, item), 2);
    assert_eq!(engine.counter_value(b, item), 3);
    assert_eq!(engine.counter_value(c, item), 4);

    // The node before the insertion point was never re-resolved.
    assert_eq!(*log_a.borrow(), vec![1]);
    assert_eq!(*log_b.borrow(), vec![2, 3]);
    assert_eq!(*log_c.borrow(), vec![3, 4]);
    assert_eq!(*log_d.borrow(), vec![0, 2]);
}

#[test]
fn removing_a_reset_carrier_reopens_scopes_downstream() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let r = tree.create_node();
    let x = tree.create_node();
    let y = tree.create_node();
    tree.append_child(root, r);
    tree.append_child(root, x);
    tree.append_child(root, y);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    engine.register(r, counter, Action::reset(10), |_| {}).unwrap();
    engine.register(x, counter, Action::increment(1), |_| {}).unwrap();
    engine.register(y, counter, Action::increment(1), |_| {}).unwrap();
    assert_eq!(engine.counter_value(x, counter), 11);
    assert_eq!(engine.counter_value(y, counter), 12);

    engine.apply_batch(tree.remove(r));

    // The reset scope is gone; increments open a fresh implicit scope.
    assert_eq!(engine.counter_value(x, counter), 1);
    assert_eq!(engine.counter_value(y, counter), 2);
}

#[test]
fn reapplying_identical_actions_notifies_nobody() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(root, b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    let log_a = Rc::new(RefCell::new(Vec::new()));
    let log_b = Rc::new(RefCell::new(Vec::new()));
    engine.register(a, counter, Action::reset(2), logger(&log_a)).unwrap();
    engine.register(b, counter, Action::increment(1), logger(&log_b)).unwrap();
    assert_eq!(*log_a.borrow(), vec![2]);
    assert_eq!(*log_b.borrow(), vec![3]);

    let mut same = Actions::new();
    same.insert(counter, Action::reset(2));
    engine.set_actions(a, same, None);

    // Nothing resolved differently, so the walk stopped at `a` and no
    // listener fired.
    assert_eq!(*log_a.borrow(), vec![2]);
    assert_eq!(*log_b.borrow(), vec![3]);
}

#[test]
fn removal_without_a_successor_reference_still_converges() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let a1 = tree.create_node();
    let b = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(a, a1);
    tree.append_child(root, b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    engine.register(a, counter, Action::reset(10), |_| {}).unwrap();
    engine.register(a1, counter, Action::increment(1), |_| {}).unwrap();
    engine.register(b, counter, Action::increment(1), |_| {}).unwrap();
    assert_eq!(engine.counter_value(b, counter), 12);

    // Host that cannot capture the successor: remove a1 but report the
    // removal with `next: None`.
    tree.remove(a1);
    let batch = MutationBatch {
        added: Vec::new(),
        removals: vec![RemovalContext { parent: a, prev_sibling: None, next: None }],
    };
    engine.apply_batch(batch);

    assert_eq!(engine.counter_value(b, counter), 11);
}

#[test]
fn inserted_subtree_resolves_top_down_in_one_sweep() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();

    let branch = tree.create_node();
    let leaf = tree.create_node();
    tree.append_child(branch, leaf);
    engine.register(branch, counter, Action::reset(7), |_| {}).unwrap();
    engine.register(leaf, counter, Action::increment(1), |_| {}).unwrap();

    engine.apply_batch(tree.append_child(root, branch));

    assert_eq!(engine.counter_value(branch, counter), 7);
    assert_eq!(engine.counter_value(leaf, counter), 8);
}
