//! End-to-end flows: a mutating tree, the propagation engine, and style
//! rendering working together.

use css_counters::{
    render_counter, render_counters, Action, CounterEngine, CounterId, SimpleTree,
    StyleDescriptor, StyleRegistry,
};

#[test]
fn nested_section_numbering() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let part = tree.create_node();
    let chapter = tree.create_node();
    let section_a = tree.create_node();
    let section_b = tree.create_node();
    tree.append_child(root, part);
    tree.append_child(part, chapter);
    tree.append_child(chapter, section_a);
    tree.append_child(chapter, section_b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let section = CounterId::new();
    engine.register(part, section, Action::increment(1), |_| {}).unwrap();
    engine.register(chapter, section, Action::increment(1), |_| {}).unwrap();
    engine.register(section_a, section, Action::increment(1), |_| {}).unwrap();
    engine.register(section_b, section, Action::increment(1), |_| {}).unwrap();

    // Increments without resets share one implicit scope, so counters()
    // renders a single segment.
    let styles = StyleRegistry::with_predefined();
    let stack = engine.resolved_stack(section_b, section).unwrap();
    assert_eq!(render_counters(stack, ".", styles.decimal()), "4");
}

#[test]
fn counters_with_nested_resets_renders_a_dotted_path() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let h1 = tree.create_node();
    let h2 = tree.create_node();
    let h3 = tree.create_node();
    tree.append_child(root, h1);
    tree.append_child(h1, h2);
    tree.append_child(h2, h3);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    engine.register(h1, counter, Action::reset(1), |_| {}).unwrap();
    engine.register(h2, counter, Action::reset(2), |_| {}).unwrap();
    engine.register(h3, counter, Action::reset(3), |_| {}).unwrap();

    let styles = StyleRegistry::with_predefined();
    let stack = engine.resolved_stack(h3, counter).unwrap();
    assert_eq!(render_counters(stack, ".", styles.decimal()), "1.2.3");
}

#[test]
fn styled_list_survives_mutation() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let list = tree.create_node();
    tree.append_child(root, list);
    let mut items = Vec::new();
    for _ in 0..4 {
        let item = tree.create_node();
        tree.append_child(list, item);
        items.push(item);
    }

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let marker = CounterId::new();
    engine.register(list, marker, Action::reset(0), |_| {}).unwrap();
    for item in &items {
        engine.register(*item, marker, Action::increment(1), |_| {}).unwrap();
    }

    let styles = StyleRegistry::with_predefined();
    let roman = styles.get("upper-roman").unwrap();
    let render = |engine: &CounterEngine<SimpleTree>, node| {
        engine
            .resolved_stack(node, marker)
            .map(|stack| render_counter(stack, &roman))
    };
    assert_eq!(render(&engine, items[3]).as_deref(), Some("IV"));

    // Drop the second item; the rest renumber.
    engine.apply_batch(tree.remove(items[1]));
    assert_eq!(render(&engine, items[2]).as_deref(), Some("II"));
    assert_eq!(render(&engine, items[3]).as_deref(), Some("III"));

    // Insert a fresh item at the front.
    let newcomer = tree.create_node();
    engine.register(newcomer, marker, Action::increment(1), |_| {}).unwrap();
    engine.apply_batch(tree.insert_before(list, newcomer, Some(items[0])));
    assert_eq!(render(&engine, newcomer).as_deref(), Some("I"));
    assert_eq!(render(&engine, items[3]).as_deref(), Some("IV"));
}

#[test]
fn custom_descriptor_style_renders_engine_output() {
    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(root, b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();
    engine.register(a, counter, Action::reset(1), |_| {}).unwrap();
    engine.register(b, counter, Action::reset(2), |_| {}).unwrap();

    let mut styles = StyleRegistry::with_predefined();
    let descriptor: StyleDescriptor = serde_json::from_value(serde_json::json!({
        "system": "cyclic",
        "symbols": ["▶", "▷"],
    }))
    .unwrap();
    let style = descriptor.build(&styles).unwrap();
    styles.register("pointer", style.clone());

    let stack = engine.resolved_stack(b, counter).unwrap();
    assert_eq!(render_counter(stack, &style), "▷");
}

#[test]
fn watch_drives_live_rendered_output() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let tree = SimpleTree::new();
    let root = tree.create_node();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.append_child(root, a);
    tree.append_child(root, b);

    let mut engine = CounterEngine::new(tree.clone());
    engine.track_root(root).unwrap();
    let counter = CounterId::new();

    let styles = StyleRegistry::with_predefined();
    let alpha = styles.get("lower-alpha").unwrap();
    let rendered = Rc::new(RefCell::new(String::new()));
    {
        let rendered = Rc::clone(&rendered);
        let alpha = alpha.clone();
        engine.register(a, counter, Action::increment(1), |_| {}).unwrap();
        engine.watch(b, counter, move |stack| {
            *rendered.borrow_mut() = render_counter(stack, &alpha);
        });
    }
    assert_eq!(&*rendered.borrow(), "a");

    engine.set_actions(
        b,
        css_counters::Actions::from_iter([(counter, Action::increment(1))]),
        None,
    );
    assert_eq!(&*rendered.borrow(), "b");
}
