//! CSS counters, end to end.
//!
//! Glue over the two halves of the system: `counter-engine` maintains
//! per-node counter stacks under tree mutation, and `counter-style` renders
//! integer values as numbered text. The two free functions here implement
//! the `counter()` and `counters()` value shapes over a resolved stack.
//!
//! ```
//! use css_counters::{render_counter, StyleRegistry};
//! use css_counters::engine::{CounterInstance, Origin};
//!
//! let styles = StyleRegistry::with_predefined();
//! let roman = styles.get("upper-roman").unwrap();
//! let stack = [CounterInstance { origin: Origin::Node(0u32), value: 1994 }];
//! assert_eq!(render_counter(&stack, &roman), "MCMXCIV");
//! ```

pub use counter_engine as engine;
pub use counter_style as style;

pub use counter_engine::{
    stack_value, Action, Actions, CounterEngine, CounterId, CounterInstance, CounterStack,
    EngineError, MutationBatch, NodeId, Origin, RegistrationHandle, RemovalContext, RootHandle,
    SimpleTree, Stacks, TreeAdapter, WatchHandle,
};
pub use counter_style::{Style, StyleDescriptor, StyleError, StyleRegistry, System};

/// The `counter()` shape: render the innermost value of the stack. An
/// empty stack reads as 0.
pub fn render_counter<N>(stack: &[CounterInstance<N>], style: &Style) -> String {
    style.format(stack_value(stack))
}

/// The `counters()` shape: render every open scope outermost-first, joined
/// by `separator`. An empty stack renders a single 0.
pub fn render_counters<N>(
    stack: &[CounterInstance<N>],
    separator: &str,
    style: &Style,
) -> String {
    if stack.is_empty() {
        return style.format(0);
    }
    let values: Vec<i32> = stack.iter().map(|instance| instance.value).collect();
    style.format_all(&values, separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(value: i32) -> CounterInstance<u32> {
        CounterInstance { origin: Origin::Node(0), value }
    }

    #[test]
    fn counter_renders_the_innermost_scope() {
        let styles = StyleRegistry::with_predefined();
        let stack = [inst(2), inst(7)];
        assert_eq!(render_counter(&stack, styles.decimal()), "7");
    }

    #[test]
    fn counters_renders_all_scopes_outermost_first() {
        let styles = StyleRegistry::with_predefined();
        let stack = [inst(1), inst(2), inst(3)];
        assert_eq!(render_counters(&stack, ".", styles.decimal()), "1.2.3");
    }

    #[test]
    fn empty_stack_reads_zero() {
        let styles = StyleRegistry::with_predefined();
        assert_eq!(render_counter(&[] as &[CounterInstance<u32>], styles.decimal()), "0");
        assert_eq!(render_counters(&[] as &[CounterInstance<u32>], ".", styles.decimal()), "0");
    }
}
