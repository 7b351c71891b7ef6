//! Shared fixtures for the engine integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use counter_engine::{stack_value, CounterInstance, NodeId};

/// Listener that appends each delivered counter value to `log`.
pub fn logger(
    log: &Rc<RefCell<Vec<i32>>>,
) -> impl FnMut(&[CounterInstance<NodeId>]) + 'static {
    let log = Rc::clone(log);
    move |stack| log.borrow_mut().push(stack_value(stack))
}
