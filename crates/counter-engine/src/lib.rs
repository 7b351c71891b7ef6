//! Incremental counter propagation over an ordered node tree.
//!
//! Counters live in per-node stacks of scopes; a node's stacks derive from
//! its document-order predecessor's, so a structural edit only forces
//! recomputation forward from the edit until the stacks stop changing.
//! The host plugs its tree in through [`TreeAdapter`] and reports edits
//! with [`MutationBatch`]; [`SimpleTree`] is a ready-made tree for hosts
//! that need one.

pub mod action;
pub mod adapter;
pub mod engine;
pub mod registry;
pub mod tree;

pub use action::{stack_value, Action, Actions, CounterId, CounterInstance, CounterStack, Origin, Stacks};
pub use adapter::{MutationBatch, RemovalContext, TreeAdapter};
pub use engine::{CounterEngine, EngineError, RegistrationHandle, RootHandle, WatchHandle};
pub use registry::ChangeCallback;
pub use tree::{NodeId, SimpleTree};
