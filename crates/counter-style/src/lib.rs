//! CSS counter-style formatting.
//!
//! Pure integer→string rendering for the counter numbering systems of CSS
//! Counter Styles Level 3: cyclic, fixed, symbolic, alphabetic, numeric,
//! additive, the limited Chinese positional algorithm, and Ethiopic
//! numerals. A [`Style`] wraps a [`System`] with negative-value decoration,
//! range clamping, padding, and a fallback chain that terminates at the
//! self-referential default decimal style, so [`Style::format`] always
//! returns a string.
//!
//! This crate has no notion of a document tree; the propagation side lives
//! in `counter-engine`.

pub mod descriptor;
pub mod predefined;
pub mod registry;
pub mod style;
pub mod system;

pub use descriptor::{DescriptorSystem, NegativeDescriptor, PadDescriptor, StyleDescriptor};
pub use registry::StyleRegistry;
pub use style::{Negative, Pad, Style, StyleError, StyleOptions};
pub use system::{ChineseSet, System, SYMBOLIC_REPEAT_LIMIT};
