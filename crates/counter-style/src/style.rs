//! Counter styles: a [`System`] wrapped with negative decoration, range
//! clamping, padding, and a fallback chain.
//!
//! Every style holds a strong reference to its fallback, forming a chain
//! that must terminate at the default decimal style. The default style is
//! the only style whose fallback points at itself; it is built in two
//! phases (construct, then patch the fallback cell once) and that
//! self-reference is the sole one permitted — [`Style::create`] rejects any
//! other cycle up front.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::system::System;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("unknown counter style: {0:?}")]
    UnknownStyle(String),
    #[error("fallback chain does not terminate at the default style")]
    FallbackCycle,
    #[error("counter system requires at least {required} symbol(s), got {got}")]
    NotEnoughSymbols { required: usize, got: usize },
    #[error("additive weights must be non-negative and strictly descending")]
    BadAdditiveWeights,
    #[error("invalid style descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Decoration applied around the formatted magnitude of a negative value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negative {
    pub prefix: String,
    pub suffix: String,
}

impl Default for Negative {
    fn default() -> Self {
        Negative { prefix: "-".to_string(), suffix: String::new() }
    }
}

/// Minimum-length padding, inserted between the sign and the magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pad {
    pub min_len: usize,
    pub symbol: String,
}

/// Options accepted by [`Style::create`]. `negative`, `range`, and `pad`
/// default to the system's own behavior when `None`.
pub struct StyleOptions {
    pub system: System,
    pub negative: Option<Negative>,
    pub range: Option<(i32, i32)>,
    pub pad: Option<Pad>,
    pub fallback: Rc<Style>,
}

/// An immutable counter style.
pub struct Style {
    system: System,
    negative: Negative,
    range: (i32, i32),
    pad: Option<Pad>,
    fallback: OnceCell<Rc<Style>>,
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The fallback link is skipped: printing it would recurse through
        // the default style's self-reference.
        f.debug_struct("Style")
            .field("system", &self.system)
            .field("negative", &self.negative)
            .field("range", &self.range)
            .field("pad", &self.pad)
            .finish_non_exhaustive()
    }
}

impl Style {
    /// Build the default decimal style.
    ///
    /// Phase one constructs the style with an empty fallback cell; phase two
    /// patches the cell to point at the style itself. This is the sole
    /// permitted self-reference in any fallback chain.
    pub fn default_decimal() -> Rc<Style> {
        let style = Rc::new(Style {
            system: System::Numeric {
                symbols: ('0'..='9').map(|c| c.to_string()).collect(),
            },
            negative: Negative::default(),
            range: (i32::MIN, i32::MAX),
            pad: None,
            fallback: OnceCell::new(),
        });
        let self_ref = Rc::clone(&style);
        let _ = style.fallback.set(self_ref);
        style
    }

    /// Build a style, validating the system's symbol tables and the
    /// fallback chain.
    pub fn create(options: StyleOptions) -> Result<Rc<Style>, StyleError> {
        validate_system(&options.system)?;
        check_fallback_chain(&options.fallback)?;
        let range = options.range.unwrap_or_else(|| options.system.range());
        let style = Rc::new(Style {
            system: options.system,
            negative: options.negative.unwrap_or_default(),
            range,
            pad: options.pad,
            fallback: OnceCell::new(),
        });
        let _ = style.fallback.set(options.fallback);
        Ok(style)
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn range(&self) -> (i32, i32) {
        self.range
    }

    pub fn fallback(&self) -> &Rc<Style> {
        // Set unconditionally by both constructors.
        self.fallback.get().expect("style fallback is always initialized")
    }

    /// Render one counter value. Never fails: out-of-range and
    /// unrepresentable values delegate down the fallback chain, which
    /// terminates at the self-referential default.
    pub fn format(&self, value: i32) -> String {
        let mut current: &Style = self;
        loop {
            if current.in_range(value) {
                if let Some(text) = current.format_here(value) {
                    return text;
                }
            }
            let next: &Style = current.fallback();
            if std::ptr::eq(next, current) {
                // Self-referential terminal style that still could not
                // represent the value; render plain decimal as a last
                // resort. Unreachable for the stock default style.
                return value.to_string();
            }
            current = next;
        }
    }

    /// Render a sequence of values joined by `separator` (the `counters()`
    /// shape: map each value through the style, then join).
    pub fn format_all(&self, values: &[i32], separator: &str) -> String {
        let parts: Vec<String> = values.iter().map(|v| self.format(*v)).collect();
        parts.join(separator)
    }

    fn in_range(&self, value: i32) -> bool {
        value >= self.range.0 && value <= self.range.1
    }

    fn format_here(&self, value: i32) -> Option<String> {
        let negative = self.system.uses_negative_sign() && value < 0;
        let magnitude = if negative {
            -(value as i64)
        } else {
            value as i64
        };
        let text = self.system.format(magnitude)?;
        let decorated_len = text.chars().count()
            + if negative {
                self.negative.prefix.chars().count() + self.negative.suffix.chars().count()
            } else {
                0
            };
        let padding = match &self.pad {
            Some(pad) if pad.min_len > decorated_len => {
                pad.symbol.repeat(pad.min_len - decorated_len)
            }
            _ => String::new(),
        };
        if negative {
            Some(format!(
                "{}{}{}{}",
                self.negative.prefix, padding, text, self.negative.suffix
            ))
        } else {
            Some(format!("{padding}{text}"))
        }
    }
}

fn validate_system(system: &System) -> Result<(), StyleError> {
    let minimum = match system {
        System::Cyclic { symbols }
        | System::Fixed { symbols, .. }
        | System::Symbolic { symbols } => Some((1, symbols.len())),
        System::Alphabetic { symbols } | System::Numeric { symbols } => {
            Some((2, symbols.len()))
        }
        System::Additive { symbols } => {
            let descending = symbols
                .windows(2)
                .all(|pair| pair[0].0 > pair[1].0);
            let non_negative = symbols.iter().all(|(w, _)| *w >= 0);
            if !descending || !non_negative {
                return Err(StyleError::BadAdditiveWeights);
            }
            Some((1, symbols.len()))
        }
        System::Chinese(_) | System::Ethiopic => None,
    };
    if let Some((required, got)) = minimum {
        if got < required {
            return Err(StyleError::NotEnoughSymbols { required, got });
        }
    }
    Ok(())
}

/// Walk a proposed fallback chain and confirm it reaches the
/// self-referential default style without revisiting any link.
fn check_fallback_chain(start: &Rc<Style>) -> Result<(), StyleError> {
    let mut seen: Vec<*const Style> = Vec::new();
    let mut current: &Rc<Style> = start;
    loop {
        let next = current.fallback();
        if Rc::ptr_eq(next, current) {
            return Ok(());
        }
        let ptr = Rc::as_ptr(current);
        if seen.contains(&ptr) {
            return Err(StyleError::FallbackCycle);
        }
        seen.push(ptr);
        current = next;
    }
}
