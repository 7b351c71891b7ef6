//! Data-driven style definitions.
//!
//! A [`StyleDescriptor`] is the serde model of an `@counter-style`-shaped
//! definition: system, symbol tables, negative decoration, range, pad, and
//! a fallback style name resolved against a [`StyleRegistry`]. Descriptors
//! cover the six table-driven systems; the Chinese and Ethiopic algorithms
//! are predefined-only.
//!
//! ```
//! use counter_style::{StyleDescriptor, StyleRegistry};
//!
//! let mut registry = StyleRegistry::with_predefined();
//! let descriptor: StyleDescriptor = serde_json::from_str(
//!     r#"{ "system": "cyclic", "symbols": ["›"] }"#,
//! ).unwrap();
//! let style = registry.define("chevron", &descriptor).unwrap();
//! assert_eq!(style.format(7), "›");
//! ```

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::registry::StyleRegistry;
use crate::style::{Negative, Pad, Style, StyleError, StyleOptions};
use crate::system::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorSystem {
    Cyclic,
    Fixed,
    Symbolic,
    Alphabetic,
    Numeric,
    Additive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeDescriptor {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadDescriptor {
    pub min_length: usize,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub system: DescriptorSystem,
    /// Symbol list for every system except `additive`.
    #[serde(default)]
    pub symbols: Vec<String>,
    /// `(weight, symbol)` pairs for `additive`, strictly descending.
    #[serde(default)]
    pub additive_symbols: Vec<(i32, String)>,
    /// First value of a `fixed` system; defaults to 1.
    #[serde(default)]
    pub first_value: Option<i32>,
    #[serde(default)]
    pub negative: Option<NegativeDescriptor>,
    /// Inclusive `[min, max]` override.
    #[serde(default)]
    pub range: Option<(i32, i32)>,
    #[serde(default)]
    pub pad: Option<PadDescriptor>,
    /// Fallback style name; defaults to `decimal`.
    #[serde(default)]
    pub fallback: Option<String>,
}

impl StyleDescriptor {
    /// Build a [`Style`] from this descriptor, resolving the fallback name
    /// against `registry`.
    pub fn build(&self, registry: &StyleRegistry) -> Result<Rc<Style>, StyleError> {
        let system = self.system()?;
        let fallback = match &self.fallback {
            Some(name) => registry.get(name)?,
            None => Rc::clone(registry.decimal()),
        };
        let range = match self.range {
            Some((min, max)) if min > max => {
                return Err(StyleError::InvalidDescriptor(format!(
                    "empty range: [{min}, {max}]"
                )));
            }
            other => other,
        };
        Style::create(StyleOptions {
            system,
            negative: self.negative.as_ref().map(|n| Negative {
                prefix: n.prefix.clone(),
                suffix: n.suffix.clone(),
            }),
            range,
            pad: self.pad.as_ref().map(|p| Pad {
                min_len: p.min_length,
                symbol: p.symbol.clone(),
            }),
            fallback,
        })
        .map_err(|err| match err {
            // Malformed symbol tables in a descriptor are descriptor errors.
            StyleError::NotEnoughSymbols { .. } | StyleError::BadAdditiveWeights => {
                StyleError::InvalidDescriptor(err.to_string())
            }
            other => other,
        })
    }

    fn system(&self) -> Result<System, StyleError> {
        let needs_symbols = !matches!(self.system, DescriptorSystem::Additive);
        if needs_symbols && self.symbols.is_empty() {
            return Err(StyleError::InvalidDescriptor(
                "symbols are required for this system".to_string(),
            ));
        }
        Ok(match self.system {
            DescriptorSystem::Cyclic => System::Cyclic { symbols: self.symbols.clone() },
            DescriptorSystem::Fixed => System::Fixed {
                first: self.first_value.unwrap_or(1),
                symbols: self.symbols.clone(),
            },
            DescriptorSystem::Symbolic => System::Symbolic { symbols: self.symbols.clone() },
            DescriptorSystem::Alphabetic => {
                System::Alphabetic { symbols: self.symbols.clone() }
            }
            DescriptorSystem::Numeric => System::Numeric { symbols: self.symbols.clone() },
            DescriptorSystem::Additive => {
                if self.additive_symbols.is_empty() {
                    return Err(StyleError::InvalidDescriptor(
                        "additiveSymbols are required for an additive system".to_string(),
                    ));
                }
                System::Additive { symbols: self.additive_symbols.clone() }
            }
        })
    }
}
