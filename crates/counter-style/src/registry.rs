//! Name-keyed style registry.
//!
//! A [`StyleRegistry`] owns the shared default decimal style and maps style
//! names to [`Style`] references. [`StyleRegistry::with_predefined`] installs
//! the full predefined set; custom styles enter through
//! [`register`](StyleRegistry::register) or the descriptor path
//! ([`define`](StyleRegistry::define)).

use std::rc::Rc;

use indexmap::IndexMap;

use crate::descriptor::StyleDescriptor;
use crate::predefined;
use crate::style::{Style, StyleError};

pub struct StyleRegistry {
    styles: IndexMap<String, Rc<Style>>,
    decimal: Rc<Style>,
}

impl StyleRegistry {
    /// A registry containing only the default decimal style.
    pub fn new() -> Self {
        let decimal = Style::default_decimal();
        let mut styles = IndexMap::new();
        styles.insert("decimal".to_string(), Rc::clone(&decimal));
        StyleRegistry { styles, decimal }
    }

    /// A registry with the complete predefined style set installed.
    pub fn with_predefined() -> Self {
        let mut registry = StyleRegistry::new();
        predefined::install(&mut registry);
        registry
    }

    /// The shared default decimal style, terminal fallback of every chain.
    pub fn decimal(&self) -> &Rc<Style> {
        &self.decimal
    }

    pub fn get(&self, name: &str) -> Result<Rc<Style>, StyleError> {
        self.styles
            .get(name)
            .cloned()
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Register `style` under `name`, replacing any previous binding.
    /// Styles already chained to the old binding keep their references.
    pub fn register(&mut self, name: impl Into<String>, style: Rc<Style>) {
        self.styles.insert(name.into(), style);
    }

    /// Build a style from a descriptor and register it under `name`.
    /// The descriptor's `fallback` is resolved against this registry.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        descriptor: &StyleDescriptor,
    ) -> Result<Rc<Style>, StyleError> {
        let style = descriptor.build(self)?;
        self.styles.insert(name.into(), Rc::clone(&style));
        Ok(style)
    }

    /// Registered style names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        StyleRegistry::new()
    }
}
