//! Fluent filter registration.
//!
//! [`FilterBuilder`] is a descriptor-in-progress bound to a registry and a
//! name, created through [`FilterRegistry::declare`]. It carries no state
//! of its own beyond the eventual registration:
//!
//! ```
//! use crudfilters::registry::FilterRegistry;
//! use serde_json::json;
//!
//! let mut registry: FilterRegistry<Vec<String>> = FilterRegistry::new();
//! registry
//!     .declare("status")
//!     .label("Status")
//!     .kind("dropdown")
//!     .values(json!(["draft", "published"]))
//!     .when_active(|query, value| query.push(format!("status = {value}")))
//!     .when_inactive(|query| query.push("all statuses".into()))
//!     .register()
//!     .unwrap();
//! ```

use crate::error::Result;
use crate::filter::{ActiveLogic, FallbackLogic, Filter, FilterOptions, ValueSource};
use crate::registry::FilterRegistry;
use serde_json::Value;

/// A filter being configured before registration.
pub struct FilterBuilder<'a, Q> {
    registry: &'a mut FilterRegistry<Q>,
    options: FilterOptions,
    values: ValueSource,
    active_logic: Option<ActiveLogic<Q>>,
    fallback_logic: Option<FallbackLogic<Q>>,
}

impl<'a, Q> FilterBuilder<'a, Q> {
    pub(crate) fn new(registry: &'a mut FilterRegistry<Q>, name: impl Into<String>) -> Self {
        Self {
            registry,
            options: FilterOptions::named(name),
            values: ValueSource::default(),
            active_logic: None,
            fallback_logic: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.options.kind = Some(kind.into());
        self
    }

    /// Attach a free-form option (placeholder text, column name, ...).
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(key.into(), value.into());
        self
    }

    /// Literal rendering payload.
    pub fn values(mut self, values: impl Into<Value>) -> Self {
        self.values = ValueSource::Literal(values.into());
        self
    }

    /// Deferred rendering payload, produced once at registration.
    pub fn values_with(mut self, producer: impl FnOnce() -> Value + 'static) -> Self {
        self.values = ValueSource::deferred(producer);
        self
    }

    /// Query modification to run when the filter is active.
    pub fn when_active(mut self, logic: impl Fn(&mut Q, &Value) + 'static) -> Self {
        self.active_logic = Some(Box::new(logic));
        self
    }

    /// Query modification to run when the filter is inactive.
    pub fn when_inactive(mut self, logic: impl Fn(&mut Q) + 'static) -> Self {
        self.fallback_logic = Some(Box::new(logic));
        self
    }

    /// Register the configured filter, consuming the builder.
    ///
    /// Fails like [`FilterRegistry::add`]: on a duplicate name, or when
    /// the builder was somehow declared without one.
    pub fn register(self) -> Result<&'a Filter<Q>> {
        let mut filter = Filter::new(self.options, self.values)?;
        if let Some(logic) = self.active_logic {
            filter.set_active_logic(logic);
        }
        if let Some(logic) = self.fallback_logic {
            filter.set_fallback_logic(logic);
        }
        self.registry.add_filter(filter)
    }
}
