//! Per-request configuration context.
//!
//! [`PanelContext`] is the object a CRUD panel builds while handling one
//! request: a current operation name ("list", "create", ...) plus a typed
//! settings store keyed by `"{operation}.{key}"`. It is constructed per
//! request, passed explicitly, and thrown away with the response; nothing
//! here is shared or ambient.
//!
//! Filter semantics attach through the [`HasFilters`] extension trait,
//! which keeps the [`FilterRegistry`] inside the settings store under the
//! well-known [`FILTERS_SETTING`] key. Any context type with typed
//! operation settings can adopt the trait the same way.

use crate::builder::FilterBuilder;
use crate::input::FilterInput;
use crate::registry::FilterRegistry;
use std::any::Any;
use std::collections::HashMap;

/// Settings key under which the filter registry is stored.
pub const FILTERS_SETTING: &str = "filters";

const DEFAULT_OPERATION: &str = "list";

/// One request's panel configuration: an operation name and its settings.
#[derive(Default)]
pub struct PanelContext {
    operation: String,
    settings: HashMap<String, Box<dyn Any>>,
}

impl std::fmt::Debug for PanelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Setting values are type-erased; only the keys are printable.
        f.debug_struct("PanelContext")
            .field("operation", &self.operation())
            .field("settings", &self.settings.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PanelContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            settings: HashMap::new(),
        }
    }

    pub fn operation(&self) -> &str {
        if self.operation.is_empty() {
            DEFAULT_OPERATION
        } else {
            &self.operation
        }
    }

    /// Switch the current operation. Settings are scoped per operation,
    /// so each operation sees its own values (and its own filters).
    pub fn set_operation(&mut self, operation: impl Into<String>) {
        self.operation = operation.into();
    }

    fn setting_key(&self, key: &str) -> String {
        format!("{}.{}", self.operation(), key)
    }

    /// Store `value` under `key` for the current operation, replacing any
    /// previous value regardless of its type.
    pub fn set_operation_setting<T: Any>(&mut self, key: &str, value: T) {
        self.settings.insert(self.setting_key(key), Box::new(value));
    }

    /// The current operation's setting under `key`, if present with the
    /// requested type.
    pub fn operation_setting<T: Any>(&self, key: &str) -> Option<&T> {
        self.settings
            .get(&self.setting_key(key))
            .and_then(|slot| slot.downcast_ref())
    }

    pub fn operation_setting_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.settings
            .get_mut(&self.setting_key(key))
            .and_then(|slot| slot.downcast_mut())
    }

    pub fn has_operation_setting(&self, key: &str) -> bool {
        self.settings.contains_key(&self.setting_key(key))
    }

    /// Get the setting under `key`, initializing it with `default` when it
    /// is missing or holds a value of a different type.
    pub fn operation_setting_or_insert_with<T: Any>(
        &mut self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> &mut T {
        let full_key = self.setting_key(key);
        let needs_init = !matches!(self.settings.get(&full_key), Some(slot) if slot.is::<T>());
        if needs_init {
            self.settings.insert(full_key.clone(), Box::new(default()));
        }
        match self
            .settings
            .get_mut(&full_key)
            .and_then(|slot| slot.downcast_mut())
        {
            Some(value) => value,
            None => unreachable!("setting was initialized above"),
        }
    }
}

/// Filter semantics for a settings-bearing configuration context.
///
/// The registry lives in the context's operation settings under
/// [`FILTERS_SETTING`]; it is created lazily (disabled) on first mutable
/// access and persists for the lifetime of the context. `Q` is the
/// external query-builder type the filters modify.
pub trait HasFilters<Q: 'static> {
    /// The registry for the current operation, or `None` when no filter
    /// call has touched this context yet.
    fn filters(&self) -> Option<&FilterRegistry<Q>>;

    /// The registry for the current operation, created (disabled) on
    /// first access.
    fn filters_mut(&mut self) -> &mut FilterRegistry<Q>;

    /// Start a fluent filter registration; shorthand for
    /// [`FilterRegistry::declare`] on [`filters_mut`](Self::filters_mut).
    fn filter(&mut self, name: impl Into<String>) -> FilterBuilder<'_, Q>
    where
        Self: Sized,
    {
        self.filters_mut().declare(name)
    }

    fn enable_filters(&mut self) {
        self.filters_mut().enable();
    }

    fn disable_filters(&mut self) {
        self.filters_mut().disable();
    }

    fn clear_filters(&mut self) {
        self.filters_mut().clear();
    }

    fn filters_enabled(&self) -> bool {
        self.filters().is_some_and(|registry| registry.is_enabled())
    }

    fn filters_disabled(&self) -> bool {
        !self.filters_enabled()
    }

    /// Apply every registered filter against the external query builder.
    /// A context without a registry applies nothing.
    fn apply_filters(&self, query: &mut Q, input: &FilterInput) {
        if let Some(registry) = self.filters() {
            registry.apply_all(query, input);
        }
    }
}

impl<Q: 'static> HasFilters<Q> for PanelContext {
    fn filters(&self) -> Option<&FilterRegistry<Q>> {
        self.operation_setting(FILTERS_SETTING)
    }

    fn filters_mut(&mut self) -> &mut FilterRegistry<Q> {
        self.operation_setting_or_insert_with(FILTERS_SETTING, FilterRegistry::new)
    }
}
