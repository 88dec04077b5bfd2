//! The filter registry.
//!
//! [`FilterRegistry`] owns the ordered set of [`Filter`] descriptors for
//! one panel configuration and mediates all access to it: registration,
//! lookup, mutation, and apply-time dispatch.
//!
//! ## Enabled vs. empty
//!
//! The registry tracks an explicit enabled flag independent of the
//! collection's size. A registry that was enabled and then [`clear`]ed is
//! *enabled and empty*, which is a different state from *disabled*: an
//! enabled panel still renders its (empty) filter bar and applies nothing,
//! while a disabled panel has no filter semantics at all. Because of this,
//! [`is_enabled`] and [`is_disabled`] are strict complements here.
//!
//! [`clear`]: FilterRegistry::clear
//! [`is_enabled`]: FilterRegistry::is_enabled
//! [`is_disabled`]: FilterRegistry::is_disabled

use crate::builder::FilterBuilder;
use crate::error::{FilterError, Result};
use crate::filter::{Filter, FilterOptions, FilterPatch, ValueSource};
use crate::input::FilterInput;
use serde_json::Value;
use std::fmt;

/// Named, ordered, mutable collection of filters for one configuration
/// context. Generic over the external query-builder type `Q`.
pub struct FilterRegistry<Q> {
    enabled: bool,
    filters: Vec<Filter<Q>>,
}

impl<Q> FilterRegistry<Q> {
    /// A new registry starts disabled; the first successful
    /// [`add`](Self::add) or an explicit [`enable`](Self::enable) turns
    /// it on.
    pub fn new() -> Self {
        Self {
            enabled: false,
            filters: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_disabled(&self) -> bool {
        !self.enabled
    }

    /// Turn the registry on, starting from an empty collection if it was
    /// disabled. Already-enabled registries are left untouched.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Turn the registry off, discarding every descriptor.
    pub fn disable(&mut self) {
        self.filters.clear();
        self.enabled = false;
    }

    /// Drop all descriptors but keep the registry enabled.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Alias for [`clear`](Self::clear).
    pub fn remove_all(&mut self) {
        self.clear();
    }

    /// Register a new filter.
    ///
    /// Resolves `values` (running a deferred producer exactly once),
    /// enables the registry, and appends the descriptor. Fails with
    /// [`FilterError::MissingName`] when `options` carry no name and
    /// [`FilterError::DuplicateName`] when the name is already taken; a
    /// failed add leaves the registry unchanged apart from enablement
    /// never happening.
    pub fn add(
        &mut self,
        options: FilterOptions,
        values: impl Into<ValueSource>,
        active_logic: impl Fn(&mut Q, &Value) + 'static,
        fallback_logic: Option<Box<dyn Fn(&mut Q)>>,
    ) -> Result<&Filter<Q>> {
        let mut filter = Filter::new(options, values)?.with_active_logic(active_logic);
        if let Some(fallback) = fallback_logic {
            filter.set_fallback_logic(fallback);
        }
        self.add_filter(filter)
    }

    /// Register a descriptor built elsewhere (e.g. via [`Filter::new`]).
    ///
    /// Same enablement and uniqueness rules as [`add`](Self::add).
    pub fn add_filter(&mut self, filter: Filter<Q>) -> Result<&Filter<Q>> {
        if self.get(filter.name()).is_some() {
            return Err(FilterError::DuplicateName(filter.name().to_string()));
        }
        self.enabled = true;
        self.filters.push(filter);
        let idx = self.filters.len() - 1;
        Ok(&self.filters[idx])
    }

    /// The registered filters in insertion order; empty when disabled.
    pub fn list(&self) -> &[Filter<Q>] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// First filter registered under `name`, or `None`. A miss is a
    /// normal absent result, never an error.
    pub fn get(&self, name: &str) -> Option<&Filter<Q>> {
        self.filters.iter().find(|f| f.name() == name)
    }

    /// Whether the filter named `name` is activated by `input`. False for
    /// unknown names and for disabled registries, regardless of input.
    pub fn is_active(&self, name: &str, input: &FilterInput) -> bool {
        self.enabled && self.get(name).is_some_and(|f| f.is_active(input))
    }

    /// Apply a typed partial update to the filter named `name`.
    ///
    /// Unlike a plain lookup miss, modifying an unknown name is a
    /// configuration mistake and fails with [`FilterError::NotFound`].
    pub fn modify(&mut self, name: &str, patch: FilterPatch<Q>) -> Result<&Filter<Q>> {
        let filter = self
            .filters
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| FilterError::NotFound(name.to_string()))?;
        patch.apply_to(filter);
        Ok(&*filter)
    }

    /// Drop the filter named `name`, preserving the order of the rest.
    /// Removing an unknown name is a no-op.
    pub fn remove(&mut self, name: &str) {
        self.filters.retain(|f| f.name() != name);
    }

    /// Whether any filter's `attribute` equals `value` (see
    /// [`Filter::matches`]).
    pub fn any_where(&self, attribute: &str, value: &Value) -> bool {
        self.first_where(attribute, value).is_some()
    }

    /// First filter, in insertion order, whose `attribute` equals `value`.
    pub fn first_where(&self, attribute: &str, value: &Value) -> Option<&Filter<Q>> {
        self.filters.iter().find(|f| f.matches(attribute, value))
    }

    /// Start a fluent registration bound to this registry; see
    /// [`FilterBuilder`].
    pub fn declare(&mut self, name: impl Into<String>) -> FilterBuilder<'_, Q> {
        FilterBuilder::new(self, name)
    }

    /// Run one filter's two-branch dispatch against the external query
    /// builder. Stateless per call.
    pub fn apply(&self, filter: &Filter<Q>, query: &mut Q, input: &FilterInput) {
        filter.apply(query, input);
    }

    /// Apply every registered filter in insertion order.
    pub fn apply_all(&self, query: &mut Q, input: &FilterInput) {
        for filter in &self.filters {
            filter.apply(query, input);
        }
    }

    /// Whether `input` activates at least one registered filter.
    pub fn has_any_active(&self, input: &FilterInput) -> bool {
        self.enabled && self.filters.iter().any(|f| f.is_active(input))
    }
}

impl<Q> Default for FilterRegistry<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> fmt::Debug for FilterRegistry<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("enabled", &self.enabled)
            .field("filters", &self.filters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct FakeQuery {
        clauses: Vec<String>,
    }

    fn registry_with(names: &[&str]) -> FilterRegistry<FakeQuery> {
        let mut registry = FilterRegistry::new();
        for name in names {
            registry
                .add_filter(
                    Filter::new(FilterOptions::named(*name), Value::Null).unwrap(),
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn new_registry_is_disabled_and_empty() {
        let registry = FilterRegistry::<FakeQuery>::new();
        assert!(registry.is_disabled());
        assert!(!registry.is_enabled());
        assert!(registry.list().is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn add_enables_and_round_trips_through_get() {
        let mut registry = FilterRegistry::<FakeQuery>::new();
        let options = FilterOptions::named("status")
            .with_label("Status")
            .with_kind("dropdown");
        registry
            .add(options, json!(["draft", "published"]), |q, v| {
                q.clauses.push(format!("status = {v}"));
            }, None)
            .unwrap();

        assert!(registry.is_enabled());
        let filter = registry.get("status").unwrap();
        assert_eq!(filter.label(), Some("Status"));
        assert_eq!(filter.kind(), Some("dropdown"));
        assert_eq!(filter.values(), &json!(["draft", "published"]));
        assert!(filter.has_active_logic());
        assert!(!filter.has_fallback_logic());
    }

    #[test]
    fn add_without_name_fails() {
        let mut registry = FilterRegistry::<FakeQuery>::new();
        let err = registry
            .add(FilterOptions::default(), Value::Null, |_, _| {}, None)
            .unwrap_err();
        assert!(matches!(err, FilterError::MissingName));
        // A failed add never enables the registry.
        assert!(registry.is_disabled());
    }

    #[test]
    fn duplicate_name_fails_and_keeps_single_descriptor() {
        let mut registry = FilterRegistry::<FakeQuery>::new();
        registry
            .add(FilterOptions::named("status"), Value::Null, |_, _| {}, None)
            .unwrap();
        let err = registry
            .add(FilterOptions::named("status"), Value::Null, |_, _| {}, None)
            .unwrap_err();

        assert!(matches!(err, FilterError::DuplicateName(name) if name == "status"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn disable_discards_descriptors_and_enable_does_not_resurrect() {
        let mut registry = registry_with(&["a", "b"]);
        registry.disable();

        assert!(registry.is_disabled());
        assert!(registry.list().is_empty());

        registry.enable();
        assert!(registry.is_enabled());
        assert!(registry.list().is_empty());

        // Re-adding after the round trip works.
        registry
            .add(FilterOptions::named("a"), Value::Null, |_, _| {}, None)
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_empties_but_stays_enabled() {
        let mut registry = registry_with(&["a", "b"]);
        registry.clear();

        assert!(registry.is_enabled());
        assert!(!registry.is_disabled());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_drops_only_the_match_and_keeps_order() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.remove("b");

        let names: Vec<&str> = registry.list().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a", "c"]);

        // Unknown name is a no-op.
        registry.remove("missing");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn modify_patches_only_the_named_descriptor() {
        let mut registry = registry_with(&["a", "b"]);
        let patched = registry
            .modify("b", FilterPatch::new().with_label("B filter"))
            .unwrap();
        assert_eq!(patched.label(), Some("B filter"));
        assert_eq!(registry.get("a").unwrap().label(), None);
    }

    #[test]
    fn modify_unknown_name_is_not_found() {
        let mut registry = registry_with(&["a"]);
        let err = registry.modify("missing", FilterPatch::new()).unwrap_err();
        assert!(matches!(err, FilterError::NotFound(name) if name == "missing"));
    }

    #[test]
    fn is_active_needs_existence_enablement_and_input() {
        let mut registry = registry_with(&["status"]);
        let input = FilterInput::new().with("status", "draft");

        assert!(registry.is_active("status", &input));
        assert!(!registry.is_active("status", &FilterInput::new()));
        assert!(!registry.is_active("missing", &input));

        registry.disable();
        assert!(!registry.is_active("status", &input));
    }

    #[test]
    fn where_scans_walk_insertion_order() {
        let mut registry = FilterRegistry::<FakeQuery>::new();
        for (name, kind) in [("a", "dropdown"), ("b", "range"), ("c", "dropdown")] {
            registry
                .add_filter(
                    Filter::new(
                        FilterOptions::named(name).with_kind(kind),
                        Value::Null,
                    )
                    .unwrap(),
                )
                .unwrap();
        }

        assert!(registry.any_where("type", &json!("range")));
        assert!(!registry.any_where("type", &json!("checkbox")));
        let first = registry.first_where("type", &json!("dropdown")).unwrap();
        assert_eq!(first.name(), "a");
    }

    #[test]
    fn apply_all_runs_filters_in_insertion_order() {
        let mut registry = FilterRegistry::<FakeQuery>::new();
        registry
            .add(FilterOptions::named("status"), Value::Null, |q, v| {
                q.clauses.push(format!("status = {v}"));
            }, None)
            .unwrap();
        registry
            .add(
                FilterOptions::named("price"),
                Value::Null,
                |q, v| q.clauses.push(format!("price in {v}")),
                Some(Box::new(|q: &mut FakeQuery| {
                    q.clauses.push("all prices".into())
                })),
            )
            .unwrap();

        let mut query = FakeQuery::default();
        let input = FilterInput::new().with("status", "draft");
        registry.apply_all(&mut query, &input);

        assert_eq!(query.clauses, vec!["status = \"draft\"", "all prices"]);
    }

    #[test]
    fn has_any_active_reflects_input_and_enablement() {
        let mut registry = registry_with(&["status", "price"]);
        assert!(!registry.has_any_active(&FilterInput::new()));
        assert!(registry.has_any_active(&FilterInput::new().with("price", 10)));

        registry.disable();
        assert!(!registry.has_any_active(&FilterInput::new().with("price", 10)));
    }
}
