//! Filter descriptors.
//!
//! A [`Filter`] pairs UI metadata (name, label, kind, free-form options)
//! with the two pieces of query-modification logic that run at apply time:
//! the active branch when the request input holds a value under the
//! filter's name, and the fallback branch otherwise. Descriptors are
//! generic over the query-builder type `Q` they modify; this crate passes
//! `Q` through untouched.

use crate::error::{FilterError, Result};
use crate::input::FilterInput;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Query modification run when a filter is active. Receives the current
/// input value submitted under the filter's name.
pub type ActiveLogic<Q> = Box<dyn Fn(&mut Q, &Value)>;

/// Query modification run when a filter is inactive.
pub type FallbackLogic<Q> = Box<dyn Fn(&mut Q)>;

/// Option bag handed to filter registration.
///
/// `name` is required by the registry; everything else is optional UI
/// metadata. Unknown keys land in `extra` so web-layer JSON round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FilterOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Rendering payload for a filter: either a literal value or a producer
/// invoked exactly once, synchronously, at registration time.
///
/// Deferred producers exist so expensive value lists (e.g. a dropdown's
/// entries pulled from elsewhere) are only computed when the filter is
/// actually registered.
pub enum ValueSource {
    Literal(Value),
    Deferred(Box<dyn FnOnce() -> Value>),
}

impl ValueSource {
    pub fn literal(value: impl Into<Value>) -> Self {
        ValueSource::Literal(value.into())
    }

    pub fn deferred(producer: impl FnOnce() -> Value + 'static) -> Self {
        ValueSource::Deferred(Box::new(producer))
    }

    /// Consume the source, running a deferred producer if there is one.
    pub fn resolve(self) -> Value {
        match self {
            ValueSource::Literal(value) => value,
            ValueSource::Deferred(producer) => producer(),
        }
    }
}

impl Default for ValueSource {
    fn default() -> Self {
        ValueSource::Literal(Value::Null)
    }
}

impl From<Value> for ValueSource {
    fn from(value: Value) -> Self {
        ValueSource::Literal(value)
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            ValueSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A registered filter descriptor.
///
/// The name is fixed at construction; every other field can be changed
/// afterwards through [`FilterPatch`].
pub struct Filter<Q> {
    name: String,
    label: Option<String>,
    kind: Option<String>,
    options: Map<String, Value>,
    values: Value,
    active_logic: Option<ActiveLogic<Q>>,
    fallback_logic: Option<FallbackLogic<Q>>,
}

impl<Q> Filter<Q> {
    /// Build a descriptor from an option bag, resolving the value source.
    ///
    /// Fails with [`FilterError::MissingName`] when the options carry no
    /// name. Logic is attached separately via
    /// [`with_active_logic`](Self::with_active_logic) and
    /// [`with_fallback_logic`](Self::with_fallback_logic).
    pub fn new(options: FilterOptions, values: impl Into<ValueSource>) -> Result<Self> {
        let FilterOptions {
            name,
            label,
            kind,
            extra,
        } = options;
        let name = name.ok_or(FilterError::MissingName)?;

        Ok(Self {
            name,
            label,
            kind,
            options: extra,
            values: values.into().resolve(),
            active_logic: None,
            fallback_logic: None,
        })
    }

    pub fn with_active_logic(mut self, logic: impl Fn(&mut Q, &Value) + 'static) -> Self {
        self.active_logic = Some(Box::new(logic));
        self
    }

    pub fn with_fallback_logic(mut self, logic: impl Fn(&mut Q) + 'static) -> Self {
        self.fallback_logic = Some(Box::new(logic));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn has_active_logic(&self) -> bool {
        self.active_logic.is_some()
    }

    pub fn has_fallback_logic(&self) -> bool {
        self.fallback_logic.is_some()
    }

    /// Whether the request input activates this filter: true when the
    /// input holds a non-empty value under the filter's name.
    pub fn is_active(&self, input: &FilterInput) -> bool {
        input.has_value(&self.name)
    }

    /// The input value submitted under this filter's name, if any.
    pub fn current_value<'a>(&self, input: &'a FilterInput) -> Option<&'a Value> {
        if self.is_active(input) {
            input.get(&self.name)
        } else {
            None
        }
    }

    /// Attribute-equality check used by the registry scans.
    ///
    /// `attribute` addresses the typed fields (`name`, `label`, `type`,
    /// `values`) or falls through to the free-form options map. Unknown
    /// attributes never match.
    pub fn matches(&self, attribute: &str, value: &Value) -> bool {
        match attribute {
            "name" => value.as_str() == Some(self.name.as_str()),
            "label" => value
                .as_str()
                .is_some_and(|v| Some(v) == self.label.as_deref()),
            "type" | "kind" => value
                .as_str()
                .is_some_and(|v| Some(v) == self.kind.as_deref()),
            "values" => self.values == *value,
            _ => self.options.get(attribute) == Some(value),
        }
    }

    /// Two-branch dispatch: run the active logic with the current input
    /// value when the filter is active, else the fallback logic when one
    /// is attached, else nothing. Stateless per call; the only side effect
    /// is whatever the logic does to `query`.
    pub fn apply(&self, query: &mut Q, input: &FilterInput) {
        match self.current_value(input) {
            Some(value) => {
                if let Some(logic) = &self.active_logic {
                    logic(query, value);
                }
            }
            None => {
                if let Some(fallback) = &self.fallback_logic {
                    fallback(query);
                }
            }
        }
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub(crate) fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    pub(crate) fn set_options(&mut self, options: Map<String, Value>) {
        self.options = options;
    }

    pub(crate) fn set_values(&mut self, values: Value) {
        self.values = values;
    }

    pub(crate) fn set_active_logic(&mut self, logic: ActiveLogic<Q>) {
        self.active_logic = Some(logic);
    }

    pub(crate) fn set_fallback_logic(&mut self, logic: FallbackLogic<Q>) {
        self.fallback_logic = Some(logic);
    }
}

impl<Q> fmt::Debug for Filter<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("values", &self.values)
            .field("active_logic", &self.active_logic.as_ref().map(|_| ".."))
            .field("fallback_logic", &self.fallback_logic.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Typed partial update for [`FilterRegistry::modify`].
///
/// Each field set on the patch overwrites the descriptor's field wholesale;
/// unset fields are left alone. The name is immutable and deliberately
/// absent here.
///
/// [`FilterRegistry::modify`]: crate::registry::FilterRegistry::modify
pub struct FilterPatch<Q> {
    label: Option<String>,
    kind: Option<String>,
    options: Option<Map<String, Value>>,
    values: Option<Value>,
    active_logic: Option<ActiveLogic<Q>>,
    fallback_logic: Option<FallbackLogic<Q>>,
}

impl<Q> FilterPatch<Q> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_values(mut self, values: impl Into<Value>) -> Self {
        self.values = Some(values.into());
        self
    }

    pub fn with_active_logic(mut self, logic: impl Fn(&mut Q, &Value) + 'static) -> Self {
        self.active_logic = Some(Box::new(logic));
        self
    }

    pub fn with_fallback_logic(mut self, logic: impl Fn(&mut Q) + 'static) -> Self {
        self.fallback_logic = Some(Box::new(logic));
        self
    }

    pub(crate) fn apply_to(self, filter: &mut Filter<Q>) {
        if let Some(label) = self.label {
            filter.set_label(Some(label));
        }
        if let Some(kind) = self.kind {
            filter.set_kind(Some(kind));
        }
        if let Some(options) = self.options {
            filter.set_options(options);
        }
        if let Some(values) = self.values {
            filter.set_values(values);
        }
        if let Some(logic) = self.active_logic {
            filter.set_active_logic(logic);
        }
        if let Some(logic) = self.fallback_logic {
            filter.set_fallback_logic(logic);
        }
    }
}

impl<Q> Default for FilterPatch<Q> {
    fn default() -> Self {
        Self {
            label: None,
            kind: None,
            options: None,
            values: None,
            active_logic: None,
            fallback_logic: None,
        }
    }
}
