//! # crudfilters
//!
//! A named, ordered filter registry for CRUD panel configurations.
//!
//! Admin panels let users narrow a listing through filters: a price range,
//! a status dropdown, a free-text search. This crate is the registry
//! behind that bar — it owns the filter descriptors for one request's
//! panel configuration and runs their query-modification logic at apply
//! time. It is a **UI-agnostic library**: no rendering, no routing, no
//! ORM, no HTTP. The web layer hands in parsed request parameters and an
//! opaque query builder; everything else stays outside.
//!
//! ## How the pieces fit
//!
//! A [`context::PanelContext`] is built per request. The
//! [`context::HasFilters`] trait attaches filter semantics to it, storing
//! a [`registry::FilterRegistry`] in the context's operation settings.
//! Filters are declared fluently:
//!
//! ```
//! use crudfilters::context::{HasFilters, PanelContext};
//! use crudfilters::input::FilterInput;
//! use serde_json::json;
//!
//! // The "query builder" is whatever type the application's data layer
//! // uses; this crate only threads it through to the filter logic.
//! type Query = Vec<String>;
//!
//! let mut panel = PanelContext::new("list");
//! panel
//!     .filter("price")
//!     .label("Price")
//!     .kind("range")
//!     .when_active(|query: &mut Query, value| {
//!         query.push(format!("price between {value}"));
//!     })
//!     .when_inactive(|query: &mut Query| {
//!         query.push("all prices".into());
//!     })
//!     .register()
//!     .unwrap();
//!
//! let mut query = Query::new();
//! let input = FilterInput::new().with("price", json!([10, 50]));
//! panel.apply_filters(&mut query, &input);
//! assert_eq!(query, vec!["price between [10,50]".to_string()]);
//! ```
//!
//! Everything runs single-threaded and synchronously within one request;
//! registries are never shared across requests and never persisted.
//!
//! ## Module Overview
//!
//! - [`context`]: Per-request `PanelContext` and the `HasFilters` trait
//! - [`registry`]: The `FilterRegistry` collection and its state machine
//! - [`filter`]: `Filter` descriptors, options, values, typed patches
//! - [`builder`]: Fluent `FilterBuilder` registration
//! - [`input`]: Request-parameter lookup (`FilterInput`)
//! - [`error`]: Error types

pub mod builder;
pub mod context;
pub mod error;
pub mod filter;
pub mod input;
pub mod registry;
