//! Weft: a minimal client-side application runtime.
//!
//! A page declares UI fragments as HTML templates fetched over the network;
//! the host registers each as a component definition and wires instances to
//! one shared, hierarchical, reactive store. The store is the interesting
//! part: dotted-path reads and writes, staged-write commit, and prefix-aware
//! publish/subscribe.
//!
//! This crate re-exports the two layers:
//!
//! - [`store`]: `Store`, `TreePath`, `Value`, subscriptions
//! - [`host`]: `App`, component definitions and lifecycle

pub use weft_host as host;
pub use weft_store as store;

pub use weft_host::{App, Component, ComponentSpec, Hooks};
pub use weft_store::{Store, TreePath, Value};
