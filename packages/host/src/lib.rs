//! # weft-host
//!
//! The component host for Weft. It fetches HTML template fragments over
//! the network (with optional version-keyed caching), extracts the
//! `<template>` elements into component definitions, and instantiates
//! components wired to one shared [`weft_store::Store`].
//!
//! The host contributes no data semantics of its own; everything reactive
//! happens through the store's subscribe/get/set surface. Capabilities the
//! host needs from its environment - fetching, caching, id generation -
//! are injected traits, so tests run without network or real entropy.
//!
//! ```rust,no_run
//! use weft_host::{App, Hooks};
//!
//! # async fn demo() -> Result<(), weft_host::Error> {
//! let mut app = App::new(
//!     vec!["https://example.com/components.html".to_string()],
//!     None,
//!     Some("v1".to_string()),
//! )?;
//! app.load_components().await?;
//! let card = app.create("user-card", Hooks::default())?;
//! card.connected().await?;
//! # Ok(())
//! # }
//! ```

mod app;
mod cache;
mod component;
mod error;
mod fetch;
mod id;
mod template;

pub use app::App;
pub use cache::{DiskCache, MemoryCache, TemplateCache};
pub use component::{
    attr_hook, hook, AttrHookFn, AttributeChange, Component, ComponentSpec, HookContext, HookFn,
    HookFuture, Hooks,
};
pub use error::Error;
pub use fetch::{HttpFetcher, StaticFetcher, TemplateFetcher};
pub use id::{IdSource, SequentialSource, UuidSource};
pub use template::{extract_templates, Template};
