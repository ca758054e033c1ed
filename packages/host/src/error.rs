//! Error types for the component host.

use thiserror::Error;

/// Errors that can occur in the component host.
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching a template source failed.
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The template cache could not be read or written.
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),

    /// No component is registered under the given name.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] weft_store::Error),

    /// A lifecycle hook that a component does implement failed.
    #[error("hook '{hook}' failed: {message}")]
    Hook { hook: &'static str, message: String },
}
