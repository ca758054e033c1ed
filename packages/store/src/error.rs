//! Error types for the store layer.

use thiserror::Error;

use crate::path::{PathError, TreePath};

/// Errors that can occur in store operations.
///
/// A `get` on an unreachable path is not an error (it is `None`), and
/// unsubscribing an unknown pair is a silent no-op. Errors here come from
/// invalid paths and from writes whose parent container does not exist.
#[derive(Debug, Error)]
pub enum Error {
    /// Path validation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// A write or delete targeted a path with no path components.
    #[error("empty path: the operation needs at least one component")]
    EmptyPath,

    /// An intermediate path segment did not resolve to a container.
    ///
    /// Writes do not create intermediate containers; the parent structure
    /// must exist before a child can be written into it.
    #[error("missing container at '{segment}' while walking '{path}'")]
    PathMissing { path: TreePath, segment: String },

    /// A path component addressed an array but was not a valid index.
    #[error("invalid array index '{component}' in '{path}'")]
    InvalidIndex { path: TreePath, component: String },

    /// An array index was past the end of the array.
    #[error("array index {index} out of bounds in '{path}'")]
    IndexOutOfBounds { path: TreePath, index: usize },

    /// A subscriber callback failed.
    ///
    /// Never returned from store operations; dispatch isolates each
    /// callback and logs the failure instead.
    #[error("subscriber callback failed: {message}")]
    Subscriber { message: String },
}
