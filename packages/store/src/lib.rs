//! # weft-store
//!
//! The reactive core of Weft: a hierarchical, path-addressed, in-memory
//! store with staged writes and prefix-aware publish/subscribe.
//!
//! - [`TreePath`]: validated dotted path (`"user.name"`)
//! - [`Value`]: tree-shaped data; `Map`/`Array` branch, everything else is a leaf
//! - [`Store`]: get/set/delete, stage/commit, subscribe/unsubscribe
//! - [`PathTrie`]: component-keyed prefix trie backing the subscription registry
//!
//! A write to a path notifies every subscriber whose topic is a prefix of
//! that path (the exact path included), delivering the written path and new
//! value. Dispatch is fire-and-forget: each callback runs in its own task,
//! its failure is logged and isolated, and the writer never waits.
//!
//! The store is not a database: no persistence, no replication, no schema.
//! Writes are last-write-wins and intermediate containers are never created
//! implicitly.
//!
//! # Example
//!
//! ```rust
//! use weft_store::{callback, Store, Value, tree_path};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), weft_store::Error> {
//! let store = Store::with_data(Value::from(serde_json::json!({"user": {"name": "Ann"}})));
//!
//! store.subscribe(&tree_path!("user"), "c1", callback(|path, value| async move {
//!     println!("{path} changed to {value:?}");
//!     Ok(())
//! })).await;
//!
//! store.set(&tree_path!("user.name"), Value::from("Bob")).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod path;
mod store;
mod trie;
mod value;

pub use error::Error;
pub use path::{PathError, TreePath};
pub use store::{callback, Callback, CallbackFuture, Store};
pub use trie::PathTrie;
pub use value::Value;
