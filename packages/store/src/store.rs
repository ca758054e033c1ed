//! The reactive store: path-addressed tree, staged writes, prefix pub/sub.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{Error, PathTrie, TreePath, Value};

/// Future returned by a subscriber callback.
pub type CallbackFuture = Pin<Box<dyn Future<Output = Result<(), Error>> + Send>>;

/// A subscriber callback.
///
/// Receives the full path that was written and the new value. A subscriber
/// watching an ancestor topic still sees the complete written path, not the
/// topic it registered under.
pub type Callback = Arc<dyn Fn(TreePath, Value) -> CallbackFuture + Send + Sync>;

/// Wrap a plain async closure into a [`Callback`].
///
/// # Example
///
/// ```rust
/// use weft_store::{callback, Store, tree_path, Value};
///
/// # async fn demo(store: &Store) {
/// let cb = callback(|path, value| async move {
///     println!("{path} = {value:?}");
///     Ok(())
/// });
/// store.subscribe(&tree_path!("user"), "c1", cb).await;
/// # }
/// ```
pub fn callback<F, Fut>(f: F) -> Callback
where
    F: Fn(TreePath, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    Arc::new(move |path, value| Box::pin(f(path, value)))
}

/// Callbacks registered under one topic, keyed by subscriber identity.
type TopicBucket = BTreeMap<String, Callback>;

/// Mutable store state, guarded as one unit.
struct State {
    data: Value,
    stage: BTreeMap<TreePath, Value>,
    subscriptions: PathTrie<TopicBucket>,
}

/// A hierarchical, reactive, in-memory store.
///
/// The store owns a tree of values addressed by dotted paths, a buffer of
/// staged writes applied by [`commit`](Store::commit), and a subscription
/// registry notified on every [`set`](Store::set). Notification is
/// prefix-aware: a write to `a.b.c` reaches subscribers of `a`, `a.b` and
/// `a.b.c`, and each receives the written path and new value.
///
/// All state lives behind a single mutex so each structural mutation is one
/// atomic step; callbacks are dispatched as independent tokio tasks after the
/// lock is released, and the writer never waits for them.
///
/// # Example
///
/// ```rust
/// use weft_store::{Store, Value, tree_path};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), weft_store::Error> {
/// let store = Store::with_data(Value::from(serde_json::json!({"user": {"name": "Ann"}})));
/// store.set(&tree_path!("user.name"), Value::from("Bob")).await?;
/// assert_eq!(store.get(&tree_path!("user.name")).await, Some(Value::from("Bob")));
/// # Ok(())
/// # }
/// ```
pub struct Store {
    state: Mutex<State>,
}

impl Store {
    /// Create a store with an empty root map.
    pub fn new() -> Self {
        Self::with_data(Value::map())
    }

    /// Create a store with an initial data tree.
    pub fn with_data(data: Value) -> Self {
        Self {
            state: Mutex::new(State {
                data,
                stage: BTreeMap::new(),
                subscriptions: PathTrie::new(),
            }),
        }
    }

    /// Read the value at a path.
    ///
    /// Returns `None` for any unreachable path: absent keys, paths that
    /// descend through a leaf, out-of-range indices. Never an error and
    /// never mutates.
    pub async fn get(&self, path: &TreePath) -> Option<Value> {
        let state = self.state.lock().await;
        state.data.get(path).cloned()
    }

    /// Write a value at a path, last-write-wins, and notify subscribers.
    ///
    /// The parent container must already exist; intermediate containers are
    /// not created (see [`Error::PathMissing`]). On success every callback
    /// registered on the path or any ancestor prefix of it is invoked with
    /// `(path, value)` in its own task; a failing callback is logged and
    /// never affects this caller or other callbacks.
    pub async fn set(&self, path: &TreePath, value: Value) -> Result<(), Error> {
        let callbacks = {
            let mut state = self.state.lock().await;
            state.data.set(path, value.clone())?;
            collect_callbacks(&state.subscriptions, path)
        };
        dispatch(callbacks, path.clone(), value);
        Ok(())
    }

    /// Remove the value at a path.
    ///
    /// Deliberately outside the notification pipeline: subscribers are not
    /// told about deletions. Removing an absent final key is a no-op;
    /// a missing intermediate container is an error, matching `set`.
    pub async fn delete(&self, path: &TreePath) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.data.remove(path)?;
        Ok(())
    }

    /// Buffer a pending write without touching the data tree.
    ///
    /// Re-staging the same path overwrites the earlier pending value.
    /// Nothing is notified until [`commit`](Store::commit).
    pub async fn stage(&self, path: TreePath, value: Value) {
        let mut state = self.state.lock().await;
        state.stage.insert(path, value);
    }

    /// Apply and clear all staged writes.
    ///
    /// Each entry is removed from the buffer before its write is applied, so
    /// a callback that re-stages a path during commit leaves a fresh pending
    /// entry rather than corrupting the drain. Entries apply independently:
    /// one failing write (logged) does not stop the rest.
    pub async fn commit(&self) {
        loop {
            let entry = {
                let mut state = self.state.lock().await;
                state.stage.pop_first()
            };
            let Some((path, value)) = entry else { break };
            if let Err(error) = self.set(&path, value).await {
                tracing::warn!(path = %path, %error, "staged write failed, continuing commit");
            }
        }
    }

    /// Register a callback for a topic under a subscriber identity.
    ///
    /// Re-subscribing the same `(topic, id)` pair replaces the callback. If
    /// the topic currently holds a value, the callback receives one initial
    /// snapshot call `(topic, current_value)` through the same
    /// fire-and-forget dispatch as write notifications.
    pub async fn subscribe(
        &self,
        topic: &TreePath,
        subscriber_id: impl Into<String>,
        callback: Callback,
    ) {
        let snapshot = {
            let mut state = self.state.lock().await;
            state
                .subscriptions
                .get_or_insert_with(topic, BTreeMap::new)
                .insert(subscriber_id.into(), callback.clone());
            state.data.get(topic).cloned()
        };
        if let Some(value) = snapshot {
            dispatch(vec![callback], topic.clone(), value);
        }
    }

    /// Remove a subscriber's callback from a topic.
    ///
    /// Silent no-op if the topic or the subscriber was never registered.
    pub async fn unsubscribe(&self, topic: &TreePath, subscriber_id: &str) {
        let mut state = self.state.lock().await;
        if let Some(bucket) = state.subscriptions.get_mut(topic) {
            bucket.remove(subscriber_id);
        }
    }

    /// Number of pending staged writes.
    pub async fn staged_count(&self) -> usize {
        self.state.lock().await.stage.len()
    }

    /// Number of subscribers registered on an exact topic.
    pub async fn subscriber_count(&self, topic: &TreePath) -> usize {
        let state = self.state.lock().await;
        state.subscriptions.get(topic).map_or(0, TopicBucket::len)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot the callbacks registered on every non-empty prefix of `path`.
fn collect_callbacks(subscriptions: &PathTrie<TopicBucket>, path: &TreePath) -> Vec<Callback> {
    subscriptions
        .ancestor_values(path)
        .into_iter()
        .flat_map(|bucket| bucket.values().cloned())
        .collect()
}

/// Fire-and-forget delivery: one task per callback, failures logged.
fn dispatch(callbacks: Vec<Callback>, path: TreePath, value: Value) {
    for cb in callbacks {
        let path = path.clone();
        let value = value.clone();
        tokio::spawn(async move {
            if let Err(error) = cb(path.clone(), value).await {
                tracing::warn!(path = %path, %error, "subscriber callback failed");
            }
        });
    }
}
