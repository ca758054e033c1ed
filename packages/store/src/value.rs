//! The Value type - a tree-shaped data structure.
//!
//! This is the state a [`Store`](crate::Store) holds. A dynamically-typed
//! tree: `Map` and `Array` are the branch cases, everything else is a leaf,
//! so traversal termination is an explicit match arm rather than a runtime
//! type probe.

use std::collections::BTreeMap;

use crate::{Error, TreePath};

/// A tree-shaped value addressed by dotted paths.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering (important for comparison)
/// - Uses `i64` for integers (sufficient for most use cases)
/// - Maps directly onto JSON via the `From` conversions below
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value. Distinct from "path doesn't exist".
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Get a reference to a nested value by path.
    ///
    /// Returns `None` if the path doesn't exist or can't be navigated
    /// (e.g., trying to index into a string). Descent stops before indexing
    /// a leaf; an unreachable path is a missing result, never an error.
    pub fn get(&self, path: &TreePath) -> Option<&Value> {
        let mut current = self;
        for component in path.iter() {
            current = match current {
                Value::Map(map) => map.get(component)?,
                Value::Array(arr) => {
                    let index: usize = component.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Navigate to the container holding the final path component.
    ///
    /// Intermediate containers must already exist; there is no
    /// autovivification. Callers that pre-structure their trees rely on the
    /// failure, so the sharp edge stays.
    fn walk_to_parent<'a>(
        &'a mut self,
        path: &TreePath,
        parent: &TreePath,
    ) -> Result<&'a mut Value, Error> {
        let mut current = self;
        for component in parent.iter() {
            current = match current {
                Value::Map(map) => {
                    map.get_mut(component).ok_or_else(|| Error::PathMissing {
                        path: path.clone(),
                        segment: component.clone(),
                    })?
                }
                Value::Array(arr) => {
                    let index: usize =
                        component.parse().map_err(|_| Error::InvalidIndex {
                            path: path.clone(),
                            component: component.clone(),
                        })?;
                    arr.get_mut(index).ok_or_else(|| Error::PathMissing {
                        path: path.clone(),
                        segment: component.clone(),
                    })?
                }
                _ => {
                    return Err(Error::PathMissing {
                        path: path.clone(),
                        segment: component.clone(),
                    });
                }
            };
        }
        Ok(current)
    }

    /// Set a value at a path, last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPath`] for a path with no components, and
    /// [`Error::PathMissing`] if any segment before the last does not
    /// resolve to an existing container.
    pub fn set(&mut self, path: &TreePath, value: Value) -> Result<(), Error> {
        let (parent, last) = path.split_last().ok_or(Error::EmptyPath)?;
        let container = self.walk_to_parent(path, &parent)?;

        match container {
            Value::Map(map) => {
                map.insert(last.to_string(), value);
                Ok(())
            }
            Value::Array(arr) => {
                let index: usize = last.parse().map_err(|_| Error::InvalidIndex {
                    path: path.clone(),
                    component: last.to_string(),
                })?;
                if index < arr.len() {
                    arr[index] = value;
                    Ok(())
                } else if index == arr.len() {
                    arr.push(value);
                    Ok(())
                } else {
                    Err(Error::IndexOutOfBounds {
                        path: path.clone(),
                        index,
                    })
                }
            }
            _ => Err(Error::PathMissing {
                path: path.clone(),
                segment: last.to_string(),
            }),
        }
    }

    /// Remove a value at a path, returning it if it existed.
    ///
    /// Removing an absent final key is `Ok(None)`. A missing intermediate
    /// container is [`Error::PathMissing`], matching `set`.
    pub fn remove(&mut self, path: &TreePath) -> Result<Option<Value>, Error> {
        let (parent, last) = path.split_last().ok_or(Error::EmptyPath)?;
        let container = self.walk_to_parent(path, &parent)?;

        match container {
            Value::Map(map) => Ok(map.remove(last)),
            Value::Array(arr) => {
                let index: usize = last.parse().map_err(|_| Error::InvalidIndex {
                    path: path.clone(),
                    component: last.to_string(),
                })?;
                if index < arr.len() {
                    Ok(Some(arr.remove(index)))
                } else {
                    Ok(None)
                }
            }
            _ => Err(Error::PathMissing {
                path: path.clone(),
                segment: last.to_string(),
            }),
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

// JSON bridge, so initial data trees can be written as serde_json values.

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    // Fallback for very large numbers
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_path;

    fn user_tree() -> Value {
        Value::from(serde_json::json!({
            "user": { "name": "Ann", "tags": ["admin", "ops"] }
        }))
    }

    #[test]
    fn get_nested_value() {
        let tree = user_tree();
        assert_eq!(tree.get(&tree_path!("user.name")), Some(&Value::from("Ann")));
        assert!(tree.get(&tree_path!("user")).unwrap().is_map());
        assert_eq!(tree.get(&tree_path!("nonexistent")), None);
    }

    #[test]
    fn get_stops_at_leaves() {
        let tree = user_tree();
        // user.name is a string; descending further yields missing, not panic
        assert_eq!(tree.get(&tree_path!("user.name.length")), None);
    }

    #[test]
    fn set_overwrites() {
        let mut tree = user_tree();
        tree.set(&tree_path!("user.name"), Value::from("Bob")).unwrap();
        assert_eq!(tree.get(&tree_path!("user.name")), Some(&Value::from("Bob")));
    }

    #[test]
    fn set_does_not_create_intermediates() {
        let mut tree = Value::map();
        let err = tree.set(&tree_path!("a.b.c"), Value::from(1)).unwrap_err();
        assert!(matches!(err, Error::PathMissing { .. }));
        assert_eq!(tree.get(&tree_path!("a")), None);
    }

    #[test]
    fn set_through_leaf_fails() {
        let mut tree = user_tree();
        let err = tree
            .set(&tree_path!("user.name.first"), Value::from("A"))
            .unwrap_err();
        assert!(matches!(err, Error::PathMissing { .. }));
    }

    #[test]
    fn set_empty_path_rejected() {
        let mut tree = Value::map();
        assert!(matches!(
            tree.set(&tree_path!(""), Value::Null),
            Err(Error::EmptyPath)
        ));
    }

    #[test]
    fn array_index_set_and_get() {
        let mut tree = user_tree();
        assert_eq!(
            tree.get(&tree_path!("user.tags.0")),
            Some(&Value::from("admin"))
        );

        tree.set(&tree_path!("user.tags.1"), Value::from("dev")).unwrap();
        assert_eq!(
            tree.get(&tree_path!("user.tags.1")),
            Some(&Value::from("dev"))
        );

        // Appending at len is allowed, past it is not
        tree.set(&tree_path!("user.tags.2"), Value::from("x")).unwrap();
        let err = tree
            .set(&tree_path!("user.tags.9"), Value::from("y"))
            .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { index: 9, .. }));
    }

    #[test]
    fn remove_works() {
        let mut tree = user_tree();
        let removed = tree.remove(&tree_path!("user.name")).unwrap();
        assert_eq!(removed, Some(Value::from("Ann")));
        assert_eq!(tree.get(&tree_path!("user.name")), None);
        // Parent still exists
        assert!(tree.get(&tree_path!("user")).is_some());
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut tree = user_tree();
        assert_eq!(tree.remove(&tree_path!("user.age")).unwrap(), None);
    }

    #[test]
    fn remove_missing_intermediate_fails() {
        let mut tree = user_tree();
        let err = tree.remove(&tree_path!("group.name")).unwrap_err();
        assert!(matches!(err, Error::PathMissing { .. }));
    }

    #[test]
    fn json_round_trip() {
        let json = serde_json::json!({
            "n": 1, "f": 1.5, "s": "x", "b": true, "z": null,
            "arr": [1, 2], "map": {"k": "v"}
        });
        let value = Value::from(json.clone());
        assert_eq!(serde_json::Value::from(value), json);
    }
}
