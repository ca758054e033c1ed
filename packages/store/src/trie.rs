//! A generic prefix trie keyed by path components.
//!
//! `PathTrie<T>` provides O(k) operations where k is the path depth.
//! Each node can optionally hold a value, and has children indexed by path
//! component. The subscription registry stores its topic buckets in one of
//! these; `ancestor_values` is the prefix walk behind write notification.

use std::collections::BTreeMap;

use crate::TreePath;

/// A prefix trie keyed by path components.
///
/// # Example
///
/// ```rust
/// use weft_store::{PathTrie, tree_path};
///
/// let mut trie: PathTrie<i32> = PathTrie::new();
/// trie.insert(&tree_path!("a.b"), 1);
/// trie.insert(&tree_path!("a.b.c"), 2);
///
/// assert_eq!(trie.get(&tree_path!("a.b")), Some(&1));
///
/// // ancestor_values returns every value on a prefix of the path
/// let hits: Vec<&i32> = trie.ancestor_values(&tree_path!("a.b.c.d"));
/// assert_eq!(hits, vec![&1, &2]);
/// ```
#[derive(Debug, Clone)]
pub struct PathTrie<T> {
    value: Option<T>,
    children: BTreeMap<String, PathTrie<T>>,
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }
}

impl<T> PathTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to node, creating intermediate nodes as needed.
    fn get_or_create_node(&mut self, path: &TreePath) -> &mut PathTrie<T> {
        let mut current = self;
        for component in &path.components {
            current = current.children.entry(component.clone()).or_default();
        }
        current
    }

    /// Navigate to node if it exists.
    fn get_node(&self, path: &TreePath) -> Option<&PathTrie<T>> {
        let mut current = self;
        for component in &path.components {
            current = current.children.get(component)?;
        }
        Some(current)
    }

    /// Navigate to node if it exists (mutable).
    fn get_node_mut(&mut self, path: &TreePath) -> Option<&mut PathTrie<T>> {
        let mut current = self;
        for component in &path.components {
            current = current.children.get_mut(component)?;
        }
        Some(current)
    }

    /// Insert a value at path. Returns previous value if any.
    pub fn insert(&mut self, path: &TreePath, value: T) -> Option<T> {
        let node = self.get_or_create_node(path);
        node.value.replace(value)
    }

    /// Get the value at path, creating it with `make` if absent.
    pub fn get_or_insert_with(&mut self, path: &TreePath, make: impl FnOnce() -> T) -> &mut T {
        let node = self.get_or_create_node(path);
        node.value.get_or_insert_with(make)
    }

    /// Remove and return value at exact path. Children remain.
    pub fn remove(&mut self, path: &TreePath) -> Option<T> {
        self.get_node_mut(path)?.value.take()
    }

    /// Get reference to value at exact path.
    pub fn get(&self, path: &TreePath) -> Option<&T> {
        self.get_node(path)?.value.as_ref()
    }

    /// Get mutable reference to value at exact path.
    pub fn get_mut(&mut self, path: &TreePath) -> Option<&mut T> {
        self.get_node_mut(path)?.value.as_mut()
    }

    /// Collect the values stored at every non-empty prefix of `path`,
    /// shortest prefix first, the exact path included.
    ///
    /// Walks at most `path.len()` nodes; topics that are siblings or
    /// descendants of `path` are never visited.
    pub fn ancestor_values(&self, path: &TreePath) -> Vec<&T> {
        let mut hits = Vec::new();
        let mut current = self;
        for component in &path.components {
            match current.children.get(component) {
                Some(child) => {
                    if let Some(value) = &child.value {
                        hits.push(value);
                    }
                    current = child;
                }
                None => break,
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_path;

    #[test]
    fn insert_and_get() {
        let mut trie: PathTrie<i32> = PathTrie::new();
        assert_eq!(trie.insert(&tree_path!("a.b"), 1), None);
        assert_eq!(trie.insert(&tree_path!("a.b"), 2), Some(1));
        assert_eq!(trie.get(&tree_path!("a.b")), Some(&2));
        assert_eq!(trie.get(&tree_path!("a")), None);
    }

    #[test]
    fn remove_leaves_children() {
        let mut trie: PathTrie<i32> = PathTrie::new();
        trie.insert(&tree_path!("a"), 1);
        trie.insert(&tree_path!("a.b"), 2);
        assert_eq!(trie.remove(&tree_path!("a")), Some(1));
        assert_eq!(trie.get(&tree_path!("a.b")), Some(&2));
        assert_eq!(trie.remove(&tree_path!("a")), None);
    }

    #[test]
    fn get_or_insert_with_creates_once() {
        let mut trie: PathTrie<Vec<i32>> = PathTrie::new();
        trie.get_or_insert_with(&tree_path!("a"), Vec::new).push(1);
        trie.get_or_insert_with(&tree_path!("a"), Vec::new).push(2);
        assert_eq!(trie.get(&tree_path!("a")), Some(&vec![1, 2]));
    }

    #[test]
    fn ancestor_values_collects_prefixes_only() {
        let mut trie: PathTrie<&str> = PathTrie::new();
        trie.insert(&tree_path!("a"), "a");
        trie.insert(&tree_path!("a.b"), "a.b");
        trie.insert(&tree_path!("a.b.c"), "a.b.c");
        trie.insert(&tree_path!("a.x"), "a.x"); // sibling
        trie.insert(&tree_path!("a.b.c.d"), "a.b.c.d"); // descendant

        let hits = trie.ancestor_values(&tree_path!("a.b.c"));
        assert_eq!(hits, vec![&"a", &"a.b", &"a.b.c"]);
    }

    #[test]
    fn ancestor_values_skips_valueless_nodes() {
        let mut trie: PathTrie<&str> = PathTrie::new();
        trie.insert(&tree_path!("a.b.c"), "deep");
        // node "a" and "a.b" exist but hold no value
        let hits = trie.ancestor_values(&tree_path!("a.b.c"));
        assert_eq!(hits, vec![&"deep"]);
    }

    #[test]
    fn ancestor_values_on_unknown_path() {
        let trie: PathTrie<i32> = PathTrie::new();
        assert!(trie.ancestor_values(&tree_path!("x.y")).is_empty());
    }
}
