//! Dotted-path type with validated Unicode identifier components.

use std::fmt;

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path component is not a valid Unicode identifier.
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
    /// The path string is invalid.
    InvalidPath { message: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidComponent {
                component,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid path component '{}' at position {}: {}",
                    component, position, message
                )
            }
            PathError::InvalidPath { message } => {
                write!(f, "invalid path: {}", message)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A validated dotted path into the store tree.
///
/// Path components are separated by `.` and must be valid Unicode
/// identifiers (per UAX#31) or numeric strings (for array indexing).
/// `"user.name"` addresses the `name` key inside the `user` map.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TreePath {
    pub components: Vec<String>,
}

impl TreePath {
    /// Parse a dotted path string, validating components.
    ///
    /// # Path Syntax
    ///
    /// - Components are separated by `.`
    /// - Empty components are ignored (normalizes `..` and trailing `.`)
    /// - Each component must be a valid identifier or numeric string
    ///
    /// Validation deliberately narrows what is addressable: a
    /// [`Value::Map`](crate::Value) can hold keys like `"nav-bar"` (the
    /// JSON bridge makes such trees easy to build), but no `TreePath`
    /// reaches them. Paths are kept identifier-shaped so they stay usable
    /// as identifiers in embedding languages; non-identifier keys are
    /// storable, unaddressable data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use weft_store::TreePath;
    ///
    /// let path = TreePath::parse("users.123.name").unwrap();
    /// assert_eq!(path.len(), 3);
    ///
    /// // Trailing dots are normalized
    /// assert_eq!(TreePath::parse("foo.bar.").unwrap(), TreePath::parse("foo.bar").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Ok(TreePath {
                components: Vec::new(),
            });
        }

        let components: Vec<String> = s
            .split('.')
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }

        Ok(TreePath { components })
    }

    /// Try to create a path from components, validating each.
    pub fn try_from_components(components: Vec<String>) -> Result<Self, PathError> {
        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }
        Ok(TreePath { components })
    }

    /// Validate a single path component.
    fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
        if component.is_empty() {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: "empty component".to_string(),
            });
        }

        // Allow pure numeric strings (for array indexing)
        if component.chars().all(|c| c.is_ascii_digit()) {
            return Ok(());
        }

        let mut chars = component.chars();
        let first = chars.next().unwrap();

        // First char: XID_Start or underscore followed by XID_Continue
        let valid_start = unicode_ident::is_xid_start(first)
            || (first == '_'
                && chars
                    .clone()
                    .next()
                    .is_some_and(unicode_ident::is_xid_continue));

        if !valid_start {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: "must start with a letter or underscore followed by letter/digit"
                    .to_string(),
            });
        }

        for c in chars {
            if !unicode_ident::is_xid_continue(c) {
                return Err(PathError::InvalidComponent {
                    component: component.to_string(),
                    position,
                    message: format!("invalid character '{}' in identifier", c),
                });
            }
        }

        Ok(())
    }

    /// Check if this path is empty (root path).
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.components.iter()
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &TreePath) -> TreePath {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        TreePath { components }
    }

    /// Check if this path has the given prefix.
    pub fn has_prefix(&self, prefix: &TreePath) -> bool {
        prefix.components.len() <= self.components.len()
            && prefix.components == self.components[..prefix.components.len()]
    }

    /// Iterate over every non-empty prefix of this path, shortest first.
    ///
    /// For `a.b.c` that is `a`, `a.b`, `a.b.c`. These are the ancestor
    /// topics a write to this path must notify.
    pub fn prefixes(&self) -> impl Iterator<Item = TreePath> + '_ {
        (1..=self.components.len()).map(|end| TreePath {
            components: self.components[..end].to_vec(),
        })
    }

    /// Split into the parent path and the final component.
    ///
    /// Returns `None` for the empty path.
    pub fn split_last(&self) -> Option<(TreePath, &str)> {
        let (last, parent) = self.components.split_last()?;
        Some((
            TreePath {
                components: parent.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

impl std::ops::Index<usize> for TreePath {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.components[i]
    }
}

impl std::str::FromStr for TreePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TreePath::parse(s)
    }
}

/// Macro for creating paths at compile time.
///
/// # Example
///
/// ```rust
/// use weft_store::tree_path;
///
/// let p = tree_path!("users.123.name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! tree_path {
    ($s:expr) => {
        $crate::TreePath::parse($s).expect("invalid path literal")
    };
}
