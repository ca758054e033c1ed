//! Component identifier generation.
//!
//! Identifier generation is an injected capability so embedders and tests
//! can substitute deterministic sources.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// A source of probabilistically-unique component identifiers.
pub trait IdSource: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> String;
}

/// Production identifier source backed by UUID v4.
#[derive(Debug, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic counter-based source for tests.
#[derive(Debug, Default)]
pub struct SequentialSource {
    next: AtomicU64,
}

impl IdSource for SequentialSource {
    fn next_id(&self) -> String {
        format!("component-{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_distinct() {
        let source = UuidSource;
        let a = source.next_id();
        let b = source.next_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32); // simple format, no hyphens
    }

    #[test]
    fn sequential_ids_count_up() {
        let source = SequentialSource::default();
        assert_eq!(source.next_id(), "component-0");
        assert_eq!(source.next_id(), "component-1");
    }
}
