//! Version-keyed template caching.
//!
//! The loader caches concatenated template text under a `components-{tag}`
//! key when a cache version is configured, so unchanged fragment bundles
//! skip the network on later loads.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::Error;

/// Storage for fetched template text.
pub trait TemplateCache: Send + Sync {
    /// Look up cached text under a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Store text under a key, replacing any previous entry.
    fn put(&self, key: &str, text: &str) -> Result<(), Error>;
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn put(&self, key: &str, text: &str) -> Result<(), Error> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), text.to_string());
        }
        Ok(())
    }
}

/// Cache persisted as one file per key under a directory.
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Create a cache rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys are host-generated (`components-{tag}`); sanitize anyway so a
        // hostile version tag cannot escape the cache directory.
        let file: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(file)
    }
}

impl TemplateCache for DiskCache {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.entry_path(key)).ok()
    }

    fn put(&self, key: &str, text: &str) -> Result<(), Error> {
        std::fs::write(self.entry_path(key), text)?;
        Ok(())
    }
}
