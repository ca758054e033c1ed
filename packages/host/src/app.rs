//! The application host: loads template sources and registers components.

use std::collections::BTreeMap;
use std::sync::Arc;

use weft_store::{Store, Value};

use crate::cache::{MemoryCache, TemplateCache};
use crate::component::{Component, ComponentSpec, Hooks};
use crate::fetch::{HttpFetcher, TemplateFetcher};
use crate::id::{IdSource, UuidSource};
use crate::template::extract_templates;
use crate::Error;

/// A running application: one shared [`Store`] plus a registry of component
/// definitions loaded from template sources.
///
/// The host is the sole owner of its capabilities (fetcher, cache, id
/// source); they are passed in explicitly rather than reached through any
/// ambient global.
///
/// # Example
///
/// ```rust,no_run
/// use weft_host::App;
/// use weft_store::Value;
///
/// # async fn demo() -> Result<(), weft_host::Error> {
/// let mut app = App::new(
///     vec!["https://example.com/components.html".to_string()],
///     Some(Value::from(serde_json::json!({"user": {"name": "Ann"}}))),
///     Some("v1".to_string()),
/// )?;
/// app.load_components().await?;
/// let card = app.create("user-card", weft_host::Hooks::default())?;
/// card.connected().await?;
/// # Ok(())
/// # }
/// ```
pub struct App {
    store: Arc<Store>,
    component_urls: Vec<String>,
    version: Option<String>,
    fetcher: Arc<dyn TemplateFetcher>,
    cache: Arc<dyn TemplateCache>,
    ids: Arc<dyn IdSource>,
    registry: BTreeMap<String, Arc<ComponentSpec>>,
}

impl App {
    /// Create a host with production capabilities: HTTP fetching, an
    /// in-process cache, and UUID component ids.
    pub fn new(
        component_urls: Vec<String>,
        initial_data: Option<Value>,
        version: Option<String>,
    ) -> Result<Self, Error> {
        Ok(Self::with_capabilities(
            component_urls,
            initial_data,
            version,
            Arc::new(HttpFetcher::with_default_timeout()?),
            Arc::new(MemoryCache::new()),
            Arc::new(UuidSource),
        ))
    }

    /// Create a host with explicit capabilities.
    pub fn with_capabilities(
        component_urls: Vec<String>,
        initial_data: Option<Value>,
        version: Option<String>,
        fetcher: Arc<dyn TemplateFetcher>,
        cache: Arc<dyn TemplateCache>,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        let store = match initial_data {
            Some(data) => Store::with_data(data),
            None => Store::new(),
        };
        Self {
            store: Arc::new(store),
            component_urls,
            version,
            fetcher,
            cache,
            ids,
            registry: BTreeMap::new(),
        }
    }

    /// The shared store all components of this host are wired to.
    pub fn store(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    /// Names of every registered component, sorted.
    pub fn component_names(&self) -> Vec<String> {
        self.registry.keys().cloned().collect()
    }

    /// Load template sources and register every extracted component.
    ///
    /// With a version tag, the concatenated template text is looked up in
    /// (and written back to) the cache under `components-{tag}`; without
    /// one, sources are fetched every time. Returns the number of templates
    /// registered by this call.
    pub async fn load_components(&mut self) -> Result<usize, Error> {
        let text = match self.version.clone() {
            Some(version) => {
                let key = format!("components-{version}");
                match self.cache.get(&key) {
                    Some(cached) => {
                        tracing::debug!(%key, "template cache hit");
                        cached
                    }
                    None => {
                        tracing::debug!(%key, "template cache miss");
                        let fetched = self.fetch_template_text().await;
                        self.cache.put(&key, &fetched)?;
                        fetched
                    }
                }
            }
            None => self.fetch_template_text().await,
        };

        let templates = extract_templates(&text);
        let count = templates.len();
        for template in templates {
            let spec = Arc::new(ComponentSpec::from(template));
            tracing::debug!(name = %spec.name, "registering component");
            if self
                .registry
                .insert(spec.name.clone(), Arc::clone(&spec))
                .is_some()
            {
                tracing::debug!(name = %spec.name, "component redefined, last wins");
            }
        }
        Ok(count)
    }

    /// Fetch every source in declaration order, concatenating the bodies of
    /// the sources that succeed. A failing source contributes nothing.
    async fn fetch_template_text(&self) -> String {
        let mut text = String::new();
        for url in &self.component_urls {
            match self.fetcher.fetch(url).await {
                Ok(body) => text.push_str(&body),
                Err(error) => {
                    tracing::warn!(%url, %error, "skipping template source");
                }
            }
        }
        text
    }

    /// Instantiate a registered component with a fresh identity.
    pub fn create(&self, name: &str, hooks: Hooks) -> Result<Component, Error> {
        let spec = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownComponent(name.to_string()))?;
        Ok(Component::new(
            spec,
            Arc::clone(&self.store),
            self.ids.next_id(),
            hooks,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;
    use crate::id::SequentialSource;

    const CARD: &str = r#"<template id="user-card"><p></p></template>"#;
    const NAV: &str = r#"<template id="nav-bar"><nav></nav></template>"#;

    fn host(fetcher: StaticFetcher, cache: Arc<dyn TemplateCache>, version: Option<&str>) -> App {
        App::with_capabilities(
            vec![
                "http://x/card.html".to_string(),
                "http://x/nav.html".to_string(),
            ],
            None,
            version.map(str::to_string),
            Arc::new(fetcher),
            cache,
            Arc::new(SequentialSource::default()),
        )
    }

    fn full_fetcher() -> StaticFetcher {
        let mut fetcher = StaticFetcher::new();
        fetcher.insert("http://x/card.html", CARD);
        fetcher.insert("http://x/nav.html", NAV);
        fetcher
    }

    #[tokio::test]
    async fn load_registers_all_templates() {
        let mut app = host(full_fetcher(), Arc::new(MemoryCache::new()), None);
        let count = app.load_components().await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(app.component_names(), vec!["nav-bar", "user-card"]);
    }

    #[tokio::test]
    async fn failed_source_is_skipped() {
        let mut fetcher = StaticFetcher::new();
        fetcher.insert("http://x/card.html", CARD);
        // nav.html not registered: that source fails, the other still loads
        let mut app = host(fetcher, Arc::new(MemoryCache::new()), None);
        let count = app.load_components().await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(app.component_names(), vec!["user-card"]);
    }

    #[tokio::test]
    async fn versioned_load_populates_and_reuses_cache() {
        let cache: Arc<dyn TemplateCache> = Arc::new(MemoryCache::new());

        let mut first = host(full_fetcher(), Arc::clone(&cache), Some("v1"));
        first.load_components().await.unwrap();
        assert!(cache.get("components-v1").is_some());

        // Second host shares the cache but has no working sources; the
        // cached text alone must register the components.
        let mut second = host(StaticFetcher::new(), Arc::clone(&cache), Some("v1"));
        let count = second.load_components().await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn unversioned_load_bypasses_cache() {
        let cache: Arc<dyn TemplateCache> = Arc::new(MemoryCache::new());
        let mut app = host(full_fetcher(), Arc::clone(&cache), None);
        app.load_components().await.unwrap();
        assert!(cache.get("components-v1").is_none());
    }

    #[tokio::test]
    async fn duplicate_component_name_last_wins() {
        let mut fetcher = StaticFetcher::new();
        fetcher.insert(
            "http://x/card.html",
            r#"<template id="user-card"><p>old</p></template>"#,
        );
        fetcher.insert(
            "http://x/nav.html",
            r#"<template id="user-card"><p>new</p></template>"#,
        );
        let mut app = host(fetcher, Arc::new(MemoryCache::new()), None);
        app.load_components().await.unwrap();

        let card = app.create("user-card", Hooks::default()).unwrap();
        assert!(card.spec().markup.contains("new"));
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let mut app = host(full_fetcher(), Arc::new(MemoryCache::new()), None);
        app.load_components().await.unwrap();

        let a = app.create("user-card", Hooks::default()).unwrap();
        let b = app.create("user-card", Hooks::default()).unwrap();
        assert_eq!(a.component_id(), "component-0");
        assert_eq!(b.component_id(), "component-1");
    }

    #[tokio::test]
    async fn create_unknown_component_fails() {
        let app = host(full_fetcher(), Arc::new(MemoryCache::new()), None);
        let err = app.create("nope", Hooks::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownComponent(_)));
    }

    #[tokio::test]
    async fn initial_data_reaches_the_store() {
        let app = App::with_capabilities(
            Vec::new(),
            Some(Value::from(serde_json::json!({"user": {"name": "Ann"}}))),
            None,
            Arc::new(StaticFetcher::new()),
            Arc::new(MemoryCache::new()),
            Arc::new(SequentialSource::default()),
        );
        let store = app.store();
        assert_eq!(
            store.get(&weft_store::tree_path!("user.name")).await,
            Some(Value::from("Ann"))
        );
    }
}
