//! Component definitions, instances, and lifecycle hooks.
//!
//! A registered [`ComponentSpec`] describes one template-backed component;
//! a [`Component`] is one live instance bound to the shared store under its
//! own generated identity. Lifecycle hooks are explicit optional
//! capabilities: an absent hook is silently skipped, while a present hook's
//! failure propagates to whoever drove the lifecycle event.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use weft_store::{Callback, Store, TreePath};

use crate::template::Template;
use crate::Error;

/// Future returned by a lifecycle hook.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), Error>> + Send>>;

/// A lifecycle hook invocation.
pub type HookFn = Box<dyn Fn(HookContext) -> HookFuture + Send + Sync>;

/// An attribute-change hook invocation.
pub type AttrHookFn = Box<dyn Fn(HookContext, AttributeChange) -> HookFuture + Send + Sync>;

/// Wrap a plain async closure into a [`HookFn`].
pub fn hook<F, Fut>(f: F) -> HookFn
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    Box::new(move |cx| Box::pin(f(cx)))
}

/// Wrap a plain async closure into an [`AttrHookFn`].
pub fn attr_hook<F, Fut>(f: F) -> AttrHookFn
where
    F: Fn(HookContext, AttributeChange) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    Box::new(move |cx, change| Box::pin(f(cx, change)))
}

/// What a hook gets to work with: the shared store and its own identity.
#[derive(Clone)]
pub struct HookContext {
    pub store: Arc<Store>,
    pub component_id: String,
}

/// One observed-attribute change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub name: String,
    pub old: Option<String>,
    pub new: String,
}

/// The optional lifecycle capabilities of a component.
///
/// Each slot a component leaves `None` is simply not invoked; there is no
/// error for choosing not to implement a hook.
#[derive(Default)]
pub struct Hooks {
    /// Runs exactly once, on the first connect.
    pub init: Option<HookFn>,
    pub connected: Option<HookFn>,
    pub disconnected: Option<HookFn>,
    pub adopted: Option<HookFn>,
    pub attribute_changed: Option<AttrHookFn>,
}

/// A registered component definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Component name (the template's `id`).
    pub name: String,
    /// Attribute names whose changes are forwarded to instances.
    pub observed_attributes: Vec<String>,
    /// Template markup with scripts removed.
    pub markup: String,
    /// The template's extracted script source. Kept for embedders that
    /// evaluate it; the host itself does not.
    pub script: String,
}

impl From<Template> for ComponentSpec {
    fn from(template: Template) -> Self {
        Self {
            name: template.name,
            observed_attributes: template.attributes,
            markup: template.markup,
            script: template.script,
        }
    }
}

/// A live component instance wired to the shared store.
pub struct Component {
    spec: Arc<ComponentSpec>,
    store: Arc<Store>,
    component_id: String,
    hooks: Hooks,
    connected: AtomicBool,
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("component_id", &self.component_id)
            .finish_non_exhaustive()
    }
}

impl Component {
    pub(crate) fn new(
        spec: Arc<ComponentSpec>,
        store: Arc<Store>,
        component_id: String,
        hooks: Hooks,
    ) -> Self {
        Self {
            spec,
            store,
            component_id,
            hooks,
            connected: AtomicBool::new(false),
        }
    }

    /// The definition this instance was created from.
    pub fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    /// This instance's unique identity, used as its subscriber id.
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// The shared store this instance is bound to.
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    fn context(&self) -> HookContext {
        HookContext {
            store: Arc::clone(&self.store),
            component_id: self.component_id.clone(),
        }
    }

    async fn run_hook(
        &self,
        name: &'static str,
        hook: Option<&HookFn>,
    ) -> Result<(), Error> {
        match hook {
            Some(hook) => hook(self.context()).await.map_err(|e| Error::Hook {
                hook: name,
                message: e.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Drive the connect event: `init` runs exactly once on the first
    /// connect, then the `connected` hook if present.
    pub async fn connected(&self) -> Result<(), Error> {
        if !self.connected.swap(true, Ordering::SeqCst) {
            self.run_hook("init", self.hooks.init.as_ref()).await?;
        }
        self.run_hook("connected", self.hooks.connected.as_ref())
            .await
    }

    /// Drive the disconnect event.
    pub async fn disconnected(&self) -> Result<(), Error> {
        self.run_hook("disconnected", self.hooks.disconnected.as_ref())
            .await
    }

    /// Drive the re-parent event.
    pub async fn adopted(&self) -> Result<(), Error> {
        self.run_hook("adopted", self.hooks.adopted.as_ref()).await
    }

    /// Forward an attribute change to the instance.
    ///
    /// Changes to attributes the definition does not observe are dropped,
    /// as are changes when no `attribute_changed` hook is present.
    pub async fn attribute_changed(
        &self,
        name: &str,
        old: Option<&str>,
        new: &str,
    ) -> Result<(), Error> {
        if !self.spec.observed_attributes.iter().any(|a| a == name) {
            return Ok(());
        }
        match &self.hooks.attribute_changed {
            Some(hook) => hook(
                self.context(),
                AttributeChange {
                    name: name.to_string(),
                    old: old.map(str::to_string),
                    new: new.to_string(),
                },
            )
            .await
            .map_err(|e| Error::Hook {
                hook: "attribute_changed",
                message: e.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Subscribe to a store topic under this instance's identity.
    pub async fn subscribe(&self, topic: &TreePath, callback: Callback) {
        self.store
            .subscribe(topic, self.component_id.clone(), callback)
            .await;
    }

    /// Remove this instance's subscription on a topic.
    pub async fn unsubscribe(&self, topic: &TreePath) {
        self.store.unsubscribe(topic, &self.component_id).await;
    }
}
