//! The page type pool: registration and lazy discovery of plugins.
//!
//! The pool is constructed once with the installed application table and
//! passed around explicitly (it lives in the kernel's shared state). Nothing
//! is registered at construction; the first lookup triggers a one-shot scan
//! over the installed apps, invoking each app's registration hook. After the
//! scan the pool is effectively read-only for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::admin::{AdminSite, PageModelAdmin};
use crate::error::PageTypeError;
use crate::plugin::{PageTypeModel, PageTypePlugin};

/// Registration hook an installed app exposes for its page type plugins.
///
/// The hook body performs the `register` calls, the way a plugin module's
/// top-level registration would.
pub type PageTypeHook = fn(&PageTypePool) -> Result<(), PageTypeError>;

/// An installed application package.
///
/// Apps without page type plugins leave the hook unset; discovery skips
/// them silently. A present hook that fails marks the app as broken and the
/// error propagates unmodified.
#[derive(Clone, Copy)]
pub struct AppDescriptor {
    name: &'static str,
    page_type_plugins: Option<PageTypeHook>,
}

impl AppDescriptor {
    /// An app that ships no page type plugins.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            page_type_plugins: None,
        }
    }

    /// An app with a page type registration hook.
    pub const fn with_page_types(name: &'static str, hook: PageTypeHook) -> Self {
        Self {
            name,
            page_type_plugins: Some(hook),
        }
    }

    /// The app's package name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("name", &self.name)
            .field("page_type_plugins", &self.page_type_plugins.is_some())
            .finish()
    }
}

/// Discovery progress. Transitions `Empty -> Discovering -> Ready` exactly
/// once; a failed scan unwinds back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscoveryState {
    Empty,
    Discovering,
    Ready,
}

#[derive(Default)]
struct PoolInner {
    /// Plugin name -> singleton instance.
    plugins: HashMap<String, Arc<dyn PageTypePlugin>>,
    /// Model machine name -> plugin name, for render-time lookup.
    plugin_for_model: HashMap<String, String>,
}

/// The central administration of page type plugins.
pub struct PageTypePool {
    apps: Vec<AppDescriptor>,
    /// One-time initialization guard: concurrent first callers block here
    /// until the scan completes.
    discovery: Mutex<DiscoveryState>,
    inner: RwLock<PoolInner>,
    admin_site: AdminSite,
}

impl PageTypePool {
    /// Create an empty pool over the installed application table.
    pub fn new(apps: Vec<AppDescriptor>) -> Self {
        Self {
            apps,
            discovery: Mutex::new(DiscoveryState::Empty),
            inner: RwLock::new(PoolInner::default()),
            admin_site: AdminSite::new(),
        }
    }

    /// Make a page type plugin known to the pool.
    ///
    /// Validates the model binding, rejects name and model collisions, then
    /// stores the singleton instance, the reverse model mapping, and the
    /// plugin's admin customization. A failed registration leaves the pool
    /// untouched.
    pub fn register(&self, plugin: Arc<dyn PageTypePlugin>) -> Result<(), PageTypeError> {
        let model = plugin.model().clone();
        validate_machine_name(model.name)
            .map_err(|details| PageTypeError::invalid_model(plugin.name(), details))?;

        let name = plugin.name().to_string();
        let mut inner = self.inner.write();

        if inner.plugins.contains_key(&name) {
            return Err(PageTypeError::already_registered(name));
        }
        if inner.plugin_for_model.contains_key(model.name) || self.admin_site.is_registered(model.name)
        {
            return Err(PageTypeError::already_registered(model.name));
        }

        self.admin_site.register(model.name, plugin.model_admin())?;
        inner
            .plugin_for_model
            .insert(model.name.to_string(), name.clone());
        inner.plugins.insert(name.clone(), plugin);

        debug!(plugin = %name, model = %model.name, "registered page type plugin");
        Ok(())
    }

    /// All registered plugin instances. Order is not significant.
    pub fn plugins(&self) -> Result<Vec<Arc<dyn PageTypePlugin>>, PageTypeError> {
        self.ensure_discovered()?;
        Ok(self.inner.read().plugins.values().cloned().collect())
    }

    /// The model descriptors exposed by all registered plugins.
    pub fn model_classes(&self) -> Result<Vec<PageTypeModel>, PageTypeError> {
        self.ensure_discovered()?;
        Ok(self
            .inner
            .read()
            .plugins
            .values()
            .map(|plugin| plugin.model().clone())
            .collect())
    }

    /// The plugin registered for a model, by exact machine name.
    pub fn plugin_for_model(&self, model: &str) -> Result<Arc<dyn PageTypePlugin>, PageTypeError> {
        self.ensure_discovered()?;
        let inner = self.inner.read();
        inner
            .plugin_for_model
            .get(model)
            .and_then(|name| inner.plugins.get(name))
            .cloned()
            .ok_or_else(|| PageTypeError::plugin_not_found(model))
    }

    /// The admin customization bound during registration for a model.
    pub fn model_admin(&self, model: &str) -> Result<Arc<dyn PageModelAdmin>, PageTypeError> {
        self.ensure_discovered()?;
        self.admin_site
            .get(model)
            .ok_or_else(|| PageTypeError::AdminNotFound {
                model: model.to_string(),
            })
    }

    /// The pool-owned admin site.
    pub fn admin_site(&self) -> &AdminSite {
        &self.admin_site
    }

    /// Run the one-shot plugin scan if it has not happened yet.
    ///
    /// Apps without a hook are skipped silently; a hook error unwinds all
    /// registrations and propagates, so a corrected configuration can retry.
    /// Hooks run under the discovery guard and must only register; a hook
    /// that reads the pool back would deadlock.
    fn ensure_discovered(&self) -> Result<(), PageTypeError> {
        let mut state = self.discovery.lock();
        if *state == DiscoveryState::Ready {
            return Ok(());
        }

        *state = DiscoveryState::Discovering;
        for app in &self.apps {
            match app.page_type_plugins {
                Some(hook) => {
                    debug!(app = app.name, "loading page type plugins");
                    if let Err(e) = hook(self) {
                        {
                            let mut inner = self.inner.write();
                            inner.plugins.clear();
                            inner.plugin_for_model.clear();
                        }
                        self.admin_site.clear();
                        *state = DiscoveryState::Empty;
                        return Err(e);
                    }
                }
                None => {
                    debug!(app = app.name, "app has no page type plugins");
                }
            }
        }

        *state = DiscoveryState::Ready;
        Ok(())
    }
}

impl std::fmt::Debug for PageTypePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("PageTypePool")
            .field("apps", &self.apps.len())
            .field("plugins", &inner.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Validate a model machine name: lowercase letters, digits, underscores.
fn validate_machine_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("model machine name is empty".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!(
            "model machine name '{name}' may only contain lowercase letters, digits and underscores"
        ));
    }
    Ok(())
}
