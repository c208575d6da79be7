//! Admin customization for page models.
//!
//! Each registered plugin binds an admin customization to its model. The
//! pool owns a dedicated [`AdminSite`] so plugin admin registrations never
//! collide with any other registration surface.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::PageTypeError;

/// Customization surface for a model's admin listing.
///
/// The defaults fit the generic page record; plugins override to surface
/// their own columns.
pub trait PageModelAdmin: Send + Sync {
    /// Columns shown in the model's listing.
    fn list_display(&self) -> Vec<&'static str> {
        vec!["title", "slug", "status", "changed"]
    }

    /// Fields the listing can be filtered by.
    fn list_filter(&self) -> Vec<&'static str> {
        vec!["status", "in_navigation"]
    }

    /// Fields searched by the listing's search box.
    fn search_fields(&self) -> Vec<&'static str> {
        vec!["title", "slug"]
    }
}

/// Generic admin used when a plugin does not provide its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAdmin;

impl PageModelAdmin for PageAdmin {}

/// Registry of admin customizations, keyed by model machine name.
///
/// Owned by the page type pool and populated during plugin registration.
pub struct AdminSite {
    registry: RwLock<HashMap<String, Arc<dyn PageModelAdmin>>>,
}

impl AdminSite {
    /// Create an empty admin site.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
        }
    }

    /// Register an admin for a model.
    ///
    /// Fails when the model already has an admin registered.
    pub fn register(
        &self,
        model: &str,
        admin: Arc<dyn PageModelAdmin>,
    ) -> Result<(), PageTypeError> {
        let mut registry = self.registry.write();
        if registry.contains_key(model) {
            return Err(PageTypeError::already_registered(model));
        }
        registry.insert(model.to_string(), admin);
        Ok(())
    }

    /// Get the admin registered for a model.
    pub fn get(&self, model: &str) -> Option<Arc<dyn PageModelAdmin>> {
        self.registry.read().get(model).cloned()
    }

    /// Check whether a model has an admin registered.
    pub fn is_registered(&self, model: &str) -> bool {
        self.registry.read().contains_key(model)
    }

    /// List registered model names.
    pub fn models(&self) -> Vec<String> {
        self.registry.read().keys().cloned().collect()
    }

    /// Drop all registrations. Used when a failed discovery scan unwinds.
    pub(crate) fn clear(&self) {
        self.registry.write().clear();
    }
}

impl Default for AdminSite {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AdminSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSite")
            .field("models", &self.models())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let site = AdminSite::new();
        site.register("textfile", Arc::new(PageAdmin)).unwrap();

        assert!(site.is_registered("textfile"));
        let admin = site.get("textfile").unwrap();
        assert_eq!(admin.list_display(), vec!["title", "slug", "status", "changed"]);
        assert!(site.get("other").is_none());
    }

    #[test]
    fn double_registration_is_rejected() {
        let site = AdminSite::new();
        site.register("textfile", Arc::new(PageAdmin)).unwrap();

        let err = site.register("textfile", Arc::new(PageAdmin)).unwrap_err();
        assert!(matches!(err, PageTypeError::AlreadyRegistered { name } if name == "textfile"));
    }

    #[test]
    fn overridden_admin_surfaces_its_columns() {
        struct WideAdmin;
        impl PageModelAdmin for WideAdmin {
            fn list_display(&self) -> Vec<&'static str> {
                vec!["title", "layout", "status"]
            }
        }

        let site = AdminSite::new();
        site.register("layout_page", Arc::new(WideAdmin)).unwrap();
        let admin = site.get("layout_page").unwrap();
        assert_eq!(admin.list_display(), vec!["title", "layout", "status"]);
        // Untouched defaults remain.
        assert_eq!(admin.list_filter(), vec!["status", "in_navigation"]);
    }
}
