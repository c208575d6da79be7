//! The installed application table.
//!
//! Folio applications are compiled into the binary; each entry optionally
//! exposes a page type registration hook. The pool's one-shot discovery
//! walks this table on first access, skipping apps without a hook.

use folio_sdk::AppDescriptor;

use crate::config::Config;

/// All applications shipped with this build.
fn all_apps() -> Vec<AppDescriptor> {
    vec![
        AppDescriptor::new("folio_kernel"),
        AppDescriptor::with_page_types("folio_layout_page", folio_layout_page::page_type_plugins),
        AppDescriptor::with_page_types("folio_textfile", folio_textfile::page_type_plugins),
    ]
}

/// The installed apps, honoring the configured disable list.
pub fn installed_apps(config: &Config) -> Vec<AppDescriptor> {
    all_apps()
        .into_iter()
        .filter(|app| !config.disabled_apps.iter().any(|name| name == app.name()))
        .collect()
}
