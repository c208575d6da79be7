//! Folio Plugin SDK
//!
//! Page models, the plugin contract, and the page type pool. Plugin crates
//! depend on this crate only; the kernel depends on it too and wires the
//! pool into its shared state.

pub mod admin;
pub mod error;
pub mod plugin;
pub mod pool;
pub mod types;

pub use admin::{AdminSite, PageAdmin, PageModelAdmin};
pub use error::PageTypeError;
pub use plugin::{PageTypeModel, PageTypePlugin, TemplateRenderer};
pub use pool::{AppDescriptor, PageTypeHook, PageTypePool};
pub use types::{CreatePage, NavigationEntry, Page, Site, mark_current};

pub mod prelude {
    pub use crate::admin::{PageAdmin, PageModelAdmin};
    pub use crate::error::PageTypeError;
    pub use crate::plugin::{PageTypeModel, PageTypePlugin, TemplateRenderer};
    pub use crate::pool::PageTypePool;
    pub use crate::types::{Page, Site};
}
