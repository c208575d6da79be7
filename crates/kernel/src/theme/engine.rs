//! Tera-backed theme engine.
//!
//! Page type plugins hand the engine a template name through the SDK's
//! `TemplateRenderer` seam; resolution tries each suggestion with the
//! `.html` suffix and as given, caching what it finds.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use folio_sdk::TemplateRenderer;

/// Template engine for the active theme.
pub struct ThemeEngine {
    tera: Tera,
    /// Resolved template names, keyed by the suggestion list.
    resolved: DashMap<String, String>,
}

impl ThemeEngine {
    /// Load every `.html` template under `templates_dir`.
    pub fn new(templates_dir: &Path) -> Result<Self> {
        let glob = templates_dir.join("**/*.html");
        let glob = glob
            .to_str()
            .context("template directory path is not valid UTF-8")?;

        let mut tera = Tera::new(glob).context("failed to load theme templates")?;
        tera.register_filter("format_date", format_date);

        debug!(
            count = tera.get_template_names().count(),
            "theme templates loaded"
        );

        Ok(Self {
            tera,
            resolved: DashMap::new(),
        })
    }

    /// An engine with no templates. Tests add raw templates as needed.
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        tera.register_filter("format_date", format_date);
        Self {
            tera,
            resolved: DashMap::new(),
        }
    }

    /// The underlying Tera instance.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Mutable access to Tera, for adding templates at runtime.
    pub fn tera_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }

    /// Resolve the first suggestion that names a loaded template.
    ///
    /// Each suggestion is tried with the `.html` suffix, then verbatim.
    /// Hits are cached under the full suggestion list; misses are not, so
    /// templates added after a miss are still found.
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let key = suggestions.join("|");
        if let Some(hit) = self.resolved.get(&key) {
            return Some(hit.clone());
        }

        let found = suggestions.iter().find_map(|name| self.lookup(name))?;
        self.resolved.insert(key, found.clone());
        Some(found)
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let with_suffix = format!("{name}.html");
        if self.tera.get_template(&with_suffix).is_ok() {
            return Some(with_suffix);
        }
        self.tera
            .get_template(name)
            .is_ok()
            .then(|| name.to_string())
    }
}

impl TemplateRenderer for ThemeEngine {
    fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        let name = self
            .resolve_template(&[template])
            .unwrap_or_else(|| template.to_string());

        self.tera
            .render(&name, context)
            .with_context(|| format!("failed to render template '{name}'"))
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("templates", &self.tera.get_template_names().count())
            .field("resolved", &self.resolved.len())
            .finish()
    }
}

/// Tera filter rendering Unix timestamps as human-readable dates.
fn format_date(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let Some(timestamp) = value.as_i64() else {
        return Ok(tera::Value::String(String::new()));
    };

    let formatted = chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "Unknown date".to_string());

    Ok(tera::Value::String(formatted))
}
