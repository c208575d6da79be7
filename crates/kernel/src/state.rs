//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use folio_sdk::PageTypePool;

use crate::apps;
use crate::config::Config;
use crate::db;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// The page type pool over the installed-app table.
    page_types: Arc<PageTypePool>,

    /// Theme engine for template rendering.
    theme: Arc<ThemeEngine>,
}

impl AppState {
    /// Create new application state with database connections.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        info!(templates_dir = ?config.templates_dir, "loading templates from directory");
        let theme = match ThemeEngine::new(&config.templates_dir) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                tracing::warn!(error = ?e, "failed to load templates, starting with an empty theme");
                Arc::new(ThemeEngine::empty())
            }
        };

        let page_types = Arc::new(PageTypePool::new(apps::installed_apps(config)));

        Ok(Self::from_parts(db, page_types, theme))
    }

    /// Assemble state from already-built parts.
    ///
    /// Integration tests use this to wire a pool and theme without a live
    /// database.
    pub fn from_parts(db: PgPool, page_types: Arc<PageTypePool>, theme: Arc<ThemeEngine>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                page_types,
                theme,
            }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get the page type pool.
    pub fn page_types(&self) -> &Arc<PageTypePool> {
        &self.inner.page_types
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
