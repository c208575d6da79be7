//! Page and site models with their query operations.
//!
//! Pages are the stored content records of Folio (like URL nodes in a
//! classic page tree). Each page names the content model that owns it via
//! `page_type`; per-type data lives in JSONB `fields`. The resolver methods
//! (`find_for_path`, `published`, `in_navigation`, `toplevel_navigation`)
//! are the read side the web layer builds on.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Site record.
///
/// Every page belongs to exactly one site; the site is exposed to render
/// templates alongside the page.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Site {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Host name this site serves (e.g. "example.org").
    pub domain: String,

    /// Human-readable site name.
    pub name: String,

    /// Unix timestamp when created.
    pub created: i64,
}

impl Site {
    /// Create a new site.
    pub async fn create(pool: &PgPool, domain: &str, name: &str) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();

        let site = sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO site (id, domain, name, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id, domain, name, created
            "#,
        )
        .bind(id)
        .bind(domain)
        .bind(name)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("failed to create site")?;

        Ok(site)
    }

    /// Find a site by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let site =
            sqlx::query_as::<_, Site>("SELECT id, domain, name, created FROM site WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await
                .context("failed to fetch site by id")?;

        Ok(site)
    }

    /// Get the default site (the oldest one).
    pub async fn default_site(pool: &PgPool) -> Result<Option<Self>> {
        let site = sqlx::query_as::<_, Site>(
            "SELECT id, domain, name, created FROM site ORDER BY created ASC, id ASC LIMIT 1",
        )
        .fetch_optional(pool)
        .await
        .context("failed to fetch default site")?;

        Ok(site)
    }
}

/// Page record (stored content object).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Parent page in the hierarchy (null for top-level pages).
    pub parent_id: Option<Uuid>,

    /// Owning site.
    pub site_id: Uuid,

    /// Machine name of the content model that handles this page.
    pub page_type: String,

    /// Page title.
    pub title: String,

    /// URL slug within the parent.
    pub slug: String,

    /// Publication status (0 = draft, 1 = published).
    pub status: i16,

    /// Whether the page appears in site navigation.
    pub in_navigation: bool,

    /// Materialized URL path. Always starts and ends with `/`; the root
    /// page is exactly `/`.
    pub cached_path: String,

    /// Per-type field storage (JSONB).
    pub fields: serde_json::Value,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

/// Input for creating a new page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub parent_id: Option<Uuid>,
    pub site_id: Uuid,
    pub page_type: String,
    pub title: String,
    pub slug: String,
    pub status: Option<i16>,
    pub in_navigation: Option<bool>,
    pub fields: Option<serde_json::Value>,
}

impl Page {
    /// Status value for unpublished drafts.
    pub const DRAFT: i16 = 0;

    /// Status value for published pages.
    pub const PUBLISHED: i16 = 1;

    /// Check if this page is published.
    pub fn is_published(&self) -> bool {
        self.status == Self::PUBLISHED
    }

    /// Check if this page sits at the top of the hierarchy.
    pub fn is_toplevel(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Normalize a URL path for lookup against `cached_path`.
    ///
    /// Leading and trailing separators are stripped, then the remainder is
    /// wrapped in separators. The empty path normalizes to the root `/`.
    pub fn normalize_path(path: &str) -> String {
        let stripped = path.trim_matches('/');
        if stripped.is_empty() {
            "/".to_string()
        } else {
            format!("/{stripped}/")
        }
    }

    /// Find the published page for a URL path.
    ///
    /// The path is normalized first, so `about`, `/about` and `/about/` all
    /// resolve the same record. Returns `None` when no published page has
    /// the path; drafts never match. Uniqueness of `cached_path` among
    /// published pages is enforced by the storage layer.
    pub async fn find_for_path(pool: &PgPool, path: &str) -> Result<Option<Self>> {
        let normalized = Self::normalize_path(path);

        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, parent_id, site_id, page_type, title, slug, status,
                   in_navigation, cached_path, fields, created, changed
            FROM page
            WHERE cached_path = $1 AND status = $2
            "#,
        )
        .bind(&normalized)
        .bind(Self::PUBLISHED)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to fetch page for path '{normalized}'"))?;

        Ok(page)
    }

    /// List all published pages.
    pub async fn published(pool: &PgPool) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, parent_id, site_id, page_type, title, slug, status,
                   in_navigation, cached_path, fields, created, changed
            FROM page
            WHERE status = $1
            ORDER BY cached_path
            "#,
        )
        .bind(Self::PUBLISHED)
        .fetch_all(pool)
        .await
        .context("failed to list published pages")?;

        Ok(pages)
    }

    /// List published pages that appear in navigation.
    pub async fn in_navigation(pool: &PgPool) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, parent_id, site_id, page_type, title, slug, status,
                   in_navigation, cached_path, fields, created, changed
            FROM page
            WHERE status = $1 AND in_navigation = TRUE
            ORDER BY cached_path
            "#,
        )
        .bind(Self::PUBLISHED)
        .fetch_all(pool)
        .await
        .context("failed to list navigation pages")?;

        Ok(pages)
    }

    /// List top-level navigation pages, marking the current one.
    ///
    /// Returns in-navigation pages without a parent. When `current` is
    /// given, the matching entry carries `is_current = true`. The marker
    /// lives on the returned [`NavigationEntry`] wrappers, never on the
    /// page records themselves.
    pub async fn toplevel_navigation(
        pool: &PgPool,
        current: Option<&Page>,
    ) -> Result<Vec<NavigationEntry>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, parent_id, site_id, page_type, title, slug, status,
                   in_navigation, cached_path, fields, created, changed
            FROM page
            WHERE status = $1 AND in_navigation = TRUE AND parent_id IS NULL
            ORDER BY cached_path
            "#,
        )
        .bind(Self::PUBLISHED)
        .fetch_all(pool)
        .await
        .context("failed to list toplevel navigation pages")?;

        Ok(mark_current(pages, current))
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, parent_id, site_id, page_type, title, slug, status,
                   in_navigation, cached_path, fields, created, changed
            FROM page
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch page by id")?;

        Ok(page)
    }

    /// List pages of a content model, newest first.
    pub async fn list_by_type(pool: &PgPool, page_type: &str) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, parent_id, site_id, page_type, title, slug, status,
                   in_navigation, cached_path, fields, created, changed
            FROM page
            WHERE page_type = $1
            ORDER BY created DESC, id DESC
            "#,
        )
        .bind(page_type)
        .fetch_all(pool)
        .await
        .with_context(|| format!("failed to list pages of type '{page_type}'"))?;

        Ok(pages)
    }

    /// Create a new page.
    ///
    /// The materialized path is derived from the parent chain: the parent's
    /// `cached_path` plus the slug, wrapped in separators. A top-level page
    /// with an empty slug becomes the root `/`.
    pub async fn create(pool: &PgPool, input: CreatePage) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();
        let status = input.status.unwrap_or(Self::DRAFT);
        let in_navigation = input.in_navigation.unwrap_or(false);
        let fields = input
            .fields
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let cached_path = match input.parent_id {
            Some(parent_id) => {
                let parent = Self::find_by_id(pool, parent_id)
                    .await?
                    .with_context(|| format!("parent page {parent_id} not found"))?;
                Self::normalize_path(&format!("{}/{}", parent.cached_path, input.slug))
            }
            None => Self::normalize_path(&input.slug),
        };

        let page = sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO page (id, parent_id, site_id, page_type, title, slug, status,
                              in_navigation, cached_path, fields, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, parent_id, site_id, page_type, title, slug, status,
                      in_navigation, cached_path, fields, created, changed
            "#,
        )
        .bind(id)
        .bind(input.parent_id)
        .bind(input.site_id)
        .bind(&input.page_type)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(status)
        .bind(in_navigation)
        .bind(&cached_path)
        .bind(&fields)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("failed to create page")?;

        Ok(page)
    }

    /// Delete a page.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM page WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete page")?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a field value as a specific type.
    pub fn get_field<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Option<T> {
        self.fields
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a field's value as a string slice.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }
}

/// A page paired with its transient navigation marker.
///
/// `is_current` is computed per request and scoped to the returned
/// collection; the underlying page record is never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationEntry {
    #[serde(flatten)]
    pub page: Page,
    pub is_current: bool,
}

/// Wrap pages in [`NavigationEntry`] values, marking the one whose identity
/// matches `current`.
pub fn mark_current(pages: Vec<Page>, current: Option<&Page>) -> Vec<NavigationEntry> {
    let current_id = current.map(|page| page.id);

    pages
        .into_iter()
        .map(|page| {
            let is_current = current_id == Some(page.id);
            NavigationEntry { page, is_current }
        })
        .collect()
}
