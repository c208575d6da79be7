//! Admin listings for the page type pool.
//!
//! JSON endpoints over the registration surface: which page type plugins
//! are installed, and each model's pages shaped by its registered admin.

use anyhow::Context;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use folio_sdk::{Page, PageTypeError};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Summary of a registered page type plugin.
#[derive(Debug, Serialize)]
struct PageTypeSummary {
    name: String,
    model: String,
    verbose_name: String,
}

/// List registered page type plugins.
///
/// GET /admin/page-types
async fn list_page_types(State(state): State<AppState>) -> AppResult<Json<Vec<PageTypeSummary>>> {
    let mut summaries: Vec<_> = state
        .page_types()
        .plugins()?
        .into_iter()
        .map(|plugin| PageTypeSummary {
            name: plugin.name().to_string(),
            model: plugin.type_name().to_string(),
            verbose_name: plugin.verbose_name(),
        })
        .collect();

    // Registration order is not significant; keep the listing stable.
    summaries.sort_by(|a, b| a.model.cmp(&b.model));

    Ok(Json(summaries))
}

/// List a model's pages, shaped by its registered admin customization.
///
/// GET /admin/page-types/{model}/pages
async fn list_model_pages(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> AppResult<Json<Value>> {
    let pool = state.page_types();
    let admin = pool.model_admin(&model).map_err(unknown_model_to_404)?;
    let plugin = pool.plugin_for_model(&model).map_err(unknown_model_to_404)?;

    let pages = plugin.model_instances(state.db()).await?;
    let columns = admin.list_display();

    let rows = pages
        .iter()
        .map(|page| project_columns(page, &columns))
        .collect::<anyhow::Result<Vec<Value>>>()?;

    Ok(Json(serde_json::json!({
        "model": model,
        "columns": columns,
        "filters": admin.list_filter(),
        "search": admin.search_fields(),
        "rows": rows,
    })))
}

/// Translate unknown-model lookups to 404; other pool failures stay 500.
fn unknown_model_to_404(err: PageTypeError) -> AppError {
    match err {
        PageTypeError::PluginNotFound { .. } | PageTypeError::AdminNotFound { .. } => {
            AppError::NotFound
        }
        other => AppError::PageType(other),
    }
}

/// Project a page onto the admin's listing columns.
///
/// Columns may name record columns or JSONB fields.
fn project_columns(page: &Page, columns: &[&str]) -> anyhow::Result<Value> {
    let full = serde_json::to_value(page).context("failed to serialize page")?;

    let mut row = serde_json::Map::new();
    for column in columns {
        let value = full
            .get(*column)
            .cloned()
            .or_else(|| full.get("fields").and_then(|f| f.get(*column)).cloned())
            .unwrap_or(Value::Null);
        row.insert((*column).to_string(), value);
    }

    Ok(Value::Object(row))
}

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/page-types", get(list_page_types))
        .route("/admin/page-types/{model}/pages", get(list_model_pages))
}
