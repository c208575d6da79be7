//! Site navigation listing.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use folio_sdk::{NavigationEntry, Page};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct NavigationParams {
    /// Path of the page being viewed, for the `is_current` marker.
    current: Option<String>,
}

/// Top-level navigation entries as JSON.
///
/// When `current` names a resolvable published path, the matching entry
/// carries `is_current = true`.
async fn toplevel_navigation(
    State(state): State<AppState>,
    Query(params): Query<NavigationParams>,
) -> AppResult<Json<Vec<NavigationEntry>>> {
    let current = match params.current.as_deref() {
        Some(path) => Page::find_for_path(state.db(), path).await?,
        None => None,
    };

    let entries = Page::toplevel_navigation(state.db(), current.as_ref()).await?;
    Ok(Json(entries))
}

/// Create the navigation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/navigation", get(toplevel_navigation))
}
