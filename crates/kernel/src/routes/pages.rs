//! Published page dispatch.
//!
//! The catch-all front route: resolve the request path to a published page,
//! look up the page type plugin for its model, and delegate response
//! construction to it.

use anyhow::Context;
use axum::Router;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::get;

use folio_sdk::{Page, Site};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create the page dispatch router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_page))
        .route("/{*path}", get(serve_page))
}

/// Resolve and render the published page at the request path.
///
/// Absence (no page with this path, or only a draft) surfaces as 404.
async fn serve_page(State(state): State<AppState>, request: Request) -> AppResult<Response> {
    let path = request.uri().path().to_string();

    let page = Page::find_for_path(state.db(), &path)
        .await?
        .ok_or(AppError::NotFound)?;

    let site = Site::find_by_id(state.db(), page.site_id)
        .await?
        .with_context(|| format!("page {} references a missing site", page.id))?;

    let plugin = state.page_types().plugin_for_model(&page.page_type)?;

    tracing::debug!(
        path = %page.cached_path,
        plugin = plugin.name(),
        "dispatching page"
    );

    let response = plugin
        .respond(&request, &page, &site, state.theme().as_ref())
        .await?;

    Ok(response)
}
