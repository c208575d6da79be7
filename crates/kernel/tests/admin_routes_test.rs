#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Handler-level tests for the admin listing endpoints.
//!
//! The registration surface is fully in-memory, so these run against the
//! real router with a lazy (never-connected) database pool.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use folio_kernel::apps::installed_apps;
use folio_kernel::config::Config;
use folio_kernel::routes;
use folio_kernel::state::AppState;
use folio_kernel::theme::ThemeEngine;
use folio_sdk::PageTypePool;

fn test_state() -> AppState {
    let config = Config {
        port: 3000,
        database_url: "postgres://localhost/folio_test".to_string(),
        database_max_connections: 5,
        templates_dir: PathBuf::from("./templates"),
        disabled_apps: vec![],
    };

    // Lazy pool: no connection is made until a query runs, and these
    // endpoints never query.
    let db = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();

    let page_types = Arc::new(PageTypePool::new(installed_apps(&config)));
    let theme = Arc::new(ThemeEngine::empty());

    AppState::from_parts(db, page_types, theme)
}

fn app() -> Router {
    Router::new()
        .merge(routes::admin::router())
        .with_state(test_state())
}

#[tokio::test]
async fn page_type_listing_names_both_shipped_plugins() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin/page-types")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let listing: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let models: Vec<_> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["model"].as_str().unwrap())
        .collect();
    assert_eq!(models, vec!["layout_page", "textfile"]);

    assert_eq!(listing[0]["name"], "LayoutPagePlugin");
    assert_eq!(listing[1]["verbose_name"], "Text file");
}

#[tokio::test]
async fn unknown_model_listing_is_404() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin/page-types/ghost/pages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
