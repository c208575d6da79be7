//! Text file page type for Folio.
//!
//! Serves a stored text document verbatim under its own content type,
//! bypassing the template layer entirely. Textual content types get an
//! explicit UTF-8 charset appended, since that is what the store holds.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::{IntoResponse, Response};

use folio_sdk::prelude::*;

/// Content types known to carry UTF-8 text.
pub const UTF8_TYPES: [&str; 7] = [
    "text/plain",
    "text/html",
    "text/xml",
    "text/css",
    "text/javascript",
    "application/javascript",
    "application/json",
];

static MODEL: PageTypeModel = PageTypeModel::new("textfile", "Text file");

/// Page type serving raw text content with content-type negotiation.
#[derive(Debug, Default)]
pub struct TextFilePlugin;

#[async_trait]
impl PageTypePlugin for TextFilePlugin {
    fn model(&self) -> &PageTypeModel {
        &MODEL
    }

    async fn respond(
        &self,
        _request: &Request<Body>,
        page: &Page,
        _site: &Site,
        _renderer: &dyn TemplateRenderer,
    ) -> Result<Response, PageTypeError> {
        let mut content_type = page
            .get_text("content_type")
            .unwrap_or("text/plain")
            .to_string();
        if UTF8_TYPES.contains(&content_type.as_str()) {
            // The store is UTF-8; enforce it on the wire.
            content_type.push_str("; charset=utf-8");
        }

        let content = page.get_text("content").unwrap_or_default().to_string();

        Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
    }
}

/// Page type registration hook for the installed-app table.
pub fn page_type_plugins(pool: &PageTypePool) -> Result<(), PageTypeError> {
    pool.register(Arc::new(TextFilePlugin))
}
