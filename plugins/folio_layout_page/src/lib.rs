//! Layout-driven page type for Folio.
//!
//! Pages of this type name a layout in their fields; the render template
//! comes from that layout, so each page picks its own chrome. Everything
//! else (context construction, rendering, the response) is the default
//! plugin orchestration.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use folio_sdk::prelude::*;

static MODEL: PageTypeModel = PageTypeModel::new("layout_page", "Layout page");

/// Admin listing for layout pages, surfacing the layout column.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutPageAdmin;

impl PageModelAdmin for LayoutPageAdmin {
    fn list_display(&self) -> Vec<&'static str> {
        vec!["title", "slug", "layout", "status", "changed"]
    }
}

/// Page type rendered through the layout named on each record.
#[derive(Debug, Default)]
pub struct LayoutPagePlugin;

impl PageTypePlugin for LayoutPagePlugin {
    fn model(&self) -> &PageTypeModel {
        &MODEL
    }

    fn model_admin(&self) -> Arc<dyn PageModelAdmin> {
        Arc::new(LayoutPageAdmin)
    }

    fn template_for(&self, _request: &Request<Body>, page: &Page) -> Option<String> {
        page.fields
            .get("layout")?
            .get("template")?
            .as_str()
            .map(str::to_string)
    }
}

/// Page type registration hook for the installed-app table.
pub fn page_type_plugins(pool: &PageTypePool) -> Result<(), PageTypeError> {
    pool.register(Arc::new(LayoutPagePlugin))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::json;
    use uuid::Uuid;

    /// Renderer that echoes the template name and page title.
    struct EchoRenderer;

    impl TemplateRenderer for EchoRenderer {
        fn render(&self, template: &str, context: &tera::Context) -> anyhow::Result<String> {
            let title = context
                .get("page")
                .and_then(|p| p.get("title"))
                .and_then(|t| t.as_str())
                .unwrap_or_default();
            Ok(format!("[{template}] {title}"))
        }
    }

    fn layout_page(fields: serde_json::Value) -> Page {
        Page {
            id: Uuid::now_v7(),
            parent_id: None,
            site_id: Uuid::nil(),
            page_type: "layout_page".to_string(),
            title: "About".to_string(),
            slug: "about".to_string(),
            status: Page::PUBLISHED,
            in_navigation: true,
            cached_path: "/about/".to_string(),
            fields,
            created: 0,
            changed: 0,
        }
    }

    fn site() -> Site {
        Site {
            id: Uuid::nil(),
            domain: "example.org".to_string(),
            name: "Example".to_string(),
            created: 0,
        }
    }

    fn request() -> Request<Body> {
        Request::builder()
            .uri("/about/")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn template_comes_from_the_page_layout() {
        let page = layout_page(json!({"layout": {"template": "layouts/two_column.html"}}));
        let template = LayoutPagePlugin.template_for(&request(), &page);
        assert_eq!(template.as_deref(), Some("layouts/two_column.html"));
    }

    #[test]
    fn pages_without_a_layout_resolve_no_template() {
        assert_eq!(
            LayoutPagePlugin.template_for(&request(), &layout_page(json!({}))),
            None
        );
        assert_eq!(
            LayoutPagePlugin.template_for(&request(), &layout_page(json!({"layout": {}}))),
            None
        );
    }

    #[tokio::test]
    async fn renders_through_the_layout_template() {
        let page = layout_page(json!({"layout": {"template": "layouts/standard.html"}}));
        let response = LayoutPagePlugin
            .respond(&request(), &page, &site(), &EchoRenderer)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(html, "[layouts/standard.html] About");
    }

    #[tokio::test]
    async fn missing_layout_is_a_configuration_error() {
        let err = LayoutPagePlugin
            .respond(&request(), &layout_page(json!({})), &site(), &EchoRenderer)
            .await
            .unwrap_err();

        match err {
            PageTypeError::Configuration { plugin } => assert_eq!(plugin, "LayoutPagePlugin"),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn registers_model_and_custom_admin() {
        let pool = PageTypePool::new(vec![]);
        page_type_plugins(&pool).unwrap();

        let plugin = pool.plugin_for_model("layout_page").unwrap();
        assert_eq!(plugin.name(), "LayoutPagePlugin");

        let admin = pool.model_admin("layout_page").unwrap();
        assert!(admin.list_display().contains(&"layout"));
    }
}
