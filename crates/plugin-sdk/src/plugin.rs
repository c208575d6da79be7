//! The page type plugin contract.
//!
//! A page type plugin pairs one content model with rendering and response
//! logic. Plugins implement [`PageTypePlugin`] and are registered with the
//! [`PageTypePool`](crate::pool::PageTypePool); the web layer looks them up
//! by the model named on a stored page and delegates response construction
//! to them.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::{Html, IntoResponse, Response};
use sqlx::PgPool;

use crate::admin::{PageAdmin, PageModelAdmin};
use crate::error::PageTypeError;
use crate::types::{Page, Site};

/// Descriptor for the content model a plugin binds to.
///
/// The machine name discriminates stored pages (`page.page_type`); the
/// verbose name is the display title for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTypeModel {
    pub name: &'static str,
    pub verbose_name: &'static str,
}

impl PageTypeModel {
    /// Create a model descriptor.
    pub const fn new(name: &'static str, verbose_name: &'static str) -> Self {
        Self { name, verbose_name }
    }
}

/// Rendering seam between plugins and the kernel's template engine.
///
/// Plugins stay ignorant of the engine; the kernel's theme engine
/// implements this for Tera.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with the given context to an HTML string.
    fn render(&self, template: &str, context: &tera::Context) -> anyhow::Result<String>;
}

/// The base contract every page type plugin implements.
///
/// Only [`model`](Self::model) is required. The default [`respond`]
/// orchestration covers template-driven page types; plugins that resolve
/// templates per record override [`template_for`](Self::template_for), and
/// plugins that bypass templating entirely override [`respond`].
///
/// [`respond`]: Self::respond
#[async_trait]
pub trait PageTypePlugin: Send + Sync + 'static {
    /// The content model this plugin handles.
    fn model(&self) -> &PageTypeModel;

    /// Registration name, derived from the implementing type.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Display title, by default the model's verbose name.
    fn verbose_name(&self) -> String {
        self.model().verbose_name.to_string()
    }

    /// Machine name of the bound model, mainly for templates and listings.
    fn type_name(&self) -> &str {
        self.model().name
    }

    /// The admin customization registered for the bound model.
    fn model_admin(&self) -> Arc<dyn PageModelAdmin> {
        Arc::new(PageAdmin)
    }

    /// Static render template, used by the default [`template_for`].
    ///
    /// [`template_for`]: Self::template_for
    fn render_template(&self) -> Option<&str> {
        None
    }

    /// Select the template to render for this page and request.
    fn template_for(&self, _request: &Request<Body>, _page: &Page) -> Option<String> {
        self.render_template().map(str::to_string)
    }

    /// Build the template context for this page.
    fn context_for(&self, _request: &Request<Body>, page: &Page, site: &Site) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("page", page);
        context.insert("site", site);
        context
    }

    /// All stored pages of the bound model.
    async fn model_instances(&self, pool: &PgPool) -> anyhow::Result<Vec<Page>> {
        Page::list_by_type(pool, self.model().name).await
    }

    /// Construct the response for a resolved page.
    ///
    /// Default orchestration: select a template, build the context, render.
    /// A plugin that resolves no template and does not override this method
    /// is incompletely implemented; that surfaces as a
    /// [`PageTypeError::Configuration`] naming the plugin.
    async fn respond(
        &self,
        request: &Request<Body>,
        page: &Page,
        site: &Site,
        renderer: &dyn TemplateRenderer,
    ) -> Result<Response, PageTypeError> {
        let Some(template) = self.template_for(request, page) else {
            return Err(PageTypeError::configuration(self.name()));
        };

        let context = self.context_for(request, page, site);
        let html = renderer
            .render(&template, &context)
            .map_err(|e| PageTypeError::render(self.name(), e.to_string()))?;

        Ok(Html(html).into_response())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::json;
    use uuid::Uuid;

    struct StaticPlugin;

    impl PageTypePlugin for StaticPlugin {
        fn model(&self) -> &PageTypeModel {
            static MODEL: PageTypeModel = PageTypeModel::new("static_page", "Static page");
            &MODEL
        }

        fn render_template(&self) -> Option<&str> {
            Some("static_page.html")
        }
    }

    struct BarePlugin;

    impl PageTypePlugin for BarePlugin {
        fn model(&self) -> &PageTypeModel {
            static MODEL: PageTypeModel = PageTypeModel::new("bare", "Bare");
            &MODEL
        }
    }

    /// Renderer that echoes the template name and page title.
    struct EchoRenderer;

    impl TemplateRenderer for EchoRenderer {
        fn render(&self, template: &str, context: &tera::Context) -> anyhow::Result<String> {
            let title = context
                .get("page")
                .and_then(|p| p.get("title"))
                .and_then(|t| t.as_str())
                .unwrap_or_default();
            Ok(format!("<h1>{title}</h1><!-- {template} -->"))
        }
    }

    fn fixture_page() -> Page {
        Page {
            id: Uuid::now_v7(),
            parent_id: None,
            site_id: Uuid::nil(),
            page_type: "static_page".to_string(),
            title: "About".to_string(),
            slug: "about".to_string(),
            status: Page::PUBLISHED,
            in_navigation: true,
            cached_path: "/about/".to_string(),
            fields: json!({}),
            created: 0,
            changed: 0,
        }
    }

    fn fixture_site() -> Site {
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
    fn name_is_derived_from_the_type() {
        assert_eq!(StaticPlugin.name(), "StaticPlugin");
        assert_eq!(BarePlugin.name(), "BarePlugin");
    }

    #[test]
    fn verbose_and_type_name_come_from_the_model() {
        assert_eq!(StaticPlugin.verbose_name(), "Static page");
        assert_eq!(StaticPlugin.type_name(), "static_page");
    }

    #[test]
    fn default_context_exposes_page_and_site() {
        let context = StaticPlugin.context_for(&request(), &fixture_page(), &fixture_site());
        assert!(context.get("page").is_some());
        assert_eq!(
            context.get("site").and_then(|s| s.get("domain")),
            Some(&tera::Value::String("example.org".to_string()))
        );
    }

    #[tokio::test]
    async fn default_respond_renders_the_static_template() {
        let response = StaticPlugin
            .respond(&request(), &fixture_page(), &fixture_site(), &EchoRenderer)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<h1>About</h1>"));
        assert!(html.contains("static_page.html"));
    }

    #[tokio::test]
    async fn respond_without_template_is_a_configuration_error() {
        let err = BarePlugin
            .respond(&request(), &fixture_page(), &fixture_site(), &EchoRenderer)
            .await
            .unwrap_err();

        match err {
            PageTypeError::Configuration { plugin } => assert_eq!(plugin, "BarePlugin"),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn renderer_failures_surface_as_render_errors() {
        struct FailingRenderer;
        impl TemplateRenderer for FailingRenderer {
            fn render(&self, _t: &str, _c: &tera::Context) -> anyhow::Result<String> {
                anyhow::bail!("template not found")
            }
        }

        let err = StaticPlugin
            .respond(
                &request(),
                &fixture_page(),
                &fixture_site(),
                &FailingRenderer,
            )
            .await
            .unwrap_err();

        match err {
            PageTypeError::Render { plugin, details } => {
                assert_eq!(plugin, "StaticPlugin");
                assert!(details.contains("template not found"));
            }
            other => panic!("expected Render error, got {other:?}"),
        }
    }
}
