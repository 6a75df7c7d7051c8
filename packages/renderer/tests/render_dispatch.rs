//! Component dispatch: visibility, style merging, prop injection and
//! error isolation

use serde_json::json;
use sitekit_model::{starter_template, Component, DeviceView, Page, Site, Theme};
use sitekit_renderer::{
    builtin_registry, page_html, render_preview, render_site, Block, BlockError, BlockMeta,
    BlockProps, BlockRegistry, ComponentRenderer, HtmlOptions, PreviewPolicy, RenderContext,
    VNode, ViewerError, ViewerOptions, BLOCK_ID_ATTR,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Block whose failure mode can be switched off between renders
struct Fragile {
    broken: Arc<AtomicBool>,
    panics: bool,
}

impl Block for Fragile {
    fn render(&self, props: &BlockProps<'_>) -> Result<VNode, BlockError> {
        if self.broken.load(Ordering::SeqCst) {
            if self.panics {
                panic!("fragile block exploded");
            }
            return Err(BlockError::Render("fragile block failed".to_string()));
        }
        Ok(props.root("div").with_child(VNode::text("fragile ok")))
    }
}

async fn renderer_with(fragile: Fragile) -> ComponentRenderer {
    let registry = sitekit_renderer::register_builtins(BlockRegistry::builder())
        .register_block("fragile", BlockMeta::new("Fragile"), Arc::new(fragile))
        .build();
    registry.preload(registry.types()).await;
    ComponentRenderer::new(Arc::new(registry))
}

async fn builtin_renderer() -> ComponentRenderer {
    let registry = builtin_registry();
    registry.preload(registry.types()).await;
    ComponentRenderer::new(Arc::new(registry))
}

fn three_with_fragile_middle() -> Page {
    Page::new("p", "Home", "home").with_components(vec![
        Component::new("first", "heading").with_prop("text", "One"),
        Component::new("middle", "fragile"),
        Component::new("last", "heading").with_prop("text", "Three"),
    ])
}

#[tokio::test]
async fn failing_block_is_isolated_and_recovers_after_retry() {
    let broken = Arc::new(AtomicBool::new(true));
    let renderer = renderer_with(Fragile {
        broken: Arc::clone(&broken),
        panics: false,
    })
    .await;
    let theme = Theme::default();
    let ctx = RenderContext::public(&theme, DeviceView::Desktop);
    let page = three_with_fragile_middle();

    let doc = renderer.render_page(&page, &ctx);
    assert_eq!(doc.nodes.len(), 3);
    assert_eq!(doc.nodes[0].text_content(), "One");
    assert!(doc.nodes[1].is_error());
    assert_eq!(doc.nodes[2].text_content(), "Three");

    // The boundary stays tripped until retried, even once the fault is gone
    broken.store(false, Ordering::SeqCst);
    assert!(renderer.render_page(&page, &ctx).nodes[1].is_error());

    assert!(renderer.retry("middle", "fragile"));
    let doc = renderer.render_page(&page, &ctx);
    assert_eq!(doc.nodes[1].text_content(), "fragile ok");
    assert!(renderer.boundaries().is_empty());
}

#[tokio::test]
async fn panicking_block_is_caught() {
    let renderer = renderer_with(Fragile {
        broken: Arc::new(AtomicBool::new(true)),
        panics: true,
    })
    .await;
    let theme = Theme::default();
    let ctx = RenderContext::public(&theme, DeviceView::Desktop);

    let doc = renderer.render_page(&three_with_fragile_middle(), &ctx);

    match &doc.nodes[1] {
        VNode::Error { message, .. } => assert!(message.contains("fragile block exploded")),
        other => panic!("expected error card, got {:?}", other),
    }
    assert_eq!(doc.component_ids(), vec!["first", "middle", "last"]);
}

#[tokio::test]
async fn unknown_types_are_skipped_silently() {
    let renderer = builtin_renderer().await;
    let theme = Theme::default();
    let ctx = RenderContext::public(&theme, DeviceView::Desktop);
    let page = Page::new("p", "Home", "home").with_components(vec![
        Component::new("a", "heading").with_prop("text", "A"),
        Component::new("x", "nonexistent-block-xyz"),
        Component::new("b", "heading").with_prop("text", "B"),
    ]);

    let doc = renderer.render_page(&page, &ctx);

    assert_eq!(doc.component_ids(), vec!["a", "b"]);
    assert!(doc.nodes.iter().all(|n| !n.is_error()));
}

#[tokio::test]
async fn hidden_components_render_nothing_on_that_device() {
    let renderer = builtin_renderer().await;
    let theme = Theme::default();
    let page = Page::new("p", "Home", "home").with_components(vec![
        Component::new("a", "spacer").hidden_on(DeviceView::Mobile),
        Component::new("b", "spacer"),
    ]);

    let mobile = renderer.render_page(&page, &RenderContext::public(&theme, DeviceView::Mobile));
    let desktop = renderer.render_page(&page, &RenderContext::public(&theme, DeviceView::Desktop));

    assert_eq!(mobile.component_ids(), vec!["b"]);
    assert_eq!(desktop.component_ids(), vec!["a", "b"]);
}

#[tokio::test]
async fn device_style_overrides_desktop_baseline() {
    let renderer = builtin_renderer().await;
    let theme = Theme::default();
    let component = Component::new("s", "spacer")
        .with_style(DeviceView::Desktop, "padding", "10px")
        .with_style(DeviceView::Desktop, "marginTop", "4px")
        .with_style(DeviceView::Mobile, "padding", "2px");

    let mobile = renderer
        .render_component(&component, &RenderContext::public(&theme, DeviceView::Mobile))
        .unwrap();
    let tablet = renderer
        .render_component(&component, &RenderContext::public(&theme, DeviceView::Tablet))
        .unwrap();

    assert_eq!(mobile.style("padding"), Some("2px"));
    assert_eq!(mobile.style("margin-top"), Some("4px"));
    assert_eq!(tablet.style("padding"), Some("10px"));
}

#[tokio::test]
async fn language_is_injected_only_into_language_aware_blocks() {
    let renderer = builtin_renderer().await;
    let theme = Theme::default();
    let ctx = RenderContext::public(&theme, DeviceView::Desktop).with_language("fr");

    let switcher = renderer
        .render_component(
            &Component::new("l", "language-switcher").with_prop("languages", json!(["en", "fr"])),
            &ctx,
        )
        .unwrap();
    let active = switcher
        .find(&|n| n.attr("aria-current").is_some())
        .and_then(|n| n.attr("data-language"));
    assert_eq!(active, Some("fr"));

    let nav = renderer
        .render_component(&Component::new("n", "navbar").with_prop("brand", "Acme"), &ctx)
        .unwrap();
    assert_eq!(nav.attr("lang"), Some("fr"));

    // Without an active language the stored props are used as-is
    let plain = renderer
        .render_component(
            &Component::new("n", "navbar").with_prop("brand", "Acme"),
            &RenderContext::public(&theme, DeviceView::Desktop),
        )
        .unwrap();
    assert_eq!(plain.attr("lang"), None);
}

#[tokio::test]
async fn gradient_background_prop_becomes_background_style() {
    let renderer = builtin_renderer().await;
    let theme = Theme::default();
    let hero = Component::new("h", "hero")
        .with_prop("title", "Hi")
        .with_prop("backgroundColor", "linear-gradient(135deg, #000, #fff)");

    let node = renderer
        .render_component(&hero, &RenderContext::public(&theme, DeviceView::Desktop))
        .unwrap();

    assert_eq!(node.style("background"), Some("linear-gradient(135deg, #000, #fff)"));
    assert_eq!(node.style("background-color"), Some("transparent"));
}

#[tokio::test]
async fn container_children_render_inside_parent() {
    let renderer = builtin_renderer().await;
    let theme = Theme::default();
    let columns = Component::new("cols", "columns").with_children(vec![
        Component::new("c1", "text").with_prop("content", "Left"),
        Component::new("c2", "nonexistent-block-xyz"),
        Component::new("c3", "text").with_prop("content", "Right"),
    ]);

    let node = renderer
        .render_component(&columns, &RenderContext::public(&theme, DeviceView::Desktop))
        .unwrap();

    assert_eq!(node.attr(BLOCK_ID_ATTR), Some("cols"));
    assert_eq!(node.children().len(), 2);
    assert_eq!(node.text_content(), "LeftRight");
}

#[test]
fn pending_blocks_render_placeholder_without_runtime() {
    let renderer = ComponentRenderer::new(Arc::new(builtin_registry()));
    let theme = Theme::default();

    let node = renderer
        .render_component(
            &Component::new("h", "hero").with_prop("title", "Hi"),
            &RenderContext::public(&theme, DeviceView::Desktop),
        )
        .unwrap();

    assert_eq!(
        node,
        VNode::Placeholder {
            component_id: "h".to_string(),
            min_height: 400,
        }
    );
}

#[tokio::test]
async fn public_viewer_serves_published_home_page() {
    let renderer = builtin_renderer().await;
    let mut site = Site::from_template("Demo", "demo", &starter_template()).unwrap();

    assert_eq!(
        render_site(&renderer, &site, None, &ViewerOptions::default()).unwrap_err(),
        ViewerError::NotPublished("demo".to_string())
    );

    site.published = true;
    let page = render_site(&renderer, &site, None, &ViewerOptions::default()).unwrap();
    assert_eq!(page.slug, "home");
    assert_eq!(page.title, "Welcome");
    assert!(page.document.nodes.iter().all(|n| !n.is_error()));

    let html = page_html(&page, HtmlOptions::default());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Welcome</title>"));
    assert!(html.contains("--color-primary: #0f766e"));
    assert!(html.contains("data-animate=\"fade-up\""));
    // Wrappers start hidden; the page ships the rule and script that reveal them
    assert!(html.contains("[data-animate].is-visible { opacity: 1 !important; transform: none !important; }"));
    assert!(html.contains("new IntersectionObserver("));
    assert!(html.contains("DOMContentLoaded"));
    assert!(html.find("<script>") > html.find("data-animate=\"fade-up\""));

    let missing = render_site(&renderer, &site, Some("pricing"), &ViewerOptions::default());
    assert!(matches!(missing, Err(ViewerError::PageNotFound { .. })));
}

#[tokio::test]
async fn empty_site_has_nothing_to_serve() {
    let renderer = builtin_renderer().await;
    let mut site = Site::blank("Empty", "empty").unwrap();
    site.pages.clear();

    let options = ViewerOptions {
        require_published: false,
        ..Default::default()
    };
    assert_eq!(
        render_site(&renderer, &site, None, &options).unwrap_err(),
        ViewerError::EmptySite("empty".to_string())
    );
}

#[tokio::test]
async fn lazy_preview_defers_until_visible() {
    let renderer = builtin_renderer().await;
    let template = starter_template();
    let pages = template.pages();
    let policy = PreviewPolicy::thumbnail();

    let hidden = render_preview(&renderer, &pages[0], &template.theme, &policy, false);
    assert!(hidden.children().is_empty());
    assert_eq!(hidden.attr("data-preview-state"), Some("deferred"));
    assert_eq!(hidden.style("height"), Some("250px"));

    let shown = render_preview(&renderer, &pages[0], &template.theme, &policy, true);
    let viewport = &shown.children()[0];
    assert_eq!(viewport.style("transform"), Some("scale(0.25)"));
    assert!(shown.find(&|n| n.attr("data-animate").is_some()).is_none());
    assert!(shown.find(&|n| n.attr("data-component-id").is_some()).is_none());
}
