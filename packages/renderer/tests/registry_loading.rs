//! Lazy loading behavior of the block registry, alone and through the renderer

use sitekit_model::{Component, DeviceView, Page, Theme};
use sitekit_renderer::{
    component_ids, from_fn, Block, BlockMeta, BlockRegistry, ComponentRenderer, LoadError, RenderContext,
    Resolution, VNode,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn slow_registry(loads: Arc<AtomicUsize>) -> BlockRegistry {
    BlockRegistry::builder()
        .register_lazy(
            "gallery",
            BlockMeta::new("Gallery").with_placeholder_height(300),
            move || {
                let loads = Arc::clone(&loads);
                async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok(from_fn(|p| Ok(p.root("div").with_child(VNode::text("gallery")))))
                }
            },
        )
        .build()
}

#[tokio::test]
async fn concurrent_resolutions_share_one_load() {
    let loads = Arc::new(AtomicUsize::new(0));
    let registry = slow_registry(Arc::clone(&loads));

    let (a, b, c) = tokio::join!(
        registry.resolve("gallery"),
        registry.resolve("gallery"),
        registry.resolve("gallery"),
    );

    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_some());
    assert!(c.unwrap().is_some());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(registry.load_count(), 1);

    // Later resolutions hit the cache
    registry.resolve("gallery").await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn same_type_twice_in_one_render_pass_loads_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(slow_registry(Arc::clone(&loads)));
    let renderer = ComponentRenderer::new(Arc::clone(&registry));
    let mut loaded = registry.subscribe();

    let page = Page::new("p", "Home", "home").with_components(vec![
        Component::new("g1", "gallery"),
        Component::new("g2", "gallery"),
    ]);
    let theme = Theme::default();
    let ctx = RenderContext::public(&theme, DeviceView::Desktop);

    let first = renderer.render_page(&page, &ctx);
    assert!(first.nodes.iter().all(VNode::is_placeholder));
    assert_eq!(
        first.nodes[0],
        VNode::Placeholder {
            component_id: "g1".to_string(),
            min_height: 300,
        }
    );

    loaded.changed().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    let second = renderer.render_page(&page, &ctx);
    assert!(second.nodes.iter().all(|n| !n.is_placeholder()));
    assert_eq!(second.component_ids(), vec!["g1", "g2"]);
}

#[tokio::test]
async fn preload_reports_failures_and_keeps_successes() {
    let registry = BlockRegistry::builder()
        .register_lazy("broken", BlockMeta::new("Broken"), || async {
            Err(LoadError::failed("broken", "chunk missing"))
        })
        .register_block(
            "text",
            BlockMeta::new("Text"),
            from_fn(|p| Ok(p.root("p"))),
        )
        .build();

    let failures = registry.preload(["broken", "text", "text"]).await;

    assert_eq!(failures, vec![LoadError::failed("broken", "chunk missing")]);
    assert!(matches!(registry.peek("text"), Resolution::Ready(_)));
    assert!(matches!(registry.peek("broken"), Resolution::Failed(_)));
}

#[tokio::test]
async fn concurrent_resolutions_share_one_failed_load() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let registry = BlockRegistry::builder()
        .register_lazy("video", BlockMeta::new("Video"), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err::<Arc<dyn Block>, _>(LoadError::failed("video", "cdn unreachable"))
            }
        })
        .build();

    let (a, b, c) = tokio::join!(
        registry.resolve("video"),
        registry.resolve("video"),
        registry.resolve("video")
    );
    assert!(a.is_err() && b.is_err() && c.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    let failures = registry.preload(["video", "video"]).await;
    assert_eq!(failures.len(), 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_load_renders_error_card_until_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let registry = Arc::new(
        BlockRegistry::builder()
            .register_lazy("map", BlockMeta::new("Map"), move || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(LoadError::failed("map", "timeout"))
                    } else {
                        Ok(from_fn(|p| Ok(p.root("figure"))))
                    }
                }
            })
            .build(),
    );
    let renderer = ComponentRenderer::new(Arc::clone(&registry));
    let theme = Theme::default();
    let ctx = RenderContext::public(&theme, DeviceView::Desktop);
    let map = Component::new("m1", "map");

    assert!(registry.resolve("map").await.is_err());

    let failed = renderer.render_component(&map, &ctx).unwrap();
    assert!(failed.is_error());

    let mut loaded = registry.subscribe();
    assert!(renderer.retry("m1", "map"));
    // Cleared until the reload finishes, so the slot shows a placeholder
    assert!(matches!(registry.peek("map"), Resolution::Pending));
    assert!(renderer.render_component(&map, &ctx).unwrap().is_placeholder());
    loaded.changed().await.unwrap();

    let node = renderer.render_component(&map, &ctx).unwrap();
    assert_eq!(node.attr("data-block"), Some("map"));
    assert_eq!(component_ids(&[node]), vec!["m1"]);
}
