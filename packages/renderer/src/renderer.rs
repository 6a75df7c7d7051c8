//! # Component Renderer
//!
//! Dispatch layer between the page tree and block implementations.
//!
//! For each component, in order:
//!
//! 1. Hidden on the active device: nothing is rendered.
//! 2. Unknown block type: nothing is rendered, siblings are unaffected.
//! 3. Implementation still loading: a placeholder with a stable height,
//!    and a background load is requested.
//! 4. Desktop style merged with the device override; language-aware
//!    blocks receive the active language; gradient and translucent
//!    backgrounds are promoted to the `background` shorthand.
//! 5. The block renders behind an error boundary. Errors and panics turn
//!    into an error card for that component only.
//! 6. Editing mode wraps the output for selection. Outside the editor,
//!    animated components get their entry animation wrapper.

use crate::block::{BlockError, BlockProps, BlockUpdater, UpdateSink};
use crate::boundary::ErrorBoundaries;
use crate::builtin::LANGUAGE_PROP;
use crate::html::ANIMATE_ATTR;
use crate::registry::{BlockMeta, BlockRegistry, LoadError, Resolution};
use crate::style::{promote_background, to_css};
use crate::vdom::{wrapper_chain, VNode, VirtualDomDocument, BLOCK_ID_ATTR, COMPONENT_ID_ATTR};
use serde_json::Value;
use sitekit_model::{walk_component, Animation, Component, DeviceView, Page, Theme, Visitor};
use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Height of a loading slot when the registry has no better hint
pub const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 120;

/// Per-pass render inputs shared by every component
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: DeviceView,
    pub theme: &'a Theme,
    pub editing: bool,
    /// Active language, injected into language-aware blocks
    pub language: Option<&'a str>,
    pub selected_id: Option<&'a str>,
    pub on_update: Option<&'a UpdateSink<'a>>,
    pub on_select: Option<&'a (dyn Fn(&str) + 'a)>,
    /// Entry animations; ignored while editing
    pub animations: bool,
}

impl<'a> RenderContext<'a> {
    /// Published-page rendering
    pub fn public(theme: &'a Theme, device: DeviceView) -> Self {
        Self {
            device,
            theme,
            editing: false,
            language: None,
            selected_id: None,
            on_update: None,
            on_select: None,
            animations: true,
        }
    }

    /// Editor canvas rendering
    pub fn editing(theme: &'a Theme, device: DeviceView) -> Self {
        Self {
            editing: true,
            animations: false,
            ..Self::public(theme, device)
        }
    }

    pub fn with_language(mut self, language: &'a str) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_selection(mut self, selected_id: Option<&'a str>) -> Self {
        self.selected_id = selected_id;
        self
    }

    pub fn with_update_sink(mut self, sink: &'a UpdateSink<'a>) -> Self {
        self.on_update = Some(sink);
        self
    }

    pub fn with_select_handler(mut self, handler: &'a (dyn Fn(&str) + 'a)) -> Self {
        self.on_select = Some(handler);
        self
    }

    pub fn without_animations(mut self) -> Self {
        self.animations = false;
        self
    }

    fn animates(&self) -> bool {
        self.animations && !self.editing
    }
}

pub struct ComponentRenderer {
    registry: Arc<BlockRegistry>,
    boundaries: ErrorBoundaries,
}

impl ComponentRenderer {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            registry,
            boundaries: ErrorBoundaries::new(),
        }
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn boundaries(&self) -> &ErrorBoundaries {
        &self.boundaries
    }

    /// Render one component and its children.
    ///
    /// `None` means the component contributes nothing (hidden or unknown).
    pub fn render_component(&self, component: &Component, ctx: &RenderContext<'_>) -> Option<VNode> {
        if component.is_hidden(ctx.device) {
            return None;
        }

        let block = match self.registry.peek(&component.block_type) {
            Resolution::Unknown => {
                debug!(
                    id = %component.id,
                    block_type = %component.block_type,
                    "Skipping unknown block type"
                );
                return None;
            }
            Resolution::Pending => {
                self.registry.request(&component.block_type);
                let min_height = self
                    .registry
                    .meta(&component.block_type)
                    .map(|m| m.placeholder_height)
                    .unwrap_or(DEFAULT_PLACEHOLDER_HEIGHT);
                let placeholder = VNode::Placeholder {
                    component_id: component.id.clone(),
                    min_height,
                };
                return Some(self.wrap(component, placeholder, ctx));
            }
            Resolution::Failed(err) => {
                let card = error_card(component, &err.to_string());
                return Some(self.wrap(component, card, ctx));
            }
            Resolution::Ready(block) => block,
        };

        let meta = self.registry.meta(&component.block_type);

        if let Some(state) = self.boundaries.get(&component.id) {
            let card = error_card(component, &state.message);
            return Some(self.wrap(component, card, ctx));
        }

        let mut props = component.props.clone();
        if let (Some(language), true) = (ctx.language, meta.is_some_and(|m| m.language_aware)) {
            props.insert(LANGUAGE_PROP.to_string(), Value::String(language.to_string()));
        }

        let mut style = component.effective_style(ctx.device);
        promote_background(&mut props, &mut style);
        let css = to_css(&style);

        let block_props = BlockProps {
            component_id: &component.id,
            block_type: &component.block_type,
            props: &props,
            style: &css,
            theme: ctx.theme,
            device: ctx.device,
            editing: ctx.editing,
            children: self.render_components(&component.children, ctx),
            updater: BlockUpdater::new(&component.id, ctx.on_update),
        };

        let rendered = catch_unwind(AssertUnwindSafe(|| block.render(&block_props)))
            .unwrap_or_else(|payload| Err(BlockError::Panicked(panic_message(payload.as_ref()))));

        let node = match rendered {
            Ok(node) => stamp_block_id(node, &component.id),
            Err(err) => {
                warn!(
                    id = %component.id,
                    block_type = %component.block_type,
                    error = %err,
                    "Block failed to render"
                );
                let message = err.to_string();
                self.boundaries
                    .record(&component.id, &component.block_type, &message);
                error_card(component, &message)
            }
        };

        Some(self.wrap(component, node, ctx))
    }

    /// Render siblings in order; each one is isolated from the others
    pub fn render_components(&self, components: &[Component], ctx: &RenderContext<'_>) -> Vec<VNode> {
        components
            .iter()
            .filter_map(|c| self.render_component(c, ctx))
            .collect()
    }

    #[instrument(skip(self, page, ctx), fields(page = %page.slug, device = %ctx.device, editing = ctx.editing))]
    pub fn render_page(&self, page: &Page, ctx: &RenderContext<'_>) -> VirtualDomDocument {
        let mut document = VirtualDomDocument::new();
        document.add_style(":root", ctx.theme.css_variables().into_iter().collect());
        for node in self.render_components(&page.components, ctx) {
            document.add_node(node);
        }
        debug!(nodes = document.nodes.len(), "Rendered page");
        document
    }

    /// Load every block type used on `page`, nested components included
    pub async fn preload_page(&self, page: &Page) -> Vec<LoadError> {
        let mut collector = TypeCollector::default();
        collector.visit_page(page);
        self.registry.preload(collector.types).await
    }

    /// Reset the error state of a component so the next render tries again.
    ///
    /// Returns true when there was anything to reset.
    pub fn retry(&self, component_id: &str, block_type: &str) -> bool {
        let tripped = self.boundaries.clear(component_id).is_some();
        let failed_load = matches!(self.registry.peek(block_type), Resolution::Failed(_));
        if failed_load {
            self.registry.clear_failure(block_type);
            self.registry.request(block_type);
        }
        debug!(component_id, block_type, tripped, failed_load, "Retry requested");
        tripped || failed_load
    }

    /// Route a click at `path` below `root` to the innermost component
    /// wrapper. The select handler runs once, for that component only.
    pub fn dispatch_click(&self, root: &VNode, path: &[usize], ctx: &RenderContext<'_>) -> Option<String> {
        let id = wrapper_chain(root, path).pop()?;
        if let Some(on_select) = ctx.on_select {
            on_select(&id);
        }
        Some(id)
    }

    fn wrap(&self, component: &Component, inner: VNode, ctx: &RenderContext<'_>) -> VNode {
        let meta = self.registry.meta(&component.block_type);
        if ctx.editing {
            return editing_wrapper(component, meta, inner, ctx);
        }
        match (&component.animation, ctx.animates()) {
            (Some(animation), true) => animation_wrapper(animation, inner),
            _ => inner,
        }
    }
}

fn stamp_block_id(node: VNode, component_id: &str) -> VNode {
    match node {
        VNode::Element { .. } => node.with_attr(BLOCK_ID_ATTR, component_id),
        other => VNode::element("div")
            .with_attr(BLOCK_ID_ATTR, component_id)
            .with_child(other),
    }
}

fn error_card(component: &Component, message: &str) -> VNode {
    VNode::Error {
        component_id: component.id.clone(),
        label: component.label.clone(),
        block_type: component.block_type.clone(),
        message: message.to_string(),
    }
}

fn editing_wrapper(
    component: &Component,
    meta: Option<&BlockMeta>,
    inner: VNode,
    ctx: &RenderContext<'_>,
) -> VNode {
    let selected = ctx.selected_id == Some(component.id.as_str());
    let floating = meta.is_some_and(|m| m.floating);

    let mut class = String::from("builder-block");
    if floating {
        class.push_str(" builder-block--floating");
    }
    if selected {
        class.push_str(" is-selected");
    }

    let mut wrapper = VNode::element("div")
        .with_attr("class", class)
        .with_attr(COMPONENT_ID_ATTR, component.id.as_str())
        .with_attr("data-block-type", component.block_type.as_str());

    if selected {
        wrapper = wrapper.with_style("outline", "2px solid var(--color-primary)");
    }

    // Floating widgets sit outside document flow; no label chip for them
    if !floating {
        let label = match (component.label.is_empty(), meta) {
            (true, Some(meta)) => meta.label.as_str(),
            _ => component.label.as_str(),
        };
        wrapper = wrapper.with_style("position", "relative").with_child(
            VNode::element("span")
                .with_attr("class", "block-label")
                .with_style("position", "absolute")
                .with_child(VNode::text(label)),
        );
    }

    wrapper.with_child(inner)
}

fn animation_wrapper(animation: &Animation, inner: VNode) -> VNode {
    let transition = format!(
        "opacity {d}ms ease {delay}ms, transform {d}ms ease {delay}ms",
        d = animation.duration_ms,
        delay = animation.delay_ms
    );

    let mut wrapper = VNode::element("div")
        .with_attr(ANIMATE_ATTR, animation.kind.as_str())
        .with_attr("data-animate-trigger", animation.trigger.as_str())
        .with_style("opacity", "0")
        .with_style("transition", transition);

    if let Some(transform) = animation.kind.initial_transform() {
        wrapper = wrapper.with_style("transform", transform);
    }

    wrapper.with_child(inner)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Default)]
struct TypeCollector {
    types: BTreeSet<String>,
}

impl Visitor for TypeCollector {
    fn visit_component(&mut self, component: &Component, depth: usize) {
        self.types.insert(component.block_type.clone());
        walk_component(self, component, depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::from_fn;
    use crate::registry::BlockMeta;
    use sitekit_model::{AnimationKind, AnimationTrigger};

    async fn ready_renderer() -> ComponentRenderer {
        let registry = BlockRegistry::builder()
            .register_block(
                "box",
                BlockMeta::new("Box"),
                from_fn(|p| Ok(p.root("div").with_children(p.children.clone()))),
            )
            .register_block(
                "fab",
                BlockMeta::new("Fab").floating(),
                from_fn(|p| Ok(p.root("a"))),
            )
            .build();
        registry.preload(["box", "fab"]).await;
        ComponentRenderer::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_editing_wrapper_marks_selection() {
        let renderer = ready_renderer().await;
        let theme = Theme::default();
        let ctx = RenderContext::editing(&theme, DeviceView::Desktop).with_selection(Some("a"));

        let node = renderer
            .render_component(&Component::new("a", "box").with_label("Box A"), &ctx)
            .unwrap();

        assert_eq!(node.attr(COMPONENT_ID_ATTR), Some("a"));
        assert_eq!(node.attr("class"), Some("builder-block is-selected"));
        assert!(node.style("outline").is_some());
        assert_eq!(node.children()[0].text_content(), "Box A");
    }

    #[tokio::test]
    async fn test_floating_wrapper_has_no_label_chip() {
        let renderer = ready_renderer().await;
        let theme = Theme::default();
        let ctx = RenderContext::editing(&theme, DeviceView::Desktop).with_selection(Some("f"));

        let node = renderer
            .render_component(&Component::new("f", "fab"), &ctx)
            .unwrap();

        assert_eq!(
            node.attr("class"),
            Some("builder-block builder-block--floating is-selected")
        );
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].attr(BLOCK_ID_ATTR), Some("f"));
    }

    #[tokio::test]
    async fn test_animation_applies_only_outside_editor() {
        let renderer = ready_renderer().await;
        let theme = Theme::default();
        let component = Component::new("a", "box").with_animation(Animation {
            kind: AnimationKind::FadeUp,
            trigger: AnimationTrigger::Scroll,
            duration_ms: 400,
            delay_ms: 100,
        });

        let public = renderer
            .render_component(&component, &RenderContext::public(&theme, DeviceView::Desktop))
            .unwrap();
        assert_eq!(public.attr("data-animate"), Some("fade-up"));
        assert_eq!(public.style("opacity"), Some("0"));

        let editing = renderer
            .render_component(&component, &RenderContext::editing(&theme, DeviceView::Desktop))
            .unwrap();
        assert!(editing.find(&|n| n.attr("data-animate").is_some()).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_click_selects_innermost_component() {
        let renderer = ready_renderer().await;
        let theme = Theme::default();
        let selected = std::sync::Mutex::new(Vec::new());
        let on_select = |id: &str| selected.lock().unwrap().push(id.to_string());
        let ctx = RenderContext::editing(&theme, DeviceView::Desktop).with_select_handler(&on_select);

        let tree = Component::new("outer", "box").with_child(Component::new("inner", "box"));
        let root = renderer.render_component(&tree, &ctx).unwrap();

        // wrapper(outer) > [label, div(outer) > [wrapper(inner) > [label, div(inner)]]]
        let clicked = renderer.dispatch_click(&root, &[1, 0, 1], &ctx);

        assert_eq!(clicked.as_deref(), Some("inner"));
        assert_eq!(*selected.lock().unwrap(), vec!["inner".to_string()]);
    }
}
