//! Canvas chrome: insertion gaps, sortable items, empty state and the
//! drag overlay.

use crate::drag::{GapState, Point};
use crate::EditorConfig;
use sitekit_renderer::VNode;

pub const GAP_INDEX_ATTR: &str = "data-gap-index";
pub const SORTABLE_ID_ATTR: &str = "data-sortable-id";

/// Opacity of an item while it is being dragged
const DRAGGED_OPACITY: &str = "0.4";

pub fn gap(index: usize, state: GapState) -> VNode {
    let node = VNode::element("div")
        .with_attr("class", "canvas-gap")
        .with_attr(GAP_INDEX_ATTR, index.to_string())
        .with_attr("data-state", state.as_str())
        .with_style("position", "relative");

    match state {
        GapState::Idle => node
            .with_style("height", "1px")
            .with_style("background", "currentColor")
            .with_style("opacity", "0.08"),

        GapState::HoverInsert => node
            .with_style("height", "2px")
            .with_style("background", "var(--color-primary)")
            .with_child(
                VNode::element("button")
                    .with_attr("type", "button")
                    .with_attr("class", "canvas-gap__insert")
                    .with_attr("data-insert-index", index.to_string())
                    .with_child(VNode::text("Insert here")),
            ),

        GapState::DropTarget => node
            .with_style("height", "4px")
            .with_style("background", "var(--color-primary)")
            .with_child(marker("start"))
            .with_child(marker("end")),
    }
}

fn marker(side: &str) -> VNode {
    VNode::element("span")
        .with_attr("class", format!("canvas-gap__marker canvas-gap__marker--{}", side))
        .with_style("position", "absolute")
        .with_style("width", "8px")
        .with_style("height", "8px")
        .with_style("border-radius", "50%")
}

/// Shown instead of gaps when the page has no components
pub fn empty_state(state: GapState) -> VNode {
    let mut node = VNode::element("div")
        .with_attr("class", "canvas-empty")
        .with_attr(GAP_INDEX_ATTR, "0")
        .with_attr("data-state", state.as_str())
        .with_style("min-height", "240px")
        .with_style("border", "2px dashed currentColor")
        .with_child(VNode::text("Drag a block here to start building"));

    if state == GapState::DropTarget {
        node = node.with_style("border-color", "var(--color-primary)");
    }
    node
}

pub fn item(component_id: &str, content: VNode, dragged: bool) -> VNode {
    let mut node = VNode::element("div")
        .with_attr("class", "canvas-item")
        .with_attr(SORTABLE_ID_ATTR, component_id)
        .with_child(content);

    if dragged {
        node = node.with_style("opacity", DRAGGED_OPACITY);
    }
    node
}

/// Floating snapshot that follows the pointer during a reorder drag
pub fn drag_overlay(label: &str, snapshot: Option<VNode>, pointer: Point, config: &EditorConfig) -> VNode {
    let scale = config.overlay_scale;
    let mut body = VNode::element("div")
        .with_attr("class", "drag-overlay__body")
        .with_style("max-height", format!("{}px", config.overlay_max_height))
        .with_style("overflow", "hidden");

    if let Some(snapshot) = snapshot {
        body = body.with_child(
            VNode::element("div")
                .with_style("transform", format!("scale({})", scale))
                .with_style("transform-origin", "top left")
                .with_style("width", format!("{}%", (100.0 / scale).round()))
                .with_child(snapshot),
        );
    }

    VNode::element("div")
        .with_attr("class", "drag-overlay")
        .with_attr("aria-hidden", "true")
        .with_style("position", "fixed")
        .with_style("left", format!("{}px", pointer.x))
        .with_style("top", format!("{}px", pointer.y))
        .with_style("pointer-events", "none")
        .with_child(
            VNode::element("div")
                .with_attr("class", "drag-overlay__label")
                .with_child(VNode::text(label)),
        )
        .with_child(body)
}
