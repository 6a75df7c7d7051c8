//! Scaled, read-only page previews for dashboards and template galleries.

use crate::renderer::{ComponentRenderer, RenderContext};
use crate::vdom::VNode;
use sitekit_model::{DeviceView, Page, Theme};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPolicy {
    /// Viewport width the page is laid out at before scaling
    pub width: u32,
    pub scale: f32,
    /// Visible height of the frame in unscaled pixels, if clipped
    pub clip_height: Option<u32>,
    /// Render only once the frame is visible
    pub lazy: bool,
}

impl PreviewPolicy {
    /// Small card in a site list
    pub fn mini() -> Self {
        Self {
            width: 1280,
            scale: 0.2,
            clip_height: Some(800),
            lazy: true,
        }
    }

    pub fn thumbnail() -> Self {
        Self {
            width: 1280,
            scale: 0.25,
            clip_height: Some(1000),
            lazy: true,
        }
    }

    /// Full-length live preview in the template gallery
    pub fn template_live() -> Self {
        Self {
            width: 1280,
            scale: 0.35,
            clip_height: None,
            lazy: false,
        }
    }

    fn frame_width(&self) -> u32 {
        (self.width as f32 * self.scale).round() as u32
    }

    fn frame_height(&self) -> Option<u32> {
        self.clip_height
            .map(|h| (h as f32 * self.scale).round() as u32)
    }
}

impl FromStr for PreviewPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mini" => Ok(Self::mini()),
            "thumbnail" => Ok(Self::thumbnail()),
            "template" | "template-live" => Ok(Self::template_live()),
            other => Err(format!("unknown preview variant '{}'", other)),
        }
    }
}

/// Render `page` into a scaled preview frame.
///
/// Previews never animate and never carry editing wrappers. A lazy preview
/// that is not yet visible renders an empty frame of the final size.
pub fn render_preview(
    renderer: &ComponentRenderer,
    page: &Page,
    theme: &Theme,
    policy: &PreviewPolicy,
    visible: bool,
) -> VNode {
    let mut frame = VNode::element("div")
        .with_attr("class", "site-preview")
        .with_style("width", format!("{}px", policy.frame_width()))
        .with_style("overflow", "hidden");

    if let Some(height) = policy.frame_height() {
        frame = frame.with_style("height", format!("{}px", height));
    }

    if policy.lazy && !visible {
        return frame.with_attr("data-preview-state", "deferred");
    }

    let ctx = RenderContext::public(theme, DeviceView::Desktop).without_animations();
    let content = renderer.render_components(&page.components, &ctx);

    frame.with_child(
        VNode::element("div")
            .with_attr("class", "site-preview__viewport")
            .with_attr("aria-hidden", "true")
            .with_style("width", format!("{}px", policy.width))
            .with_style("transform", format!("scale({})", policy.scale))
            .with_style("transform-origin", "top left")
            .with_style("pointer-events", "none")
            .with_children(content),
    )
}
