//! # Sitekit Renderer
//!
//! Turns a page tree into a virtual DOM.
//!
//! ```text
//! Component tree ──▶ ComponentRenderer ──▶ VNode tree ──▶ HTML
//!                         │
//!                         ▼
//!                   BlockRegistry (type → lazily loaded Block)
//! ```
//!
//! The registry is the only suspension point: a block type that has not
//! loaded yet renders as a fixed-height placeholder and is loaded in the
//! background. Concurrent requests for one type share a single load.

pub mod block;
pub mod boundary;
pub mod builtin;
pub mod html;
pub mod preview;
pub mod registry;
pub mod renderer;
pub mod style;
pub mod vdom;
pub mod viewer;

pub use block::{from_fn, Block, BlockError, BlockProps, BlockUpdater, UpdateSink};
pub use boundary::{BoundaryState, ErrorBoundaries};
pub use builtin::{builtin_registry, register_builtins, LANGUAGE_PROP};
pub use html::{page_html, to_html, HtmlOptions, ANIMATE_ATTR};
pub use preview::{render_preview, PreviewPolicy};
pub use registry::{
    BlockLoader, BlockMeta, BlockRegistry, BlockRegistryBuilder, LoadError, LoadFuture, Resolution,
};
pub use renderer::{ComponentRenderer, RenderContext, DEFAULT_PLACEHOLDER_HEIGHT};
pub use vdom::{
    component_ids, wrapper_chain, CssRule, VNode, VirtualDomDocument, BLOCK_ID_ATTR,
    COMPONENT_ID_ATTR,
};
pub use viewer::{render_site, RenderedPage, ViewerError, ViewerOptions};
