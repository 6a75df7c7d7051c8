//! # Block contract
//!
//! Every block implementation receives the same inputs regardless of its
//! type: its props, the merged style for the active device, the theme, the
//! device, the editing flag, pre-rendered children and an update handle.

use crate::vdom::VNode;
use sitekit_model::{DeviceView, Props, Theme};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Callback receiving `(component_id, partial_props)` from inline edits
pub type UpdateSink<'a> = dyn Fn(&str, Props) + 'a;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockError {
    #[error("{0}")]
    Render(String),

    #[error("Missing prop '{0}'")]
    MissingProp(String),

    #[error("Invalid prop '{name}': {reason}")]
    InvalidProp { name: String, reason: String },

    #[error("Block panicked: {0}")]
    Panicked(String),

    #[error("Failed to load block: {0}")]
    Load(String),
}

/// A renderable block implementation
pub trait Block: Send + Sync {
    fn render(&self, props: &BlockProps<'_>) -> Result<VNode, BlockError>;
}

impl<F> Block for F
where
    F: Fn(&BlockProps<'_>) -> Result<VNode, BlockError> + Send + Sync,
{
    fn render(&self, props: &BlockProps<'_>) -> Result<VNode, BlockError> {
        self(props)
    }
}

/// Wrap a render function as a shareable block
pub fn from_fn<F>(f: F) -> Arc<dyn Block>
where
    F: Fn(&BlockProps<'_>) -> Result<VNode, BlockError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Forwards inline edits to the owner of the component tree.
///
/// Without a sink, updates are dropped.
#[derive(Clone, Copy)]
pub struct BlockUpdater<'a> {
    component_id: &'a str,
    sink: Option<&'a UpdateSink<'a>>,
}

impl<'a> BlockUpdater<'a> {
    pub fn new(component_id: &'a str, sink: Option<&'a UpdateSink<'a>>) -> Self {
        Self { component_id, sink }
    }

    pub fn update(&self, partial: Props) {
        if let Some(sink) = self.sink {
            sink(self.component_id, partial);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
    }
}

/// Inputs handed to `Block::render`
pub struct BlockProps<'a> {
    pub component_id: &'a str,
    pub block_type: &'a str,
    /// Stored props plus injected cross-cutting values
    pub props: &'a Props,
    /// Desktop style merged with the device override, as CSS values
    pub style: &'a BTreeMap<String, String>,
    pub theme: &'a Theme,
    pub device: DeviceView,
    pub editing: bool,
    /// Rendered child components (container blocks)
    pub children: Vec<VNode>,
    pub updater: BlockUpdater<'a>,
}

impl<'a> BlockProps<'a> {
    /// Root element carrying the merged style
    pub fn root(&self, tag: &str) -> VNode {
        VNode::element(tag)
            .with_attr("data-block", self.block_type)
            .with_styles(self.style)
    }

    pub fn str_prop(&self, name: &str) -> Option<&'a str> {
        self.props.get(name).and_then(|v| v.as_str())
    }

    pub fn required_str(&self, name: &str) -> Result<&'a str, BlockError> {
        self.str_prop(name)
            .ok_or_else(|| BlockError::MissingProp(name.to_string()))
    }

    pub fn u64_prop(&self, name: &str) -> Option<u64> {
        self.props.get(name).and_then(|v| v.as_u64())
    }

    pub fn str_list(&self, name: &str) -> Vec<&'a str> {
        self.props
            .get(name)
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[test]
    fn test_updater_forwards_component_id() {
        let received = RefCell::new(Vec::new());
        let sink = |id: &str, partial: Props| received.borrow_mut().push((id.to_string(), partial));

        let updater = BlockUpdater::new("hero-1", Some(&sink));
        let mut partial = Props::new();
        partial.insert("title".to_string(), json!("New"));
        updater.update(partial.clone());

        assert_eq!(received.borrow().as_slice(), &[("hero-1".to_string(), partial)]);
    }

    #[test]
    fn test_updater_without_sink_is_inert() {
        let updater = BlockUpdater::new("hero-1", None);
        assert!(!updater.is_connected());
        updater.update(Props::new());
    }
}
