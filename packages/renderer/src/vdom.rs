use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute marking an editing wrapper; its value is the component id
pub const COMPONENT_ID_ATTR: &str = "data-component-id";

/// Attribute stamped on the root element of every rendered block
pub const BLOCK_ID_ATTR: &str = "data-block-id";

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },

    /// Stable-size slot shown while a block implementation loads
    Placeholder {
        component_id: String,
        min_height: u32,
    },

    /// Isolated render failure of one component
    Error {
        component_id: String,
        label: String,
        block_type: String,
        message: String,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles(mut self, new_styles: &BTreeMap<String, String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            for (key, value) in new_styles {
                styles.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, VNode::Error { .. })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, VNode::Placeholder { .. })
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Placeholder { .. } | VNode::Error { .. } => {}
        }
    }

    /// Depth-first search for the first node satisfying `pred`
    pub fn find(&self, pred: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if pred(self) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(pred))
    }

    /// Node reached by following child indices from this node
    pub fn descend(&self, path: &[usize]) -> Option<&VNode> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.children().get(*first)?.descend(rest),
        }
    }
}

/// Ids of the components rendered in `nodes`, in document order.
///
/// Error and placeholder nodes count as their component's presence.
pub fn component_ids(nodes: &[VNode]) -> Vec<String> {
    fn collect(node: &VNode, out: &mut Vec<String>) {
        match node {
            VNode::Element {
                attributes,
                children,
                ..
            } => {
                if let Some(id) = attributes.get(BLOCK_ID_ATTR) {
                    out.push(id.clone());
                }
                for child in children {
                    collect(child, out);
                }
            }
            VNode::Placeholder { component_id, .. } | VNode::Error { component_id, .. } => {
                out.push(component_id.clone());
            }
            VNode::Text { .. } => {}
        }
    }

    let mut ids = Vec::new();
    for node in nodes {
        collect(node, &mut ids);
    }
    ids
}

/// Ids of editing wrappers crossed on the way from `root` to the node at
/// `path`, outermost first.
pub fn wrapper_chain(root: &VNode, path: &[usize]) -> Vec<String> {
    let mut chain = Vec::new();
    let mut node = root;
    let mut rest = path;

    loop {
        if let Some(id) = node.attr(COMPONENT_ID_ATTR) {
            chain.push(id.to_string());
        }
        match rest.split_first() {
            Some((index, tail)) => match node.children().get(*index) {
                Some(child) => {
                    node = child;
                    rest = tail;
                }
                None => break,
            },
            None => break,
        }
    }

    chain
}

/// CSS rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub properties: BTreeMap<String, String>,
}

/// Rendered document: root nodes plus document-level CSS
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VirtualDomDocument {
    pub nodes: Vec<VNode>,
    pub styles: Vec<CssRule>,
}

impl VirtualDomDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }

    pub fn add_style(&mut self, selector: impl Into<String>, properties: BTreeMap<String, String>) {
        self.styles.push(CssRule {
            selector: selector.into(),
            properties,
        });
    }

    pub fn component_ids(&self) -> Vec<String> {
        component_ids(&self.nodes)
    }
}
