//! # Components
//!
//! A component is one block instance in a page tree. Its `type` is a key
//! into the block registry; its `props` are opaque to everything except the
//! block implementation registered for that type.

use crate::device::DeviceView;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Open, per-type property map
pub type Props = serde_json::Map<String, Value>;

/// Style properties for one device
pub type StyleMap = serde_json::Map<String, Value>;

/// Block instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub props: Props,

    /// Device → style overrides. `desktop` is the inherited baseline.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<DeviceView, StyleMap>,

    /// Device → hidden flag. Hidden components are skipped entirely.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hidden: BTreeMap<DeviceView, bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

/// Entry / scroll-triggered animation, applied only outside the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub kind: AnimationKind,

    #[serde(default)]
    pub trigger: AnimationTrigger,

    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,

    #[serde(default)]
    pub delay_ms: u32,
}

fn default_duration_ms() -> u32 {
    600
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    FadeIn,
    FadeUp,
    SlideLeft,
    SlideRight,
    ZoomIn,
}

impl AnimationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::FadeIn => "fade-in",
            AnimationKind::FadeUp => "fade-up",
            AnimationKind::SlideLeft => "slide-left",
            AnimationKind::SlideRight => "slide-right",
            AnimationKind::ZoomIn => "zoom-in",
        }
    }

    /// Transform applied before the element becomes visible
    pub fn initial_transform(&self) -> Option<&'static str> {
        match self {
            AnimationKind::FadeIn => None,
            AnimationKind::FadeUp => Some("translateY(24px)"),
            AnimationKind::SlideLeft => Some("translateX(32px)"),
            AnimationKind::SlideRight => Some("translateX(-32px)"),
            AnimationKind::ZoomIn => Some("scale(0.95)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationTrigger {
    /// Runs once when the page loads
    Load,
    /// Runs when the element scrolls into view
    #[default]
    Scroll,
}

impl AnimationTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationTrigger::Load => "load",
            AnimationTrigger::Scroll => "scroll",
        }
    }
}

impl Component {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        let block_type = block_type.into();
        Self {
            id: id.into(),
            label: block_type.clone(),
            block_type,
            props: Props::new(),
            styles: BTreeMap::new(),
            hidden: BTreeMap::new(),
            animation: None,
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_style(
        mut self,
        device: DeviceView,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.styles
            .entry(device)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn hidden_on(mut self, device: DeviceView) -> Self {
        self.hidden.insert(device, true);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Component>) -> Self {
        self.children.extend(children);
        self
    }

    /// Whether this component is skipped on `device`
    pub fn is_hidden(&self, device: DeviceView) -> bool {
        self.hidden.get(&device).copied().unwrap_or(false)
    }

    /// Desktop styles with the device's overrides merged on top.
    ///
    /// Device-specific keys win; desktop keys fill the gaps.
    pub fn effective_style(&self, device: DeviceView) -> StyleMap {
        let mut merged = self
            .styles
            .get(&DeviceView::Desktop)
            .cloned()
            .unwrap_or_default();

        if !device.is_base() {
            if let Some(overrides) = self.styles.get(&device) {
                for (key, value) in overrides {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        merged
    }

    /// Merge a partial props update into this component's props
    pub fn merge_props(&mut self, partial: &Props) {
        for (key, value) in partial {
            self.props.insert(key.clone(), value.clone());
        }
    }

    /// Number of components in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Component::subtree_len).sum::<usize>()
    }
}

/// Depth-first lookup in a component list
pub fn find_in<'a>(list: &'a [Component], id: &str) -> Option<&'a Component> {
    for component in list {
        if component.id == id {
            return Some(component);
        }
        if let Some(found) = find_in(&component.children, id) {
            return Some(found);
        }
    }
    None
}

/// Depth-first mutable lookup in a component list
pub fn find_in_mut<'a>(list: &'a mut [Component], id: &str) -> Option<&'a mut Component> {
    for component in list.iter_mut() {
        if component.id == id {
            return Some(component);
        }
        if let Some(found) = find_in_mut(&mut component.children, id) {
            return Some(found);
        }
    }
    None
}

/// Location of a component: its parent (`None` for top level) and index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub parent_id: Option<String>,
    pub index: usize,
}

/// Find where `id` lives in the tree
pub fn locate_in(list: &[Component], id: &str) -> Option<Location> {
    locate_with_parent(list, id, None)
}

fn locate_with_parent(list: &[Component], id: &str, parent: Option<&str>) -> Option<Location> {
    if let Some(index) = list.iter().position(|c| c.id == id) {
        return Some(Location {
            parent_id: parent.map(str::to_string),
            index,
        });
    }
    list.iter()
        .find_map(|c| locate_with_parent(&c.children, id, Some(&c.id)))
}

/// Remove `id` from wherever it lives and return it with its old location
pub fn remove_from(list: &mut Vec<Component>, id: &str) -> Option<(Component, Location)> {
    let location = locate_in(list, id)?;
    let siblings = match &location.parent_id {
        None => list,
        Some(parent_id) => &mut find_in_mut(list, parent_id)?.children,
    };
    let removed = siblings.remove(location.index);
    Some((removed, location))
}
