use crate::component::{self, Component, Location};
use serde::{Deserialize, Serialize};

/// A page owned by exactly one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    /// Unique within the owning site
    pub slug: String,

    #[serde(default)]
    pub is_home_page: bool,

    /// Top-level component list, in render order
    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoMeta>,
}

/// Optional SEO metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            is_home_page: false,
            components: Vec::new(),
            seo: None,
        }
    }

    pub fn home(mut self) -> Self {
        self.is_home_page = true;
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components.extend(components);
        self
    }

    pub fn with_seo(mut self, seo: SeoMeta) -> Self {
        self.seo = Some(seo);
        self
    }

    /// Find a component anywhere in the tree
    pub fn find_component(&self, id: &str) -> Option<&Component> {
        component::find_in(&self.components, id)
    }

    pub fn find_component_mut(&mut self, id: &str) -> Option<&mut Component> {
        component::find_in_mut(&mut self.components, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_component(id).is_some()
    }

    /// Where a component lives: parent id (`None` = top level) and index
    pub fn locate(&self, id: &str) -> Option<Location> {
        component::locate_in(&self.components, id)
    }

    /// Detach a component (and its subtree) from the tree
    pub fn remove_component(&mut self, id: &str) -> Option<(Component, Location)> {
        component::remove_from(&mut self.components, id)
    }

    /// Sibling list for `parent_id` (`None` = top level)
    pub fn siblings_mut(&mut self, parent_id: Option<&str>) -> Option<&mut Vec<Component>> {
        match parent_id {
            None => Some(&mut self.components),
            Some(id) => self.find_component_mut(id).map(|c| &mut c.children),
        }
    }

    pub fn siblings(&self, parent_id: Option<&str>) -> Option<&[Component]> {
        match parent_id {
            None => Some(&self.components),
            Some(id) => self.find_component(id).map(|c| c.children.as_slice()),
        }
    }

    /// All component ids in document (depth-first) order
    pub fn ids(&self) -> Vec<String> {
        fn collect(list: &[Component], out: &mut Vec<String>) {
            for component in list {
                out.push(component.id.clone());
                collect(&component.children, out);
            }
        }

        let mut ids = Vec::new();
        collect(&self.components, &mut ids);
        ids
    }

    /// Title to publish: SEO override, else page title
    pub fn document_title(&self) -> &str {
        self.seo
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or(&self.title)
    }
}
