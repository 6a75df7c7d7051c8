//! # Page Mutations
//!
//! Semantic operations on a page's component tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one editor action
//! 2. **Validated**: structural constraints are checked before anything changes
//! 3. **Invertible**: every mutation can produce its inverse against the
//!    page it is about to change
//!
//! ## Mutation Semantics
//!
//! ### Move
//! - Detaches the component (with its subtree) and re-inserts it into the
//!   target sibling list at `index`, counted after detaching
//! - Within one list this is an array move: `[A, B, C]` moving `A` to
//!   index 2 gives `[B, C, A]`
//! - Fails if the target parent is the component itself or a descendant
//!
//! ### Insert
//! - `index` is clamped to the sibling count
//! - Fails if any id in the inserted subtree already exists on the page
//!
//! ### UpdateProps
//! - Shallow merge; keys not mentioned keep their values

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitekit_model::{Component, DeviceView, Page, Props};
use std::collections::HashSet;
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Move a component to `index` in the children of `parent_id`
    /// (`None` = page top level)
    MoveComponent {
        component_id: String,
        parent_id: Option<String>,
        index: usize,
    },

    InsertComponent {
        parent_id: Option<String>,
        index: usize,
        component: Component,
    },

    /// Remove a component and its subtree
    RemoveComponent { component_id: String },

    /// Merge a partial props map into the component's props
    UpdateProps { component_id: String, props: Props },

    /// Replace the props map wholesale
    ReplaceProps { component_id: String, props: Props },

    /// Set (or with `None`, clear) one style property for a device
    SetStyle {
        component_id: String,
        device: DeviceView,
        property: String,
        value: Option<Value>,
    },

    SetHidden {
        component_id: String,
        device: DeviceView,
        hidden: bool,
    },

    SetLabel { component_id: String, label: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Duplicate component id: {0}")]
    DuplicateId(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Mutation {
    /// Id of the component this mutation targets
    pub fn component_id(&self) -> &str {
        match self {
            Mutation::MoveComponent { component_id, .. }
            | Mutation::RemoveComponent { component_id }
            | Mutation::UpdateProps { component_id, .. }
            | Mutation::ReplaceProps { component_id, .. }
            | Mutation::SetStyle { component_id, .. }
            | Mutation::SetHidden { component_id, .. }
            | Mutation::SetLabel { component_id, .. } => component_id,
            Mutation::InsertComponent { component, .. } => &component.id,
        }
    }

    /// Apply mutation to the page with validation
    pub fn apply(&self, page: &mut Page) -> Result<(), MutationError> {
        self.validate(page)?;

        match self {
            Mutation::MoveComponent {
                component_id,
                parent_id,
                index,
            } => {
                let (component, _) = page
                    .remove_component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                insert_at(page, parent_id.as_deref(), *index, component)
            }

            Mutation::InsertComponent {
                parent_id,
                index,
                component,
            } => insert_at(page, parent_id.as_deref(), *index, component.clone()),

            Mutation::RemoveComponent { component_id } => {
                page.remove_component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                Ok(())
            }

            Mutation::UpdateProps {
                component_id,
                props,
            } => {
                find_mut(page, component_id)?.merge_props(props);
                Ok(())
            }

            Mutation::ReplaceProps {
                component_id,
                props,
            } => {
                find_mut(page, component_id)?.props = props.clone();
                Ok(())
            }

            Mutation::SetStyle {
                component_id,
                device,
                property,
                value,
            } => {
                let component = find_mut(page, component_id)?;
                match value {
                    Some(value) => {
                        component
                            .styles
                            .entry(*device)
                            .or_default()
                            .insert(property.clone(), value.clone());
                    }
                    None => {
                        if let Some(style) = component.styles.get_mut(device) {
                            style.remove(property);
                            if style.is_empty() {
                                component.styles.remove(device);
                            }
                        }
                    }
                }
                Ok(())
            }

            Mutation::SetHidden {
                component_id,
                device,
                hidden,
            } => {
                let component = find_mut(page, component_id)?;
                if *hidden {
                    component.hidden.insert(*device, true);
                } else {
                    component.hidden.remove(device);
                }
                Ok(())
            }

            Mutation::SetLabel {
                component_id,
                label,
            } => {
                find_mut(page, component_id)?.label = label.clone();
                Ok(())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        match self {
            Mutation::MoveComponent {
                component_id,
                parent_id,
                ..
            } => {
                let component = find(page, component_id)?;

                if let Some(parent_id) = parent_id {
                    if !page.contains(parent_id) {
                        return Err(MutationError::ParentNotFound(parent_id.clone()));
                    }
                    // Target parent inside the moved subtree
                    if component.id == *parent_id
                        || sitekit_model::component::find_in(&component.children, parent_id)
                            .is_some()
                    {
                        return Err(MutationError::CycleDetected);
                    }
                }
                Ok(())
            }

            Mutation::InsertComponent {
                parent_id,
                component,
                ..
            } => {
                if let Some(parent_id) = parent_id {
                    if !page.contains(parent_id) {
                        return Err(MutationError::ParentNotFound(parent_id.clone()));
                    }
                }

                let existing: HashSet<String> = page.ids().into_iter().collect();
                let mut incoming = HashSet::new();
                let mut stack = vec![component];
                while let Some(c) = stack.pop() {
                    if c.id.is_empty() {
                        return Err(MutationError::InvalidStructure(
                            "Component id cannot be empty".to_string(),
                        ));
                    }
                    if existing.contains(&c.id) || !incoming.insert(c.id.as_str()) {
                        return Err(MutationError::DuplicateId(c.id.clone()));
                    }
                    stack.extend(c.children.iter());
                }
                Ok(())
            }

            Mutation::RemoveComponent { component_id }
            | Mutation::UpdateProps { component_id, .. }
            | Mutation::ReplaceProps { component_id, .. }
            | Mutation::SetStyle { component_id, .. }
            | Mutation::SetHidden { component_id, .. }
            | Mutation::SetLabel { component_id, .. } => {
                find(page, component_id)?;
                Ok(())
            }
        }
    }

    /// Mutation that undoes `self`, computed against the page before `self`
    /// is applied
    pub fn to_inverse(&self, page: &Page) -> Result<Mutation, MutationError> {
        self.validate(page)?;

        let inverse = match self {
            Mutation::MoveComponent { component_id, .. } => {
                let location = page
                    .locate(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                Mutation::MoveComponent {
                    component_id: component_id.clone(),
                    parent_id: location.parent_id,
                    index: location.index,
                }
            }

            Mutation::InsertComponent { component, .. } => Mutation::RemoveComponent {
                component_id: component.id.clone(),
            },

            Mutation::RemoveComponent { component_id } => {
                let location = page
                    .locate(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                Mutation::InsertComponent {
                    parent_id: location.parent_id,
                    index: location.index,
                    component: find(page, component_id)?.clone(),
                }
            }

            Mutation::UpdateProps { component_id, .. } | Mutation::ReplaceProps { component_id, .. } => {
                Mutation::ReplaceProps {
                    component_id: component_id.clone(),
                    props: find(page, component_id)?.props.clone(),
                }
            }

            Mutation::SetStyle {
                component_id,
                device,
                property,
                ..
            } => Mutation::SetStyle {
                component_id: component_id.clone(),
                device: *device,
                property: property.clone(),
                value: find(page, component_id)?
                    .styles
                    .get(device)
                    .and_then(|style| style.get(property))
                    .cloned(),
            },

            Mutation::SetHidden {
                component_id,
                device,
                ..
            } => Mutation::SetHidden {
                component_id: component_id.clone(),
                device: *device,
                hidden: find(page, component_id)?.is_hidden(*device),
            },

            Mutation::SetLabel { component_id, .. } => Mutation::SetLabel {
                component_id: component_id.clone(),
                label: find(page, component_id)?.label.clone(),
            },
        };

        Ok(inverse)
    }
}

fn find<'a>(page: &'a Page, id: &str) -> Result<&'a Component, MutationError> {
    page.find_component(id)
        .ok_or_else(|| MutationError::ComponentNotFound(id.to_string()))
}

fn find_mut<'a>(page: &'a mut Page, id: &str) -> Result<&'a mut Component, MutationError> {
    page.find_component_mut(id)
        .ok_or_else(|| MutationError::ComponentNotFound(id.to_string()))
}

fn insert_at(
    page: &mut Page,
    parent_id: Option<&str>,
    index: usize,
    component: Component,
) -> Result<(), MutationError> {
    let siblings = page
        .siblings_mut(parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.unwrap_or_default().to_string()))?;
    let index = index.min(siblings.len());
    siblings.insert(index, component);
    Ok(())
}

/// Result of applying a mutation through a document
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,
}
