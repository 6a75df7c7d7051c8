//! # Sitekit Model
//!
//! The persisted data model for the site builder.
//!
//! ## Ownership
//!
//! ```text
//! Site ──owns──▶ Page* ──owns──▶ Component* ──owns──▶ Component* (children)
//!   │
//!   └── Theme (one per site, read-only for every renderer)
//! ```
//!
//! A `Component` is exclusively owned by its parent: there is no aliasing
//! and no component is shared between pages. Its `id` is identity, not
//! position, and never changes across reorder, insert, update or delete.
//!
//! `props` is an open key/value map. Each block type owns the meaning of
//! its props; the model never validates their internal shape.
//!
//! ## Device overrides
//!
//! `styles` and `hidden` are keyed by [`DeviceView`]. `desktop` is the
//! baseline and the active device's entry is merged on top of it.

pub mod component;
pub mod device;
pub mod error;
pub mod id_generator;
pub mod page;
pub mod site;
pub mod store;
pub mod template;
pub mod theme;
pub mod validator;
pub mod visitor;

pub use component::{
    Animation, AnimationKind, AnimationTrigger, Component, Location, Props, StyleMap,
};
pub use device::DeviceView;
pub use error::{ModelError, ModelResult};
pub use id_generator::{get_document_id, IdGenerator};
pub use page::{Page, SeoMeta};
pub use site::{is_valid_slug, slugify, Site};
pub use store::{MemorySiteStore, NewSite, SiteQuery, SiteStore, StoreError};
pub use template::{starter_template, SiteTemplate};
pub use theme::{Palette, Theme, ThemeFonts};
pub use validator::{ValidationLevel, ValidationWarning, Validator};
pub use visitor::{walk_component, walk_page, Visitor};
