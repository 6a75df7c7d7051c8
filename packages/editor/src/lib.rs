//! # Sitekit Editor
//!
//! Editing engine behind the builder canvas.
//!
//! ```text
//! pointer / palette events
//!          │
//!          ▼
//!       Canvas ──▶ Mutation ──▶ PageDocument ──▶ Page
//!          │                        │
//!          │                    UndoStack
//!          ▼
//!   ComponentRenderer (editing context) ──▶ VNode
//! ```
//!
//! Every change to a page is a [`Mutation`]. Mutations are validated before
//! they touch the tree and record their inverse, so any sequence of edits
//! can be undone step by step.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitekit_editor::{palette_hook, Canvas, DragPayload};
//!
//! let registry = std::sync::Arc::new(sitekit_renderer::builtin_registry());
//! let mut canvas = Canvas::new(page, site.theme.clone())
//!     .on_drop_block_at(palette_hook(registry.clone()));
//!
//! canvas.drop_on_gap(0, &DragPayload::palette("hero"))?;
//! canvas.reorder("hero-1", "features-1")?;
//! canvas.document_mut().save_into(&mut site)?;
//! ```

pub mod canvas;
pub mod config;
pub mod document;
pub mod drag;
pub mod errors;
pub mod mutations;
pub mod undo_stack;
pub mod view;

pub use canvas::{palette_hook, Canvas, DropBlockHook, InsertAtHook};
pub use config::EditorConfig;
pub use document::PageDocument;
pub use drag::{DragGesture, DragPayload, GapState, Point, PALETTE_MIME};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use undo_stack::{MutationBatch, UndoStack};
pub use view::{GAP_INDEX_ATTR, SORTABLE_ID_ATTR};
