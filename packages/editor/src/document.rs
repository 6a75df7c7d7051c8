//! # Page Document
//!
//! Editing handle for one page: the page itself, a version counter that
//! increments on every applied change, a dirty flag, and undo history.
//!
//! ```text
//! Load ──▶ Edit (mutations) ──▶ Save
//!  │            │                 │
//! Site       version++        save_into
//! ```

use crate::{EditorError, Mutation, MutationResult, UndoStack};
use sitekit_model::{ModelError, Page, Site};
use tracing::debug;

#[derive(Debug)]
pub struct PageDocument {
    page: Page,
    /// Increments on each applied mutation, undo and redo
    pub version: u64,
    dirty: bool,
    history: UndoStack,
}

impl PageDocument {
    pub fn new(page: Page) -> Self {
        Self::with_undo_levels(page, 100)
    }

    pub fn with_undo_levels(page: Page, undo_levels: usize) -> Self {
        Self {
            page,
            version: 0,
            dirty: false,
            history: UndoStack::with_max_levels(undo_levels),
        }
    }

    /// Open the page with `slug` from `site`
    pub fn from_site(site: &Site, slug: &str) -> Result<Self, EditorError> {
        let page = site
            .page_by_slug(slug)
            .ok_or_else(|| ModelError::PageNotFound(slug.to_string()))?;
        Ok(Self::new(page.clone()))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.history.apply(&mutation, &mut self.page)?;
        debug!(component_id = mutation.component_id(), version = self.version + 1, "Applied mutation");
        Ok(self.bump())
    }

    /// Apply several mutations as one undo step.
    ///
    /// Stops at the first failure; mutations applied before it stay applied
    /// and remain undoable as one step.
    pub fn apply_batch(
        &mut self,
        description: &str,
        mutations: Vec<Mutation>,
    ) -> Result<MutationResult, EditorError> {
        self.history.begin_batch();
        self.history.set_batch_description(description);

        let mut applied = 0;
        let mut outcome = Ok(());
        for mutation in &mutations {
            if let Err(err) = self.history.apply(mutation, &mut self.page) {
                outcome = Err(err);
                break;
            }
            applied += 1;
        }
        self.history.end_batch();

        if applied > 0 {
            self.bump();
        }
        outcome?;
        Ok(MutationResult {
            version: self.version,
        })
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.history.undo(&mut self.page)?;
        if undone {
            self.bump();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.history.redo(&mut self.page)?;
        if redone {
            self.bump();
        }
        Ok(redone)
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the page back into `site` and clear the dirty flag
    pub fn save_into(&mut self, site: &mut Site) -> Result<(), EditorError> {
        let slot = site
            .page_by_slug_mut(&self.page.slug)
            .ok_or_else(|| ModelError::PageNotFound(self.page.slug.clone()))?;
        *slot = self.page.clone();
        site.touch();
        self.dirty = false;
        Ok(())
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    fn bump(&mut self) -> MutationResult {
        self.version += 1;
        self.dirty = true;
        MutationResult {
            version: self.version,
        }
    }
}
