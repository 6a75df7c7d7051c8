//! # Undo/Redo History
//!
//! - Each mutation's inverse is computed against the page right before the
//!   mutation is applied
//! - Undo applies the inverses newest-first; redo replays the originals
//! - Recording a new step discards everything that was undone
//! - Several mutations can be grouped into one step (e.g. duplicate + select)
//!
//! ```rust,ignore
//! let mut history = UndoStack::new();
//! history.apply(&Mutation::SetLabel { component_id: "hero-1".into(), label: "Hero".into() }, &mut page)?;
//! history.undo(&mut page)?;
//! history.redo(&mut page)?;
//! ```

use crate::{Mutation, MutationError};
use sitekit_model::Page;
use std::collections::VecDeque;

/// One undo step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationBatch {
    /// In application order
    pub mutations: Vec<Mutation>,
    /// In undo order (reverse of `mutations`)
    pub inverses: Vec<Mutation>,
    pub description: Option<String>,
}

impl MutationBatch {
    pub fn single(mutation: Mutation, inverse: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            inverses: vec![inverse],
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn record(&mut self, mutation: Mutation, inverse: Mutation) {
        self.mutations.push(mutation);
        self.inverses.insert(0, inverse);
    }
}

#[derive(Debug)]
pub struct UndoStack {
    done: VecDeque<MutationBatch>,
    undone: Vec<MutationBatch>,
    /// 0 = unlimited
    max_levels: usize,
    open_batch: Option<MutationBatch>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            max_levels,
            open_batch: None,
        }
    }

    /// Apply `mutation` to `page` and record it. Nothing is recorded when
    /// the mutation fails validation.
    pub fn apply(&mut self, mutation: &Mutation, page: &mut Page) -> Result<(), MutationError> {
        let inverse = mutation.to_inverse(page)?;
        mutation.apply(page)?;

        match &mut self.open_batch {
            Some(batch) => batch.record(mutation.clone(), inverse),
            None => self.push(MutationBatch::single(mutation.clone(), inverse)),
        }
        Ok(())
    }

    /// Group the following mutations into one step until `end_batch`
    pub fn begin_batch(&mut self) {
        self.open_batch = Some(MutationBatch::default());
    }

    pub fn end_batch(&mut self) {
        if let Some(batch) = self.open_batch.take() {
            if !batch.mutations.is_empty() {
                self.push(batch);
            }
        }
    }

    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.open_batch {
            batch.description = Some(description.into());
        }
    }

    fn push(&mut self, batch: MutationBatch) {
        self.done.push_back(batch);
        if self.max_levels > 0 {
            while self.done.len() > self.max_levels {
                self.done.pop_front();
            }
        }
        self.undone.clear();
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self, page: &mut Page) -> Result<bool, MutationError> {
        let Some(batch) = self.done.pop_back() else {
            return Ok(false);
        };
        for inverse in &batch.inverses {
            inverse.apply(page)?;
        }
        self.undone.push(batch);
        Ok(true)
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self, page: &mut Page) -> Result<bool, MutationError> {
        let Some(batch) = self.undone.pop() else {
            return Ok(false);
        };
        for mutation in &batch.mutations {
            mutation.apply(page)?;
        }
        self.done.push_back(batch);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.done.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.undone.len()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.open_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.done.back().and_then(|b| b.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.undone.last().and_then(|b| b.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_model::Component;

    fn page() -> Page {
        Page::new("p", "Home", "home").with_components(vec![
            Component::new("a", "hero").with_label("Hero"),
            Component::new("b", "features"),
        ])
    }

    fn relabel(id: &str, label: &str) -> Mutation {
        Mutation::SetLabel {
            component_id: id.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_apply_undo_redo() {
        let mut page = page();
        let mut stack = UndoStack::new();

        stack.apply(&relabel("a", "Banner"), &mut page).unwrap();
        assert_eq!(page.find_component("a").unwrap().label, "Banner");

        assert!(stack.undo(&mut page).unwrap());
        assert_eq!(page.find_component("a").unwrap().label, "Hero");
        assert_eq!(stack.redo_levels(), 1);

        assert!(stack.redo(&mut page).unwrap());
        assert_eq!(page.find_component("a").unwrap().label, "Banner");
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_batched_mutations() {
        let mut page = page();
        let original = page.clone();
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.set_batch_description("Swap and rename");
        stack
            .apply(
                &Mutation::MoveComponent {
                    component_id: "a".to_string(),
                    parent_id: None,
                    index: 1,
                },
                &mut page,
            )
            .unwrap();
        stack.apply(&relabel("b", "Feature grid"), &mut page).unwrap();
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Swap and rename"));

        stack.undo(&mut page).unwrap();
        assert_eq!(page, original);
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut page = page();
        let mut stack = UndoStack::new();

        stack.apply(&relabel("a", "One"), &mut page).unwrap();
        stack.undo(&mut page).unwrap();
        assert_eq!(stack.redo_levels(), 1);

        stack.apply(&relabel("a", "Two"), &mut page).unwrap();
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut page = page();
        let mut stack = UndoStack::with_max_levels(2);

        for i in 0..3 {
            stack.apply(&relabel("a", &format!("Label {}", i)), &mut page).unwrap();
        }

        assert_eq!(stack.undo_levels(), 2);
    }

    #[test]
    fn test_failed_mutation_is_not_recorded() {
        let mut page = page();
        let mut stack = UndoStack::new();

        assert!(stack.apply(&relabel("missing", "X"), &mut page).is_err());
        assert!(!stack.can_undo());
    }
}
