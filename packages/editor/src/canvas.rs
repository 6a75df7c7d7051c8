//! # Editor Canvas
//!
//! Interactive surface for one page. The canvas owns a [`PageDocument`]
//! and tracks the transient editing state around it:
//!
//! - the selected component
//! - the device being previewed
//! - a press that may turn into a reorder drag
//! - which insertion gap is hovered, and which one is under a palette drag
//! - an insertion slot waiting for the host to pick a block
//!
//! Gaps sit between top-level components: a page with `n` components has
//! `n + 1` gaps, gap `i` inserting before component `i`. An empty page
//! shows a single drop zone that behaves like gap 0.
//!
//! Persistence belongs to the caller: every change goes through the
//! document, which can be written back with [`PageDocument::save_into`].

use crate::drag::{DragGesture, DragPayload, GapState, Point};
use crate::view;
use crate::{EditorConfig, EditorError, Mutation, MutationError, MutationResult, PageDocument};
use sitekit_model::{Component, DeviceView, IdGenerator, Page, Props, Theme};
use sitekit_renderer::{wrapper_chain, BlockRegistry, ComponentRenderer, RenderContext, VNode};
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Host hook for "Insert here": the host opens its block picker and later
/// answers with [`Canvas::complete_insert`].
pub type InsertAtHook = Box<dyn FnMut(usize)>;

/// Host hook turning a palette drop into a component, or `None` to refuse.
pub type DropBlockHook = Box<dyn FnMut(&str, usize) -> Option<Component>>;

pub struct Canvas {
    document: PageDocument,
    theme: Theme,
    config: EditorConfig,
    device: DeviceView,
    language: Option<String>,
    selected_id: Option<String>,
    drag: Option<DragGesture>,
    hovered_gap: Option<usize>,
    palette_gap: Option<usize>,
    pending_insert: Option<usize>,
    on_insert_at: Option<InsertAtHook>,
    on_drop_block_at: Option<DropBlockHook>,
    /// Prop edits made by blocks during render, applied by `apply_inline_updates`
    inline_updates: RefCell<Vec<(String, Props)>>,
}

impl Canvas {
    pub fn new(page: Page, theme: Theme) -> Self {
        Self::with_config(page, theme, EditorConfig::default())
    }

    pub fn with_config(page: Page, theme: Theme, config: EditorConfig) -> Self {
        Self::from_document(PageDocument::with_undo_levels(page, config.undo_levels), theme, config)
    }

    pub fn from_document(document: PageDocument, theme: Theme, config: EditorConfig) -> Self {
        Self {
            document,
            theme,
            config,
            device: DeviceView::Desktop,
            language: None,
            selected_id: None,
            drag: None,
            hovered_gap: None,
            palette_gap: None,
            pending_insert: None,
            on_insert_at: None,
            on_drop_block_at: None,
            inline_updates: RefCell::new(Vec::new()),
        }
    }

    pub fn on_insert_at(mut self, hook: impl FnMut(usize) + 'static) -> Self {
        self.on_insert_at = Some(Box::new(hook));
        self
    }

    pub fn on_drop_block_at(
        mut self,
        hook: impl FnMut(&str, usize) -> Option<Component> + 'static,
    ) -> Self {
        self.on_drop_block_at = Some(Box::new(hook));
        self
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut PageDocument {
        &mut self.document
    }

    pub fn into_document(self) -> PageDocument {
        self.document
    }

    pub fn page(&self) -> &Page {
        self.document.page()
    }

    /// Top-level components in canvas order
    pub fn components(&self) -> &[Component] {
        &self.document.page().components
    }

    pub fn is_empty(&self) -> bool {
        self.components().is_empty()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn device(&self) -> DeviceView {
        self.device
    }

    pub fn set_device(&mut self, device: DeviceView) {
        self.device = device;
    }

    /// Maximum canvas width for the current device
    pub fn canvas_width(&self) -> Option<u32> {
        self.config.canvas_width(self.device)
    }

    pub fn set_language(&mut self, language: Option<&str>) {
        self.language = language.map(str::to_string);
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Select a component, or clear the selection with `None` or `""`.
    ///
    /// Ids that are not on the page are ignored and return false.
    pub fn select(&mut self, component_id: Option<&str>) -> bool {
        match component_id.filter(|id| !id.is_empty()) {
            None => {
                self.selected_id = None;
                true
            }
            Some(id) if self.page().contains(id) => {
                self.selected_id = Some(id.to_string());
                true
            }
            Some(id) => {
                debug!(component_id = id, "Ignoring selection of unknown component");
                false
            }
        }
    }

    /// Select whatever was clicked in a tree produced by [`Canvas::render`].
    ///
    /// The innermost component wrapper on the path wins; clicking outside
    /// every component clears the selection.
    pub fn click(&mut self, root: &VNode, path: &[usize]) -> Option<String> {
        let target = wrapper_chain(root, path).pop();
        self.select(target.as_deref());
        target
    }

    /// Apply any mutation through the document
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.document.apply(mutation)
    }

    /// Move `active_id` to the position of `over_id` among the top-level
    /// components.
    ///
    /// Returns false without touching the page when the ids are equal or
    /// either one is not a top-level component.
    #[instrument(skip(self))]
    pub fn reorder(&mut self, active_id: &str, over_id: &str) -> Result<bool, EditorError> {
        if active_id == over_id {
            return Ok(false);
        }
        let components = self.components();
        let (Some(_), Some(new_index)) = (
            components.iter().position(|c| c.id == active_id),
            components.iter().position(|c| c.id == over_id),
        ) else {
            return Ok(false);
        };

        self.document.apply(Mutation::MoveComponent {
            component_id: active_id.to_string(),
            parent_id: None,
            index: new_index,
        })?;
        debug!(index = new_index, "Reordered component");
        Ok(true)
    }

    /// Press on a canvas item
    pub fn pointer_down(&mut self, component_id: &str, at: Point) {
        self.drag = Some(DragGesture::new(component_id, at));
    }

    /// Returns true when this move turned the press into a reorder drag
    pub fn pointer_move(&mut self, to: Point) -> bool {
        let distance = self.config.drag_activation_distance;
        match &mut self.drag {
            Some(gesture) => {
                let activated = gesture.move_to(to, distance);
                if activated {
                    debug!(component_id = %gesture.component_id, "Drag started");
                }
                activated
            }
            None => false,
        }
    }

    /// Release the pointer over `over_id`.
    ///
    /// A press that never travelled far enough is a click and selects the
    /// pressed component. An active drag reorders onto `over_id`.
    pub fn pointer_up(&mut self, over_id: Option<&str>) -> Result<bool, EditorError> {
        let Some(gesture) = self.drag.take() else {
            return Ok(false);
        };

        if !gesture.active {
            return Ok(self.select(Some(&gesture.component_id)));
        }
        match over_id {
            Some(over_id) => self.reorder(&gesture.component_id, over_id),
            None => Ok(false),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|g| g.active)
    }

    /// Component being dragged, once the drag is active
    pub fn dragged_id(&self) -> Option<&str> {
        self.drag
            .as_ref()
            .filter(|g| g.active)
            .map(|g| g.component_id.as_str())
    }

    /// Number of insertion gaps (an empty page has its single drop zone)
    pub fn gap_count(&self) -> usize {
        self.components().len() + 1
    }

    pub fn hover_gap(&mut self, index: Option<usize>) {
        self.hovered_gap = index;
    }

    /// A drag is over gap `index`. Only palette drags highlight a gap;
    /// returns whether this one does.
    pub fn palette_drag_over(&mut self, index: usize, payload: &DragPayload) -> bool {
        if payload.palette_block_type().is_none() || index >= self.gap_count() {
            return false;
        }
        self.palette_gap = Some(index);
        true
    }

    pub fn palette_drag_leave(&mut self) {
        self.palette_gap = None;
    }

    pub fn gap_state(&self, index: usize) -> GapState {
        if self.palette_gap == Some(index) {
            GapState::DropTarget
        } else if self.hovered_gap == Some(index)
            && self.palette_gap.is_none()
            && !self.is_dragging()
        {
            GapState::HoverInsert
        } else {
            GapState::Idle
        }
    }

    /// "Insert here" on gap `index`.
    ///
    /// Without an insert hook this does nothing and returns false.
    pub fn request_insert_at(&mut self, index: usize) -> bool {
        let index = index.min(self.components().len());
        let Some(hook) = self.on_insert_at.as_mut() else {
            return false;
        };
        self.pending_insert = Some(index);
        hook(index);
        true
    }

    pub fn pending_insert(&self) -> Option<usize> {
        self.pending_insert
    }

    pub fn cancel_insert(&mut self) {
        self.pending_insert = None;
    }

    /// Insert the block the host picked for the pending slot. Returns the
    /// new component id, or `None` when no slot is pending.
    pub fn complete_insert(&mut self, component: Component) -> Result<Option<String>, EditorError> {
        let Some(index) = self.pending_insert.take() else {
            return Ok(None);
        };
        self.insert_at(index, component).map(Some)
    }

    /// Insert `component` at top-level `index` and select it.
    ///
    /// Empty ids in the subtree are filled with fresh ones; the final id of
    /// the inserted component is returned.
    pub fn insert_at(&mut self, index: usize, mut component: Component) -> Result<String, EditorError> {
        let mut ids = IdGenerator::for_page(self.page());
        reserve_ids(&component, &mut ids);
        assign_missing_ids(&mut component, &mut ids);
        let id = component.id.clone();

        self.document.apply(Mutation::InsertComponent {
            parent_id: None,
            index,
            component,
        })?;
        self.selected_id = Some(id.clone());
        Ok(id)
    }

    /// Drop on gap `index` (or the empty state, as gap 0).
    ///
    /// Only palette payloads create blocks; any other drop, or a refusal by
    /// the host hook, leaves the page unchanged and returns `None`.
    #[instrument(skip(self, payload), fields(mime = %payload.mime))]
    pub fn drop_on_gap(
        &mut self,
        index: usize,
        payload: &DragPayload,
    ) -> Result<Option<String>, EditorError> {
        self.palette_gap = None;

        let Some(block_type) = payload.palette_block_type() else {
            return Ok(None);
        };
        let index = index.min(self.components().len());
        let Some(hook) = self.on_drop_block_at.as_mut() else {
            debug!("No drop hook installed");
            return Ok(None);
        };
        let Some(component) = hook(block_type, index) else {
            return Ok(None);
        };

        self.insert_at(index, component).map(Some)
    }

    /// Merge `partial` into a component's props
    pub fn update_props(&mut self, component_id: &str, partial: Props) -> Result<MutationResult, EditorError> {
        self.document.apply(Mutation::UpdateProps {
            component_id: component_id.to_string(),
            props: partial,
        })
    }

    pub fn set_hidden(
        &mut self,
        component_id: &str,
        device: DeviceView,
        hidden: bool,
    ) -> Result<MutationResult, EditorError> {
        self.document.apply(Mutation::SetHidden {
            component_id: component_id.to_string(),
            device,
            hidden,
        })
    }

    /// Edits queued by blocks during the last renders
    pub fn pending_inline_updates(&self) -> usize {
        self.inline_updates.borrow().len()
    }

    /// Apply prop edits that blocks queued while rendering, as one undo step.
    ///
    /// Edits for components that no longer exist are dropped.
    pub fn apply_inline_updates(&mut self) -> Result<usize, EditorError> {
        let queued = self.inline_updates.take();
        let page = self.document.page();

        let mut mutations = Vec::with_capacity(queued.len());
        for (component_id, partial) in queued {
            if !page.contains(&component_id) {
                warn!(component_id = %component_id, "Dropping inline edit for removed component");
                continue;
            }
            mutations.push(Mutation::UpdateProps {
                component_id,
                props: partial,
            });
        }
        if mutations.is_empty() {
            return Ok(0);
        }

        let applied = mutations.len();
        self.document.apply_batch("Inline edit", mutations)?;
        Ok(applied)
    }

    /// Remove the selected component. Returns false when nothing is selected.
    pub fn delete_selected(&mut self) -> Result<bool, EditorError> {
        let Some(id) = self.selected_id.clone() else {
            return Ok(false);
        };
        self.document.apply(Mutation::RemoveComponent { component_id: id })?;
        self.selected_id = None;
        Ok(true)
    }

    /// Copy a component (with fresh ids throughout) right after the
    /// original and select the copy
    pub fn duplicate(&mut self, component_id: &str) -> Result<String, EditorError> {
        let page = self.page();
        let location = page
            .locate(component_id)
            .ok_or_else(|| MutationError::ComponentNotFound(component_id.to_string()))?;
        let mut copy = page
            .find_component(component_id)
            .cloned()
            .ok_or_else(|| MutationError::ComponentNotFound(component_id.to_string()))?;

        let mut ids = IdGenerator::for_page(page);
        reassign_ids(&mut copy, &mut ids);
        let id = copy.id.clone();

        self.document.apply(Mutation::InsertComponent {
            parent_id: location.parent_id,
            index: location.index + 1,
            component: copy,
        })?;
        self.selected_id = Some(id.clone());
        Ok(id)
    }

    pub fn duplicate_selected(&mut self) -> Result<String, EditorError> {
        let id = self.selected_id.clone().ok_or(EditorError::NothingSelected)?;
        self.duplicate(&id)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.document.undo()?;
        self.drop_stale_selection();
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.document.redo()?;
        self.drop_stale_selection();
        Ok(redone)
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selected_id {
            if !self.document.page().contains(id) {
                self.selected_id = None;
            }
        }
    }

    /// Render the canvas: gaps, sortable items, the empty state and, while
    /// dragging, the overlay.
    #[instrument(skip(self, renderer), fields(page = %self.page().slug, device = %self.device.as_str()))]
    pub fn render(&self, renderer: &ComponentRenderer) -> VNode {
        let sink = |component_id: &str, partial: Props| {
            self.inline_updates
                .borrow_mut()
                .push((component_id.to_string(), partial));
        };
        let mut ctx = RenderContext::editing(&self.theme, self.device)
            .with_selection(self.selected_id.as_deref())
            .with_update_sink(&sink);
        if let Some(language) = &self.language {
            ctx = ctx.with_language(language);
        }

        let mut root = VNode::element("div")
            .with_attr("class", "builder-canvas")
            .with_attr("data-device", self.device.as_str());
        if let Some(width) = self.canvas_width() {
            root = root
                .with_style("max-width", format!("{}px", width))
                .with_style("margin", "0 auto");
        }

        let page = self.page();
        let pruned = renderer.boundaries().retain(|id| page.contains(id));
        if pruned > 0 {
            debug!(pruned, "Dropped error boundaries of removed components");
        }

        let components = self.components();
        if components.is_empty() {
            return root.with_child(view::empty_state(self.gap_state(0)));
        }

        let dragged = self.dragged_id();
        for (index, component) in components.iter().enumerate() {
            root = root.with_child(view::gap(index, self.gap_state(index)));
            if let Some(node) = renderer.render_component(component, &ctx) {
                root = root.with_child(view::item(
                    &component.id,
                    node,
                    dragged == Some(component.id.as_str()),
                ));
            }
        }
        root = root.with_child(view::gap(components.len(), self.gap_state(components.len())));

        if let Some(overlay) = self.drag_overlay(renderer) {
            root = root.with_child(overlay);
        }
        root
    }

    fn drag_overlay(&self, renderer: &ComponentRenderer) -> Option<VNode> {
        let gesture = self.drag.as_ref().filter(|g| g.active)?;
        let component = self
            .components()
            .iter()
            .find(|c| c.id == gesture.component_id)?;

        let label = if component.label.is_empty() {
            renderer
                .registry()
                .meta(&component.block_type)
                .map(|meta| meta.label.as_str())
                .unwrap_or(component.block_type.as_str())
        } else {
            component.label.as_str()
        };
        let ctx = RenderContext::public(&self.theme, self.device).without_animations();
        let snapshot = renderer.render_component(component, &ctx);

        Some(view::drag_overlay(label, snapshot, gesture.pointer, &self.config))
    }
}

/// Drop hook that builds components from the registry's default props.
///
/// Unknown block types are refused. Ids are left empty for the canvas to
/// assign.
pub fn palette_hook(
    registry: Arc<BlockRegistry>,
) -> impl FnMut(&str, usize) -> Option<Component> + 'static {
    move |block_type: &str, _index: usize| {
        let meta = registry.meta(block_type)?;
        Some(
            Component::new("", block_type)
                .with_label(meta.label.clone())
                .with_props(meta.default_props.clone()),
        )
    }
}

fn reserve_ids(component: &Component, ids: &mut IdGenerator) {
    if !component.id.is_empty() {
        ids.reserve(component.id.clone());
    }
    for child in &component.children {
        reserve_ids(child, ids);
    }
}

fn assign_missing_ids(component: &mut Component, ids: &mut IdGenerator) {
    if component.id.is_empty() {
        component.id = ids.new_id();
    }
    for child in &mut component.children {
        assign_missing_ids(child, ids);
    }
}

fn reassign_ids(component: &mut Component, ids: &mut IdGenerator) {
    component.id = ids.new_id();
    for child in &mut component.children {
        reassign_ids(child, ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PALETTE_MIME;

    fn canvas(ids: &[&str]) -> Canvas {
        let components = ids.iter().map(|id| Component::new(*id, "text")).collect();
        Canvas::new(Page::new("p", "Home", "home").with_components(components), Theme::default())
    }

    fn order(canvas: &Canvas) -> Vec<&str> {
        canvas.components().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_reorder_is_array_move() {
        let mut canvas = canvas(&["a", "b", "c", "d"]);

        assert!(canvas.reorder("a", "c").unwrap());
        assert_eq!(order(&canvas), vec!["b", "c", "a", "d"]);

        assert!(canvas.reorder("d", "b").unwrap());
        assert_eq!(order(&canvas), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_reorder_noops() {
        let mut canvas = canvas(&["a", "b"]);

        assert!(!canvas.reorder("a", "a").unwrap());
        assert!(!canvas.reorder("a", "missing").unwrap());
        assert!(!canvas.reorder("missing", "a").unwrap());
        assert_eq!(order(&canvas), vec!["a", "b"]);
        assert_eq!(canvas.document().version, 0);
    }

    #[test]
    fn test_short_press_selects() {
        let mut canvas = canvas(&["a", "b"]);

        canvas.pointer_down("b", Point::new(0.0, 0.0));
        assert!(!canvas.pointer_move(Point::new(3.0, 3.0)));
        assert!(canvas.pointer_up(Some("a")).unwrap());

        assert_eq!(canvas.selected_id(), Some("b"));
        assert_eq!(order(&canvas), vec!["a", "b"]);
    }

    #[test]
    fn test_drag_past_threshold_reorders() {
        let mut canvas = canvas(&["a", "b", "c"]);

        canvas.pointer_down("a", Point::new(0.0, 0.0));
        assert!(canvas.pointer_move(Point::new(0.0, 20.0)));
        assert!(canvas.is_dragging());
        assert_eq!(canvas.dragged_id(), Some("a"));

        assert!(canvas.pointer_up(Some("c")).unwrap());
        assert_eq!(order(&canvas), vec!["b", "c", "a"]);
        assert!(!canvas.is_dragging());
        assert_eq!(canvas.selected_id(), None);
    }

    #[test]
    fn test_select_ignores_unknown_ids() {
        let mut canvas = canvas(&["a"]);

        assert!(canvas.select(Some("a")));
        assert!(!canvas.select(Some("ghost")));
        assert_eq!(canvas.selected_id(), Some("a"));

        assert!(canvas.select(Some("")));
        assert_eq!(canvas.selected_id(), None);
    }

    #[test]
    fn test_gap_states() {
        let mut canvas = canvas(&["a", "b"]);
        assert_eq!(canvas.gap_count(), 3);

        canvas.hover_gap(Some(1));
        assert_eq!(canvas.gap_state(1), GapState::HoverInsert);
        assert_eq!(canvas.gap_state(0), GapState::Idle);

        assert!(!canvas.palette_drag_over(2, &DragPayload::new("text/plain", "x")));
        assert!(canvas.palette_drag_over(2, &DragPayload::new(PALETTE_MIME, "hero")));
        assert_eq!(canvas.gap_state(2), GapState::DropTarget);

        canvas.palette_drag_leave();
        assert_eq!(canvas.gap_state(2), GapState::Idle);
    }

    #[test]
    fn test_hover_suppressed_while_dragging() {
        let mut canvas = canvas(&["a", "b"]);
        canvas.hover_gap(Some(0));

        canvas.pointer_down("a", Point::default());
        canvas.pointer_move(Point::new(50.0, 0.0));

        assert_eq!(canvas.gap_state(0), GapState::Idle);
    }

    #[test]
    fn test_hover_suppressed_during_palette_drag() {
        let mut canvas = canvas(&["a", "b"]);

        assert!(canvas.palette_drag_over(2, &DragPayload::new(PALETTE_MIME, "hero")));
        canvas.hover_gap(Some(0));
        assert_eq!(canvas.gap_state(0), GapState::Idle);
        assert_eq!(canvas.gap_state(2), GapState::DropTarget);

        canvas.palette_drag_leave();
        assert_eq!(canvas.gap_state(0), GapState::HoverInsert);
    }

    #[test]
    fn test_insert_assigns_id_and_selects() {
        let mut canvas = canvas(&["a"]);

        let id = canvas.insert_at(0, Component::new("", "spacer")).unwrap();

        assert!(!id.is_empty());
        assert_eq!(canvas.components()[0].id, id);
        assert_eq!(canvas.selected_id(), Some(id.as_str()));
    }

    #[test]
    fn test_insert_keeps_ids_already_in_the_subtree() {
        let mut canvas = canvas(&["a"]);
        let next = IdGenerator::for_page(canvas.page()).new_id();

        let parent = Component::new("", "columns").with_child(Component::new(next.clone(), "text"));
        let id = canvas.insert_at(1, parent).unwrap();

        assert_ne!(id, next);
        assert_eq!(canvas.components()[1].children[0].id, next);
        assert_eq!(canvas.page().ids().len(), 3);
    }

    #[test]
    fn test_duplicate_gets_fresh_ids() {
        let mut page = Page::new("p", "Home", "home");
        page.components.push(
            Component::new("cols", "columns").with_child(Component::new("inner", "text")),
        );
        let mut canvas = Canvas::new(page, Theme::default());

        let copy = canvas.duplicate("cols").unwrap();

        assert_eq!(canvas.components().len(), 2);
        assert_eq!(canvas.components()[1].id, copy);
        assert_ne!(canvas.components()[1].children[0].id, "inner");
        assert_eq!(canvas.selected_id(), Some(copy.as_str()));
    }

    #[test]
    fn test_undo_clears_stale_selection() {
        let mut canvas = canvas(&["a"]);
        let id = canvas.insert_at(1, Component::new("", "text")).unwrap();
        assert_eq!(canvas.selected_id(), Some(id.as_str()));

        assert!(canvas.undo().unwrap());
        assert_eq!(canvas.selected_id(), None);
        assert_eq!(order(&canvas), vec!["a"]);
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = canvas(&["a", "b"]);
        assert!(!canvas.delete_selected().unwrap());

        canvas.select(Some("a"));
        assert!(canvas.delete_selected().unwrap());
        assert_eq!(order(&canvas), vec!["b"]);
        assert_eq!(canvas.selected_id(), None);
    }
}
