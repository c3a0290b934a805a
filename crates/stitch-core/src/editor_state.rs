//! Editor UI state: active tool, selection, hover, viewport and image
//! loading status.
//!
//! Nothing here is part of the document or the undo history.

use crate::elements::ElementId;
use crate::tools::{ToolKind, ToolStyle};
use crate::viewport::Viewport;
use kurbo::Size;
use std::collections::HashMap;

/// Loading state of an image resource, keyed by src.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageStatus {
    Pending,
    Loaded(Size),
    /// Shown as a placeholder until the user retries.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct EditorStore {
    active_tool: ToolKind,
    /// Tool to restore when a temporary tool (Space for pan) is released.
    suspended_tool: Option<ToolKind>,
    selection: Vec<ElementId>,
    hovered: Option<ElementId>,
    pub viewport: Viewport,
    pub is_panning: bool,
    pub is_drawing: bool,
    pub is_transforming: bool,
    editing_text: Option<ElementId>,
    /// Paint for newly drawn elements.
    pub style: ToolStyle,
    images: HashMap<String, ImageStatus>,
}

impl EditorStore {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    // --- Tools ---

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    /// Switch tools. Any tool other than select clears the selection.
    pub fn set_active_tool(&mut self, tool: ToolKind) {
        self.suspended_tool = None;
        if tool != ToolKind::Select {
            self.clear_selection();
        }
        if tool != self.active_tool {
            log::debug!("Tool: {} -> {}", self.active_tool.name(), tool.name());
        }
        self.active_tool = tool;
    }

    /// Switch tools until [`EditorStore::end_temporary_tool`], keeping the
    /// selection.
    pub fn begin_temporary_tool(&mut self, tool: ToolKind) -> bool {
        if self.suspended_tool.is_some() || self.active_tool == tool {
            return false;
        }
        self.suspended_tool = Some(self.active_tool);
        self.active_tool = tool;
        true
    }

    pub fn end_temporary_tool(&mut self) -> bool {
        match self.suspended_tool.take() {
            Some(tool) => {
                self.active_tool = tool;
                true
            }
            None => false,
        }
    }

    // --- Selection ---

    /// Selected ids in selection order.
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Replace the selection with a single element.
    pub fn select(&mut self, id: ElementId) {
        self.selection = vec![id];
    }

    /// Replace the selection.
    pub fn set_selection(&mut self, ids: Vec<ElementId>) {
        self.selection.clear();
        for id in ids {
            self.add_to_selection(id);
        }
    }

    pub fn add_to_selection(&mut self, id: ElementId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Add or remove `id`. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: ElementId) -> bool {
        if let Some(index) = self.selection.iter().position(|s| s == &id) {
            self.selection.remove(index);
            false
        } else {
            self.selection.push(id);
            true
        }
    }

    pub fn deselect(&mut self, id: &ElementId) {
        self.selection.retain(|s| s != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drop selected and hovered ids for which `keep` is false.
    pub fn retain_existing(&mut self, keep: impl Fn(&ElementId) -> bool) {
        self.selection.retain(|id| keep(id));
        if self.hovered.as_ref().is_some_and(|id| !keep(id)) {
            self.hovered = None;
        }
    }

    // --- Hover and text editing ---

    pub fn hovered(&self) -> Option<&ElementId> {
        self.hovered.as_ref()
    }

    pub fn set_hovered(&mut self, id: Option<ElementId>) {
        self.hovered = id;
    }

    /// Text element whose raw content is being edited.
    pub fn editing_text(&self) -> Option<&ElementId> {
        self.editing_text.as_ref()
    }

    pub fn set_editing_text(&mut self, id: Option<ElementId>) {
        self.editing_text = id;
    }

    // --- Images ---

    pub fn image_status(&self, src: &str) -> Option<ImageStatus> {
        self.images.get(src).copied()
    }

    /// Start tracking a load. Returns false when `src` is already pending,
    /// loaded, or failed; failed loads are never retried implicitly.
    pub fn mark_image_pending(&mut self, src: &str) -> bool {
        if self.images.contains_key(src) {
            return false;
        }
        self.images.insert(src.to_string(), ImageStatus::Pending);
        true
    }

    pub fn mark_image_loaded(&mut self, src: &str, size: Size) {
        self.images.insert(src.to_string(), ImageStatus::Loaded(size));
    }

    pub fn mark_image_failed(&mut self, src: &str) {
        self.images.insert(src.to_string(), ImageStatus::Failed);
    }

    /// Put a failed load back to pending. Returns false unless it had failed.
    pub fn retry_image(&mut self, src: &str) -> bool {
        match self.images.get_mut(src) {
            Some(status) if *status == ImageStatus::Failed => {
                *status = ImageStatus::Pending;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    #[test]
    fn test_non_select_tool_clears_selection() {
        let mut state = EditorStore::default();
        state.select(id("a"));
        state.set_active_tool(ToolKind::Select);
        assert!(state.is_selected(&id("a")));
        state.set_active_tool(ToolKind::Rectangle);
        assert!(!state.has_selection());
    }

    #[test]
    fn test_temporary_tool_restores_previous() {
        let mut state = EditorStore::default();
        state.select(id("a"));
        assert!(state.begin_temporary_tool(ToolKind::Pan));
        assert!(!state.begin_temporary_tool(ToolKind::Pan));
        assert_eq!(state.active_tool(), ToolKind::Pan);
        assert!(state.has_selection());
        assert!(state.end_temporary_tool());
        assert_eq!(state.active_tool(), ToolKind::Select);
        assert!(!state.end_temporary_tool());
    }

    #[test]
    fn test_toggle_selection() {
        let mut state = EditorStore::default();
        assert!(state.toggle_selection(id("a")));
        assert!(state.toggle_selection(id("b")));
        assert!(!state.toggle_selection(id("a")));
        assert_eq!(state.selection(), &[id("b")]);
    }

    #[test]
    fn test_retain_existing_prunes_hover() {
        let mut state = EditorStore::default();
        state.set_selection(vec![id("a"), id("b")]);
        state.set_hovered(Some(id("a")));
        state.retain_existing(|i| i == &id("b"));
        assert_eq!(state.selection(), &[id("b")]);
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_failed_image_waits_for_retry() {
        let mut state = EditorStore::default();
        assert!(state.mark_image_pending("a.png"));
        state.mark_image_failed("a.png");
        assert!(!state.mark_image_pending("a.png"));
        assert_eq!(state.image_status("a.png"), Some(ImageStatus::Failed));

        assert!(state.retry_image("a.png"));
        assert_eq!(state.image_status("a.png"), Some(ImageStatus::Pending));
        assert!(!state.retry_image("a.png"));

        state.mark_image_loaded("a.png", Size::new(4.0, 3.0));
        assert_eq!(
            state.image_status("a.png"),
            Some(ImageStatus::Loaded(Size::new(4.0, 3.0)))
        );
    }
}
