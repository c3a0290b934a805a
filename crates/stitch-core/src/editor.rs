//! The editor: document store, UI state, history and the gesture state
//! machine behind one handle.
//!
//! Hosts forward pointer, wheel and key events with screen coordinates and
//! a hit-test target. Everything runs synchronously on the caller's thread.

use crate::config::EditorConfig;
use crate::document::{Document, DocumentResult, SlideId};
use crate::editor_state::EditorStore;
use crate::elements::{Element, ElementId, ElementUpdate, TransformCommit};
use crate::history::History;
use crate::input::{HitTarget, KeyEvent, MouseButton, PointerEvent, PointerState, WheelEvent};
use crate::shortcuts::{Command, ShortcutRegistry};
use crate::snap::{drag_rect, snap_line_endpoint};
use crate::store::{DocumentStore, ReorderDirection};
use crate::text_layout::{EstimatedMeasure, TextMeasure, fitted_height};
use crate::tools::{Interaction, Marquee, ToolKind, meets_draw_threshold};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Longest side of an inserted image, in document px.
pub const MAX_INSERTED_IMAGE_SIZE: f64 = 800.0;

pub struct Editor {
    config: EditorConfig,
    store: DocumentStore,
    state: EditorStore,
    history: History,
    interaction: Interaction,
    pointer: PointerState,
    /// Swallow the click event that follows a gesture release.
    suppress_click: bool,
    measure: Box<dyn TextMeasure>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::new("Untitled Board"), EditorConfig::default())
    }
}

impl Editor {
    pub fn new(document: Document, config: EditorConfig) -> Self {
        let mut store = DocumentStore::new(document);
        store.set_duplicate_offset(config.duplicate_offset);
        let mut editor = Self {
            state: EditorStore::new(Viewport::with_limits(config.min_zoom, config.max_zoom)),
            history: History::new(config.history_limit, config.history_debounce()),
            store,
            config,
            interaction: Interaction::Idle,
            pointer: PointerState::new(),
            suppress_click: false,
            measure: Box::new(EstimatedMeasure),
        };
        editor.push_history();
        editor
    }

    /// Use renderer font metrics for text fitting.
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    // --- Accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Direct store access for UI chrome. Discrete edits made this way
    /// should be followed by [`Editor::push_history`].
    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn state(&self) -> &EditorStore {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorStore {
        &mut self.state
    }

    pub fn document(&self) -> &Document {
        self.store.document()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.state.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn active_tool(&self) -> ToolKind {
        self.state.active_tool()
    }

    /// Selected elements on the current slide, in selection order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        let Some(slide) = self.store.current_slide() else {
            return Vec::new();
        };
        self.state
            .selection()
            .iter()
            .filter_map(|id| slide.element(id))
            .collect()
    }

    /// Provisional element of a drawing gesture, for the renderer.
    pub fn preview_element(&self) -> Option<Element> {
        self.interaction.preview(&self.state.style)
    }

    /// Marquee rectangle in document space while one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.interaction {
            Interaction::MarqueeSelecting(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }

    pub fn text_draft(&self) -> Option<&str> {
        match &self.interaction {
            Interaction::EditingText { draft, .. } => Some(draft),
            _ => None,
        }
    }

    // --- Document ---

    /// Replace the document and start a fresh history.
    pub fn load_document(&mut self, document: Document) {
        self.cancel_gesture();
        self.store.initialize_document(document);
        self.history.clear();
        self.state.clear_selection();
        self.state.set_hovered(None);
        self.push_history();
    }

    // --- History ---

    /// Snapshot the document now.
    pub fn push_history(&mut self) {
        if let Err(err) = self.history.push_state(self.store.document()) {
            log::error!("Failed to record history: {err}");
        }
    }

    /// Snapshot the document once edits have been quiet for the debounce
    /// interval.
    fn push_history_later(&mut self) {
        self.history.schedule_push(Instant::now());
    }

    /// Drive debounced snapshots. Returns whether one was taken.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history
            .flush_due(self.store.document(), now)
            .unwrap_or_else(|err| {
                log::error!("Failed to record history: {err}");
                false
            })
    }

    /// Take a pending debounced snapshot immediately.
    pub fn flush_history(&mut self) -> bool {
        self.history
            .flush(self.store.document())
            .unwrap_or_else(|err| {
                log::error!("Failed to record history: {err}");
                false
            })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> DocumentResult<bool> {
        self.cancel_gesture();
        let changed = self.history.undo(&mut self.store)?;
        if changed {
            self.prune_selection();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> DocumentResult<bool> {
        self.cancel_gesture();
        let changed = self.history.redo(&mut self.store)?;
        if changed {
            self.prune_selection();
        }
        Ok(changed)
    }

    fn prune_selection(&mut self) {
        let slide = self.store.current_slide();
        self.state
            .retain_existing(|id| slide.is_some_and(|s| s.contains(id)));
    }

    // --- Tools ---

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_active_tool(&mut self, tool: ToolKind) {
        self.cancel_gesture();
        self.state.set_active_tool(tool);
    }

    /// Abandon the current gesture and undo its live effects.
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => {}
            Interaction::Panning { .. } => self.state.is_panning = false,
            Interaction::DrawingShape { .. } | Interaction::DrawingLine { .. } => {
                self.state.is_drawing = false;
            }
            Interaction::MarqueeSelecting(marquee) => {
                self.state.set_selection(marquee.base_selection);
            }
            Interaction::DraggingElements { ids, total, .. } => {
                if total != Vec2::ZERO {
                    self.store.move_elements(&ids, -total);
                }
            }
            Interaction::TransformingElement { .. } => self.state.is_transforming = false,
            Interaction::EditingText { .. } => self.state.set_editing_text(None),
        }
    }

    fn begin_pan(&mut self, button: MouseButton) {
        self.interaction = Interaction::Panning { button };
        self.state.is_panning = true;
    }

    // --- Pointer ---

    pub fn handle_pointer_down(&mut self, event: &PointerEvent) {
        self.pointer.press(event.position, event.button);
        self.suppress_click = false;
        if matches!(self.interaction, Interaction::EditingText { .. }) {
            self.commit_text_edit();
        }
        if !self.interaction.is_idle() {
            return;
        }

        match event.button {
            MouseButton::Middle => {
                self.begin_pan(MouseButton::Middle);
                return;
            }
            MouseButton::Right => return,
            MouseButton::Left => {}
        }

        let point = self.state.viewport.screen_to_document(event.position);
        let tool = self.state.active_tool();
        match tool {
            ToolKind::Pan => self.begin_pan(MouseButton::Left),
            ToolKind::Rectangle | ToolKind::Ellipse => {
                self.interaction = Interaction::DrawingShape {
                    vector_type: tool.vector_type().unwrap_or_default(),
                    anchor: point,
                    current: point,
                    square: event.modifiers.shift,
                };
                self.state.is_drawing = true;
            }
            ToolKind::Line => {
                self.interaction = Interaction::DrawingLine {
                    start: point,
                    end: point,
                    constrained: event.modifiers.shift,
                };
                self.state.is_drawing = true;
            }
            ToolKind::Text => self.create_text_at(point),
            ToolKind::Image => log::debug!("Image tool waits for an inserted image"),
            ToolKind::Select => self.press_select(event, point),
        }
    }

    fn press_select(&mut self, event: &PointerEvent, point: Point) {
        let pressed = event
            .target
            .element()
            .filter(|id| self.store.element(id).is_some())
            .cloned();
        let Some(id) = pressed else {
            self.interaction = Interaction::MarqueeSelecting(Marquee::new(
                point,
                event.position,
                event.modifiers.shift,
                self.state.selection().to_vec(),
            ));
            return;
        };

        let mut collapse_on_click = false;
        if event.modifiers.shift {
            if !self.state.toggle_selection(id.clone()) {
                return;
            }
        } else if self.state.is_selected(&id) {
            collapse_on_click = self.state.selection().len() > 1;
        } else {
            self.state.select(id.clone());
        }

        if self.store.element(&id).is_some_and(|e| e.locked) {
            return;
        }
        self.interaction = Interaction::DraggingElements {
            ids: self.state.selection().to_vec(),
            pressed: id,
            collapse_on_click,
            last: point,
            total: Vec2::ZERO,
        };
    }

    pub fn handle_pointer_move(&mut self, event: &PointerEvent) {
        let delta = self.pointer.move_to(event.position);
        let point = self.state.viewport.screen_to_document(event.position);

        match &mut self.interaction {
            Interaction::Idle => self.state.set_hovered(event.target.element().cloned()),
            Interaction::Panning { .. } => self.state.viewport.pan_by(delta.x, delta.y),
            Interaction::DrawingShape {
                current, square, ..
            } => {
                *current = point;
                *square = event.modifiers.shift;
            }
            Interaction::DrawingLine {
                end, constrained, ..
            } => {
                *end = point;
                *constrained = event.modifiers.shift;
            }
            Interaction::MarqueeSelecting(marquee) => {
                marquee.update(point, event.position);
                let hits = self
                    .store
                    .current_slide()
                    .map(|slide| slide.elements_in_rect(marquee.rect()))
                    .unwrap_or_default();
                self.state.set_selection(marquee.selection(hits));
            }
            Interaction::DraggingElements {
                ids, last, total, ..
            } => {
                let step = point - *last;
                *last = point;
                if step != Vec2::ZERO && self.store.move_elements(ids, step) > 0 {
                    *total += step;
                }
            }
            Interaction::TransformingElement { .. } | Interaction::EditingText { .. } => {}
        }
    }

    pub fn handle_pointer_up(&mut self, event: &PointerEvent) {
        self.pointer.release(event.position, event.button);
        let point = self.state.viewport.screen_to_document(event.position);
        let left = event.button == MouseButton::Left;

        match std::mem::take(&mut self.interaction) {
            Interaction::Panning { button } if button == event.button => {
                self.state.is_panning = false;
            }
            Interaction::DrawingShape {
                vector_type,
                anchor,
                square,
                ..
            } if left => {
                self.state.is_drawing = false;
                let rect = drag_rect(anchor, point, square || event.modifiers.shift);
                let element = self.state.style.shape(vector_type, rect);
                self.commit_drawn(element);
            }
            Interaction::DrawingLine {
                start, constrained, ..
            } if left => {
                self.state.is_drawing = false;
                let end = if constrained || event.modifiers.shift {
                    snap_line_endpoint(start, point).point
                } else {
                    point
                };
                let element = self.state.style.line(start, end);
                self.commit_drawn(element);
            }
            Interaction::MarqueeSelecting(mut marquee) if left => {
                marquee.update(point, event.position);
                if marquee.is_click() {
                    if marquee.additive {
                        self.state.set_selection(marquee.base_selection);
                    } else {
                        self.state.clear_selection();
                    }
                } else {
                    let hits = self
                        .store
                        .current_slide()
                        .map(|slide| slide.elements_in_rect(marquee.rect()))
                        .unwrap_or_default();
                    self.state.set_selection(marquee.selection(hits));
                }
                self.suppress_click = true;
            }
            Interaction::DraggingElements {
                ids,
                pressed,
                collapse_on_click,
                total,
                ..
            } if left => {
                if total != Vec2::ZERO {
                    log::debug!("Moved {} elements by {total:?}", ids.len());
                    self.push_history();
                } else if collapse_on_click {
                    self.state.select(pressed);
                }
                self.suppress_click = true;
            }
            other => self.interaction = other,
        }
    }

    /// Window-level release. Ends the gesture `button` started even when
    /// the pointer left the canvas.
    pub fn handle_pointer_released_outside(&mut self, button: MouseButton) {
        if !self.pointer.is_pressed(button) {
            return;
        }
        let event = PointerEvent::new(self.pointer.position).with_button(button);
        self.handle_pointer_up(&event);
    }

    /// The window lost focus: end every pointer gesture and any temporary
    /// tool, since their releases will not be reported.
    pub fn handle_focus_lost(&mut self) {
        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            self.handle_pointer_released_outside(button);
        }
        self.pointer.release_all();
        self.state.end_temporary_tool();
    }

    /// Click reported after a press and release. Returns whether it
    /// changed the selection.
    pub fn handle_click(&mut self, event: &PointerEvent) -> bool {
        if std::mem::take(&mut self.suppress_click) {
            return false;
        }
        if event.button != MouseButton::Left
            || event.modifiers.shift
            || self.state.active_tool() != ToolKind::Select
        {
            return false;
        }
        match &event.target {
            HitTarget::Element(id) => {
                if self.store.element(id).is_none() {
                    return false;
                }
                self.state.select(id.clone());
            }
            HitTarget::Background | HitTarget::Empty => self.state.clear_selection(),
        }
        true
    }

    /// Double-click on a text element opens it for editing.
    pub fn handle_double_click(&mut self, event: &PointerEvent) -> bool {
        if self.state.active_tool() != ToolKind::Select {
            return false;
        }
        match event.target.element() {
            Some(id) => {
                let id = id.clone();
                self.begin_text_edit(&id)
            }
            None => false,
        }
    }

    pub fn handle_wheel(&mut self, event: &WheelEvent) {
        if event.modifiers.command() {
            self.state.viewport.wheel_zoom(
                event.position,
                event.delta.y,
                self.config.wheel_zoom_factor,
            );
        } else {
            self.state
                .viewport
                .wheel_pan(event.delta, event.modifiers.shift);
        }
    }

    fn commit_drawn(&mut self, mut element: Element) {
        if !meets_draw_threshold(&element) {
            log::debug!("Discarded {:?} below the minimum size", element.element_type());
            return;
        }
        element.regenerate_id();
        self.add_and_select(element);
    }

    fn create_text_at(&mut self, point: Point) {
        let element = self.state.style.text(point);
        self.add_and_select(element);
    }

    fn add_and_select(&mut self, element: Element) -> Option<ElementId> {
        let id = self.store.add_element(element, None)?;
        self.push_history();
        self.state.set_active_tool(ToolKind::Select);
        self.state.select(id.clone());
        self.suppress_click = true;
        Some(id)
    }

    // --- Keyboard ---

    /// Returns whether the key was consumed.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> bool {
        if matches!(self.interaction, Interaction::EditingText { .. }) {
            return match event.key.as_str() {
                "Enter" if !event.modifiers.shift => {
                    self.commit_text_edit();
                    true
                }
                "Escape" => {
                    self.cancel_text_edit();
                    true
                }
                _ => false,
            };
        }

        if event.key == " " {
            if self.interaction.is_idle() {
                self.state.begin_temporary_tool(ToolKind::Pan);
            }
            return true;
        }

        match ShortcutRegistry::lookup(event) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    pub fn handle_key_up(&mut self, event: &KeyEvent) -> bool {
        if event.key != " " || !self.state.end_temporary_tool() {
            return false;
        }
        if let Interaction::Panning {
            button: MouseButton::Left,
        } = self.interaction
        {
            self.cancel_gesture();
        }
        true
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::SetTool(tool) => self.set_active_tool(tool),
            Command::DeleteSelection => {
                self.delete_selected();
            }
            Command::Cancel => {
                if self.interaction.is_idle() {
                    self.state.clear_selection();
                } else {
                    self.cancel_gesture();
                }
            }
            Command::Undo => {
                if let Err(err) = self.undo() {
                    log::error!("Undo failed: {err}");
                }
            }
            Command::Redo => {
                if let Err(err) = self.redo() {
                    log::error!("Redo failed: {err}");
                }
            }
            Command::Duplicate => {
                self.duplicate_selected();
            }
            Command::SelectAll => self.select_all(),
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::ResetZoom => self.reset_zoom(),
            Command::Nudge { dx, dy, large } => {
                let step = if large {
                    self.config.nudge_large
                } else {
                    self.config.nudge_small
                };
                self.nudge_selected(Vec2::new(f64::from(dx) * step, f64::from(dy) * step));
            }
        }
    }

    // --- Text editing ---

    pub fn begin_text_edit(&mut self, id: &ElementId) -> bool {
        let Some(text) = self
            .store
            .element(id)
            .filter(|e| !e.locked)
            .and_then(Element::as_text)
        else {
            return false;
        };
        let draft = text.content.clone();
        self.cancel_gesture();
        self.state.select(id.clone());
        self.state.set_editing_text(Some(id.clone()));
        self.interaction = Interaction::EditingText {
            id: id.clone(),
            draft,
        };
        true
    }

    pub fn set_text_draft(&mut self, text: impl Into<String>) {
        if let Interaction::EditingText { draft, .. } = &mut self.interaction {
            *draft = text.into();
        }
    }

    /// Write the draft back with a refitted height. Returns whether the
    /// element changed.
    pub fn commit_text_edit(&mut self) -> bool {
        let (id, draft) = match std::mem::take(&mut self.interaction) {
            Interaction::EditingText { id, draft } => (id, draft),
            other => {
                self.interaction = other;
                return false;
            }
        };
        self.state.set_editing_text(None);

        let Some(element) = self.store.element(&id) else {
            return false;
        };
        let mut edited = element.clone();
        let mut update = ElementUpdate::default().content(draft);
        update.apply_to(&mut edited);
        if let Some(height) = fitted_height(&edited, self.measure.as_ref()) {
            update = update.height(height);
        }
        if update.height.is_none() && edited == *element {
            return false;
        }

        let changed = self.store.update_element(&id, &update);
        if changed {
            self.push_history();
        }
        changed
    }

    /// Leave the text session without writing the draft.
    pub fn cancel_text_edit(&mut self) {
        if matches!(self.interaction, Interaction::EditingText { .. }) {
            self.cancel_gesture();
        }
    }

    /// The text field lost focus.
    pub fn handle_text_blur(&mut self) -> bool {
        self.commit_text_edit()
    }

    // --- Transform ---

    pub fn begin_transform(&mut self, id: &ElementId) -> bool {
        if !self.interaction.is_idle() || !self.store.element(id).is_some_and(|e| !e.locked) {
            return false;
        }
        self.interaction = Interaction::TransformingElement { id: id.clone() };
        self.state.is_transforming = true;
        true
    }

    /// Bake a handle transform into the element and record it.
    pub fn commit_transform(&mut self, id: &ElementId, commit: &TransformCommit) -> bool {
        let transforming = matches!(
            &self.interaction,
            Interaction::TransformingElement { id: active } if active == id
        );
        if transforming {
            self.interaction = Interaction::Idle;
            self.state.is_transforming = false;
        }
        let Some(element) = self.store.element(id).filter(|e| !e.locked) else {
            return false;
        };

        let mut transformed = element.clone();
        transformed.apply_transform(commit);
        if let Some(height) = fitted_height(&transformed, self.measure.as_ref()) {
            transformed.height = height.max(transformed.min_size());
        }
        let update = ElementUpdate::from_element_geometry(&transformed);
        let changed = self.store.update_element(id, &update);
        if changed {
            self.push_history();
        }
        changed
    }

    pub fn cancel_transform(&mut self) {
        if matches!(self.interaction, Interaction::TransformingElement { .. }) {
            self.cancel_gesture();
        }
    }

    // --- Element edits ---

    /// Property edit from UI chrome, recorded after the debounce interval.
    /// Text boxes are refit to their content unless the edit sets a height
    /// or the box is open for editing.
    pub fn update_element(&mut self, id: &ElementId, update: &ElementUpdate) -> bool {
        let Some(element) = self.store.element(id) else {
            return false;
        };
        let mut update = update.clone();
        let editing = self.state.editing_text() == Some(id);
        if !editing && update.height.is_none() && update.affects_text_layout() {
            let mut preview = element.clone();
            update.apply_to(&mut preview);
            update.height = fitted_height(&preview, self.measure.as_ref());
        }

        let changed = self.store.update_element(id, &update);
        if changed {
            self.push_history_later();
        }
        changed
    }

    /// Move the selection, recorded after the debounce interval.
    pub fn nudge_selected(&mut self, delta: Vec2) -> usize {
        let ids = self.state.selection().to_vec();
        let moved = self.store.move_elements(&ids, delta);
        if moved > 0 {
            self.push_history_later();
        }
        moved
    }

    pub fn delete_selected(&mut self) -> usize {
        self.cancel_gesture();
        let ids = self.state.selection().to_vec();
        let removed = self.store.delete_elements(&ids);
        if removed > 0 {
            self.push_history();
        }
        self.state.clear_selection();
        removed
    }

    /// Duplicate the selection and select the copies.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        self.cancel_gesture();
        let ids = self.state.selection().to_vec();
        let copies = self.store.duplicate_elements(&ids);
        if !copies.is_empty() {
            self.push_history();
            self.state.set_selection(copies.clone());
        }
        copies
    }

    /// Select every unlocked element on the current slide.
    pub fn select_all(&mut self) {
        let ids = self
            .store
            .sorted_elements()
            .into_iter()
            .filter(|e| !e.locked)
            .map(|e| e.id.clone())
            .collect();
        self.state.set_selection(ids);
    }

    pub fn reorder_selected(&mut self, direction: ReorderDirection) -> bool {
        let ids = self.state.selection().to_vec();
        let mut changed = false;
        for id in &ids {
            changed |= self.store.reorder_element(id, direction);
        }
        if changed {
            self.push_history();
        }
        changed
    }

    // --- Slides ---

    /// Insert a slide after the current one and switch to it.
    pub fn add_slide(&mut self) -> SlideId {
        self.cancel_gesture();
        let current = self.store.current_slide_id().clone();
        let id = self.store.add_slide(Some(&current));
        self.state.clear_selection();
        self.push_history();
        id
    }

    pub fn delete_slide(&mut self, id: &SlideId) -> bool {
        self.cancel_gesture();
        let deleted = self.store.delete_slide(id);
        if deleted {
            self.prune_selection();
            self.push_history();
        }
        deleted
    }

    pub fn duplicate_slide(&mut self, id: &SlideId) -> Option<SlideId> {
        self.cancel_gesture();
        let copy = self.store.duplicate_slide(id)?;
        self.state.clear_selection();
        self.push_history();
        Some(copy)
    }

    pub fn set_current_slide(&mut self, id: &SlideId) -> bool {
        if self.store.current_slide_id() == id {
            return false;
        }
        self.cancel_gesture();
        let switched = self.store.set_current_slide(id);
        if switched {
            self.state.clear_selection();
            self.state.set_hovered(None);
        }
        switched
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) {
        self.state.viewport.zoom_in(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.state.viewport.zoom_out(self.config.zoom_step);
    }

    pub fn reset_zoom(&mut self) {
        self.state.viewport.reset_zoom();
    }

    /// Fit the page into a container of the given screen size.
    pub fn zoom_to_fit(&mut self, container: Size) {
        let page = self.store.document().settings.page_size();
        self.state.viewport.zoom_to_fit(container, page);
    }

    // --- Images ---

    /// Start tracking an image the renderer is about to load. Returns
    /// whether the host should start the load.
    pub fn request_image(&mut self, src: &str) -> bool {
        self.state.mark_image_pending(src)
    }

    pub fn on_image_loaded(&mut self, src: &str, size: Size) {
        self.state.mark_image_loaded(src, size);
        if self.store.apply_image_size(src, size) > 0 {
            self.push_history_later();
        }
    }

    /// The element keeps its data and renders a placeholder.
    pub fn on_image_failed(&mut self, src: &str) {
        log::warn!("Failed to load image {src}");
        self.state.mark_image_failed(src);
    }

    pub fn retry_image(&mut self, src: &str) -> bool {
        let retry = self.state.retry_image(src);
        if retry {
            log::debug!("Retrying image {src}");
        }
        retry
    }

    /// Add a decoded image, scaled down to fit [`MAX_INSERTED_IMAGE_SIZE`]
    /// and centered on `center` (the page center by default).
    pub fn insert_image(
        &mut self,
        src: impl Into<String>,
        natural_size: Size,
        center: Option<Point>,
    ) -> Option<ElementId> {
        let src = src.into();
        if natural_size.width <= 0.0 || natural_size.height <= 0.0 {
            log::warn!("Ignoring image {src} with empty size");
            return None;
        }
        let longest = natural_size.width.max(natural_size.height);
        let scale = (MAX_INSERTED_IMAGE_SIZE / longest).min(1.0);
        let center = center.unwrap_or_else(|| {
            let page = self.store.document().settings.page_size();
            Point::new(page.width / 2.0, page.height / 2.0)
        });

        self.cancel_gesture();
        self.state.mark_image_loaded(&src, natural_size);
        let rect = Rect::from_center_size(center, natural_size * scale);
        self.add_and_select(Element::image(src, rect))
    }
}
