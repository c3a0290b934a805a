//! Document store: the single owner of the live [`Document`].
//!
//! All mutations are synchronous. Invalid references are silent no-ops
//! reported through the return value. Every mutation that changes the
//! document bumps `updatedAt` and raises the unsaved-changes flag.

use crate::color::HexColor;
use crate::document::{Document, SettingsUpdate, Slide, SlideId, now_millis};
use crate::elements::{Element, ElementId, ElementUpdate};
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Offset applied to duplicated elements so copies are visible.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Direction for [`DocumentStore::reorder_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    /// Swap with the element directly above.
    Up,
    /// Swap with the element directly below.
    Down,
    Top,
    Bottom,
}

/// Which slides [`DocumentStore::document_colors`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScope {
    CurrentSlide,
    AllSlides,
}

/// Partial update of a slide's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideUpdate {
    pub name: Option<String>,
    pub background_color: Option<String>,
}

/// Owns the document and the current slide.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    document: Document,
    current_slide_id: SlideId,
    has_unsaved_changes: bool,
    is_saving: bool,
    last_saved: Option<u64>,
    duplicate_offset: f64,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Document::new("Untitled Board"))
    }
}

impl DocumentStore {
    /// Create a store around an existing document.
    pub fn new(document: Document) -> Self {
        let mut store = Self {
            current_slide_id: SlideId::from(""),
            document: Document::new(""),
            has_unsaved_changes: false,
            is_saving: false,
            last_saved: None,
            duplicate_offset: DUPLICATE_OFFSET,
        };
        store.initialize_document(document);
        store
    }

    pub fn set_duplicate_offset(&mut self, offset: f64) {
        self.duplicate_offset = offset;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current_slide_id(&self) -> &SlideId {
        &self.current_slide_id
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.document.slide(&self.current_slide_id)
    }

    fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        self.document.slide_mut(&self.current_slide_id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Epoch milliseconds of the last successful save.
    pub fn last_saved(&self) -> Option<u64> {
        self.last_saved
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.is_saving = saving;
    }

    /// Called by the persistence layer once a save has landed.
    pub fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
        self.is_saving = false;
        self.last_saved = Some(now_millis());
    }

    fn mark_changed(&mut self) {
        self.document.touch();
        self.has_unsaved_changes = true;
    }

    // --- Document ---

    /// Load a document wholesale.
    ///
    /// A document without slides gets a blank one, slide order is made
    /// dense and legacy paint is resolved into layers. The first slide
    /// becomes current.
    pub fn initialize_document(&mut self, mut document: Document) {
        if document.slides.is_empty() {
            log::warn!("Document {} has no slides, adding a blank one", document.id);
            document.slides.push(Slide::new("Slide 1", 0));
        }
        document.renormalize_slide_order();
        let migrated = document
            .slides
            .iter_mut()
            .flat_map(|slide| slide.elements.iter_mut())
            .map(Element::normalize_legacy_paint)
            .filter(|changed| *changed)
            .count();
        if migrated > 0 {
            log::debug!("Resolved legacy paint on {migrated} elements");
        }

        log::info!(
            "Initialized document {} ({} slides)",
            document.id,
            document.slides.len()
        );
        self.current_slide_id = document.slides[0].id.clone();
        self.document = document;
        self.has_unsaved_changes = false;
    }

    /// Replace the document with a fresh blank one.
    pub fn create_document(&mut self, name: impl Into<String>) -> &Document {
        self.initialize_document(Document::new(name));
        &self.document
    }

    /// Swap in a history snapshot. The current slide is kept when it still
    /// exists.
    pub(crate) fn restore(&mut self, document: Document) {
        if document.slide(&self.current_slide_id).is_none() {
            if let Some(first) = document.slides.first() {
                self.current_slide_id = first.id.clone();
            }
        }
        self.document = document;
        self.has_unsaved_changes = true;
    }

    pub fn rename_document(&mut self, name: impl Into<String>) {
        self.document.name = name.into();
        self.mark_changed();
    }

    /// Merge `update` into the page settings. Returns false when nothing
    /// changed.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> bool {
        let mut settings = self.document.settings.clone();
        if let Some(width) = update.width {
            settings.width = width;
        }
        if let Some(height) = update.height {
            settings.height = height;
        }
        if let Some(color) = &update.background_color {
            settings.background_color = color.clone();
        }
        if settings == self.document.settings {
            return false;
        }
        self.document.settings = settings;
        self.mark_changed();
        true
    }

    // --- Slides ---

    /// Insert a blank slide after `after` (or at the end) and make it
    /// current.
    pub fn add_slide(&mut self, after: Option<&SlideId>) -> SlideId {
        let count = self.document.slides.len();
        let index = after
            .and_then(|id| self.document.slide_index(id))
            .map_or(count, |i| i + 1);

        let slide = Slide::new(format!("Slide {}", count + 1), index);
        let id = slide.id.clone();
        self.document.slides.insert(index, slide);
        self.document.renormalize_slide_order();
        self.current_slide_id = id.clone();
        self.mark_changed();
        log::debug!("Added slide {id} at {index}");
        id
    }

    /// Remove a slide. The last remaining slide cannot be deleted.
    pub fn delete_slide(&mut self, id: &SlideId) -> bool {
        if self.document.slides.len() <= 1 {
            log::warn!("Refusing to delete the only slide");
            return false;
        }
        let Some(index) = self.document.slide_index(id) else {
            return false;
        };

        self.document.slides.remove(index);
        self.document.renormalize_slide_order();
        if &self.current_slide_id == id {
            let next = index.min(self.document.slides.len() - 1);
            self.current_slide_id = self.document.slides[next].id.clone();
        }
        self.mark_changed();
        log::debug!("Deleted slide {id}");
        true
    }

    /// Deep-copy a slide with fresh ids right after the source and make the
    /// copy current.
    pub fn duplicate_slide(&mut self, id: &SlideId) -> Option<SlideId> {
        let index = self.document.slide_index(id)?;
        let mut copy = self.document.slides[index].clone();
        copy.id = SlideId::new();
        copy.name = format!("{} (Copy)", copy.name);
        for element in &mut copy.elements {
            element.regenerate_id();
        }

        let new_id = copy.id.clone();
        self.document.slides.insert(index + 1, copy);
        self.document.renormalize_slide_order();
        self.current_slide_id = new_id.clone();
        self.mark_changed();
        log::debug!("Duplicated slide {id} as {new_id}");
        Some(new_id)
    }

    /// Move the slide at `from` to `to`.
    pub fn reorder_slides(&mut self, from: usize, to: usize) -> bool {
        let len = self.document.slides.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let slide = self.document.slides.remove(from);
        self.document.slides.insert(to, slide);
        self.document.renormalize_slide_order();
        self.mark_changed();
        true
    }

    pub fn set_current_slide(&mut self, id: &SlideId) -> bool {
        if self.document.slide(id).is_none() {
            return false;
        }
        self.current_slide_id = id.clone();
        true
    }

    pub fn update_slide(&mut self, id: &SlideId, update: &SlideUpdate) -> bool {
        let Some(slide) = self.document.slide_mut(id) else {
            return false;
        };
        if let Some(name) = &update.name {
            slide.name = name.clone();
        }
        if let Some(color) = &update.background_color {
            slide.background_color = Some(color.clone());
        }
        self.mark_changed();
        true
    }

    /// Store a rendered preview. Thumbnails are derived data, so this does
    /// not count as an unsaved change.
    pub fn set_slide_thumbnail(&mut self, id: &SlideId, thumbnail: impl Into<String>) -> bool {
        match self.document.slide_mut(id) {
            Some(slide) => {
                slide.thumbnail = Some(thumbnail.into());
                true
            }
            None => false,
        }
    }

    // --- Elements ---

    /// Element on the current slide.
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.current_slide()?.element(id)
    }

    /// Current slide elements in paint order.
    pub fn sorted_elements(&self) -> Vec<&Element> {
        self.current_slide()
            .map(Slide::sorted_elements)
            .unwrap_or_default()
    }

    /// Insert an element on `slide` (or the current slide) above every
    /// existing element. Any caller-provided z-index is replaced.
    pub fn add_element(
        &mut self,
        mut element: Element,
        slide: Option<&SlideId>,
    ) -> Option<ElementId> {
        let slide_id = slide.unwrap_or(&self.current_slide_id).clone();
        let slide = self.document.slide_mut(&slide_id)?;

        element.z_index = slide.max_z_index() + 1;
        element.normalize_legacy_paint();
        let id = element.id.clone();
        slide.elements.push(element);
        self.mark_changed();
        log::debug!("Added element {id} to slide {slide_id}");
        Some(id)
    }

    /// Shallow-merge `update` into an element on the current slide.
    /// Returns false when the element is missing or already matches.
    pub fn update_element(&mut self, id: &ElementId, update: &ElementUpdate) -> bool {
        let Some(element) = self.current_slide_mut().and_then(|s| s.element_mut(id)) else {
            return false;
        };
        let mut merged = element.clone();
        update.apply_to(&mut merged);
        if merged == *element {
            return false;
        }
        *element = merged;
        self.mark_changed();
        true
    }

    /// Move unlocked elements by `delta`. Returns how many moved.
    pub fn move_elements(&mut self, ids: &[ElementId], delta: Vec2) -> usize {
        let Some(slide) = self.current_slide_mut() else {
            return 0;
        };
        let mut moved = 0;
        for element in slide.elements.iter_mut() {
            if !element.locked && ids.contains(&element.id) {
                element.translate(delta);
                moved += 1;
            }
        }
        if moved > 0 {
            self.mark_changed();
        }
        moved
    }

    /// Remove elements from the current slide. Returns how many were removed.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> usize {
        let Some(slide) = self.current_slide_mut() else {
            return 0;
        };
        let before = slide.elements.len();
        slide.elements.retain(|e| !ids.contains(&e.id));
        let removed = before - slide.elements.len();
        if removed > 0 {
            self.mark_changed();
            log::debug!("Deleted {removed} elements");
        }
        removed
    }

    /// Copy elements with fresh ids, offset so they are visible, stacked
    /// above everything in their original relative order.
    pub fn duplicate_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let offset = self.duplicate_offset;
        let Some(slide) = self.current_slide_mut() else {
            return Vec::new();
        };

        let wanted: HashSet<&ElementId> = ids.iter().collect();
        let mut copies: Vec<Element> = slide
            .sorted_elements()
            .into_iter()
            .filter(|e| wanted.contains(&e.id))
            .cloned()
            .collect();
        if copies.is_empty() {
            return Vec::new();
        }

        let base = slide.max_z_index() + 1;
        let mut new_ids = Vec::with_capacity(copies.len());
        for (index, copy) in copies.iter_mut().enumerate() {
            copy.regenerate_id();
            copy.translate(Vec2::new(offset, offset));
            copy.z_index = base + index as i64;
            new_ids.push(copy.id.clone());
        }
        slide.elements.extend(copies);
        self.mark_changed();
        log::debug!("Duplicated {} elements", new_ids.len());
        new_ids
    }

    /// Change an element's paint order on the current slide.
    pub fn reorder_element(&mut self, id: &ElementId, direction: ReorderDirection) -> bool {
        let Some(slide) = self.current_slide_mut() else {
            return false;
        };

        let sorted: Vec<(ElementId, i64)> = slide
            .sorted_elements()
            .iter()
            .map(|e| (e.id.clone(), e.z_index))
            .collect();
        let Some(position) = sorted.iter().position(|(eid, _)| eid == id) else {
            return false;
        };
        let current = sorted[position].1;

        let changes: Vec<(ElementId, i64)> = match direction {
            ReorderDirection::Up => match sorted.get(position + 1) {
                Some((next_id, next_z)) => vec![(id.clone(), *next_z), (next_id.clone(), current)],
                None => Vec::new(),
            },
            ReorderDirection::Down => match position.checked_sub(1).map(|i| &sorted[i]) {
                Some((prev_id, prev_z)) => vec![(id.clone(), *prev_z), (prev_id.clone(), current)],
                None => Vec::new(),
            },
            ReorderDirection::Top => {
                let below = position.checked_sub(1).map(|i| sorted[i].1);
                let on_top = position + 1 == sorted.len() && below.is_none_or(|z| z < current);
                if on_top {
                    Vec::new()
                } else {
                    vec![(id.clone(), slide.max_z_index() + 1)]
                }
            }
            ReorderDirection::Bottom => {
                let above = sorted.get(position + 1).map(|(_, z)| *z);
                let at_bottom = position == 0 && above.is_none_or(|z| z > current);
                if at_bottom {
                    Vec::new()
                } else {
                    vec![(id.clone(), slide.min_z_index() - 1)]
                }
            }
        };

        let mut changed = false;
        for (target, z_index) in changes {
            if let Some(element) = slide.element_mut(&target) {
                if element.z_index != z_index {
                    element.z_index = z_index;
                    changed = true;
                }
            }
        }
        if changed {
            self.mark_changed();
        }
        changed
    }

    /// Record the intrinsic size of a loaded image on every fill layer that
    /// shows `src` without one. Returns how many elements changed.
    pub fn apply_image_size(&mut self, src: &str, size: Size) -> usize {
        let mut changed = 0;
        for slide in self.document.slides.iter_mut() {
            for element in slide.elements.iter_mut() {
                if element.paint.set_image_size(src, size) {
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.mark_changed();
        }
        changed
    }

    /// Unique colors in use, brightest first.
    pub fn document_colors(&self, scope: ColorScope) -> Vec<String> {
        let slides: Vec<&Slide> = match scope {
            ColorScope::CurrentSlide => self.current_slide().into_iter().collect(),
            ColorScope::AllSlides => self.document.slides.iter().collect(),
        };

        let mut colors: Vec<String> = Vec::new();
        let mut push = |color: &str| {
            let color = color.to_lowercase();
            if !colors.contains(&color) {
                colors.push(color);
            }
        };
        for slide in slides {
            if let Some(background) = &slide.background_color {
                push(background);
            }
            for element in &slide.elements {
                for color in element.paint.colors() {
                    push(&color);
                }
            }
        }
        push(&self.document.settings.background_color);

        let brightness = |color: &String| {
            HexColor::parse(color)
                .map(|c| c.brightness())
                .unwrap_or(0.0)
        };
        colors.sort_by(|a, b| brightness(b).total_cmp(&brightness(a)));
        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{FillLayer, Paint, VectorType};
    use kurbo::{Point, Rect};

    fn shape_at(x: f64, y: f64) -> Element {
        Element::vector(VectorType::Rectangle, Rect::new(x, y, x + 50.0, y + 50.0))
    }

    fn orders(store: &DocumentStore) -> Vec<usize> {
        store.document().slides.iter().map(|s| s.order).collect()
    }

    #[test]
    fn test_default_store() {
        let store = DocumentStore::default();
        assert_eq!(store.document().slides.len(), 1);
        assert_eq!(store.current_slide().unwrap().name, "Slide 1");
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_add_slide_inserts_after_and_selects() {
        let mut store = DocumentStore::default();
        let first = store.current_slide_id().clone();
        let second = store.add_slide(None);
        let between = store.add_slide(Some(&first));

        let ids: Vec<_> = store.document().slides.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![first, between.clone(), second]);
        assert_eq!(orders(&store), vec![0, 1, 2]);
        assert_eq!(store.current_slide_id(), &between);
        assert_eq!(store.current_slide().unwrap().name, "Slide 3");
        assert!(store.has_unsaved_changes());
    }

    #[test]
    fn test_add_then_delete_slide_restores_invariants() {
        let mut store = DocumentStore::default();
        store.add_slide(None);
        let id = store.add_slide(None);
        assert!(store.delete_slide(&id));
        assert_eq!(store.document().slides.len(), 2);
        assert_eq!(orders(&store), vec![0, 1]);
    }

    #[test]
    fn test_cannot_delete_last_slide() {
        let mut store = DocumentStore::default();
        let id = store.current_slide_id().clone();
        assert!(!store.delete_slide(&id));
        assert_eq!(store.document().slides.len(), 1);
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_delete_current_slide_moves_to_same_index() {
        let mut store = DocumentStore::default();
        let first = store.current_slide_id().clone();
        let second = store.add_slide(None);
        let third = store.add_slide(None);

        store.set_current_slide(&second);
        assert!(store.delete_slide(&second));
        assert_eq!(store.current_slide_id(), &third);

        assert!(store.delete_slide(&third));
        assert_eq!(store.current_slide_id(), &first);
        assert!(!store.delete_slide(&SlideId::from("missing")));
    }

    #[test]
    fn test_duplicate_slide_copies_with_fresh_ids() {
        let mut store = DocumentStore::default();
        let source = store.current_slide_id().clone();
        let element_id = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        store.add_slide(None);

        let copy = store.duplicate_slide(&source).unwrap();
        let doc = store.document();
        assert_eq!(doc.slides[1].id, copy);
        assert_eq!(doc.slides[1].name, "Slide 1 (Copy)");
        assert_eq!(doc.slides[1].elements.len(), 1);
        assert_ne!(doc.slides[1].elements[0].id, element_id);
        assert_eq!(orders(&store), vec![0, 1, 2]);
        assert_eq!(store.current_slide_id(), &copy);
    }

    #[test]
    fn test_reorder_slides() {
        let mut store = DocumentStore::default();
        let first = store.current_slide_id().clone();
        store.add_slide(None);
        store.add_slide(None);
        assert!(store.reorder_slides(0, 2));
        assert_eq!(store.document().slides[2].id, first);
        assert_eq!(orders(&store), vec![0, 1, 2]);
        assert!(!store.reorder_slides(0, 3));
    }

    #[test]
    fn test_add_element_assigns_next_z_index() {
        let mut store = DocumentStore::default();
        let mut element = shape_at(0.0, 0.0);
        element.z_index = 99;
        let a = store.add_element(element, None).unwrap();
        let b = store.add_element(shape_at(10.0, 10.0), None).unwrap();
        assert_eq!(store.element(&a).unwrap().z_index, 0);
        assert_eq!(store.element(&b).unwrap().z_index, 1);
    }

    #[test]
    fn test_add_element_to_missing_slide_is_noop() {
        let mut store = DocumentStore::default();
        assert!(store.add_element(shape_at(0.0, 0.0), Some(&SlideId::from("nope"))).is_none());
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_update_element_merges_and_ignores_missing() {
        let mut store = DocumentStore::default();
        let id = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let update = ElementUpdate::default().position(Point::new(5.0, 6.0));
        assert!(store.update_element(&id, &update));
        let element = store.element(&id).unwrap();
        assert_eq!((element.x, element.y, element.width), (5.0, 6.0, 50.0));
        assert!(!store.update_element(&ElementId::from("missing"), &update));
    }

    #[test]
    fn test_delete_elements_ignores_unknown_ids() {
        let mut store = DocumentStore::default();
        let a = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let b = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        assert_eq!(store.delete_elements(&[a.clone(), ElementId::from("ghost")]), 1);
        assert!(store.element(&a).is_none());
        assert!(store.element(&b).is_some());
    }

    #[test]
    fn test_duplicate_elements_offsets_and_returns_ids() {
        let mut store = DocumentStore::default();
        let a = store
            .add_element(shape_at(100.0, 100.0).with_id("a"), None)
            .unwrap();
        let new_ids = store.duplicate_elements(&[a.clone()]);
        assert_eq!(new_ids.len(), 1);
        assert_ne!(new_ids[0], a);
        let copy = store.element(&new_ids[0]).unwrap();
        assert_eq!((copy.x, copy.y), (120.0, 120.0));
        assert_eq!(copy.z_index, 1);
        assert_eq!(store.current_slide().unwrap().elements.len(), 2);
    }

    #[test]
    fn test_duplicate_preserves_relative_z_order() {
        let mut store = DocumentStore::default();
        let low = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let high = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        store.reorder_element(&low, ReorderDirection::Top);
        // low is now above high.
        let copies = store.duplicate_elements(&[low.clone(), high.clone()]);
        let z = |id: &ElementId| store.element(id).unwrap().z_index;
        assert!(z(&copies[0]) < z(&copies[1]));
        assert_eq!(store.element(&copies[0]).unwrap().x, 20.0);
        assert!(z(&copies[0]) > z(&low));
        assert!(store.duplicate_elements(&[ElementId::from("ghost")]).is_empty());
    }

    #[test]
    fn test_reorder_up_and_down_swap() {
        let mut store = DocumentStore::default();
        let a = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let b = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let c = store.add_element(shape_at(0.0, 0.0), None).unwrap();

        assert!(store.reorder_element(&a, ReorderDirection::Up));
        let z = |store: &DocumentStore, id: &ElementId| store.element(id).unwrap().z_index;
        assert_eq!((z(&store, &a), z(&store, &b), z(&store, &c)), (1, 0, 2));

        store.reorder_element(&c, ReorderDirection::Down);
        assert_eq!((z(&store, &a), z(&store, &c)), (2, 1));

        // Already at the top: nothing to swap with.
        assert!(!store.reorder_element(&a, ReorderDirection::Up));
        assert!(!store.reorder_element(&a, ReorderDirection::Top));
        assert!(!store.reorder_element(&b, ReorderDirection::Down));
        assert!(!store.reorder_element(&b, ReorderDirection::Bottom));
        assert_eq!(z(&store, &a), 2);
    }

    #[test]
    fn test_reorder_without_effect_leaves_document_clean() {
        let mut store = DocumentStore::default();
        let a = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let b = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        store.current_slide_mut().unwrap().element_mut(&b).unwrap().z_index = 0;
        store.mark_saved();

        // Equal z-indices: swapping changes nothing.
        assert!(!store.reorder_element(&a, ReorderDirection::Up));
        assert!(!store.has_unsaved_changes());

        // A tie at the top still needs a real move.
        assert!(store.reorder_element(&a, ReorderDirection::Top));
        assert_eq!(store.element(&a).unwrap().z_index, 1);
    }

    #[test]
    fn test_unchanged_updates_are_noops() {
        let mut store = DocumentStore::default();
        let id = store.add_element(shape_at(5.0, 6.0), None).unwrap();
        store.mark_saved();
        let updated_at = store.document().updated_at;

        let same = ElementUpdate::default().position(Point::new(5.0, 6.0));
        assert!(!store.update_element(&id, &same));
        let settings = SettingsUpdate {
            width: Some(1920.0),
            ..SettingsUpdate::default()
        };
        assert!(!store.update_settings(&settings));
        assert!(!store.has_unsaved_changes());
        assert_eq!(store.document().updated_at, updated_at);
    }

    #[test]
    fn test_top_then_bottom_gives_global_minimum() {
        let mut store = DocumentStore::default();
        let ids: Vec<_> = (0..4)
            .map(|i| store.add_element(shape_at(i as f64, 0.0), None).unwrap())
            .collect();
        let target = &ids[2];
        store.reorder_element(target, ReorderDirection::Top);
        assert_eq!(store.element(target).unwrap().z_index, 4);
        store.reorder_element(target, ReorderDirection::Bottom);

        let min = store
            .current_slide()
            .unwrap()
            .elements
            .iter()
            .map(|e| e.z_index)
            .min()
            .unwrap();
        assert_eq!(store.element(target).unwrap().z_index, min);
        assert_eq!(min, -1);
        assert!(!store.reorder_element(&ElementId::from("ghost"), ReorderDirection::Top));
    }

    #[test]
    fn test_move_elements_skips_locked() {
        let mut store = DocumentStore::default();
        let free = store.add_element(shape_at(0.0, 0.0), None).unwrap();
        let mut pinned = shape_at(0.0, 0.0);
        pinned.locked = true;
        let pinned = store.add_element(pinned, None).unwrap();

        assert_eq!(store.move_elements(&[free.clone(), pinned.clone()], Vec2::new(3.0, 4.0)), 1);
        assert_eq!(store.element(&free).unwrap().x, 3.0);
        assert_eq!(store.element(&pinned).unwrap().x, 0.0);
    }

    #[test]
    fn test_initialize_repairs_and_migrates() {
        let mut doc = Document::new("Imported");
        doc.slides.clear();
        let mut store = DocumentStore::default();
        store.initialize_document(doc);
        assert_eq!(store.document().slides.len(), 1);

        let mut doc = Document::new("Legacy");
        doc.slides[0].order = 7;
        doc.slides[0]
            .elements
            .push(shape_at(0.0, 0.0).with_paint(Paint::legacy(Some("#ff0000"), None, None)));
        store.initialize_document(doc);
        let slide = store.current_slide().unwrap();
        assert_eq!(slide.order, 0);
        assert_eq!(slide.elements[0].paint.fills.as_ref().map(Vec::len), Some(1));
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_save_flags() {
        let mut store = DocumentStore::default();
        store.rename_document("Renamed");
        assert!(store.has_unsaved_changes());
        store.set_saving(true);
        assert!(store.is_saving());
        store.mark_saved();
        assert!(!store.has_unsaved_changes());
        assert!(!store.is_saving());
        assert!(store.last_saved().is_some());

        let id = store.current_slide_id().clone();
        assert!(store.set_slide_thumbnail(&id, "data:image/png;base64,"));
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_settings_and_slide_updates() {
        let mut store = DocumentStore::default();
        assert!(store.update_settings(&SettingsUpdate {
            width: Some(1280.0),
            ..SettingsUpdate::default()
        }));
        assert_eq!(store.document().settings.width, 1280.0);
        assert_eq!(store.document().settings.height, 1080.0);

        let id = store.current_slide_id().clone();
        let update = SlideUpdate {
            background_color: Some("#000000".into()),
            ..SlideUpdate::default()
        };
        assert!(store.update_slide(&id, &update));
        assert_eq!(
            store.current_slide().unwrap().background_color.as_deref(),
            Some("#000000")
        );
    }

    #[test]
    fn test_document_colors_sorted_by_brightness() {
        let mut store = DocumentStore::default();
        let mut element = shape_at(0.0, 0.0).with_paint(Paint::legacy(
            Some("#FF0000"),
            Some("#000000"),
            Some(1.0),
        ));
        element.paint.fills = Some(vec![FillLayer::solid("#FF0000", 1.0)]);
        store.add_element(element, None);

        let colors = store.document_colors(ColorScope::CurrentSlide);
        assert_eq!(colors, vec!["#ffffff", "#ff0000", "#000000"]);
    }

    #[test]
    fn test_apply_image_size_only_fills_missing() {
        let mut store = DocumentStore::default();
        let mut element = shape_at(0.0, 0.0);
        element.paint.fills = Some(vec![FillLayer::image("photo.png", None, 1.0)]);
        store.add_element(element, None);
        store.mark_saved();

        assert_eq!(store.apply_image_size("photo.png", Size::new(800.0, 600.0)), 1);
        assert!(store.has_unsaved_changes());
        assert_eq!(store.apply_image_size("photo.png", Size::new(10.0, 10.0)), 0);
        assert_eq!(store.apply_image_size("other.png", Size::new(10.0, 10.0)), 0);
    }
}
