//! Tools and the pointer gesture state machine.

use crate::elements::{Element, ElementId, FillLayer, Paint, StrokeLayer, VectorType};
use crate::input::MouseButton;
use crate::snap::{drag_rect, snap_line_endpoint};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Drawn shapes and lines must exceed this size to be kept.
pub const MIN_DRAW_SIZE: f64 = 5.0;

/// Marquee drags within this many screen px on both axes count as a click.
pub const MARQUEE_CLICK_THRESHOLD: f64 = 3.0;

/// Size of text boxes created by the text tool.
pub const TEXT_BOX_SIZE: Size = Size::new(200.0, 50.0);

/// Content of text boxes created by the text tool.
pub const TEXT_PLACEHOLDER: &str = "Double-click to edit";

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Ellipse,
    Line,
    Text,
    Image,
}

impl ToolKind {
    /// Shape produced by a drag with this tool.
    pub fn vector_type(self) -> Option<VectorType> {
        match self {
            ToolKind::Rectangle => Some(VectorType::Rectangle),
            ToolKind::Ellipse => Some(VectorType::Ellipse),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pan => "pan",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
            ToolKind::Image => "image",
        }
    }
}

/// Paint applied to newly drawn elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub text_color: String,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            fill_color: "#3b82f6".to_string(),
            stroke_color: "#1d4ed8".to_string(),
            stroke_width: 2.0,
            text_color: "#000000".to_string(),
        }
    }
}

impl ToolStyle {
    pub fn shape(&self, vector_type: VectorType, rect: Rect) -> Element {
        Element::vector(vector_type, rect).with_paint(Paint::layered(
            vec![FillLayer::solid(&self.fill_color, 1.0)],
            vec![StrokeLayer::new(&self.stroke_color, self.stroke_width, 1.0)],
        ))
    }

    pub fn line(&self, start: Point, end: Point) -> Element {
        Element::line(start, end).with_paint(Paint::layered(
            Vec::new(),
            vec![StrokeLayer::new(&self.stroke_color, self.stroke_width, 1.0)],
        ))
    }

    /// Placeholder text box with its top-left corner at `origin`.
    pub fn text(&self, origin: Point) -> Element {
        Element::text(TEXT_PLACEHOLDER, origin, TEXT_BOX_SIZE).with_paint(Paint::layered(
            vec![FillLayer::solid(&self.text_color, 1.0)],
            Vec::new(),
        ))
    }
}

/// Whether a drawn element is large enough to keep.
pub fn meets_draw_threshold(element: &Element) -> bool {
    match element.as_line() {
        Some(line) => line.length() > MIN_DRAW_SIZE,
        None => element.width > MIN_DRAW_SIZE && element.height > MIN_DRAW_SIZE,
    }
}

/// Rubber-band selection in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    /// Press point in document space.
    pub origin: Point,
    pub current: Point,
    origin_screen: Point,
    /// Shift was held at press: hits are added to `base_selection`.
    pub additive: bool,
    /// Selection when the gesture started.
    pub base_selection: Vec<ElementId>,
    exceeded_threshold: bool,
}

impl Marquee {
    pub fn new(
        origin: Point,
        origin_screen: Point,
        additive: bool,
        base_selection: Vec<ElementId>,
    ) -> Self {
        Self {
            origin,
            current: origin,
            origin_screen,
            additive,
            base_selection,
            exceeded_threshold: false,
        }
    }

    pub fn update(&mut self, current: Point, current_screen: Point) {
        self.current = current;
        let moved = current_screen - self.origin_screen;
        if moved.x.abs() > MARQUEE_CLICK_THRESHOLD || moved.y.abs() > MARQUEE_CLICK_THRESHOLD {
            self.exceeded_threshold = true;
        }
    }

    /// Marquee rectangle in document space.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.current)
    }

    /// The pointer never left the click threshold.
    pub fn is_click(&self) -> bool {
        !self.exceeded_threshold
    }

    /// Selection implied by the elements currently under the marquee.
    pub fn selection(&self, hits: Vec<ElementId>) -> Vec<ElementId> {
        if !self.additive {
            return hits;
        }
        let mut selection = self.base_selection.clone();
        for id in hits {
            if !selection.contains(&id) {
                selection.push(id);
            }
        }
        selection
    }
}

/// The gesture currently driven by the pointer or the text field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Panning {
        button: MouseButton,
    },
    DrawingShape {
        vector_type: VectorType,
        anchor: Point,
        current: Point,
        square: bool,
    },
    DrawingLine {
        start: Point,
        end: Point,
        constrained: bool,
    },
    MarqueeSelecting(Marquee),
    DraggingElements {
        ids: Vec<ElementId>,
        /// Element under the press.
        pressed: ElementId,
        /// Collapse a multi-selection to `pressed` if the press ends as a click.
        collapse_on_click: bool,
        last: Point,
        total: Vec2,
    },
    TransformingElement {
        id: ElementId,
    },
    EditingText {
        id: ElementId,
        draft: String,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Panning { .. } => "panning",
            Interaction::DrawingShape { .. } => "drawing-shape",
            Interaction::DrawingLine { .. } => "drawing-line",
            Interaction::MarqueeSelecting(_) => "marquee-selecting",
            Interaction::DraggingElements { .. } => "dragging-element",
            Interaction::TransformingElement { .. } => "transforming-element",
            Interaction::EditingText { .. } => "editing-text",
        }
    }

    /// Provisional element for a drawing gesture.
    pub fn preview(&self, style: &ToolStyle) -> Option<Element> {
        match self {
            Interaction::DrawingShape {
                vector_type,
                anchor,
                current,
                square,
            } => Some(style.shape(*vector_type, drag_rect(*anchor, *current, *square))),
            Interaction::DrawingLine {
                start,
                end,
                constrained,
            } => {
                let end = if *constrained {
                    snap_line_endpoint(*start, *end).point
                } else {
                    *end
                };
                Some(style.line(*start, end))
            }
            _ => None,
        }
    }
}
