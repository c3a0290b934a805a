//! Stitch Core Library
//!
//! Platform-agnostic document model, interaction state machine and undo
//! history for the Stitch slide editor. Rendering and platform input are
//! left to the host, which feeds events into an [`Editor`].

pub mod color;
pub mod config;
pub mod document;
pub mod editor;
pub mod editor_state;
pub mod elements;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod snap;
pub mod store;
pub mod text_layout;
pub mod tools;
pub mod viewport;

pub use color::{ColorError, HexColor};
pub use config::{ConfigError, EditorConfig};
pub use document::{Document, DocumentError, DocumentResult, DocumentSettings, Slide, SlideId};
pub use editor::Editor;
pub use editor_state::{EditorStore, ImageStatus};
pub use elements::{
    Element, ElementId, ElementKind, ElementType, ElementUpdate, FillLayer, Paint, StrokeLayer,
    TransformCommit, VectorType,
};
pub use history::History;
pub use input::{HitTarget, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use store::{ColorScope, DocumentStore, ReorderDirection, SlideUpdate};
pub use text_layout::{EstimatedMeasure, TextMeasure};
pub use tools::{Interaction, ToolKind, ToolStyle};
pub use viewport::Viewport;
