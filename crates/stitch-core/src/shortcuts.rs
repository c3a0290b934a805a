//! Keyboard shortcut registry.

use crate::input::KeyEvent;
use crate::tools::ToolKind;

/// Editor action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetTool(ToolKind),
    DeleteSelection,
    /// Cancel the current gesture, or clear the selection when idle.
    Cancel,
    Undo,
    Redo,
    Duplicate,
    SelectAll,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    /// Move the selection one step; `large` uses the large nudge distance.
    Nudge { dx: i8, dy: i8, large: bool },
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.ctrl == event.modifiers.command()
            && self.shift == event.modifiers.shift
            && self.key.eq_ignore_ascii_case(&event.key)
    }
}

const fn nudge(key: &'static str, dx: i8, dy: i8, large: bool) -> Shortcut {
    let description = if large {
        "Nudge selection 10px"
    } else {
        "Nudge selection 1px"
    };
    Shortcut::new(key, false, large, Command::Nudge { dx, dy, large }, description)
}

const fn tool(key: &'static str, tool: ToolKind, description: &'static str) -> Shortcut {
    Shortcut::new(key, false, false, Command::SetTool(tool), description)
}

const SHORTCUTS: &[Shortcut] = &[
    tool("V", ToolKind::Select, "Select tool"),
    tool("H", ToolKind::Pan, "Pan tool"),
    tool("R", ToolKind::Rectangle, "Rectangle tool"),
    tool("O", ToolKind::Ellipse, "Ellipse tool"),
    tool("L", ToolKind::Line, "Line tool"),
    tool("T", ToolKind::Text, "Text tool"),
    tool("I", ToolKind::Image, "Image tool"),
    Shortcut::new("Delete", false, false, Command::DeleteSelection, "Delete selection"),
    Shortcut::new("Backspace", false, false, Command::DeleteSelection, "Delete selection"),
    Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current action"),
    Shortcut::new("Z", true, false, Command::Undo, "Undo"),
    Shortcut::new("Z", true, true, Command::Redo, "Redo"),
    Shortcut::new("Y", true, false, Command::Redo, "Redo"),
    Shortcut::new("D", true, false, Command::Duplicate, "Duplicate selection"),
    Shortcut::new("A", true, false, Command::SelectAll, "Select all"),
    Shortcut::new("=", true, false, Command::ZoomIn, "Zoom in"),
    Shortcut::new("+", true, true, Command::ZoomIn, "Zoom in"),
    Shortcut::new("+", true, false, Command::ZoomIn, "Zoom in"),
    Shortcut::new("-", true, false, Command::ZoomOut, "Zoom out"),
    Shortcut::new("0", true, false, Command::ResetZoom, "Reset zoom"),
    nudge("ArrowLeft", -1, 0, false),
    nudge("ArrowRight", 1, 0, false),
    nudge("ArrowUp", 0, -1, false),
    nudge("ArrowDown", 0, 1, false),
    nudge("ArrowLeft", -1, 0, true),
    nudge("ArrowRight", 1, 0, true),
    nudge("ArrowUp", 0, -1, true),
    nudge("ArrowDown", 0, 1, true),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        SHORTCUTS
    }

    /// Command bound to a key press, if any.
    pub fn lookup(event: &KeyEvent) -> Option<Command> {
        SHORTCUTS
            .iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn key(key: &str, modifiers: Modifiers) -> Option<Command> {
        ShortcutRegistry::lookup(&KeyEvent::new(key, modifiers))
    }

    #[test]
    fn test_tool_keys_are_case_insensitive() {
        assert_eq!(key("r", Modifiers::NONE), Some(Command::SetTool(ToolKind::Rectangle)));
        assert_eq!(key("R", Modifiers::NONE), Some(Command::SetTool(ToolKind::Rectangle)));
        assert_eq!(key("r", Modifiers::CTRL), None);
    }

    #[test]
    fn test_undo_redo_bindings() {
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(key("z", Modifiers::CTRL), Some(Command::Undo));
        assert_eq!(key("z", cmd), Some(Command::Undo));
        assert_eq!(key("Z", ctrl_shift), Some(Command::Redo));
        assert_eq!(key("y", Modifiers::CTRL), Some(Command::Redo));
    }

    #[test]
    fn test_nudge_distance_follows_shift() {
        assert_eq!(
            key("ArrowLeft", Modifiers::NONE),
            Some(Command::Nudge { dx: -1, dy: 0, large: false })
        );
        assert_eq!(
            key("ArrowDown", Modifiers::SHIFT),
            Some(Command::Nudge { dx: 0, dy: 1, large: true })
        );
    }

    #[test]
    fn test_format() {
        let redo = Shortcut::new("Z", true, true, Command::Redo, "Redo");
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
    }

    #[test]
    fn test_every_shortcut_is_reachable() {
        for shortcut in ShortcutRegistry::all() {
            let modifiers = Modifiers {
                ctrl: shortcut.ctrl,
                shift: shortcut.shift,
                ..Modifiers::NONE
            };
            let command = key(shortcut.key, modifiers);
            assert_eq!(command, Some(shortcut.command), "{}", shortcut.format());
        }
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(key("q", Modifiers::NONE), None);
    }
}
