//! Keyboard shortcuts for the labeling view.
//!
//! Keys are mapped to semantic [`HotkeyAction`]s here. The session decides
//! what each action does, so bindings can change without touching it.

/// Key identity as reported by the host input system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(String),
    ArrowLeft,
    ArrowRight,
    Delete,
    Backspace,
    Escape,
    Other(String),
}

impl Key {
    pub fn character(c: &str) -> Self {
        Key::Character(c.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Quick-label with the catalog category at this (0-based) position.
    QuickLabel(usize),
    PlayPause,
    SkipBackward,
    SkipForward,
    SkipBackwardLarge,
    SkipForwardLarge,
    DeleteSelectedLabel,
    /// Abort an in-flight drag and clear the label selection.
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct HotkeyContext {
    /// A text field has focus; typing must not trigger shortcuts.
    pub input_focused: bool,
    pub has_selected_label: bool,
    pub category_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyResult {
    Action(HotkeyAction),
    NoMatch,
    /// Would match, but a text input has focus.
    Suppressed,
}

pub fn handle_hotkey(
    key: &Key,
    shift: bool,
    ctrl: bool,
    alt: bool,
    meta: bool,
    context: &HotkeyContext,
) -> HotkeyResult {
    if context.input_focused {
        return HotkeyResult::Suppressed;
    }
    // Leave browser/OS chords alone.
    if ctrl || meta || alt {
        return HotkeyResult::NoMatch;
    }

    let action = match key {
        Key::Character(c) if c == " " => Some(HotkeyAction::PlayPause),
        Key::Character(c) => quick_label_slot(c, context.category_count).map(HotkeyAction::QuickLabel),
        Key::ArrowLeft if shift => Some(HotkeyAction::SkipBackwardLarge),
        Key::ArrowLeft => Some(HotkeyAction::SkipBackward),
        Key::ArrowRight if shift => Some(HotkeyAction::SkipForwardLarge),
        Key::ArrowRight => Some(HotkeyAction::SkipForward),
        Key::Delete | Key::Backspace if context.has_selected_label => {
            Some(HotkeyAction::DeleteSelectedLabel)
        }
        Key::Escape => Some(HotkeyAction::Cancel),
        _ => None,
    };

    action.map_or(HotkeyResult::NoMatch, HotkeyResult::Action)
}

/// `"1"`..`"9"` to a 0-based catalog slot, if that slot exists.
fn quick_label_slot(c: &str, category_count: usize) -> Option<usize> {
    let mut chars = c.chars();
    let digit = chars.next()?.to_digit(10)? as usize;
    if chars.next().is_some() {
        return None;
    }
    (1..=category_count.min(9))
        .contains(&digit)
        .then(|| digit - 1)
}
