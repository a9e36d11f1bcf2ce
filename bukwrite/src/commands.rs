//! Toolbar command table
//!
//! Each toolbar button maps to an [`Action`] by a stable identifier. The
//! shell looks actions up here and hands them to
//! [`EditorSession::execute`](crate::session::EditorSession::execute).

use crate::tags::{Justification, ToggleTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle(ToggleTag),
    Indent,
    Unindent,
    Justify(Justification),
    PasteImage,
    /// End the editing session (bound to Escape by the shell)
    Quit,
}

/// Identifier → action dispatch table
pub const ACTIONS: &[(&str, Action)] = &[
    ("bold", Action::Toggle(ToggleTag::Bold)),
    ("italic", Action::Toggle(ToggleTag::Italic)),
    ("underline", Action::Toggle(ToggleTag::Underline)),
    ("strikethrough", Action::Toggle(ToggleTag::Strikethrough)),
    ("indent", Action::Indent),
    ("unindent", Action::Unindent),
    ("justify-left", Action::Justify(Justification::Left)),
    ("justify-right", Action::Justify(Justification::Right)),
    ("justify-center", Action::Justify(Justification::Center)),
    ("justify-fill", Action::Justify(Justification::Fill)),
    ("paste-image", Action::PasteImage),
    ("quit", Action::Quit),
];

impl Action {
    pub fn from_id(id: &str) -> Option<Self> {
        ACTIONS
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, action)| *action)
    }

    pub fn id(self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, action)| *action == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }
}

/// What the shell should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}
