//! Focus state machine types.
//!
//! ```text
//!              click inside input / shortcut
//!   ┌───────────┐ ───────────────────────────▶ ┌─────────┐
//!   │ Unfocused │                              │ Focused │
//!   └───────────┘ ◀─────────────────────────── └─────────┘
//!                  Escape / click outside panel
//! ```
//!
//! Activating while `Focused` and deactivating while `Unfocused` are no-ops.

/// Whether the search input currently owns keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusState {
    /// Initial state. The shortcut hint is visible and keys are not typed.
    #[default]
    Unfocused,
    /// Keys edit the query; the suggestion surface may be shown.
    Focused,
}

impl FocusState {
    #[must_use]
    pub const fn is_focused(self) -> bool {
        matches!(self, Self::Focused)
    }
}

/// Transition requested by a collaborator subscription.
///
/// These are the payloads the focus machine registers with the key listener
/// and the outside-interaction detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Activate,
    Deactivate,
}
