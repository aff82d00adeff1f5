//! Application layer: the focus state machine and its event handling.
//!
//! ```text
//! Zellij events → Event → handle_event → AppState mutations → Actions → shim
//!                              ↑                                   │
//!                              └──── Timer / SearchSettled ────────┘
//! ```
//!
//! - [`actions`]: Side effects returned to the plugin shim
//! - [`handler`]: Event dispatch
//! - [`modes`]: Focus states and transitions
//! - [`state`]: The orchestrator owning focus, collaborators and view model

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{FocusState, Transition};
pub use state::{AppState, InputField, Presentation};
