//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process: [`AppState::layout`] computes the view
//! model and places the screen regions pointer events are tested against,
//! then the components draw the view model into those regions.

use crate::app::AppState;
use crate::ui::components;
use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;

const TOO_SMALL: &str = "docseek: pane too small";

/// Renders the overlay to stdout.
///
/// Takes the state mutably because the layout pass re-places the panel
/// regions for this frame.
pub fn render(state: &mut AppState, rows: usize, cols: usize) {
    let viewmodel = state.layout(rows, cols);

    let Some(layout) = &viewmodel.layout else {
        if rows > 0 {
            position_cursor(0, 0);
            print!(
                "{}{}{}",
                Theme::fg(&state.theme.colors.text_dim),
                TOO_SMALL.chars().take(cols).collect::<String>(),
                Theme::reset()
            );
        }
        return;
    };

    components::render_panel(&viewmodel, layout, &state.theme);
}
