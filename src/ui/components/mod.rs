//! Composable UI component renderers.
//!
//! - [`search`]: Input box with shortcut hint and loading marker
//! - [`suggestions`]: Error/message notices and the hit list
//! - [`footer`]: Keybinding hints
//!
//! [`render_panel`] draws them into the rectangles placed by
//! [`layout`](crate::ui::layout).

mod footer;
mod search;
mod suggestions;

use crate::ui::layout::PanelLayout;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use footer::render_footer;
use search::render_search_bar;
use suggestions::{render_hits, render_notices};

/// Renders the whole panel.
pub fn render_panel(vm: &UIViewModel, layout: &PanelLayout, theme: &Theme) {
    render_search_bar(layout.input, &vm.search_bar, theme);

    if let Some(surface) = &vm.surface {
        if let Some(rect) = layout.notices {
            render_notices(rect, surface, theme);
        }
        if let Some(rect) = layout.list {
            render_hits(rect, &surface.items, theme);
        }
    }

    if let (Some(footer), Some(rect)) = (&vm.footer, layout.footer) {
        render_footer(rect, footer, theme);
    }
}
