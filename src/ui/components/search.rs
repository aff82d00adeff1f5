//! Search input box renderer.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Search docs: focus             Ctrl+k │
//! └──────────────────────────────────────┘
//! ```
//!
//! The right edge carries the shortcut hint while unfocused and a loading
//! marker while a search is pending or in flight.

use crate::input::Rect;
use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

const PLACEHOLDER: &str = "Search docs";
const LOADING_MARKER: &str = "…";

/// Renders the input box into `rect`, which must be three rows tall.
pub fn render_search_bar(rect: Rect, search: &SearchBarInfo, theme: &Theme) {
    let inner_width = rect.width.saturating_sub(2);
    let border = if search.focused {
        &theme.colors.focused_border
    } else {
        &theme.colors.search_bar_border
    };

    position_cursor(rect.row, rect.col);
    print!("{}┌{}┐{}", Theme::fg(border), "─".repeat(inner_width), Theme::reset());

    let badge = search
        .hint
        .as_deref()
        .map(|hint| format!(" {hint} "))
        .or_else(|| search.loading.then(|| format!("{LOADING_MARKER} ")))
        .unwrap_or_default();
    let badge_len = badge.chars().count();

    let (text, text_color) = if search.query.is_empty() && !search.focused {
        (format!(" {PLACEHOLDER}"), &theme.colors.text_dim)
    } else {
        (format!(" {PLACEHOLDER}: {}", search.query), &theme.colors.text_normal)
    };
    let text = truncate(&text, inner_width.saturating_sub(badge_len));
    let padding = inner_width.saturating_sub(text.chars().count() + badge_len);

    position_cursor(rect.row + 1, rect.col);
    print!("{}│", Theme::fg(border));
    print!("{}{text}", Theme::fg(text_color));
    print!("{}", " ".repeat(padding));
    if search.hint.is_some() {
        print!(
            "{}{}{badge}{}",
            Theme::fg(&theme.colors.hint_fg),
            Theme::bg(&theme.colors.hint_bg),
            Theme::reset()
        );
    } else {
        print!("{}{badge}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{}│{}", Theme::fg(border), Theme::reset());

    position_cursor(rect.row + 2, rect.col);
    print!("{}└{}┘{}", Theme::fg(border), "─".repeat(inner_width), Theme::reset());
}
