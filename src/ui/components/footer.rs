//! Footer help line with centered keybinding hints.

use crate::input::Rect;
use crate::ui::helpers::{print_line, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer centered in `rect`.
pub fn render_footer(rect: Rect, footer: &FooterInfo, theme: &Theme) {
    let help_text = truncate(&footer.keybindings, rect.width);
    let text_len = help_text.chars().count();
    let padding = rect.width.saturating_sub(text_len) / 2;

    let line = format!("{}{}{help_text}", Theme::fg(&theme.colors.text_dim), " ".repeat(padding));
    print_line(rect, rect.row, &line, padding + text_len);
    print!("{}", Theme::reset());
}
