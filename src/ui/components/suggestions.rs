//! Suggestion surface renderer: notices above a list of hits.
//!
//! Each hit is one row: the title (with query matches highlighted), then its
//! section and a body excerpt in dimmer colors as far as the width allows. The selected row is drawn with the selection
//! colors across the full panel width.

use crate::input::Rect;
use crate::ui::helpers::{self, print_line, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, SurfaceInfo};

const SECTION_SEPARATOR: &str = " · ";
const SNIPPET_SEPARATOR: &str = " │ ";

/// Renders the error and message lines into `rect`.
pub fn render_notices(rect: Rect, surface: &SurfaceInfo, theme: &Theme) {
    let lines = surface
        .error
        .iter()
        .map(|e| (format!(" ⚠ {e}"), &theme.colors.error_fg))
        .chain(surface.message.iter().map(|m| (format!(" {m}"), &theme.colors.text_dim)));

    for (offset, (text, color)) in lines.take(rect.height).enumerate() {
        let text = truncate(&text, rect.width);
        let len = text.chars().count();
        print_line(rect, rect.row + offset, &format!("{}{text}", Theme::fg(color)), len);
        print!("{}", Theme::reset());
    }
}

/// Renders the visible hits into `rect`, one per row.
pub fn render_hits(rect: Rect, items: &[DisplayItem], theme: &Theme) {
    for (offset, item) in items.iter().take(rect.height).enumerate() {
        render_hit(rect, rect.row + offset, item, theme);
    }
}

fn render_hit(rect: Rect, row: usize, item: &DisplayItem, theme: &Theme) {
    let (line, used) = hit_line(rect.width, item, theme);
    print_line(rect, row, &line, used);
    print!("{}", Theme::reset());
}

/// Styles one hit row `width` cells wide, returning it with its visible length.
fn hit_line(width: usize, item: &DisplayItem, theme: &Theme) -> (String, usize) {
    let base = if item.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    let title_width = width.saturating_sub(2);
    let title = truncate(&item.title, title_width);
    let mut used = 1 + title.chars().count();

    let mut line = format!("{base} ");
    if item.is_selected {
        line.push_str(Theme::bold());
        line.push_str(&title);
    } else {
        line.push_str(&helpers::highlighted(&title, &item.highlight_ranges, theme, &base));
    }

    let trailing = [
        (SECTION_SEPARATOR, item.section.as_deref(), &theme.colors.section_fg),
        (SNIPPET_SEPARATOR, item.snippet.as_deref(), &theme.colors.text_dim),
    ];

    for (separator, text, color) in trailing {
        let Some(text) = text else { continue };
        let separator_len = separator.chars().count();
        let room = width.saturating_sub(used + separator_len + 1);
        if room == 0 {
            break;
        }

        let text = truncate(text, room);
        used += separator_len + text.chars().count();
        if !item.is_selected {
            line.push_str(&Theme::fg(&theme.colors.border));
        }
        line.push_str(separator);
        if !item.is_selected {
            line.push_str(&Theme::fg(color));
        }
        line.push_str(&text);
    }

    (line, used)
}
