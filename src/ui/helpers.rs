//! Shared rendering utilities.
//!
//! All text measurement is in characters, not bytes, so titles with
//! multi-byte characters neither split mid-character nor misalign padding.

use crate::input::Rect;
use crate::ui::theme::Theme;

/// Positions the cursor at a 0-indexed pane cell.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{};{}H", row + 1, col + 1);
}

/// Shortens `text` to at most `width` characters, ending in `…` when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Styles the character `ranges` of `text` as query matches.
///
/// `restore` is the escape sequence re-applied after each highlighted run so
/// the rest of the line keeps its base style. Ranges past the end of `text`
/// are clipped.
#[must_use]
pub fn highlighted(text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(current_pos, chars.len());
        let end = end.clamp(start, chars.len());
        if start == end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(restore);

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}

/// Prints one line of `rect` at `row`, padded with spaces to the rect width.
pub fn print_line(rect: Rect, row: usize, styled: &str, visible_len: usize) {
    position_cursor(row, rect.col);
    print!("{styled}{}", " ".repeat(rect.width.saturating_sub(visible_len)));
}
