//! Screen placement of the search panel.
//!
//! The panel is centered horizontally near the top of the pane: a three-row
//! input box, the suggestion surface below it when shown, and a one-line
//! footer while focused. All coordinates are 0-indexed pane cells, the same
//! space pointer events arrive in.
//!
//! The placed rectangles are published as regions so the outside-interaction
//! detector and click handling can test pointer positions against them.

use crate::input::{Rect, RegionRef};
use crate::ui::viewmodel::SurfaceInfo;

/// The whole panel: input, surface and footer.
pub const SEARCH_PANEL: RegionRef = RegionRef(1);
/// The input box.
pub const SEARCH_INPUT: RegionRef = RegionRef(2);
/// The rows of the suggestion surface that hold hits.
pub const RESULT_LIST: RegionRef = RegionRef(3);

const MAX_PANEL_WIDTH: usize = 80;
const MIN_PANEL_WIDTH: usize = 20;
const SIDE_MARGIN: usize = 2;
const TOP_ROW: usize = 1;
const INPUT_HEIGHT: usize = 3;
const FOOTER_HEIGHT: usize = 1;
const BOTTOM_MARGIN: usize = 1;

/// Placed rectangles of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub input: Rect,
    /// Error and message lines above the hit list.
    pub notices: Option<Rect>,
    pub list: Option<Rect>,
    pub footer: Option<Rect>,
}

/// Rows available to the suggestion surface in a pane `rows` tall.
#[must_use]
pub const fn max_surface_rows(rows: usize) -> usize {
    rows.saturating_sub(TOP_ROW + INPUT_HEIGHT + FOOTER_HEIGHT + BOTTOM_MARGIN)
}

/// Places the panel, or returns `None` when the pane is too small for the
/// input box.
#[must_use]
pub fn compute(rows: usize, cols: usize, surface: Option<&SurfaceInfo>, footer: bool) -> Option<PanelLayout> {
    let width = cols.saturating_sub(SIDE_MARGIN * 2).min(MAX_PANEL_WIDTH);
    if width < MIN_PANEL_WIDTH || rows < TOP_ROW + INPUT_HEIGHT {
        return None;
    }

    let col = (cols - width) / 2;
    let input = Rect::new(TOP_ROW, col, INPUT_HEIGHT, width);
    let mut bottom = input.bottom();
    let mut budget = max_surface_rows(rows);

    let mut notices = None;
    let mut list = None;
    if let Some(surface) = surface {
        let notice_rows = surface.notice_count().min(budget);
        if notice_rows > 0 {
            notices = Some(Rect::new(bottom, col, notice_rows, width));
            bottom += notice_rows;
            budget -= notice_rows;
        }

        let list_rows = surface.items.len().min(budget);
        if list_rows > 0 {
            list = Some(Rect::new(bottom, col, list_rows, width));
            bottom += list_rows;
        }
    }

    let footer = (footer && bottom + FOOTER_HEIGHT <= rows).then(|| {
        let rect = Rect::new(bottom, col, FOOTER_HEIGHT, width);
        bottom += FOOTER_HEIGHT;
        rect
    });

    Some(PanelLayout {
        panel: Rect::new(TOP_ROW, col, bottom - TOP_ROW, width),
        input,
        notices,
        list,
        footer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::DisplayItem;

    fn surface(items: usize, message: bool) -> SurfaceInfo {
        SurfaceInfo {
            items: (0..items)
                .map(|i| DisplayItem {
                    title: format!("hit {i}"),
                    section: None,
                    snippet: None,
                    url: String::new(),
                    is_selected: i == 0,
                    highlight_ranges: vec![],
                })
                .collect(),
            message: message.then(|| "Searching…".to_string()),
            error: None,
        }
    }

    #[test]
    fn input_only_when_no_surface() {
        let layout = compute(24, 100, None, false).unwrap();
        assert_eq!(layout.input, Rect::new(1, 10, 3, 80));
        assert_eq!(layout.panel, layout.input);
        assert!(layout.list.is_none());
        assert!(layout.footer.is_none());
    }

    #[test]
    fn surface_stacks_below_input() {
        let s = surface(3, true);
        let layout = compute(24, 60, Some(&s), true).unwrap();

        assert_eq!(layout.input, Rect::new(1, 2, 3, 56));
        assert_eq!(layout.notices, Some(Rect::new(4, 2, 1, 56)));
        assert_eq!(layout.list, Some(Rect::new(5, 2, 3, 56)));
        assert_eq!(layout.footer, Some(Rect::new(8, 2, 1, 56)));
        assert_eq!(layout.panel, Rect::new(1, 2, 8, 56));
    }

    #[test]
    fn list_is_clipped_to_pane_height() {
        let s = surface(20, false);
        let layout = compute(10, 60, Some(&s), true).unwrap();
        let list = layout.list.unwrap();

        assert_eq!(list.height, max_surface_rows(10));
        assert!(layout.panel.bottom() <= 10);
    }

    #[test]
    fn too_small_pane_has_no_layout() {
        assert!(compute(24, 10, None, false).is_none());
        assert!(compute(2, 100, None, false).is_none());
    }
}
