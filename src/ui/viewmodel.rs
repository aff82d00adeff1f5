//! View model types representing renderable UI state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) by
//! `compute_viewmodel` and consumed by the renderer. They contain no
//! business logic, only display-ready data: untruncated text, selection
//! flags, fuzzy highlight ranges and the placed layout.

use crate::ui::layout::PanelLayout;

/// Complete UI view model for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Placed rectangles, or `None` when the pane is too small.
    pub layout: Option<PanelLayout>,

    pub search_bar: SearchBarInfo,

    /// The suggestion surface. `None` while inactive.
    pub surface: Option<SurfaceInfo>,

    /// Keybinding hints, shown while focused.
    pub footer: Option<FooterInfo>,
}

/// The search input box.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Current query text.
    pub query: String,

    /// Whether the input owns keyboard focus.
    pub focused: bool,

    /// Shortcut hint shown while unfocused, e.g. `Ctrl+k`.
    pub hint: Option<String>,

    /// Whether a search is pending or in flight.
    pub loading: bool,
}

/// Contents of the suggestion surface.
#[derive(Debug, Clone)]
pub struct SurfaceInfo {
    /// Visible window of hits.
    pub items: Vec<DisplayItem>,

    /// Status line such as "Searching…", "12 results" or "No results".
    pub message: Option<String>,

    /// Last provider error, shown above any stale results.
    pub error: Option<String>,
}

impl SurfaceInfo {
    /// Lines taken by the error and message above the hit list.
    #[must_use]
    pub fn notice_count(&self) -> usize {
        usize::from(self.error.is_some()) + usize::from(self.message.is_some())
    }
}

/// Display information for a single hit.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub title: String,

    /// Top-level section the hit belongs to.
    pub section: Option<String>,

    /// Matching excerpt from the page body.
    pub snippet: Option<String>,

    pub url: String,

    /// Whether this item is under the selection cursor.
    pub is_selected: bool,

    /// Character ranges of `title` matching the query.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}
