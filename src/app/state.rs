//! The focus state machine and the state it orchestrates.
//!
//! [`AppState`] owns the focus state, the input field handle, and the three
//! collaborators: the key listener, the outside-interaction detector and the
//! query channel. It is created mounted, with the activation shortcut, the
//! Escape binding and the outside-panel watch registered; [`AppState::unmount`]
//! revokes all of them together with any pending debounce.
//!
//! View models are computed on demand from a state snapshot, and the layout
//! pass places the screen regions the detector and click handling test
//! against.

use super::modes::{FocusState, Transition};
use crate::domain::{ProviderError, ResultSet};
use crate::input::{KeyChord, KeyCode, KeyListener, OutsideDetector, Point, Regions, ShortcutOptions};
use crate::query::QueryChannel;
use crate::ui::layout::{self, RESULT_LIST, SEARCH_INPUT, SEARCH_PANEL};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, FooterInfo, SearchBarInfo, SurfaceInfo, UIViewModel};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::time::Duration;

/// Handle to the text field the overlay types into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    focused: bool,
}

impl InputField {
    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.focused
    }
}

/// What the downstream renderer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation<'a> {
    pub query: &'a str,
    pub results: Option<&'a ResultSet>,
    pub error: Option<&'a ProviderError>,
    /// Whether the suggestion surface is shown.
    pub is_active: bool,
}

/// Central state of the search overlay.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current focus state. Mutated only through `activate`/`deactivate`.
    pub focus: FocusState,

    /// The search text field. `None` once unmounted.
    pub input: Option<InputField>,

    /// Highlighted suggestion within the current results.
    pub selected_index: usize,

    /// Colors used by the renderer.
    pub theme: Theme,

    /// Chord that activates the overlay.
    pub shortcut: KeyChord,

    pub(crate) keys: KeyListener<Transition>,
    pub(crate) outside: OutsideDetector<Transition>,
    pub(crate) channel: QueryChannel,
    pub(crate) regions: Regions,
}

impl AppState {
    /// Creates a mounted overlay in the `Unfocused` state.
    ///
    /// Registers `shortcut` (overriding its default handling) and Escape with
    /// the key listener, and a watch on the search panel with the outside
    /// detector.
    #[must_use]
    pub fn new(theme: Theme, shortcut: KeyChord, throttle: Duration) -> Self {
        let mut keys = KeyListener::new();
        keys.subscribe(
            shortcut.clone(),
            Transition::Activate,
            ShortcutOptions::default().overriding(),
        );
        keys.subscribe(
            KeyChord::new([KeyCode::Escape]),
            Transition::Deactivate,
            ShortcutOptions::default().overriding(),
        );

        let mut outside = OutsideDetector::new();
        outside.watch(SEARCH_PANEL, Transition::Deactivate);

        Self {
            focus: FocusState::Unfocused,
            input: Some(InputField::default()),
            selected_index: 0,
            theme,
            shortcut,
            keys,
            outside,
            channel: QueryChannel::new(throttle),
            regions: Regions::new(),
        }
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.input.is_some()
    }

    #[must_use]
    pub const fn channel(&self) -> &QueryChannel {
        &self.channel
    }

    #[must_use]
    pub const fn regions(&self) -> &Regions {
        &self.regions
    }

    /// Moves focus into the input field.
    ///
    /// Returns `false` if already focused or no input field is mounted.
    pub fn activate(&mut self) -> bool {
        if self.focus.is_focused() {
            return false;
        }
        let Some(input) = self.input.as_mut() else {
            tracing::debug!("activate ignored: input not mounted");
            return false;
        };

        input.focus();
        self.focus = FocusState::Focused;
        tracing::debug!("search overlay focused");
        true
    }

    /// Removes focus from the input field.
    ///
    /// Returns `false` if already unfocused or no input field is mounted.
    pub fn deactivate(&mut self) -> bool {
        if !self.focus.is_focused() {
            return false;
        }
        let Some(input) = self.input.as_mut() else {
            tracing::debug!("deactivate ignored: input not mounted");
            return false;
        };

        input.blur();
        self.focus = FocusState::Unfocused;
        tracing::debug!("search overlay unfocused");
        true
    }

    pub(crate) fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::Activate => self.activate(),
            Transition::Deactivate => self.deactivate(),
        }
    }

    /// Revokes every subscription and the pending debounce.
    pub fn unmount(&mut self) {
        tracing::debug!(focus = ?self.focus, "unmounting search overlay");
        self.keys.clear();
        self.outside.clear();
        self.channel.cancel();
        self.regions.clear();
        self.input = None;
        self.focus = FocusState::Unfocused;
    }

    /// The `{query, results, error, isActive}` snapshot for the renderer.
    #[must_use]
    pub fn presentation(&self) -> Presentation<'_> {
        let state = self.channel.state();
        Presentation {
            query: &state.query,
            results: state.results.as_ref(),
            error: state.error.as_ref(),
            is_active: self.focus.is_focused() && state.has_content(),
        }
    }

    /// Whether the keyboard shortcut hint is shown.
    #[must_use]
    pub const fn shows_shortcut_hint(&self) -> bool {
        !self.focus.is_focused()
    }

    /// The hit under the selection cursor, if any.
    #[must_use]
    pub fn selected_url(&self) -> Option<&str> {
        self.channel
            .state()
            .results
            .as_ref()
            .and_then(|r| r.hits.get(self.selected_index))
            .map(|hit| hit.url.as_str())
    }

    fn hit_count(&self) -> usize {
        self.channel.state().results.as_ref().map_or(0, ResultSet::len)
    }

    /// Moves the selection down one hit, wrapping to the top.
    pub fn move_selection_down(&mut self) -> bool {
        let count = self.hit_count();
        if count == 0 {
            return false;
        }
        self.selected_index = (self.selected_index + 1) % count;
        true
    }

    /// Moves the selection up one hit, wrapping to the bottom.
    pub fn move_selection_up(&mut self) -> bool {
        let count = self.hit_count();
        if count == 0 {
            return false;
        }
        self.selected_index = self.selected_index.checked_sub(1).unwrap_or(count - 1);
        true
    }

    /// Maps a point inside the result list to a hit index.
    #[must_use]
    pub fn hit_at(&self, point: Point) -> Option<usize> {
        let rect = self.regions.rect(RESULT_LIST)?;
        if !rect.contains(point) {
            return None;
        }
        let (start, _) = self.visible_window(rect.height);
        let index = start + (point.row - rect.row);
        (index < self.hit_count()).then_some(index)
    }

    /// First hit index and hit count shown when `rows` list rows fit.
    fn visible_window(&self, rows: usize) -> (usize, usize) {
        let count = self.hit_count();
        if rows == 0 || count == 0 {
            return (0, 0);
        }
        let visible = rows.min(count);
        let start = self
            .selected_index
            .saturating_sub(visible / 2)
            .min(count - visible);
        (start, visible)
    }

    /// Computes the view model and places the screen regions it occupies.
    pub fn layout(&mut self, rows: usize, cols: usize) -> UIViewModel {
        let vm = self.compute_viewmodel(rows, cols);

        self.regions.clear();
        if self.is_mounted() {
            if let Some(placed) = &vm.layout {
                self.regions.place(SEARCH_PANEL, placed.panel);
                self.regions.place(SEARCH_INPUT, placed.input);
                if let Some(list) = placed.list {
                    self.regions.place(RESULT_LIST, list);
                }
            }
        }
        vm
    }

    /// Transforms the current state into a renderable view model.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let presentation = self.presentation();
        let loading = self.channel.has_pending() || self.channel.is_loading();

        let search_bar = SearchBarInfo {
            query: presentation.query.to_string(),
            focused: self.focus.is_focused(),
            hint: self.shows_shortcut_hint().then(|| self.shortcut.to_string()),
            loading: self.focus.is_focused() && loading,
        };

        let surface = presentation
            .is_active
            .then(|| self.compute_surface(&presentation, loading, rows));

        let footer = self.focus.is_focused().then(|| FooterInfo {
            keybindings: "↑/↓: select  Enter: open  Esc: close".to_string(),
        });

        let layout = layout::compute(rows, cols, surface.as_ref(), footer.is_some());

        UIViewModel {
            layout,
            search_bar,
            surface,
            footer,
        }
    }

    fn compute_surface(&self, presentation: &Presentation<'_>, loading: bool, rows: usize) -> SurfaceInfo {
        let error = presentation.error.map(ToString::to_string);

        let message = match presentation.results {
            None if loading => Some("Searching…".to_string()),
            None if error.is_none() => Some("Type to search the documentation".to_string()),
            Some(results) if results.is_empty() => {
                Some(format!("No results for \"{}\"", presentation.query))
            }
            Some(results) => Some(result_count(results)),
            None => None,
        };

        let reserved = usize::from(error.is_some()) + usize::from(message.is_some());
        let list_rows = layout::max_surface_rows(rows).saturating_sub(reserved);
        let (start, visible) = self.visible_window(list_rows);

        let matcher = (!presentation.query.is_empty()).then(SkimMatcherV2::default);

        let items = presentation
            .results
            .map(|results| {
                results.hits[start..start + visible]
                    .iter()
                    .enumerate()
                    .map(|(offset, hit)| DisplayItem {
                        title: hit.title.clone(),
                        section: hit.section.clone(),
                        snippet: hit.snippet.clone(),
                        url: hit.url.clone(),
                        is_selected: start + offset == self.selected_index,
                        highlight_ranges: matcher.as_ref().map_or_else(Vec::new, |m| {
                            compute_highlight_ranges(&hit.title, presentation.query, m)
                        }),
                    })
                    .collect()
            })
            .unwrap_or_default();

        SurfaceInfo {
            items,
            message,
            error,
        }
    }
}

fn result_count(results: &ResultSet) -> String {
    match results.total {
        1 => "1 result".to_string(),
        n => format!("{n} results"),
    }
}

/// Coalesces the fuzzy match positions of `query` in `text` into
/// `(start, end)` character ranges.
fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Hit;
    use std::time::Instant;

    fn state() -> AppState {
        AppState::new(
            Theme::default(),
            "Ctrl+k".parse().unwrap(),
            Duration::from_millis(800),
        )
    }

    fn hit(title: &str) -> Hit {
        Hit {
            id: title.to_string(),
            url: format!("https://docs.example.com/{title}"),
            title: title.to_string(),
            section: None,
            snippet: None,
        }
    }

    fn with_results(state: &mut AppState, titles: &[&str]) {
        let t0 = Instant::now();
        state.channel.search("q", t0);
        let crate::query::Poll::Dispatch(request) = state.channel.poll(t0 + Duration::from_secs(1)) else {
            panic!("expected dispatch");
        };
        state.channel.settle(
            request.id,
            Ok(ResultSet {
                query: "q".to_string(),
                hits: titles.iter().map(|t| hit(t)).collect(),
                total: titles.len() as u64,
            }),
        );
    }

    #[test]
    fn starts_unfocused_with_hint() {
        let state = state();
        assert_eq!(state.focus, FocusState::Unfocused);
        assert!(state.shows_shortcut_hint());
        assert!(!state.presentation().is_active);
        assert_eq!(state.keys.len(), 2);
    }

    #[test]
    fn activation_is_idempotent() {
        let mut state = state();
        assert!(state.activate());
        assert!(!state.activate());
        assert!(state.input.as_ref().unwrap().has_focus());
        assert!(!state.shows_shortcut_hint());
    }

    #[test]
    fn deactivate_while_unfocused_is_noop() {
        let mut state = state();
        assert!(!state.deactivate());
        assert_eq!(state.focus, FocusState::Unfocused);
    }

    #[test]
    fn surface_needs_focus_and_content() {
        let mut state = state();
        state.activate();
        assert!(!state.presentation().is_active);

        state.channel.search("d", Instant::now());
        assert!(state.presentation().is_active);

        state.deactivate();
        assert!(!state.presentation().is_active);
    }

    #[test]
    fn unmounted_state_ignores_activation() {
        let mut state = state();
        state.unmount();
        assert!(!state.activate());
        assert!(state.keys.is_empty());
        assert!(state.outside.is_empty());
    }

    #[test]
    fn selection_wraps() {
        let mut state = state();
        with_results(&mut state, &["a", "b", "c"]);

        assert!(state.move_selection_up());
        assert_eq!(state.selected_index, 2);
        assert!(state.move_selection_down());
        assert_eq!(state.selected_index, 0);
        assert_eq!(state.selected_url(), Some("https://docs.example.com/a"));
    }

    #[test]
    fn layout_places_regions_and_maps_clicks_to_hits() {
        let mut state = state();
        state.activate();
        with_results(&mut state, &["alpha", "beta"]);

        let vm = state.layout(24, 100);
        let placed = vm.layout.expect("panel fits");
        assert_eq!(state.regions().rect(SEARCH_PANEL), Some(placed.panel));

        let list = placed.list.expect("results shown");
        assert_eq!(state.hit_at(Point::new(list.row + 1, list.col + 2)), Some(1));
        assert_eq!(state.hit_at(Point::new(0, 0)), None);
    }

    #[test]
    fn empty_results_show_message() {
        let mut state = state();
        state.activate();
        with_results(&mut state, &[]);

        let vm = state.compute_viewmodel(24, 100);
        let surface = vm.surface.expect("surface shown");
        assert_eq!(surface.message.as_deref(), Some("No results for \"q\""));
        assert!(surface.items.is_empty());
    }

    #[test]
    fn results_show_total_and_snippets() {
        let mut state = state();
        state.activate();
        let t0 = Instant::now();
        state.channel.search("inst", t0);
        let crate::query::Poll::Dispatch(request) = state.channel.poll(t0 + Duration::from_secs(1)) else {
            panic!("expected dispatch");
        };
        state.channel.settle(
            request.id,
            Ok(ResultSet {
                query: "inst".to_string(),
                hits: vec![Hit {
                    snippet: Some("Run the installer first".to_string()),
                    ..hit("install")
                }],
                total: 42,
            }),
        );

        let surface = state.compute_viewmodel(24, 100).surface.expect("surface shown");
        assert_eq!(surface.message.as_deref(), Some("42 results"));
        assert_eq!(surface.items[0].snippet.as_deref(), Some("Run the installer first"));
    }

    #[test]
    fn single_result_is_singular() {
        let mut state = state();
        state.activate();
        with_results(&mut state, &["only"]);

        let surface = state.compute_viewmodel(24, 100).surface.expect("surface shown");
        assert_eq!(surface.message.as_deref(), Some("1 result"));
        assert_eq!(surface.items[0].snippet, None);
    }

    #[test]
    fn highlight_ranges_coalesce() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(
            compute_highlight_ranges("install", "inst", &matcher),
            vec![(0, 4)]
        );
        assert!(compute_highlight_ranges("install", "zz", &matcher).is_empty());
    }
}
