//! Event handling and state transition logic.
//!
//! Raw host events are translated by the plugin shim into [`Event`] values and
//! handed to [`handle_event`] together with the current instant. The handler
//! feeds the key listener and the outside-interaction detector, applies the
//! focus transitions they report, drives the query channel, and returns the
//! side effects the shim has to perform as [`Action`]s.
//!
//! # Data flow
//!
//! 1. The shim receives a Zellij event and maps it to one or more [`Event`]s
//! 2. [`handle_event`] mutates [`AppState`] through its methods
//! 3. The returned actions are executed by the shim in order
//! 4. The boolean tells the shim whether to re-render

use super::actions::Action;
use super::state::AppState;
use crate::domain::error::Result;
use crate::domain::{ProviderError, ResultSet};
use crate::input::{KeyCode, KeyInput, KeyPhase, Point};
use crate::query::{Poll, RequestId};
use crate::ui::layout::SEARCH_INPUT;
use std::time::Instant;

/// Events the overlay reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One raw key press, repeat or release.
    Key(KeyInput),

    /// A pointer button went down at the given cell.
    PointerDown(Point),

    /// A previously scheduled wake-up fired.
    Timer,

    /// A dispatched search request finished.
    SearchSettled {
        id: RequestId,
        outcome: std::result::Result<ResultSet, ProviderError>,
    },

    /// Programmatic activation (e.g. a pipe message).
    Activate,

    /// Programmatic deactivation.
    Deactivate,

    /// The overlay is being torn down.
    Unmount,
}

/// Processes an event, mutates state, and returns whether to re-render plus
/// the actions to execute.
///
/// # Errors
///
/// Reserved for state mutations that can fail; the current handlers do not.
pub fn handle_event(state: &mut AppState, event: &Event, now: Instant) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Key(input) => Ok(handle_key(state, input, now)),
        Event::PointerDown(point) => Ok(handle_pointer(state, *point)),
        Event::Timer => match state.channel.poll(now) {
            Poll::Idle => Ok((false, vec![])),
            Poll::Wait(remaining) => {
                tracing::trace!(remaining_ms = remaining.as_millis(), "wake-up early, re-arming");
                Ok((false, vec![Action::ScheduleWake(remaining)]))
            }
            Poll::Dispatch(request) => Ok((true, vec![Action::Search(request)])),
        },
        Event::SearchSettled { id, outcome } => {
            let changed = state.channel.settle(*id, outcome.clone());
            if changed && outcome.is_ok() {
                state.selected_index = 0;
            }
            Ok((changed, vec![]))
        }
        Event::Activate => Ok((state.activate(), vec![])),
        Event::Deactivate => Ok((state.deactivate(), vec![])),
        Event::Unmount => {
            state.unmount();
            Ok((false, vec![]))
        }
    }
}

fn handle_key(state: &mut AppState, input: &KeyInput, now: Instant) -> (bool, Vec<Action>) {
    let dispatch = state.keys.feed(input);

    let mut should_render = false;
    for transition in dispatch.fired {
        should_render |= state.apply(transition);
    }

    if dispatch.suppress_default
        || input.phase == KeyPhase::Release
        || !state.focus.is_focused()
        || state.keys.command_modifier_held()
    {
        return (should_render, vec![]);
    }

    match input.code {
        KeyCode::Char(c) => {
            let mut query = state.channel.query().to_string();
            query.push(c);
            (true, search(state, query, now))
        }
        KeyCode::Backspace => {
            let mut query = state.channel.query().to_string();
            if query.pop().is_none() {
                return (should_render, vec![]);
            }
            (true, search(state, query, now))
        }
        KeyCode::Down => (state.move_selection_down() || should_render, vec![]),
        KeyCode::Up => (state.move_selection_up() || should_render, vec![]),
        KeyCode::Enter => {
            let actions = state
                .selected_url()
                .map(|url| vec![Action::OpenUrl(url.to_string())])
                .unwrap_or_default();
            (should_render, actions)
        }
        _ => (should_render, vec![]),
    }
}

fn search(state: &mut AppState, query: String, now: Instant) -> Vec<Action> {
    state
        .channel
        .search(query, now)
        .map(|delay| vec![Action::ScheduleWake(delay)])
        .unwrap_or_default()
}

fn handle_pointer(state: &mut AppState, point: Point) -> (bool, Vec<Action>) {
    let fired = state.outside.pointer_down(point, &state.regions);

    let mut should_render = false;
    for transition in fired {
        should_render |= state.apply(transition);
    }

    if state.regions.contains(SEARCH_INPUT, point) == Some(true) {
        return (state.activate() || should_render, vec![]);
    }

    if state.focus.is_focused() {
        if let Some(index) = state.hit_at(point) {
            state.selected_index = index;
            let actions = state
                .selected_url()
                .map(|url| vec![Action::OpenUrl(url.to_string())])
                .unwrap_or_default();
            return (true, actions);
        }
    }

    (should_render, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FocusState;
    use crate::domain::Hit;
    use crate::input::Modifier;
    use crate::ui::theme::Theme;
    use std::time::Duration;

    const CTRL: KeyCode = KeyCode::Modifier(Modifier::Ctrl);

    fn state() -> AppState {
        AppState::new(Theme::default(), "Ctrl+k".parse().unwrap(), Duration::from_millis(800))
    }

    fn press(state: &mut AppState, code: KeyCode, now: Instant) -> Vec<Action> {
        let (_, actions) = handle_event(state, &Event::Key(KeyInput::press(code)), now).unwrap();
        handle_event(state, &Event::Key(KeyInput::release(code)), now).unwrap();
        actions
    }

    fn ctrl_k(state: &mut AppState, now: Instant) {
        handle_event(state, &Event::Key(KeyInput::press(CTRL)), now).unwrap();
        press(state, KeyCode::Char('k'), now);
        handle_event(state, &Event::Key(KeyInput::release(CTRL)), now).unwrap();
    }

    #[test]
    fn shortcut_activates_and_escape_deactivates() {
        let mut state = state();
        let now = Instant::now();

        ctrl_k(&mut state, now);
        assert_eq!(state.focus, FocusState::Focused);
        assert_eq!(state.channel.query(), "");

        press(&mut state, KeyCode::Escape, now);
        assert_eq!(state.focus, FocusState::Unfocused);
    }

    #[test]
    fn typing_requires_focus() {
        let mut state = state();
        let now = Instant::now();

        assert!(press(&mut state, KeyCode::Char('a'), now).is_empty());
        assert_eq!(state.channel.query(), "");

        state.activate();
        let actions = press(&mut state, KeyCode::Char('a'), now);
        assert_eq!(actions, vec![Action::ScheduleWake(Duration::from_millis(800))]);
        assert_eq!(state.channel.query(), "a");
    }

    #[test]
    fn timer_dispatches_once_window_elapses() {
        let mut state = state();
        let t0 = Instant::now();
        state.activate();
        press(&mut state, KeyCode::Char('f'), t0);

        let (_, early) = handle_event(&mut state, &Event::Timer, t0 + Duration::from_millis(300)).unwrap();
        assert_eq!(early, vec![Action::ScheduleWake(Duration::from_millis(500))]);

        let (_, due) = handle_event(&mut state, &Event::Timer, t0 + Duration::from_millis(800)).unwrap();
        assert!(matches!(due.as_slice(), [Action::Search(r)] if r.query == "f"));
    }

    #[test]
    fn enter_opens_selected_hit() {
        let mut state = state();
        let t0 = Instant::now();
        state.activate();
        press(&mut state, KeyCode::Char('x'), t0);

        let (_, actions) = handle_event(&mut state, &Event::Timer, t0 + Duration::from_secs(1)).unwrap();
        let [Action::Search(request)] = actions.as_slice() else {
            panic!("expected search");
        };

        let hit = Hit {
            id: "1".to_string(),
            url: "https://docs.example.com/x".to_string(),
            title: "X".to_string(),
            section: None,
            snippet: None,
        };
        handle_event(
            &mut state,
            &Event::SearchSettled {
                id: request.id,
                outcome: Ok(ResultSet {
                    query: "x".to_string(),
                    hits: vec![hit],
                    total: 1,
                }),
            },
            t0,
        )
        .unwrap();

        let actions = press(&mut state, KeyCode::Enter, t0);
        assert_eq!(actions, vec![Action::OpenUrl("https://docs.example.com/x".to_string())]);
    }

    #[test]
    fn click_outside_panel_deactivates() {
        let mut state = state();
        state.activate();
        state.layout(24, 100);

        let (render, _) = handle_event(&mut state, &Event::PointerDown(Point::new(23, 0)), Instant::now()).unwrap();
        assert!(render);
        assert_eq!(state.focus, FocusState::Unfocused);
    }

    #[test]
    fn click_on_input_activates() {
        let mut state = state();
        let vm = state.layout(24, 100);
        let input = vm.layout.unwrap().input;

        handle_event(&mut state, &Event::PointerDown(Point::new(input.row + 1, input.col + 1)), Instant::now()).unwrap();
        assert_eq!(state.focus, FocusState::Focused);
    }

    #[test]
    fn unmount_stops_everything() {
        let mut state = state();
        let now = Instant::now();
        state.activate();
        press(&mut state, KeyCode::Char('a'), now);

        handle_event(&mut state, &Event::Unmount, now).unwrap();
        ctrl_k(&mut state, now);
        assert_eq!(state.focus, FocusState::Unfocused);

        let (_, actions) = handle_event(&mut state, &Event::Timer, now + Duration::from_secs(5)).unwrap();
        assert!(actions.is_empty());
    }
}
