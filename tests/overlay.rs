//! End-to-end scenarios for the search overlay, driven through the public
//! event API the plugin shim uses.

use docseek::domain::{Hit, ResultSet};
use docseek::input::{KeyCode, KeyInput, Modifier, Point};
use docseek::query::SearchRequest;
use docseek::{handle_event, initialize, Action, AppState, Config, Event, FocusState, ProviderError};
use std::time::{Duration, Instant};

const CTRL: KeyCode = KeyCode::Modifier(Modifier::Ctrl);

fn overlay() -> AppState {
    initialize(&Config::default())
}

fn send(state: &mut AppState, event: Event, now: Instant) -> (bool, Vec<Action>) {
    handle_event(state, &event, now).unwrap()
}

fn tap(state: &mut AppState, code: KeyCode, now: Instant) -> Vec<Action> {
    let (_, actions) = send(state, Event::Key(KeyInput::press(code)), now);
    send(state, Event::Key(KeyInput::release(code)), now);
    actions
}

fn type_text(state: &mut AppState, text: &str, now: Instant) {
    for c in text.chars() {
        tap(state, KeyCode::Char(c), now);
    }
}

fn shortcut(state: &mut AppState, now: Instant) -> bool {
    send(state, Event::Key(KeyInput::press(CTRL)), now);
    let (render, _) = send(state, Event::Key(KeyInput::press(KeyCode::Char('k'))), now);
    send(state, Event::Key(KeyInput::release(KeyCode::Char('k'))), now);
    send(state, Event::Key(KeyInput::release(CTRL)), now);
    render
}

fn searches(actions: &[Action]) -> Vec<SearchRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Search(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

fn results(query: &str, titles: &[&str]) -> ResultSet {
    ResultSet {
        query: query.to_string(),
        hits: titles
            .iter()
            .map(|t| Hit {
                id: (*t).to_string(),
                url: format!("https://docs.example.com/{t}"),
                title: (*t).to_string(),
                section: Some("Guide".to_string()),
                snippet: None,
            })
            .collect(),
        total: titles.len() as u64,
    }
}

/// Fires the wake-up timer at `at` and returns the request it dispatched.
fn wake(state: &mut AppState, at: Instant) -> Option<SearchRequest> {
    let (_, actions) = send(state, Event::Timer, at);
    searches(&actions).into_iter().next()
}

#[test]
fn burst_of_keystrokes_dispatches_once_with_last_query() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);

    for (i, c) in "abc".chars().enumerate() {
        tap(&mut state, KeyCode::Char(c), t0 + Duration::from_millis(100 * i as u64));
    }

    let mut dispatched = Vec::new();
    for ms in [800, 900, 1000, 1500, 3000] {
        dispatched.extend(wake(&mut state, t0 + Duration::from_millis(ms)));
    }

    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].query, "abc");
}

#[test]
fn late_response_for_older_query_never_overwrites_newer_results() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);

    type_text(&mut state, "a", t0);
    let first = wake(&mut state, t0 + Duration::from_secs(1)).unwrap();

    let t1 = t0 + Duration::from_secs(2);
    type_text(&mut state, "b", t1);
    let second = wake(&mut state, t1 + Duration::from_secs(1)).unwrap();

    send(&mut state, Event::SearchSettled { id: second.id, outcome: Ok(results("ab", &["new"])) }, t1);
    let (render, _) = send(&mut state, Event::SearchSettled { id: first.id, outcome: Ok(results("a", &["old"])) }, t1);

    assert!(!render);
    let view = state.presentation();
    assert_eq!(view.query, "ab");
    assert_eq!(view.results, Some(&results("ab", &["new"])));
}

#[test]
fn shortcut_while_focused_changes_nothing() {
    let mut state = overlay();
    let t0 = Instant::now();
    assert!(shortcut(&mut state, t0));
    type_text(&mut state, "k", t0);

    assert!(!shortcut(&mut state, t0));
    assert_eq!(state.focus, FocusState::Focused);
    assert_eq!(state.channel().query(), "k");
}

#[test]
fn clicks_inside_keep_focus_and_outside_deactivates_once() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);

    let vm = state.layout(30, 120);
    let panel = vm.layout.unwrap().panel;

    let (_, _) = send(&mut state, Event::PointerDown(Point::new(panel.row, panel.col + 1)), t0);
    assert_eq!(state.focus, FocusState::Focused);

    let outside = Point::new(panel.bottom() + 5, 0);
    let (first, _) = send(&mut state, Event::PointerDown(outside), t0);
    assert!(first);
    assert_eq!(state.focus, FocusState::Unfocused);

    let (second, _) = send(&mut state, Event::PointerDown(outside), t0);
    assert!(!second);
}

#[test]
fn escape_blurs_when_focused_and_is_a_noop_otherwise() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);
    assert!(state.input.as_ref().unwrap().has_focus());

    tap(&mut state, KeyCode::Escape, t0);
    assert_eq!(state.focus, FocusState::Unfocused);
    assert!(!state.input.as_ref().unwrap().has_focus());

    let (render, actions) = send(&mut state, Event::Key(KeyInput::press(KeyCode::Escape)), t0);
    assert!(!render);
    assert!(actions.is_empty());
    assert_eq!(state.focus, FocusState::Unfocused);
}

#[test]
fn quick_edit_sends_only_final_query_and_shows_its_results() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);

    type_text(&mut state, "abc", t0);
    tap(&mut state, KeyCode::Char('d'), t0 + Duration::from_millis(100));

    assert!(wake(&mut state, t0 + Duration::from_millis(800)).is_none());
    let request = wake(&mut state, t0 + Duration::from_millis(900)).unwrap();
    assert_eq!(request.query, "abcd");

    let r = results("abcd", &["alpha"]);
    send(&mut state, Event::SearchSettled { id: request.id, outcome: Ok(r.clone()) }, t0);

    let view = state.presentation();
    assert_eq!(view.query, "abcd");
    assert_eq!(view.results, Some(&r));
    assert_eq!(view.error, None);
    assert!(view.is_active);
}

#[test]
fn failure_keeps_previous_results_next_to_the_error() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);

    type_text(&mut state, "y", t0);
    let y = wake(&mut state, t0 + Duration::from_secs(1)).unwrap();
    let ry = results("y", &["why"]);
    send(&mut state, Event::SearchSettled { id: y.id, outcome: Ok(ry.clone()) }, t0);

    let t1 = t0 + Duration::from_secs(2);
    tap(&mut state, KeyCode::Backspace, t1);
    type_text(&mut state, "x", t1);
    let x = wake(&mut state, t1 + Duration::from_secs(1)).unwrap();
    assert_eq!(x.query, "x");

    let error = ProviderError::Status { code: 500, message: "boom".to_string() };
    send(&mut state, Event::SearchSettled { id: x.id, outcome: Err(error.clone()) }, t1);

    let view = state.presentation();
    assert_eq!(view.query, "x");
    assert_eq!(view.results, Some(&ry));
    assert_eq!(view.error, Some(&error));
}

#[test]
fn unmount_during_pending_debounce_dispatches_nothing() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);
    type_text(&mut state, "pending", t0);

    send(&mut state, Event::Unmount, t0 + Duration::from_millis(100));

    let (render, actions) = send(&mut state, Event::Timer, t0 + Duration::from_secs(5));
    assert!(!render);
    assert!(actions.is_empty());
    assert!(!state.is_mounted());
    assert!(state.regions().rect(docseek::ui::layout::SEARCH_PANEL).is_none());
}

#[test]
fn failure_without_results_shows_error_line() {
    let mut state = overlay();
    let t0 = Instant::now();
    shortcut(&mut state, t0);
    type_text(&mut state, "q", t0);
    let request = wake(&mut state, t0 + Duration::from_secs(1)).unwrap();

    send(&mut state, Event::SearchSettled { id: request.id, outcome: Err(ProviderError::NotConfigured) }, t0);

    let vm = state.layout(24, 100);
    let surface = vm.surface.unwrap();
    assert!(surface.error.is_some());
    assert!(vm.layout.unwrap().notices.is_some());
}
