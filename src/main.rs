//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the docseek library and
//! the Zellij plugin system. It translates host events into library
//! [`Event`]s, feeds them through [`handle_event`], and performs the returned
//! [`Action`]s with host calls.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, build the search provider,
//!    create `AppState`
//! 2. **Subscribe**: Key, Mouse, Timer, `WebRequestResult`, `BeforeClose`
//! 3. **Update**: Map each host event, delegate to the library layer
//! 4. **Render**: Lay out and draw the panel
//! 5. **Close**: `BeforeClose` unmounts the overlay
//!
//! # Event Mapping
//!
//! - `Key` → one `Event::Key` per synthesized press/release
//! - `Mouse(LeftClick)` → `Event::PointerDown`
//! - `Timer` → `Event::Timer`
//! - `WebRequestResult` → `Event::SearchSettled`
//! - `BeforeClose` → `Event::Unmount`
//! - pipe `activate` / `deactivate` → `Event::Activate` / `Event::Deactivate`

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_family = "wasm")]
use zellij_tile::prelude::*;

#[cfg(target_family = "wasm")]
register_plugin!(plugin::State);

/// Host builds (unit and integration tests) link without the Zellij runtime.
#[cfg(not(target_family = "wasm"))]
fn main() {}

#[cfg(target_family = "wasm")]
mod plugin {
    use std::collections::BTreeMap;
    use std::time::Instant;
    use zellij_tile::prelude::*;

    use docseek::input::{KeyInput, Point};
    use docseek::query::provider::{self, SearchProvider};
    use docseek::query::SearchRequest;
    use docseek::{handle_event, Action, Config, Event, ProviderError};

    /// Plugin state wrapper.
    ///
    /// Wraps the library's `AppState` with the host-facing pieces: the search
    /// provider and the command used to open pages.
    pub(crate) struct State {
        /// Core application state from library layer.
        app: docseek::AppState,

        /// `None` when the site key is missing; searches then fail with
        /// [`ProviderError::NotConfigured`].
        provider: Option<SearchProvider>,

        open_command: String,
    }

    impl Default for State {
        fn default() -> Self {
            let default_config = Config::default();
            Self {
                app: docseek::initialize(&default_config),
                provider: None,
                open_command: default_config.open_command,
            }
        }
    }

    impl ZellijPlugin for State {
        fn load(&mut self, configuration: BTreeMap<String, String>) {
            let config = Config::from_zellij(&configuration);
            docseek::observability::init_tracing(&config);

            let span = tracing::debug_span!("plugin_load");
            let _guard = span.entered();

            tracing::debug!(
                site_key = ?config.site_key,
                throttle_ms = config.throttle.as_millis(),
                shortcut = %config.shortcut,
                "parsed configuration"
            );
            self.app = docseek::initialize(&config);
            self.open_command.clone_from(&config.open_command);

            self.provider = match SearchProvider::from_config(&config) {
                Ok(provider) => Some(provider),
                Err(e) => {
                    tracing::warn!(error = %e, "search provider not configured");
                    None
                }
            };

            request_permission(&[PermissionType::WebAccess, PermissionType::RunCommands]);

            subscribe(&[
                EventType::Key,
                EventType::Mouse,
                EventType::Timer,
                EventType::WebRequestResult,
                EventType::PermissionRequestResult,
                EventType::BeforeClose,
            ]);

            tracing::debug!("plugin load complete");
        }

        fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
            let event_name = Self::get_event_name(&event);
            let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
            let _guard = span.entered();

            match event {
                zellij_tile::prelude::Event::Key(key) => KeyInput::sequence_for(&key)
                    .into_iter()
                    .fold(false, |render, input| self.dispatch(Event::Key(input)) || render),
                zellij_tile::prelude::Event::Mouse(Mouse::LeftClick(line, col)) => {
                    let Ok(row) = usize::try_from(line) else {
                        return false;
                    };
                    self.dispatch(Event::PointerDown(Point::new(row, col)))
                }
                zellij_tile::prelude::Event::Timer(_) => self.dispatch(Event::Timer),
                zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                    match Self::map_web_result(status, &body, &context) {
                        Some(event) => self.dispatch(event),
                        None => false,
                    }
                }
                zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                    if matches!(status, PermissionStatus::Denied) {
                        tracing::warn!("permissions denied - searches and opening pages will fail");
                    }
                    false
                }
                zellij_tile::prelude::Event::BeforeClose => self.dispatch(Event::Unmount),
                _ => false,
            }
        }

        fn pipe(&mut self, pipe_message: PipeMessage) -> bool {
            let command = pipe_message.payload.as_deref().unwrap_or(&pipe_message.name);
            tracing::debug!(command = %command, "pipe message");

            match command.trim() {
                "activate" => self.dispatch(Event::Activate),
                "deactivate" => self.dispatch(Event::Deactivate),
                other => {
                    tracing::debug!(command = %other, "ignoring unknown pipe command");
                    false
                }
            }
        }

        fn render(&mut self, rows: usize, cols: usize) {
            docseek::ui::render(&mut self.app, rows, cols);
        }
    }

    impl State {
        /// Runs an event and every follow-up event its actions produce.
        fn dispatch(&mut self, event: Event) -> bool {
            let mut queue = vec![event];
            let mut should_render = false;

            while let Some(event) = queue.pop() {
                match handle_event(&mut self.app, &event, Instant::now()) {
                    Ok((render, actions)) => {
                        tracing::debug!(action_count = actions.len(), should_render = render, "event handled");
                        should_render |= render;
                        queue.extend(actions.iter().filter_map(|a| self.execute_action(a)));
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "error handling event");
                    }
                }
            }
            should_render
        }

        fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
            match event {
                zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
                zellij_tile::prelude::Event::Mouse(..) => "Mouse".to_string(),
                zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
                zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                    format!("WebRequestResult({status})")
                }
                zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                    "PermissionRequestResult".to_string()
                }
                zellij_tile::prelude::Event::BeforeClose => "BeforeClose".to_string(),
                _ => "Other".to_string(),
            }
        }

        /// Maps a web response back to the request that produced it.
        fn map_web_result(status: u16, body: &[u8], context: &BTreeMap<String, String>) -> Option<Event> {
            let Some(id) = provider::request_id(context) else {
                tracing::debug!(status, "web response without request id");
                return None;
            };

            if let Some(trace) = provider::trace_context(context) {
                tracing::debug!(request_id = %id, trace_id = %trace.trace_id, parent_span_id = %trace.parent_span_id, status, "search response");
            }

            Some(Event::SearchSettled {
                id,
                outcome: provider::parse_response(status, body, provider::request_query(context)),
            })
        }

        /// Issues the web request for `request`, or returns its immediate failure.
        fn send(&self, request: &SearchRequest) -> Option<Event> {
            let failed = |error: ProviderError| {
                Some(Event::SearchSettled {
                    id: request.id,
                    outcome: Err(error),
                })
            };

            let Some(provider) = &self.provider else {
                return failed(ProviderError::NotConfigured);
            };

            let call = provider.build(request);
            tracing::debug!(request_id = %request.id, url = %call.url, "sending search request");
            web_request(call.url, HttpVerb::Get, call.headers, Vec::new(), call.context);
            None
        }

        /// Executes an action, returning the event it settles immediately, if any.
        #[tracing::instrument(level = "debug", skip(self))]
        fn execute_action(&self, action: &Action) -> Option<Event> {
            match action {
                Action::ScheduleWake(delay) => {
                    set_timeout(delay.as_secs_f64());
                    None
                }
                Action::Search(request) => self.send(request),
                Action::OpenUrl(url) => {
                    tracing::debug!(url = %url, command = %self.open_command, "opening page");
                    run_command(&[self.open_command.as_str(), url.as_str()], BTreeMap::new());
                    None
                }
            }
        }
    }
}
