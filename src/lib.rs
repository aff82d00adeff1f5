//! Docseek: a documentation search overlay for Zellij.
//!
//! Docseek renders a search box that is activated with a global shortcut or a
//! click, debounces typed queries into requests against a hosted
//! documentation index, and shows the matching pages as a suggestion list.
//! Escape or a click anywhere outside the panel dismisses it.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Focus machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Input (input/)│   │ Query (query/)│   │ UI Layer (ui/)│
//! │ - Key chords  │   │ - Debounce    │   │ - Layout      │
//! │ - Outside     │   │ - Ordering    │   │ - Rendering   │
//! │   clicks      │   │ - HTTP codec  │   │ - Theming     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! │  - Result sets and errors (domain/)                 │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - File-based OTLP trace export (observability/)    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Focus state machine with event/action model
//! - [`domain`]: Hits, result sets and error types
//! - [`input`]: Global key listener and outside-interaction detector
//! - [`query`]: Debounced query channel and search provider mapping
//! - [`ui`]: Terminal rendering with theme support
//! - [`infrastructure`]: Sandbox path helpers
//! - `observability`: OpenTelemetry tracing
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/docseek.wasm" {
//!         site_key "1bed1ffde465fddba2a53ad3ce69e6c2"
//!         throttle_ms "800"
//!         shortcut "Ctrl+k"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Library usage
//!
//! ```rust
//! use docseek::{handle_event, initialize, Action, Config, Event};
//! use std::time::Instant;
//!
//! let mut state = initialize(&Config::default());
//! state.activate();
//!
//! let key = docseek::input::KeyInput::press(docseek::input::KeyCode::Char('a'));
//! let (_, actions) = handle_event(&mut state, &Event::Key(key), Instant::now())?;
//! assert!(matches!(actions.as_slice(), [Action::ScheduleWake(_)]));
//! # Ok::<(), docseek::DocseekError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod input;
pub mod query;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, FocusState};
pub use domain::{DocseekError, ProviderError, Result};
pub use ui::Theme;

use input::KeyChord;
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_SHORTCUT: &str = "Ctrl+k";
const DEFAULT_HITS_PER_PAGE: u32 = 8;
const DEFAULT_OPEN_COMMAND: &str = "xdg-open";

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public site key of the search index.
    pub site_key: Option<String>,

    /// Base URL override. Default: `https://api.addsearch.com`
    pub endpoint: Option<String>,

    /// Debounce window between outbound requests. Default: 800 ms
    pub throttle: Duration,

    /// Hits requested per search (`limit`). Default: 8
    pub hits_per_page: u32,

    /// Activation shortcut, e.g. `Ctrl+k` or `Alt k`.
    pub shortcut: String,

    /// Command run with a hit URL as its only argument.
    pub open_command: String,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~` maps to the sandbox home.
    pub theme_file: Option<String>,

    /// Tracing filter directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_key: None,
            endpoint: None,
            throttle: query::DEFAULT_THROTTLE,
            hits_per_page: DEFAULT_HITS_PER_PAGE,
            shortcut: DEFAULT_SHORTCUT.to_string(),
            open_command: DEFAULT_OPEN_COMMAND.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable numbers fall back to their defaults; blank strings count
    /// as unset.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use docseek::Config;
    ///
    /// let map = BTreeMap::from([
    ///     ("throttle_ms".to_string(), "250".to_string()),
    ///     ("hits_per_page".to_string(), "lots".to_string()),
    /// ]);
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.throttle, Duration::from_millis(250));
    /// assert_eq!(config.hits_per_page, 8);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let defaults = Self::default();

        let throttle = text("throttle_ms")
            .and_then(|s| s.parse::<u64>().ok())
            .map_or(defaults.throttle, Duration::from_millis);

        let hits_per_page = text("hits_per_page")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.hits_per_page);

        Self {
            site_key: text("site_key"),
            endpoint: text("endpoint"),
            throttle,
            hits_per_page,
            shortcut: text("shortcut").unwrap_or(defaults.shortcut),
            open_command: text("open_command").unwrap_or(defaults.open_command),
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
        }
    }

    /// The activation chord, falling back to `Ctrl+k` if `shortcut` does not
    /// parse.
    #[must_use]
    pub fn shortcut_chord(&self) -> KeyChord {
        self.shortcut.parse().unwrap_or_else(|e| {
            tracing::debug!(shortcut = %self.shortcut, error = %e, "invalid shortcut, using default");
            default_chord()
        })
    }
}

fn default_chord() -> KeyChord {
    KeyChord::new([
        input::KeyCode::Modifier(input::Modifier::Ctrl),
        input::KeyCode::Char('k'),
    ])
}

/// Creates a mounted overlay from configuration.
///
/// The theme comes from `theme_file`, then `theme_name`, then the default;
/// load failures are logged and fall back to the default.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing docseek plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            let path = infrastructure::expand_tilde(theme_file);
            Theme::from_file(&path).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %path, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(theme, config.shortcut_chord(), config.throttle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_map_is_empty() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config.throttle, Duration::from_millis(800));
        assert_eq!(config.hits_per_page, 8);
        assert_eq!(config.shortcut, "Ctrl+k");
        assert_eq!(config.open_command, "xdg-open");
        assert!(config.site_key.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let map = BTreeMap::from([("site_key".to_string(), "  ".to_string())]);
        assert!(Config::from_zellij(&map).site_key.is_none());
    }

    #[test]
    fn invalid_shortcut_falls_back_to_ctrl_k() {
        let config = Config {
            shortcut: "hyper+k".to_string(),
            ..Config::default()
        };
        assert_eq!(config.shortcut_chord(), default_chord());
    }

    #[test]
    fn initialize_uses_configured_shortcut_and_theme() {
        let config = Config {
            shortcut: "Alt s".to_string(),
            theme_name: Some("catppuccin-latte".to_string()),
            ..Config::default()
        };
        let state = initialize(&config);
        assert_eq!(state.shortcut.to_string(), "Alt+S");
        assert_eq!(state.theme.name, "catppuccin-latte");
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("nope".to_string()),
            ..Config::default()
        };
        assert_eq!(initialize(&config).theme.name, "catppuccin-mocha");
    }
}
