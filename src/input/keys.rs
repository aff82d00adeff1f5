//! Global key listener with chord subscriptions.
//!
//! The listener tracks which keys are currently held and reports registered
//! key combinations ([`KeyChord`]) to their subscribers. A subscription is an
//! observer registration: the subscriber hands over a payload value and gets a
//! [`SubscriptionId`] back; whenever the chord fires, the payload is returned
//! from [`KeyListener::feed`] so the caller can act on it without the listener
//! holding any callbacks into the caller's state.
//!
//! # Matching
//!
//! A chord matches when every key of the chord is held and the key just
//! pressed belongs to the chord. Extra held keys outside the chord do not block
//! the match. A non-repeatable binding fires once per press and re-arms when
//! one of its keys is released; a repeatable binding also fires on each repeat
//! event the input system generates while the chord is held.
//!
//! # Example
//!
//! ```rust
//! use docseek::input::keys::{KeyChord, KeyCode, KeyInput, KeyListener, Modifier, ShortcutOptions};
//!
//! let mut listener = KeyListener::new();
//! let chord = KeyChord::new([KeyCode::Modifier(Modifier::Ctrl), KeyCode::Char('k')]);
//! listener.subscribe(chord, "open", ShortcutOptions::default().overriding());
//!
//! listener.feed(&KeyInput::press(KeyCode::Modifier(Modifier::Ctrl)));
//! let dispatch = listener.feed(&KeyInput::press(KeyCode::Char('k')));
//! assert_eq!(dispatch.fired, vec!["open"]);
//! assert!(dispatch.suppress_default);
//! ```

use crate::domain::DocseekError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use zellij_tile::prelude::{BareKey, KeyModifier, KeyWithModifier};

/// Modifier keys that may take part in a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

/// A physical key as seen by the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    /// A printable character key.
    Char(char),
    /// A held modifier.
    Modifier(Modifier),
    Escape,
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// Any key the listener has no name for.
    Other,
}

impl KeyCode {
    /// Returns `true` for Ctrl, Alt and Super, which turn a character key into
    /// a command rather than text.
    #[must_use]
    pub const fn is_command_modifier(self) -> bool {
        matches!(
            self,
            Self::Modifier(Modifier::Ctrl | Modifier::Alt | Modifier::Super)
        )
    }
}

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    /// Auto-repeat generated while the key stays held.
    Repeat,
    Release,
}

/// A single raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: KeyCode,
    pub phase: KeyPhase,
}

impl KeyInput {
    #[must_use]
    pub const fn press(code: KeyCode) -> Self {
        Self { code, phase: KeyPhase::Press }
    }

    #[must_use]
    pub const fn repeat(code: KeyCode) -> Self {
        Self { code, phase: KeyPhase::Repeat }
    }

    #[must_use]
    pub const fn release(code: KeyCode) -> Self {
        Self { code, phase: KeyPhase::Release }
    }

    /// Expands a Zellij key event into the raw press/release sequence the
    /// listener understands.
    ///
    /// Zellij reports a key together with its modifiers as one event and has no
    /// notion of key-up, so the sequence is synthesized: modifiers down, key
    /// down, key up, modifiers up.
    #[must_use]
    pub fn sequence_for(key: &KeyWithModifier) -> Vec<Self> {
        let modifiers: Vec<KeyCode> = key
            .key_modifiers
            .iter()
            .map(|m| {
                KeyCode::Modifier(match m {
                    KeyModifier::Ctrl => Modifier::Ctrl,
                    KeyModifier::Alt => Modifier::Alt,
                    KeyModifier::Shift => Modifier::Shift,
                    KeyModifier::Super => Modifier::Super,
                })
            })
            .collect();

        let code = match key.bare_key {
            BareKey::Char(c) => KeyCode::Char(c),
            BareKey::Esc => KeyCode::Escape,
            BareKey::Enter => KeyCode::Enter,
            BareKey::Backspace => KeyCode::Backspace,
            BareKey::Tab => KeyCode::Tab,
            BareKey::Up => KeyCode::Up,
            BareKey::Down => KeyCode::Down,
            BareKey::Left => KeyCode::Left,
            BareKey::Right => KeyCode::Right,
            _ => KeyCode::Other,
        };

        let mut sequence: Vec<Self> = modifiers.iter().copied().map(Self::press).collect();
        sequence.push(Self::press(code));
        sequence.push(Self::release(code));
        sequence.extend(modifiers.iter().rev().copied().map(Self::release));
        sequence
    }
}

/// The set of keys that must be held together for a binding to fire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord(BTreeSet<KeyCode>);

impl KeyChord {
    pub fn new(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self(keys.into_iter().collect())
    }

    #[must_use]
    pub fn contains(&self, code: KeyCode) -> bool {
        self.0.contains(&code)
    }

    fn is_held(&self, held: &BTreeSet<KeyCode>) -> bool {
        self.0.is_subset(held)
    }
}

impl FromStr for KeyChord {
    type Err = DocseekError;

    /// Parses shortcut strings such as `Ctrl+k`, `alt k` or `Super+Shift+p`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == '+' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let Some((key, modifiers)) = parts.split_last() else {
            return Err(DocseekError::Config(format!("empty shortcut: {s:?}")));
        };

        let mut keys = BTreeSet::new();
        for m in modifiers {
            let modifier = match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => Modifier::Ctrl,
                "alt" | "option" => Modifier::Alt,
                "shift" => Modifier::Shift,
                "super" | "cmd" | "meta" => Modifier::Super,
                other => {
                    return Err(DocseekError::Config(format!(
                        "unknown modifier {other:?} in shortcut {s:?}"
                    )))
                }
            };
            keys.insert(KeyCode::Modifier(modifier));
        }

        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
            _ => match key.to_ascii_lowercase().as_str() {
                "esc" | "escape" => KeyCode::Escape,
                "enter" => KeyCode::Enter,
                "tab" => KeyCode::Tab,
                _ => {
                    return Err(DocseekError::Config(format!(
                        "unknown key {key:?} in shortcut {s:?}"
                    )))
                }
            },
        };
        keys.insert(code);

        Ok(Self(keys))
    }
}

impl fmt::Display for KeyChord {
    /// Modifiers first, joined with `+`, e.g. `Ctrl+K`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (modifiers, keys): (Vec<&KeyCode>, Vec<&KeyCode>) = self
            .0
            .iter()
            .partition(|code| matches!(code, KeyCode::Modifier(_)));

        let labels: Vec<String> = modifiers
            .into_iter()
            .chain(keys)
            .map(|code| match code {
                KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
                KeyCode::Modifier(m) => format!("{m:?}"),
                other => format!("{other:?}"),
            })
            .collect();
        write!(f, "{}", labels.join("+"))
    }
}

/// Per-binding behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutOptions {
    /// Fire on every repeat event while the chord stays held.
    pub repeatable: bool,
    /// Suppress the default handling of the chord's keys while it matches.
    pub overrides_system_default: bool,
}

impl ShortcutOptions {
    #[must_use]
    pub const fn overriding(mut self) -> Self {
        self.overrides_system_default = true;
        self
    }

    #[must_use]
    pub const fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }
}

/// Handle returned by a subscription; pass it back to revoke it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone)]
struct Binding<T> {
    id: SubscriptionId,
    chord: KeyChord,
    options: ShortcutOptions,
    payload: T,
    /// Set after firing; cleared when one of the chord's keys is released.
    latched: bool,
}

/// Result of feeding one key event to the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDispatch<T> {
    /// Payloads of the bindings that fired, in subscription order.
    pub fired: Vec<T>,
    /// Whether a matching binding asked for the default handling to be skipped.
    pub suppress_default: bool,
}

impl<T> Default for KeyDispatch<T> {
    fn default() -> Self {
        Self {
            fired: Vec::new(),
            suppress_default: false,
        }
    }
}

/// Observes raw key events and reports matching chords to subscribers.
#[derive(Debug, Clone)]
pub struct KeyListener<T> {
    held: BTreeSet<KeyCode>,
    bindings: Vec<Binding<T>>,
    next_id: u64,
}

impl<T> Default for KeyListener<T> {
    fn default() -> Self {
        Self {
            held: BTreeSet::new(),
            bindings: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> KeyListener<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `chord`; `payload` is reported each time it fires.
    pub fn subscribe(&mut self, chord: KeyChord, payload: T, options: ShortcutOptions) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        tracing::debug!(subscription = id.0, chord = %chord, ?options, "key chord subscribed");
        self.bindings.push(Binding {
            id,
            chord,
            options,
            payload,
            latched: false,
        });
        id
    }

    /// Revokes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        before != self.bindings.len()
    }

    /// Revokes every subscription and forgets held keys.
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.held.clear();
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether a Ctrl, Alt or Super key is currently held.
    #[must_use]
    pub fn command_modifier_held(&self) -> bool {
        self.held.iter().any(|code| code.is_command_modifier())
    }

    /// Processes one raw key event.
    pub fn feed(&mut self, input: &KeyInput) -> KeyDispatch<T> {
        let mut dispatch = KeyDispatch::default();

        match input.phase {
            KeyPhase::Release => {
                self.held.remove(&input.code);
                for binding in &mut self.bindings {
                    if binding.chord.contains(input.code) {
                        binding.latched = false;
                    }
                }
                return dispatch;
            }
            KeyPhase::Press | KeyPhase::Repeat => {
                self.held.insert(input.code);
            }
        }

        for binding in &mut self.bindings {
            if !binding.chord.contains(input.code) || !binding.chord.is_held(&self.held) {
                continue;
            }

            if binding.options.overrides_system_default {
                dispatch.suppress_default = true;
            }

            let fires = match input.phase {
                KeyPhase::Press => !binding.latched,
                KeyPhase::Repeat => binding.options.repeatable || !binding.latched,
                KeyPhase::Release => false,
            };

            if fires {
                tracing::trace!(subscription = binding.id.0, chord = %binding.chord, "key chord fired");
                binding.latched = true;
                dispatch.fired.push(binding.payload.clone());
            }
        }

        dispatch
    }
}
