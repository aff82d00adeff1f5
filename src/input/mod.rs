//! Input collaborators of the search overlay.
//!
//! - [`keys`]: Global key listener with chord subscriptions
//! - [`pointer`]: Outside-interaction detection against placed regions

pub mod keys;
pub mod pointer;

pub use keys::{
    KeyChord, KeyCode, KeyDispatch, KeyInput, KeyListener, KeyPhase, Modifier, ShortcutOptions,
    SubscriptionId,
};
pub use pointer::{OutsideDetector, Point, Rect, RegionRef, Regions, WatchId};
