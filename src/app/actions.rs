//! Side effects requested by the event handler.
//!
//! The handler never touches the host directly. It returns `Action`s that the
//! plugin shim executes in order after each event.

use crate::query::SearchRequest;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Arm a host timer; its expiry is fed back as [`Event::Timer`].
    ///
    /// [`Event::Timer`]: crate::app::Event::Timer
    ScheduleWake(Duration),

    /// Send a request to the search service; the outcome comes back as
    /// [`Event::SearchSettled`].
    ///
    /// [`Event::SearchSettled`]: crate::app::Event::SearchSettled
    Search(SearchRequest),

    /// Open a documentation page with the configured open command.
    OpenUrl(String),
}
