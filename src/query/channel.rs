//! Debounced query channel between the input field and the search provider.
//!
//! Every [`QueryChannel::search`] call updates the visible query at once and
//! (re)arms a single pending dispatch due one window later. Calls arriving
//! before the window elapses replace the pending query and push the due time
//! out, so a burst of keystrokes turns into one request carrying the last
//! value. The channel never talks to the network itself: [`QueryChannel::poll`]
//! hands out a [`SearchRequest`] once the dispatch is due and the caller
//! reports the outcome back through [`QueryChannel::settle`].
//!
//! # Ordering
//!
//! Only the settlement of the most recently dispatched request is applied.
//! A response for an older request is dropped whether it arrives before or
//! after the newer one, so the visible results always belong to the latest
//! dispatched query.
//!
//! # Timers
//!
//! Host timers cannot be cancelled. Each call to `search` returns the delay to
//! arm a wake-up for; a wake-up that fires after its dispatch was superseded
//! simply finds nothing due and asks to be re-armed for the remainder.

use crate::domain::{ProviderError, ResultSet};
use crate::observability::TraceContext;
use std::time::{Duration, Instant};

/// Default debounce window between outbound requests.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(800);

/// Identifier of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One outbound request to the search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: RequestId,
    pub query: String,
    /// Trace context of the span that dispatched the request.
    pub trace_context: Option<TraceContext>,
}

/// The query, results and error visible to the renderer.
///
/// `results` keeps its previous value when a request fails, so after a
/// failure both `results` and `error` may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub query: String,
    pub results: Option<ResultSet>,
    pub error: Option<ProviderError>,
}

impl QueryState {
    /// Whether there is anything to show below the input field.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.query.is_empty() || self.results.is_some() || self.error.is_some()
    }
}

/// What a wake-up found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// Nothing pending.
    Idle,
    /// A dispatch is pending but not yet due; re-arm after this delay.
    Wait(Duration),
    /// The pending query is due; send this request.
    Dispatch(SearchRequest),
}

#[derive(Debug, Clone)]
struct PendingDispatch {
    query: String,
    due: Instant,
}

/// Debounced, last-query-wins channel to the search provider.
#[derive(Debug, Clone)]
pub struct QueryChannel {
    window: Duration,
    state: QueryState,
    pending: Option<PendingDispatch>,
    /// Most recently dispatched request and whether it is still unsettled.
    latest: Option<(RequestId, bool)>,
    next_id: u64,
    closed: bool,
}

impl Default for QueryChannel {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

impl QueryChannel {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: QueryState::default(),
            pending: None,
            latest: None,
            next_id: 1,
            closed: false,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub const fn state(&self) -> &QueryState {
        &self.state
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// Whether the latest dispatched request has not settled yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.latest, Some((_, true)))
    }

    /// Whether a dispatch is waiting for its window to elapse.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Updates the query and (re)arms the pending dispatch.
    ///
    /// Returns the delay after which [`poll`](Self::poll) should be called, or
    /// `None` once the channel has been cancelled.
    pub fn search(&mut self, query: impl Into<String>, now: Instant) -> Option<Duration> {
        let query = query.into();
        if self.closed {
            tracing::debug!("query channel cancelled, ignoring search");
            return None;
        }

        tracing::trace!(query = %query, superseded = self.pending.is_some(), "query updated");
        self.state.query.clone_from(&query);
        self.pending = Some(PendingDispatch {
            query,
            due: now + self.window,
        });
        Some(self.window)
    }

    /// Dispatches the pending query if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Poll {
        if self.closed {
            return Poll::Idle;
        }

        let Some(pending) = &self.pending else {
            return Poll::Idle;
        };

        if pending.due > now {
            return Poll::Wait(pending.due - now);
        }

        let Some(pending) = self.pending.take() else {
            return Poll::Idle;
        };

        let id = RequestId(self.next_id);
        self.next_id += 1;

        if let Some((previous, true)) = self.latest {
            tracing::debug!(superseded = %previous, "in-flight request superseded");
        }
        self.latest = Some((id, true));

        tracing::debug!(request_id = %id, query = %pending.query, "dispatching search request");

        Poll::Dispatch(SearchRequest {
            id,
            query: pending.query,
            trace_context: TraceContext::from_current(),
        })
    }

    /// Applies the outcome of a dispatched request.
    ///
    /// Returns `true` if the visible state changed. Outcomes for superseded
    /// requests, repeated outcomes, and anything after cancellation are
    /// dropped.
    pub fn settle(&mut self, id: RequestId, outcome: Result<ResultSet, ProviderError>) -> bool {
        if self.closed {
            tracing::debug!(request_id = %id, "query channel cancelled, dropping response");
            return false;
        }

        match self.latest {
            Some((latest, true)) if latest == id => {}
            _ => {
                tracing::debug!(request_id = %id, latest = ?self.latest, "dropping stale response");
                return false;
            }
        }
        self.latest = Some((id, false));

        match outcome {
            Ok(results) => {
                tracing::debug!(request_id = %id, hits = results.len(), "search results applied");
                self.state.results = Some(results);
                self.state.error = None;
            }
            Err(error) => {
                tracing::debug!(request_id = %id, error = %error, "search request failed");
                self.state.error = Some(error);
            }
        }
        true
    }

    /// Drops the pending dispatch and refuses all later activity.
    pub fn cancel(&mut self) {
        tracing::debug!(had_pending = self.pending.is_some(), "query channel cancelled");
        self.pending = None;
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_800: Duration = Duration::from_millis(800);

    fn hits_for(query: &str) -> ResultSet {
        ResultSet {
            query: query.to_string(),
            hits: vec![],
            total: 0,
        }
    }

    fn dispatched(poll: Poll) -> SearchRequest {
        match poll {
            Poll::Dispatch(request) => request,
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn query_updates_immediately() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        assert_eq!(channel.search("ab", t0), Some(MS_800));
        assert_eq!(channel.query(), "ab");
        assert_eq!(channel.poll(t0), Poll::Wait(MS_800));
    }

    #[test]
    fn burst_coalesces_into_last_query() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        for (i, q) in ["d", "do", "doc", "docs"].iter().enumerate() {
            channel.search(*q, t0 + MS_100 * i as u32);
        }

        // The first wake-up was armed for t0 + 800ms but the burst pushed the
        // due time out.
        assert_eq!(channel.poll(t0 + MS_800), Poll::Wait(Duration::from_millis(300)));

        let request = dispatched(channel.poll(t0 + Duration::from_millis(1100)));
        assert_eq!(request.query, "docs");
        assert_eq!(channel.poll(t0 + Duration::from_secs(5)), Poll::Idle);
    }

    #[test]
    fn empty_query_is_dispatched() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("", t0);
        assert_eq!(dispatched(channel.poll(t0 + MS_800)).query, "");
    }

    #[test]
    fn success_sets_results_and_clears_error() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("a", t0);
        let first = dispatched(channel.poll(t0 + MS_800));
        assert!(channel.is_loading());
        channel.settle(first.id, Err(ProviderError::Decode("truncated".into())));

        channel.search("ab", t0 + MS_800);
        let second = dispatched(channel.poll(t0 + MS_800 * 2));
        assert!(channel.settle(second.id, Ok(hits_for("ab"))));

        assert_eq!(channel.state().results, Some(hits_for("ab")));
        assert_eq!(channel.state().error, None);
        assert!(!channel.is_loading());
    }

    #[test]
    fn failure_keeps_stale_results() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("y", t0);
        let y = dispatched(channel.poll(t0 + MS_800));
        channel.settle(y.id, Ok(hits_for("y")));

        channel.search("x", t0 + MS_800);
        let x = dispatched(channel.poll(t0 + MS_800 * 2));
        let error = ProviderError::Status { code: 429, message: "slow down".into() };
        channel.settle(x.id, Err(error.clone()));

        assert_eq!(channel.state().query, "x");
        assert_eq!(channel.state().results, Some(hits_for("y")));
        assert_eq!(channel.state().error, Some(error));
    }

    #[test]
    fn late_response_for_superseded_request_is_dropped() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("old", t0);
        let old = dispatched(channel.poll(t0 + MS_800));
        channel.search("new", t0 + MS_800);
        let new = dispatched(channel.poll(t0 + MS_800 * 2));

        assert!(channel.settle(new.id, Ok(hits_for("new"))));
        assert!(!channel.settle(old.id, Ok(hits_for("old"))));
        assert_eq!(channel.state().results, Some(hits_for("new")));
    }

    #[test]
    fn early_response_for_superseded_request_is_dropped() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("old", t0);
        let old = dispatched(channel.poll(t0 + MS_800));
        channel.search("new", t0 + MS_800);
        let new = dispatched(channel.poll(t0 + MS_800 * 2));

        assert!(!channel.settle(old.id, Ok(hits_for("old"))));
        assert_eq!(channel.state().results, None);
        assert!(channel.is_loading());
        assert!(channel.settle(new.id, Ok(hits_for("new"))));
    }

    #[test]
    fn duplicate_settlement_is_ignored() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("a", t0);
        let request = dispatched(channel.poll(t0 + MS_800));
        assert!(channel.settle(request.id, Ok(hits_for("a"))));
        assert!(!channel.settle(request.id, Err(ProviderError::NotConfigured)));
        assert_eq!(channel.state().error, None);
    }

    #[test]
    fn cancel_drops_pending_and_later_activity() {
        let mut channel = QueryChannel::default();
        let t0 = Instant::now();

        channel.search("a", t0);
        channel.cancel();

        assert_eq!(channel.poll(t0 + MS_800), Poll::Idle);
        assert_eq!(channel.search("b", t0 + MS_800), None);
        assert_eq!(channel.query(), "a");
    }

    #[test]
    fn custom_window_is_respected() {
        let mut channel = QueryChannel::new(Duration::from_millis(250));
        let t0 = Instant::now();

        channel.search("q", t0);
        assert_eq!(channel.poll(t0 + MS_100), Poll::Wait(Duration::from_millis(150)));
        assert_eq!(dispatched(channel.poll(t0 + Duration::from_millis(250))).query, "q");
    }
}
