//! Query side of the overlay: debouncing and the search service boundary.
//!
//! - [`channel`]: Debounced, last-query-wins query channel
//! - [`provider`]: HTTP request building and response decoding

pub mod channel;
pub mod provider;

pub use channel::{Poll, QueryChannel, QueryState, RequestId, SearchRequest, DEFAULT_THROTTLE};
pub use provider::{HttpCall, SearchProvider};
