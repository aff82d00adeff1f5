//! Search results returned by the remote provider.
//!
//! A [`ResultSet`] is what the provider answered for one query. The overlay
//! treats it as opaque apart from listing its hits; ranking and pagination stay
//! on the provider's side.

use serde::{Deserialize, Serialize};

/// One matching documentation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Provider-side record identifier.
    pub id: String,
    /// Absolute URL of the documentation page (with anchor).
    pub url: String,
    /// Most specific heading of the record.
    pub title: String,
    /// Top-level section or category, if the record has one.
    pub section: Option<String>,
    /// Short excerpt of the matching content.
    pub snippet: Option<String>,
}

/// The hits returned for a single query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Query string the provider answered.
    pub query: String,
    /// Hits in provider ranking order.
    pub hits: Vec<Hit>,
    /// Total number of matches known to the provider.
    pub total: u64,
}

impl ResultSet {
    /// Returns `true` when the provider found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of hits carried by this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }
}
