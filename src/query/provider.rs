//! HTTP mapping for the remote documentation search service.
//!
//! The provider speaks the AddSearch public search API: one `GET` per
//! [`SearchRequest`] to `{endpoint}/v1/search/{site_key}?term={query}&limit={n}`.
//! The site key is public, so no credentials travel in headers. Requests go out
//! through Zellij's `web_request`, which echoes a context map back with the
//! response; the request id, the query text and the trace context travel in
//! that map so a response can be matched to its dispatch.

use super::channel::{RequestId, SearchRequest};
use crate::domain::{DocseekError, Hit, ProviderError, Result, ResultSet};
use crate::observability::TraceContext;
use crate::Config;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Default search host.
pub const DEFAULT_ENDPOINT: &str = "https://api.addsearch.com";

/// Context key carrying the request id through the host.
pub const REQUEST_ID_KEY: &str = "docseek_request_id";
const QUERY_KEY: &str = "docseek_query";
const TRACE_ID_KEY: &str = "docseek_trace_id";
const PARENT_SPAN_KEY: &str = "docseek_parent_span_id";

/// Category prefix AddSearch uses for the first path segment of a page.
const SECTION_CATEGORY: &str = "1x";

/// A fully built `GET` call, ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCall {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub context: BTreeMap<String, String>,
}

/// Configured connection to the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProvider {
    endpoint: String,
    site_key: String,
    limit: u32,
}

impl SearchProvider {
    /// Builds a provider from the plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DocseekError::Config`] if the site key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let site_key = config
            .site_key
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .ok_or_else(|| DocseekError::Config("missing `site_key`".to_string()))?;

        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            site_key,
            limit: config.hits_per_page,
        })
    }

    /// Builds the HTTP call for one dispatched request.
    #[must_use]
    pub fn build(&self, request: &SearchRequest) -> HttpCall {
        let url = format!(
            "{}/v1/search/{}?term={}&limit={}",
            self.endpoint,
            urlencoding::encode(&self.site_key),
            urlencoding::encode(&request.query),
            self.limit
        );

        let headers = BTreeMap::from([("Accept".to_string(), "application/json".to_string())]);

        let mut context = BTreeMap::from([
            (REQUEST_ID_KEY.to_string(), request.id.to_string()),
            (QUERY_KEY.to_string(), request.query.clone()),
        ]);
        if let Some(trace) = &request.trace_context {
            context.insert(TRACE_ID_KEY.to_string(), trace.trace_id.clone());
            context.insert(PARENT_SPAN_KEY.to_string(), trace.parent_span_id.clone());
        }

        HttpCall { url, headers, context }
    }
}

/// Recovers the request id from a response's echoed context.
#[must_use]
pub fn request_id(context: &BTreeMap<String, String>) -> Option<RequestId> {
    context
        .get(REQUEST_ID_KEY)
        .and_then(|id| id.parse::<u64>().ok())
        .map(RequestId)
}

/// Recovers the query text a response answers.
#[must_use]
pub fn request_query(context: &BTreeMap<String, String>) -> &str {
    context.get(QUERY_KEY).map_or("", String::as_str)
}

/// Recovers the dispatching span's trace context from a response's context.
#[must_use]
pub fn trace_context(context: &BTreeMap<String, String>) -> Option<TraceContext> {
    Some(TraceContext {
        trace_id: context.get(TRACE_ID_KEY)?.clone(),
        parent_span_id: context.get(PARENT_SPAN_KEY)?.clone(),
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<RawHit>,
    #[serde(default)]
    total_hits: u64,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    id: String,
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    highlight: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl RawHit {
    fn into_hit(self) -> Hit {
        let non_empty = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let section = self
            .categories
            .iter()
            .find_map(|c| c.strip_prefix(SECTION_CATEGORY))
            .filter(|s| !s.is_empty())
            .map(String::from);

        let snippet = non_empty(self.highlight.map(|h| strip_tags(&h))).or_else(|| non_empty(self.meta_description));

        Hit {
            id: self.id,
            title: non_empty(self.title).unwrap_or_else(|| self.url.clone()),
            url: self.url,
            section,
            snippet,
        }
    }
}

/// Drops the `<em>` markers the service wraps around matched terms.
fn strip_tags(text: &str) -> String {
    text.replace("<em>", "").replace("</em>", "")
}

/// Decodes a provider response into a result set for `query`.
///
/// # Errors
///
/// Non-2xx statuses become [`ProviderError::Status`] carrying the body's
/// `message` when present; undecodable bodies become
/// [`ProviderError::Decode`].
pub fn parse_response(status: u16, body: &[u8], query: &str) -> std::result::Result<ResultSet, ProviderError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
        return Err(ProviderError::Status { code: status, message });
    }

    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    Ok(ResultSet {
        query: query.to_string(),
        total: response.total_hits,
        hits: response.hits.into_iter().map(RawHit::into_hit).collect(),
    })
}
