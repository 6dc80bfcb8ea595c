//! Order-preserving query string construction.

use std::fmt::Display;

use url::form_urlencoded::byte_serialize;

/// Builds a canonical query string from an open set of parameters.
///
/// Keys are emitted in insertion order. Absent (`None`) values contribute
/// nothing, and an empty builder produces the empty string rather than a
/// dangling `?`, so callers can concatenate unconditionally.
///
/// # Example
///
/// ```rust
/// use swyftx_api_client::QueryParams;
///
/// let query = QueryParams::new()
///     .limit(Some(50))
///     .page(None::<u32>)
///     .sort_by(Some("date"));
/// assert_eq!(query.build(), "?limit=50&sortBy=date");
/// assert_eq!(QueryParams::new().build(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty set of query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair.
    pub fn push(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.entries.push((key.into(), value.to_string()));
        self
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Set the page size.
    pub fn limit(self, limit: Option<impl Display>) -> Self {
        self.push_opt("limit", limit)
    }

    /// Set the page number.
    pub fn page(self, page: Option<impl Display>) -> Self {
        self.push_opt("page", page)
    }

    /// Set the sort key.
    pub fn sort_by(self, sort_by: Option<impl Display>) -> Self {
        self.push_opt("sortBy", sort_by)
    }

    /// Whether any parameters are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the query string: `""` when empty, else `?k=v&k=v`.
    pub fn build(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let joined = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}
