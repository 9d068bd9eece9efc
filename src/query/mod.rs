//! Query state and locations. Pair order is observable in the produced
//! URL, so storage is an ordered vector rather than a map.

use serde::Serialize;
use thiserror::Error;

/// Raised when a host hands the controller a location it cannot reason about.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location must be an absolute path, got {0:?}")]
    NotAbsolute(String),
}

/// Ordered query parameters with unique-key write semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pairs: Vec<(String, String)>,
}

impl QueryState {
    /// An empty query.
    pub fn new() -> Self {
        QueryState::default()
    }

    /// Decode a raw query string (no leading `?`). Duplicate keys are kept
    /// in order.
    pub fn parse(raw: &str) -> Self {
        let pairs = form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        QueryState { pairs }
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Write `key = value`: the first existing pair with the key is
    /// rewritten in place and later duplicates dropped; a new key appends.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.pairs[pos].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = k != key || index <= pos;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Remove every pair with `key`.
    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// True when no pairs remain.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode to a raw query string (no leading `?`).
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// An absolute path plus its query state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub query: QueryState,
}

impl Location {
    /// Build a location from path and query parts.
    pub fn new(path: impl Into<String>, query: QueryState) -> Self {
        Location {
            path: path.into(),
            query,
        }
    }

    /// Parse `path?query`. The path must be absolute; the query is optional.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, QueryState::parse(q)),
            None => (raw, QueryState::new()),
        };
        if !path.starts_with('/') {
            return Err(LocationError::NotAbsolute(raw.to_string()));
        }
        Ok(Location {
            path: path.to_string(),
            query,
        })
    }

    /// Render `path?query`; the bare path when the query is empty, since key
    /// presence is the only state signal.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.encode())
        }
    }
}
