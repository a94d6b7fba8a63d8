//! Entities persisted and exchanged by the engine (docs/ARCHITECTURE.md §3).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A caller-supplied document identifier, unique within a collection.
///
/// Newtype rather than a bare `String` so a URL can't be passed where a
/// token or collection name is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Url(pub String);

impl From<String> for Url {
    fn from(s: String) -> Self {
        Url(s)
    }
}

impl From<&str> for Url {
    fn from(s: &str) -> Self {
        Url(s.to_string())
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-document metadata, overwritten whenever a URL is re-ingested.
///
/// `date` is nanosecond-resolution and time-zone preserving: a `FixedOffset`
/// keeps the caller's original UTC offset through an RFC3339 round trip
/// instead of normalizing to UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub date: DateTime<FixedOffset>,
    pub title: String,
}

/// One document submitted to `Processor::insert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawData {
    pub source: Source,
    pub url: Url,
    pub data: String,
}

/// Evidence that `url` contains a token, at the recorded positions.
///
/// Positions are 0-based, in pipeline-output order, and are per-document
/// only (not deduplicated, not globally ordered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub url: Url,
    pub pos: Vec<u32>,
}

/// A collection's persisted pipeline configuration: which tokenizer and
/// which ordered filter stages it was built with.
///
/// Serialized as textual JSON (docs/ARCHITECTURE.md §6.2) so the `collections` bucket
/// stays portable across storage-format revisions of `Source`/`Posting`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub tokenizer: String,
    pub col_filters: Vec<String>,
}

/// One query result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    pub source: Source,
    pub url: Url,
}
