use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, VectorWebError};
use crate::markup::RichText;

pub const DEFAULT_LIMIT: usize = 10;

/// One submission to `POST /search`. Only constructible through [`SearchRequest::new`],
/// so a request that reaches the network always has non-blank fields. The
/// fields are kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    url: String,
    query: String,
    limit: usize,
}

impl SearchRequest {
    pub fn new(url: &str, query: &str, limit: usize) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(VectorWebError::InvalidInput("url cannot be empty".into()));
        }
        if query.trim().is_empty() {
            return Err(VectorWebError::InvalidInput("query cannot be empty".into()));
        }
        if limit == 0 {
            return Err(VectorWebError::InvalidInput(
                "limit must be a positive integer".into(),
            ));
        }
        Ok(Self {
            url: url.to_string(),
            query: query.to_string(),
            limit,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// A ranked fragment of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: f64,
    pub content: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u64>,
}

impl ResultItem {
    /// First `n` characters of the id, for compact display.
    pub fn short_id(&self, n: usize) -> &str {
        match self.id.char_indices().nth(n) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// Scores are numbers on the wire, but numeric strings (`"0.980"`) are
/// accepted too.
fn deserialize_score<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    match Score::deserialize(deserializer)? {
        Score::Number(n) => Ok(n),
        Score::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid score '{s}'"))),
    }
}

/// Where a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Returned by the search service.
    Live,
    /// Synthesized locally because the service could not be confirmed reachable.
    Preview,
}

impl std::fmt::Display for ResultOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Preview => write!(f, "preview"),
        }
    }
}

/// Ordered results of one search, in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
    pub origin: ResultOrigin,
}

impl ResultSet {
    pub fn live(items: Vec<ResultItem>) -> Self {
        Self {
            items,
            origin: ResultOrigin::Live,
        }
    }

    pub fn preview(items: Vec<ResultItem>) -> Self {
        Self {
            items,
            origin: ResultOrigin::Preview,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ResultItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// State of the most recent search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Pending,
    Success(ResultSet),
    Failure(String),
}

impl SearchOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn results(&self) -> Option<&ResultSet> {
        match self {
            Self::Success(set) => Some(set),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Body of a successful `POST /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ResultItem>,
}

/// Body of a failed request, as produced by the service's error handler.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The `detail` field as display text. Strings are used verbatim, any
    /// other JSON value is rendered compactly.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
