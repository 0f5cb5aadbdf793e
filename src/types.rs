use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Document identifier assigned by the store on first insert.
pub type DocumentId = i64;
/// Term identifier assigned by the term registry.
pub type TermId = i64;

/// Name of the scalar every document carries: its ingestion time in seconds.
pub const UPDATED_SCALAR: &str = "updated";

/// How a single document field takes part in indexing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Numeric field, indexed as a scalar.
    Number(f64),
    /// String field, indexed as one `field:value` facet.
    Text(String),
    /// Array of strings, one `field:value` facet per element.
    TextList(Vec<String>),
    /// Boolean field; `true` becomes a facet named after the field.
    Flag(bool),
    /// Anything else (null, objects, mixed arrays without strings).
    Unsupported,
}

impl FieldKind {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(FieldKind::Number).unwrap_or(FieldKind::Unsupported),
            Value::String(s) => FieldKind::Text(s.clone()),
            Value::Bool(b) => FieldKind::Flag(*b),
            Value::Array(items) => {
                let texts: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect();
                if texts.is_empty() && !items.is_empty() {
                    FieldKind::Unsupported
                } else {
                    FieldKind::TextList(texts)
                }
            }
            Value::Null | Value::Object(_) => FieldKind::Unsupported,
        }
    }
}

/// Keyset cursor: the boundary sort value and document id of the previous page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub start: f64,
    pub after: DocumentId,
}

impl Cursor {
    /// Cursor continuing after `hit`, normally the last hit of a page.
    pub fn after_hit(hit: &SearchHit) -> Self {
        Cursor {
            start: hit.value,
            after: hit.id,
        }
    }
}

/// Parameters of a ranked, filtered, paginated search.
///
/// `start` and `after` together form the keyset cursor; giving only one of
/// them is rejected as malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Scalar to sort by. Defaults to the configured sort (`updated`).
    pub sort_by: Option<String>,
    /// Facet names every hit must carry (AND).
    #[serde(alias = "facets")]
    pub filters: Vec<String>,
    #[serde(alias = "desc")]
    pub descending: bool,
    /// Hits to return. Defaults to the configured page size.
    pub size: Option<usize>,
    pub start: Option<f64>,
    pub after: Option<DocumentId>,
    /// Hits to load payloads for, counted from the top of the page. Later
    /// hits carry only their id and sort value. `None` loads every hit.
    #[serde(alias = "documents")]
    pub hydrate: Option<usize>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_by(mut self, scalar: impl Into<String>) -> Self {
        self.sort_by = Some(scalar.into());
        self
    }

    pub fn filter(mut self, facet: impl Into<String>) -> Self {
        self.filters.push(facet.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn hydrate(mut self, count: usize) -> Self {
        self.hydrate = Some(count);
        self
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.start = Some(cursor.start);
        self.after = Some(cursor.after);
        self
    }

    /// The validated cursor, if any.
    pub fn page_cursor(&self) -> crate::Result<Option<Cursor>> {
        match (self.start, self.after) {
            (None, None) => Ok(None),
            (Some(start), Some(after)) => Ok(Some(Cursor { start, after })),
            (Some(_), None) => Err(crate::FacetdexError::InvalidArgument(
                "cursor.start given without cursor.after".to_string(),
            )),
            (None, Some(_)) => Err(crate::FacetdexError::InvalidArgument(
                "cursor.after given without cursor.start".to_string(),
            )),
        }
    }
}

/// One search hit: the document, its sort value and, unless the search
/// limited hydration, its stored payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Drill-down counts for one field.
///
/// Valued facets (`color:red`) aggregate into a map keyed by value; flag
/// facets (`on_sale`) carry a single count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetCount {
    Flag(u64),
    Values(BTreeMap<String, u64>),
}

impl FacetCount {
    pub fn as_flag(&self) -> Option<u64> {
        match self {
            FacetCount::Flag(count) => Some(*count),
            _ => None,
        }
    }

    pub fn value(&self, value: &str) -> Option<u64> {
        match self {
            FacetCount::Values(map) => map.get(value).copied(),
            _ => None,
        }
    }

    pub fn total(&self) -> u64 {
        match self {
            FacetCount::Flag(count) => *count,
            FacetCount::Values(map) => map.values().sum(),
        }
    }
}

/// Statistics for one scalar within a facet set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarStats {
    pub name: String,
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Result of a drill-down request: what the next filter could be, and how
/// the scalars are distributed under the current filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationSummary {
    pub facets: BTreeMap<String, FacetCount>,
    pub scalars: Vec<ScalarStats>,
}

impl AggregationSummary {
    pub fn scalar(&self, name: &str) -> Option<&ScalarStats> {
        self.scalars.iter().find(|s| s.name == name)
    }
}

/// Search hits plus drill-down for the same filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub aggregations: AggregationSummary,
    pub took_ms: u64,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub terms: u64,
    pub documents: u64,
    pub aggregations: u64,
    pub results: u64,
}
