//! # Facetdex
//!
//! A faceted search engine on top of SQLite. Filter by any combination of
//! facets, sort by any numeric field, page through the results, and ask what
//! the next filter could be, without a dedicated search server.
//!
//! Documents are arbitrary JSON objects. At write time their fields are
//! classified into facets (strings, string arrays, `true` flags) and scalars
//! (numbers, plus an implicit `updated` timestamp), and one result row is
//! materialized per (facet subset, scalar) pair. Reads are then a single
//! indexed range scan with no joins.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use facetdex::{Index, SearchParams};
//! use serde_json::json;
//!
//! # fn main() -> facetdex::Result<()> {
//! let index = Index::open("./catalog.db")?;
//! index.upsert(&json!({"material": "wood", "color": "black", "price": 10}))?;
//! index.upsert(&json!({"material": "wood", "color": "red", "price": 20}))?;
//!
//! // Drill-down statistics are refreshed by an explicit maintenance pass.
//! index.rebuild()?;
//!
//! let hits = index.search(
//!     &SearchParams::new().sort_by("price").filter("material:wood").size(10),
//! )?;
//! assert_eq!(hits.len(), 2);
//!
//! let drill_down = index.aggregations(&["material:wood".to_string()])?;
//! assert_eq!(drill_down.facets["color"].value("red"), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Limits
//!
//! Subsets are generated per anchor facet with contiguous runs of the facets
//! that sort after it, not as a full power set. Filters naming a "gapped"
//! combination find no aggregation and return no hits. Facet term ids are
//! encoded on two bytes, capping the registry at 65535 terms.
//!
//! Facet names are `field:value` split on the first `:`, so string and
//! boolean fields whose key contains `:` are not indexed as facets (numeric
//! ones still become scalars).

pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod seed;
pub mod storage;
pub mod types;

pub use config::IndexConfig;
pub use error::{ErrorKind, FacetdexError, Result};
pub use index::aggregations::RebuildReport;
pub use index::documents::UpsertOutcome;
pub use index::Index;
pub use query::QueryEngine;
pub use types::*;
