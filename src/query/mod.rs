//! Query engine: ranked retrieval and facet drill-down over the materialized
//! result rows.

mod facets;
mod sorting;

use crate::config::IndexConfig;
use crate::error::{FacetdexError, Result};
use crate::index::aggregations::AggregationStore;
use crate::index::classify::field_term_name;
use crate::index::terms::TermRegistry;
use crate::types::TermId;
use rusqlite::Connection;

/// Read-only query view over one storage snapshot.
pub struct QueryEngine<'a> {
    conn: &'a Connection,
    config: &'a IndexConfig,
}

impl<'a> QueryEngine<'a> {
    pub fn new(conn: &'a Connection, config: &'a IndexConfig) -> Self {
        QueryEngine { conn, config }
    }

    fn terms(&self) -> TermRegistry<'a> {
        TermRegistry::new(self.conn)
    }

    /// Resolve a scalar name. Unknown names, and names only ever indexed as
    /// facets, are `ScalarNotFound`.
    fn resolve_scalar(&self, name: &str) -> Result<TermId> {
        let not_found = || FacetdexError::ScalarNotFound(name.to_string());
        let id = self
            .terms()
            .resolve(&field_term_name(name), false)
            .map_err(|e| match e {
                FacetdexError::TermNotFound(_) => not_found(),
                other => other,
            })?;
        // facet terms share the registry
        if !AggregationStore::new(self.conn).is_scalar(id)? {
            return Err(not_found());
        }
        Ok(id)
    }

    /// Resolve facet names to ascending, unique ids. Unknown names, and
    /// scalar-only names, are `FacetNotFound`.
    fn resolve_facets(&self, names: &[String]) -> Result<Vec<TermId>> {
        let terms = self.terms();
        let aggregations = AggregationStore::new(self.conn);
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let normalized = name.trim().to_lowercase();
            let id = terms.resolve(&normalized, false).map_err(|e| match e {
                FacetdexError::TermNotFound(_) => FacetdexError::FacetNotFound(name.clone()),
                other => other,
            })?;
            if !aggregations.is_facet(id)? {
                return Err(FacetdexError::FacetNotFound(name.clone()));
            }
            ids.push(id);
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}
