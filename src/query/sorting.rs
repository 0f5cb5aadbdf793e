use super::QueryEngine;
use crate::error::{FacetdexError, Result};
use crate::index::aggregations::AggregationStore;
use crate::index::documents::DocumentStore;
use crate::index::facet_set::FacetSet;
use crate::types::{Cursor, DocumentId, SearchHit, SearchParams};
use rusqlite::params;

const PAGE_ASC: &str = "SELECT document, value FROM results
     WHERE aggregation = ?1
     ORDER BY value ASC, document ASC
     LIMIT ?2";
const PAGE_DESC: &str = "SELECT document, value FROM results
     WHERE aggregation = ?1
     ORDER BY value DESC, document ASC
     LIMIT ?2";
// The document bound applies to every row, not only to rows tied with the
// cursor value, so rows between the boundary and `start` with a smaller
// document id are not revisited.
const AFTER_ASC: &str = "SELECT document, value FROM results
     WHERE aggregation = ?1 AND value >= ?3 AND document > ?4
     ORDER BY value ASC, document ASC
     LIMIT ?2";
const AFTER_DESC: &str = "SELECT document, value FROM results
     WHERE aggregation = ?1 AND value <= ?3 AND document > ?4
     ORDER BY value DESC, document ASC
     LIMIT ?2";

impl QueryEngine<'_> {
    /// Ranked, filtered page of documents.
    ///
    /// Unknown sort scalars and filter facets fail with `NotFound`. A known
    /// combination that was never indexed together returns an empty page.
    pub fn search(&self, params: &SearchParams) -> Result<Vec<SearchHit>> {
        let t0 = std::time::Instant::now();
        let cursor = params.page_cursor()?;
        let size = self.page_size(params.size)?;

        let sort_by = params
            .sort_by
            .as_deref()
            .unwrap_or(self.config.default_sort.as_str());
        let scalar = self.resolve_scalar(sort_by)?;
        let facets = FacetSet::from_ids(&self.resolve_facets(&params.filters)?)?;

        let Some(aggregation) = AggregationStore::new(self.conn).find(&facets, scalar)? else {
            tracing::debug!(
                "[query] no aggregation for sort={} filters={:?}",
                sort_by,
                params.filters
            );
            return Ok(Vec::new());
        };

        let rows = self.page_rows(aggregation, params.descending, size, cursor)?;
        let t1 = t0.elapsed();

        let hydrate = params.hydrate.unwrap_or(rows.len());
        let documents = DocumentStore::new(self.conn);
        let mut hits = Vec::with_capacity(rows.len());
        for (rank, (id, value)) in rows.into_iter().enumerate() {
            let payload = if rank < hydrate {
                Some(documents.get(id)?)
            } else {
                None
            };
            hits.push(SearchHit { id, value, payload });
        }

        tracing::debug!(
            "[query] sort={} desc={} filters={:?} hits={} scan={:?} total={:?}",
            sort_by,
            params.descending,
            params.filters,
            hits.len(),
            t1,
            t0.elapsed()
        );
        Ok(hits)
    }

    fn page_size(&self, requested: Option<usize>) -> Result<usize> {
        let size = requested.unwrap_or(self.config.default_page_size);
        if size == 0 || size > self.config.max_page_size {
            return Err(FacetdexError::InvalidArgument(format!(
                "size must be between 1 and {}, got {}",
                self.config.max_page_size, size
            )));
        }
        Ok(size)
    }

    fn page_rows(
        &self,
        aggregation: i64,
        descending: bool,
        size: usize,
        cursor: Option<Cursor>,
    ) -> Result<Vec<(DocumentId, f64)>> {
        let limit = size as i64;
        let rows = match cursor {
            None => {
                let sql = if descending { PAGE_DESC } else { PAGE_ASC };
                let mut stmt = self.conn.prepare_cached(sql)?;
                let rows = stmt
                    .query_map(params![aggregation, limit], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            Some(Cursor { start, after }) => {
                let sql = if descending { AFTER_DESC } else { AFTER_ASC };
                let mut stmt = self.conn.prepare_cached(sql)?;
                let rows = stmt
                    .query_map(params![aggregation, limit, start, after], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    }
}
