//! Permutation indexer: materializes one result row per (facet subset,
//! scalar) pair of a document.

use super::aggregations::AggregationStore;
use super::facet_set::FacetSet;
use super::permutations::permutations;
use crate::error::Result;
use crate::types::{DocumentId, TermId};
use rusqlite::{params, Connection};

/// Insert the result rows for `document`.
///
/// `facets` must be sorted ascending and deduplicated. Every subset produced
/// by [`permutations`] is paired with every scalar; missing aggregations are
/// created on the way. Existing result rows are neither read nor removed, so
/// callers re-indexing a document clear it first with [`clear_document`].
///
/// Returns the number of result rows written.
pub fn index_document(
    conn: &Connection,
    document: DocumentId,
    facets: &[u16],
    scalars: &[(TermId, f64)],
) -> Result<usize> {
    let aggregations = AggregationStore::new(conn);
    let mut insert = conn.prepare_cached(
        "INSERT INTO results (document, aggregation, value) VALUES (?1, ?2, ?3)",
    )?;

    let mut written = 0;
    for subset in permutations(facets) {
        let facet_set = FacetSet::from_sorted(&subset);
        for &(scalar, value) in scalars {
            let aggregation = aggregations.get_or_create(&facet_set, scalar)?;
            insert.execute(params![document, aggregation, value])?;
            written += 1;
        }
    }
    Ok(written)
}

/// Delete every result row of `document`. Returns the number removed.
pub fn clear_document(conn: &Connection, document: DocumentId) -> Result<usize> {
    let removed = conn
        .prepare_cached("DELETE FROM results WHERE document = ?1")?
        .execute(params![document])?;
    Ok(removed)
}

pub fn result_count(conn: &Connection, document: DocumentId) -> Result<usize> {
    let count: i64 = conn
        .prepare_cached("SELECT count(*) FROM results WHERE document = ?1")?
        .query_row(params![document], |row| row.get(0))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::index::permutations::subset_count;
    use crate::storage::Storage;

    #[test]
    fn test_rows_are_subsets_times_scalars() {
        let storage = Storage::open(&IndexConfig::in_memory()).unwrap();
        storage
            .write(|conn| {
                let written = index_document(conn, 1, &[1, 2, 3, 4], &[(10, 1.0), (11, 2.0)])?;
                assert_eq!(written, 2 * subset_count(4));
                assert_eq!(result_count(conn, 1)?, written);
                Ok(())
            })
            .unwrap();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.results as usize, 2 * subset_count(4));
        assert_eq!(stats.aggregations as usize, 2 * subset_count(4));
    }

    #[test]
    fn test_shared_subsets_reuse_aggregations() {
        let storage = Storage::open(&IndexConfig::in_memory()).unwrap();
        storage
            .write(|conn| {
                index_document(conn, 1, &[1, 2], &[(10, 5.0)])?;
                index_document(conn, 2, &[1, 3], &[(10, 7.0)])?;
                Ok(())
            })
            .unwrap();
        // {}, {1}, {1,2}, {2} plus {1,3}, {3}
        assert_eq!(storage.stats().unwrap().aggregations, 6);
        assert_eq!(storage.stats().unwrap().results, 8);
    }

    #[test]
    fn test_clear_document_only_touches_that_document() {
        let storage = Storage::open(&IndexConfig::in_memory()).unwrap();
        storage
            .write(|conn| {
                index_document(conn, 1, &[1], &[(10, 5.0)])?;
                index_document(conn, 2, &[1], &[(10, 6.0)])?;
                assert_eq!(clear_document(conn, 1)?, 2);
                assert_eq!(result_count(conn, 1)?, 0);
                assert_eq!(result_count(conn, 2)?, 2);
                Ok(())
            })
            .unwrap();
    }
}
