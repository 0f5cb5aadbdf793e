//! Aggregation rows and the maintenance pass that refreshes their statistics.

use super::facet_set::{self, FacetSet};
use crate::error::Result;
use crate::types::{ScalarStats, TermId};
use rusqlite::{params, Connection, OptionalExtension};

pub type AggregationId = i64;

/// Outcome of [`AggregationStore::rebuild`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Aggregations refreshed from at least one result row.
    pub refreshed: usize,
    /// Aggregations no longer referenced by any result row, zeroed.
    pub orphaned: usize,
}

pub struct AggregationStore<'c> {
    conn: &'c Connection,
}

impl<'c> AggregationStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        AggregationStore { conn }
    }

    pub fn find(&self, facets: &FacetSet, scalar: TermId) -> Result<Option<AggregationId>> {
        let id = self
            .conn
            .prepare_cached("SELECT id FROM aggregations WHERE facet_set = ?1 AND scalar = ?2")?
            .query_row(params![facets.as_bytes(), scalar], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    /// Whether `term` was ever indexed as a scalar. Every scalar of every
    /// document gets an aggregation on the empty facet set.
    pub fn is_scalar(&self, term: TermId) -> Result<bool> {
        Ok(self.find(&FacetSet::empty(), term)?.is_some())
    }

    /// Whether `term` was ever indexed as a facet, i.e. has a singleton
    /// facet set.
    pub fn is_facet(&self, term: TermId) -> Result<bool> {
        let Ok(narrow) = u16::try_from(term) else {
            return Ok(false);
        };
        let found: Option<i64> = self
            .conn
            .prepare_cached("SELECT 1 FROM aggregations WHERE facet_set = ?1 LIMIT 1")?
            .query_row(params![FacetSet::from_sorted(&[narrow]).as_bytes()], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    /// Id of the `(facets, scalar)` aggregation, inserting an empty one first
    /// if needed. The unique constraint makes concurrent creation converge.
    pub fn get_or_create(&self, facets: &FacetSet, scalar: TermId) -> Result<AggregationId> {
        if let Some(id) = self.find(facets, scalar)? {
            return Ok(id);
        }
        self.conn
            .prepare_cached(
                "INSERT INTO aggregations (facet_set, scalar) VALUES (?1, ?2)
                 ON CONFLICT (facet_set, scalar) DO NOTHING",
            )?
            .execute(params![facets.as_bytes(), scalar])?;
        let id = self
            .conn
            .prepare_cached("SELECT id FROM aggregations WHERE facet_set = ?1 AND scalar = ?2")?
            .query_row(params![facets.as_bytes(), scalar], |row| row.get(0))?;
        Ok(id)
    }

    /// Facet sets with exactly `terms` members and their document counts.
    ///
    /// A facet set has one aggregation per scalar; every document carries the
    /// `updated` scalar, so the largest per-scalar count is the document count.
    /// Zero-count (never rebuilt or orphaned) sets are left out.
    pub fn counts_by_size(&self, terms: usize) -> Result<Vec<(FacetSet, u64)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT facet_set, max(count) FROM aggregations
             WHERE length(facet_set) = ?1
             GROUP BY facet_set
             HAVING max(count) > 0",
        )?;
        let rows = stmt
            .query_map(params![facet_set::byte_length(terms) as i64], |row| {
                Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(bytes, count)| Ok((FacetSet::from_bytes(bytes)?, count as u64)))
            .collect()
    }

    /// Per-scalar statistics for exactly `facets`, ordered by scalar name.
    pub fn scalar_stats(&self, facets: &FacetSet) -> Result<Vec<ScalarStats>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT terms.name, aggregations.count, aggregations.min, aggregations.max, aggregations.avg
             FROM aggregations
             JOIN terms ON aggregations.scalar = terms.id
             WHERE aggregations.facet_set = ?1 AND aggregations.count > 0
             ORDER BY terms.name",
        )?;
        let rows = stmt
            .query_map(params![facets.as_bytes()], |row| {
                Ok(ScalarStats {
                    name: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                    min: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
                    max: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
                    avg: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Recompute count/min/max/avg of every aggregation from the result rows.
    ///
    /// Aggregations that lost all their rows (documents re-indexed away from
    /// a facet combination) are reset to a zero count. Cost is linear in the
    /// number of result rows; run it as an explicit maintenance step.
    pub fn rebuild(&self) -> Result<RebuildReport> {
        let refreshed = self.conn.execute(
            "UPDATE aggregations
             SET count = stats.count, min = stats.min, max = stats.max, avg = stats.avg
             FROM (
                 SELECT aggregation, count(*) AS count, min(value) AS min,
                        max(value) AS max, avg(value) AS avg
                 FROM results
                 GROUP BY aggregation
             ) AS stats
             WHERE aggregations.id = stats.aggregation",
            [],
        )?;
        let orphaned = self.conn.execute(
            "UPDATE aggregations
             SET count = 0, min = NULL, max = NULL, avg = NULL
             WHERE count != 0
               AND NOT EXISTS (SELECT 1 FROM results WHERE results.aggregation = aggregations.id)",
            [],
        )?;
        Ok(RebuildReport {
            refreshed,
            orphaned,
        })
    }
}
