pub mod aggregations;
pub mod classify;
pub mod documents;
pub mod facet_set;
pub mod indexer;
pub mod permutations;
pub mod terms;

use crate::config::IndexConfig;
use crate::error::Result;
use crate::query::QueryEngine;
use crate::storage::Storage;
use crate::types::{
    AggregationSummary, DocumentId, IndexStats, SearchHit, SearchParams, SearchResponse, TermId,
};
use aggregations::{AggregationStore, RebuildReport};
use documents::{DocumentStore, PreparedDocument, UpsertOutcome};
use serde_json::Value;
use std::path::Path;
use terms::TermRegistry;

/// A faceted search index stored in one SQLite database.
///
/// Writes materialize a result row for every (facet subset, scalar) pair of a
/// document, so a search is a single range scan over one aggregation's rows.
/// Drill-down counts and scalar statistics come from the aggregation table
/// and are only as fresh as the last [`Index::rebuild`].
///
/// # Examples
///
/// ```rust,no_run
/// use facetdex::{Index, SearchParams};
/// use serde_json::json;
///
/// # fn main() -> facetdex::Result<()> {
/// let index = Index::open("./catalog.db")?;
/// index.upsert(&json!({"material": "wood", "color": "black", "price": 10}))?;
/// index.rebuild()?;
///
/// let hits = index.search(&SearchParams::new().sort_by("price").filter("material:wood"))?;
/// let drill_down = index.aggregations(&["material:wood".to_string()])?;
/// # Ok(())
/// # }
/// ```
pub struct Index {
    storage: Storage,
    config: IndexConfig,
}

impl Index {
    /// Open (or create) the index stored at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(IndexConfig::at_path(path.as_ref()))
    }

    /// Open a private in-memory index.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_config(IndexConfig::in_memory())
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        let storage = Storage::open(&config)?;
        tracing::debug!(
            "[index] opened {}",
            config
                .db_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string())
        );
        Ok(Index { storage, config })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Insert a document, or replace it when it carries the `id` of an
    /// existing one. Returns the document id.
    ///
    /// Payload write, removal of stale result rows and re-indexing happen in
    /// one transaction.
    pub fn upsert(&self, document: &Value) -> Result<DocumentId> {
        self.upsert_detailed(document).map(|outcome| outcome.id)
    }

    /// Like [`Index::upsert`], also reporting whether the document was new
    /// and how many result rows it produced.
    pub fn upsert_detailed(&self, document: &Value) -> Result<UpsertOutcome> {
        let prepared = PreparedDocument::parse(document)?;
        let updated_at = documents::now_seconds();
        let outcome = self
            .storage
            .write(|conn| prepared.store(conn, updated_at))?;
        tracing::debug!(
            "[index] {} document {} ({} facets, {} scalars, {} result rows)",
            if outcome.created { "created" } else { "updated" },
            outcome.id,
            prepared.fields.facets.len(),
            prepared.fields.scalars.len() + 1,
            outcome.results
        );
        Ok(outcome)
    }

    /// Stored payload of document `id`.
    pub fn get(&self, id: DocumentId) -> Result<Value> {
        self.storage.read(|conn| DocumentStore::new(conn).get(id))
    }

    /// Payloads of `ids`, in order. Fails on the first unknown id.
    pub fn get_many(&self, ids: &[DocumentId]) -> Result<Vec<Value>> {
        self.storage.read(|conn| {
            let documents = DocumentStore::new(conn);
            ids.iter().map(|&id| documents.get(id)).collect()
        })
    }

    pub fn search(&self, params: &SearchParams) -> Result<Vec<SearchHit>> {
        self.storage
            .read(|conn| QueryEngine::new(conn, &self.config).search(params))
    }

    pub fn aggregations(&self, filters: &[String]) -> Result<AggregationSummary> {
        self.storage
            .read(|conn| QueryEngine::new(conn, &self.config).aggregations(filters))
    }

    /// Search plus drill-down for the same filters, from one snapshot.
    pub fn results(&self, params: &SearchParams) -> Result<SearchResponse> {
        let t0 = std::time::Instant::now();
        let (results, aggregations) = self.storage.read(|conn| {
            let engine = QueryEngine::new(conn, &self.config);
            Ok((engine.search(params)?, engine.aggregations(&params.filters)?))
        })?;
        Ok(SearchResponse {
            results,
            aggregations,
            took_ms: t0.elapsed().as_millis() as u64,
        })
    }

    /// Recompute every aggregation's statistics from the result rows.
    pub fn rebuild(&self) -> Result<RebuildReport> {
        let t0 = std::time::Instant::now();
        let report = self
            .storage
            .write(|conn| AggregationStore::new(conn).rebuild())?;
        tracing::info!(
            "[aggregations] Rebuilt {} aggregations ({} orphaned) in {:?}",
            report.refreshed,
            report.orphaned,
            t0.elapsed()
        );
        Ok(report)
    }

    /// Compact the database file.
    pub fn reclaim(&self) -> Result<()> {
        self.storage.vacuum()
    }

    /// Drop and recreate the schema. Every document, term and aggregation is lost.
    pub fn reset(&self) -> Result<()> {
        self.storage.reset()
    }

    /// Every registered term as `(id, name)`, by ascending id.
    pub fn terms(&self) -> Result<Vec<(TermId, String)>> {
        self.storage.read(|conn| TermRegistry::new(conn).list_all())
    }

    pub fn stats(&self) -> Result<IndexStats> {
        self.storage.stats()
    }
}
