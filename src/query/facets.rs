use super::QueryEngine;
use crate::error::Result;
use crate::index::aggregations::AggregationStore;
use crate::index::classify::FACET_SEPARATOR;
use crate::index::facet_set::FacetSet;
use crate::index::terms::TermLookup;
use crate::types::{AggregationSummary, FacetCount};
use std::collections::BTreeMap;

/// Breakdown key used for a flag count when the same field also has valued
/// facets.
const FLAG_VALUE: &str = "true";

impl QueryEngine<'_> {
    /// Drill-down for the facets in `filters`.
    ///
    /// `facets` lists every facet that can be added to the current filters,
    /// with the number of documents the narrower filter would match, grouped
    /// by field. `scalars` holds min/max/avg of each scalar under exactly the
    /// current filters. Counts reflect the last aggregation rebuild.
    pub fn aggregations(&self, filters: &[String]) -> Result<AggregationSummary> {
        let t0 = std::time::Instant::now();
        let required = self.resolve_facets(filters)?;
        let required_set = FacetSet::from_ids(&required)?;
        let lookup = TermLookup::from_entries(self.terms().list_all()?);
        let aggregations = AggregationStore::new(self.conn);

        let mut facets = BTreeMap::new();
        for (candidate, count) in aggregations.counts_by_size(required.len() + 1)? {
            let ids = candidate.ids();
            if !required.iter().all(|id| ids.contains(id)) {
                continue;
            }
            let Some(extra) = ids.iter().find(|id| !required.contains(id)) else {
                continue;
            };
            match lookup.name(*extra) {
                Some(name) => add_count(&mut facets, name, count),
                None => tracing::warn!("[query] facet set references unknown term {}", extra),
            }
        }

        let scalars = aggregations.scalar_stats(&required_set)?;
        tracing::debug!(
            "[query] aggregations filters={:?} fields={} scalars={} took={:?}",
            filters,
            facets.len(),
            scalars.len(),
            t0.elapsed()
        );
        Ok(AggregationSummary { facets, scalars })
    }
}

fn add_count(facets: &mut BTreeMap<String, FacetCount>, term: &str, count: u64) {
    let (field, value) = match term.split_once(FACET_SEPARATOR) {
        Some((field, value)) => (field, Some(value)),
        None => (term, None),
    };

    let entry = facets.entry(field.to_string());
    match (value, entry) {
        (None, std::collections::btree_map::Entry::Vacant(slot)) => {
            slot.insert(FacetCount::Flag(count));
        }
        (Some(value), std::collections::btree_map::Entry::Vacant(slot)) => {
            slot.insert(FacetCount::Values(BTreeMap::from([(value.to_string(), count)])));
        }
        (value, std::collections::btree_map::Entry::Occupied(mut slot)) => {
            let existing = slot.get_mut();
            if let FacetCount::Flag(flag) = *existing {
                *existing = FacetCount::Values(BTreeMap::from([(FLAG_VALUE.to_string(), flag)]));
            }
            if let FacetCount::Values(map) = existing {
                *map.entry(value.unwrap_or(FLAG_VALUE).to_string()).or_default() += count;
            }
        }
    }
}
