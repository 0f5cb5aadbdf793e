//! Generate a pseudo-random product catalog for demos and benchmarks.
//!
//! Each product gets a multi-word name (indexed as a string-array facet), a
//! material, a color, a price and sometimes an `on_sale` flag. The same seed
//! always produces the same catalog.

use crate::error::Result;
use crate::index::Index;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

const NAMES: &[&str] = &[
    "10ft cable",
    "neat trucker hat",
    "good table",
    "oval mirror",
    "neat desk",
    "comfortable chair",
    "fast computer",
    "large tv",
    "square small mousepad",
    "small monitor",
    "big screen",
    "4in phone",
    "large book",
    "white paper",
    "camping water bottle",
    "good camping food",
];

const MATERIALS: &[&str] = &[
    "stone", "brick", "wood", "steel", "aluminum", "leather", "cotton", "plastic",
];

const COLORS: &[&str] = &[
    "black", "red", "green", "yellow", "beige", "gray", "taupe", "magenta", "blue", "purple",
];

/// Summary of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub documents: usize,
    pub results: usize,
}

/// Build `count` catalog documents from `seed`.
pub fn catalog_documents(count: usize, seed: u64) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let name: Vec<&str> = NAMES
                .choose(&mut rng)
                .map(|n| n.split(' ').collect())
                .unwrap_or_default();
            let price = (rng.gen_range(0.0..1000.0_f64) * 100.0).round() / 100.0;
            let mut doc = json!({
                "name": name,
                "price": price,
                "material": MATERIALS.choose(&mut rng).copied().unwrap_or("wood"),
                "color": COLORS.choose(&mut rng).copied().unwrap_or("black"),
            });
            if rng.gen_bool(0.2) {
                doc["on_sale"] = Value::Bool(true);
            }
            doc
        })
        .collect()
}

/// Index `count` generated documents into `index`, then rebuild aggregations.
pub fn seed_catalog(index: &Index, count: usize, seed: u64) -> Result<SeedResult> {
    tracing::info!("[seed] Indexing {} documents (seed={})", count, seed);
    let t0 = std::time::Instant::now();
    let mut results = 0;
    for (i, doc) in catalog_documents(count, seed).iter().enumerate() {
        if i > 0 && i % 1_000 == 0 {
            tracing::info!(
                "[seed] {:.1}%",
                (i as f64 / count as f64) * 100.0
            );
        }
        results += index.upsert_detailed(doc)?.results;
    }
    tracing::info!(
        "[seed] Indexed {} documents ({} result rows) in {:?}",
        count,
        results,
        t0.elapsed()
    );
    index.rebuild()?;
    Ok(SeedResult {
        documents: count,
        results,
    })
}
