#![allow(dead_code)]

use facetdex::{DocumentId, Index, SearchHit};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct FileFixture {
    pub _tmp: TempDir,
    pub path: PathBuf,
    pub index: Index,
}

pub fn memory_index() -> Index {
    Index::open_in_memory().unwrap()
}

pub fn file_index() -> FileFixture {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    let index = Index::open(&path).unwrap();
    FileFixture {
        _tmp: tmp,
        path,
        index,
    }
}

/// The two-document wood catalog: black at 10, red at 20.
pub fn wood_catalog(index: &Index) -> (DocumentId, DocumentId) {
    let black = index
        .upsert(&json!({"material": "wood", "color": "black", "price": 10}))
        .unwrap();
    let red = index
        .upsert(&json!({"material": "wood", "color": "red", "price": 20}))
        .unwrap();
    (black, red)
}

pub fn filters(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn prices(hits: &[SearchHit]) -> Vec<f64> {
    hits.iter()
        .map(|hit| hit.payload.as_ref().unwrap()["price"].as_f64().unwrap())
        .collect()
}

pub fn ids(hits: &[SearchHit]) -> Vec<DocumentId> {
    hits.iter().map(|hit| hit.id).collect()
}
