//! Table and index definitions for the SQLite substrate.
//!
//! `aggregations.facet_set` holds the canonical FacetSet bytes, so the
//! unique `(facet_set, scalar)` pair is what makes aggregation get-or-create
//! idempotent across concurrent writers.

pub const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS terms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS aggregations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        facet_set BLOB NOT NULL,
        scalar INTEGER NOT NULL,
        count INTEGER NOT NULL DEFAULT 0,
        min REAL,
        max REAL,
        avg REAL,
        UNIQUE (facet_set, scalar)
    )",
    "CREATE TABLE IF NOT EXISTS documents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        payload BLOB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS results (
        document INTEGER NOT NULL,
        aggregation INTEGER NOT NULL,
        value REAL NOT NULL
    )",
];

pub const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS results_sort ON results (aggregation, value, document)",
    "CREATE INDEX IF NOT EXISTS results_document ON results (document)",
    "CREATE INDEX IF NOT EXISTS aggregations_width ON aggregations (length(facet_set))",
];

pub const DROPS: &[&str] = &[
    "DROP TABLE IF EXISTS results",
    "DROP TABLE IF EXISTS aggregations",
    "DROP TABLE IF EXISTS documents",
    "DROP TABLE IF EXISTS terms",
];
