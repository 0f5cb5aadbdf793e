use std::path::PathBuf;

/// Configuration for an [`crate::Index`], loaded from environment variables.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// SQLite database file. `None` opens a private in-memory database.
    pub db_path: Option<PathBuf>,
    /// Run SQLite in write-ahead-log journal mode.
    pub wal: bool,
    /// How long a writer waits on a locked database (milliseconds).
    pub busy_timeout_ms: u64,
    /// Scalar used when a search names no `sort_by`.
    pub default_sort: String,
    /// Page size used when a search names no `size`.
    pub default_page_size: usize,
    /// Largest page a single search may request.
    pub max_page_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            db_path: Some(PathBuf::from("./facetdex.db")),
            wal: true,
            busy_timeout_ms: 5_000,
            default_sort: "updated".to_string(),
            default_page_size: 48,
            max_page_size: 1_000,
        }
    }
}

impl IndexConfig {
    /// Load config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: Some(
                std::env::var("FACETDEX_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./facetdex.db")),
            ),
            wal: std::env::var("FACETDEX_WAL")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.wal),
            busy_timeout_ms: std::env::var("FACETDEX_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.busy_timeout_ms),
            default_sort: std::env::var("FACETDEX_DEFAULT_SORT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_sort),
            default_page_size: std::env::var("FACETDEX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_page_size),
            max_page_size: std::env::var("FACETDEX_MAX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_page_size),
        }
    }

    /// Config for a private in-memory database (tests, benchmarks).
    pub fn in_memory() -> Self {
        Self {
            db_path: None,
            wal: false,
            ..Self::default()
        }
    }

    /// Config for a database file at `path`, other settings at their defaults.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }
}
