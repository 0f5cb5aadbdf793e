//! SQLite substrate: one connection, scoped transactions, schema lifecycle.

pub mod schema;

use crate::config::IndexConfig;
use crate::error::{FacetdexError, Result};
use crate::types::IndexStats;
use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Owner of the SQLite connection.
///
/// Every mutation runs inside [`Storage::write`]: the closure receives the
/// open transaction and the transaction commits only when the closure returns
/// `Ok`. Any early return or `?` drops the transaction, which rolls it back.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn open(config: &IndexConfig) -> Result<Self> {
        let conn = match &config.db_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        FacetdexError::Storage(format!(
                            "cannot create {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                Connection::open(path)?
            }
            None => Connection::open_in_memory()?,
        };

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        if config.wal && config.db_path.is_some() {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            tracing::debug!("[storage] journal_mode={}", mode);
        }

        let storage = Storage {
            conn: Mutex::new(conn),
        };
        storage.create_schema()?;
        Ok(storage)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| FacetdexError::Storage("connection lock poisoned".to_string()))
    }

    /// Run `f` inside a read transaction, giving it one consistent snapshot.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut guard = self.lock()?;
        let tx = guard.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` inside a write transaction; commit on `Ok`, roll back otherwise.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut guard = self.lock()?;
        let tx = guard.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    pub fn create_schema(&self) -> Result<()> {
        self.write(|conn| {
            for statement in schema::TABLES.iter().chain(schema::INDEXES) {
                conn.execute(statement, [])?;
            }
            Ok(())
        })
    }

    /// Drop every table and recreate the empty schema. Destroys all data.
    pub fn reset(&self) -> Result<()> {
        self.write(|conn| {
            for statement in schema::DROPS
                .iter()
                .chain(schema::TABLES)
                .chain(schema::INDEXES)
            {
                conn.execute(statement, [])?;
            }
            Ok(())
        })?;
        tracing::info!("[storage] Schema reset");
        Ok(())
    }

    /// Compact the database file and reclaim pages freed by re-indexing.
    pub fn vacuum(&self) -> Result<()> {
        let guard = self.lock()?;
        let start = std::time::Instant::now();
        guard.execute_batch("VACUUM")?;
        tracing::info!("[storage] VACUUM took {:?}", start.elapsed());
        Ok(())
    }

    pub fn stats(&self) -> Result<IndexStats> {
        self.read(|conn| {
            let count = |table: &str| -> Result<u64> {
                let n: i64 =
                    conn.query_row(&format!("SELECT count(*) FROM {}", table), [], |row| {
                        row.get(0)
                    })?;
                Ok(n as u64)
            };
            Ok(IndexStats {
                terms: count("terms")?,
                documents: count("documents")?,
                aggregations: count("aggregations")?,
                results: count("results")?,
            })
        })
    }
}
