//! Term registry: the append-only name <-> id table shared by facets and
//! scalars.

use crate::error::{FacetdexError, Result};
use crate::types::TermId;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Registry view bound to the connection (or open transaction) it runs on.
pub struct TermRegistry<'c> {
    conn: &'c Connection,
}

impl<'c> TermRegistry<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        TermRegistry { conn }
    }

    /// Id of `name`, creating the term when `create_if_missing` is set.
    ///
    /// Fails with [`FacetdexError::TermNotFound`] for an unknown name when
    /// creation is not allowed.
    pub fn resolve(&self, name: &str, create_if_missing: bool) -> Result<TermId> {
        if let Some(id) = self.lookup(name)? {
            return Ok(id);
        }
        if !create_if_missing {
            return Err(FacetdexError::TermNotFound(name.to_string()));
        }

        // Racing writers both land on the unique name; whoever loses reads back
        // the winner's id.
        self.conn
            .prepare_cached("INSERT INTO terms (name) VALUES (?1) ON CONFLICT (name) DO NOTHING")?
            .execute(params![name])?;
        let id = self
            .lookup(name)?
            .ok_or_else(|| FacetdexError::Storage(format!("term '{}' vanished after insert", name)))?;
        tracing::trace!("[terms] created {} -> {}", name, id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Result<Option<TermId>> {
        let id = self
            .conn
            .prepare_cached("SELECT id FROM terms WHERE name = ?1")?
            .query_row(params![name], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    pub fn list_all(&self) -> Result<Vec<(TermId, String)>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM terms ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// In-memory bidirectional id <-> name table built from a registry snapshot.
#[derive(Debug, Clone, Default)]
pub struct TermLookup {
    names: HashMap<TermId, String>,
    ids: HashMap<String, TermId>,
}

impl TermLookup {
    pub fn from_entries(entries: impl IntoIterator<Item = (TermId, String)>) -> Self {
        let mut lookup = TermLookup::default();
        for (id, name) in entries {
            lookup.ids.insert(name.clone(), id);
            lookup.names.insert(id, name);
        }
        lookup
    }

    pub fn name(&self, id: TermId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<TermId> {
        self.ids.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn ids(&self) -> impl Iterator<Item = TermId> + '_ {
        self.names.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::storage::Storage;

    #[test]
    fn test_resolve_creates_once() {
        let storage = Storage::open(&IndexConfig::in_memory()).unwrap();
        storage
            .write(|conn| {
                let terms = TermRegistry::new(conn);
                let first = terms.resolve("color:red", true)?;
                let again = terms.resolve("color:red", true)?;
                let other = terms.resolve("price", true)?;
                assert_eq!(first, again);
                assert_ne!(first, other);
                assert_eq!(terms.resolve("price", false)?, other);
                Ok(())
            })
            .unwrap();
        assert_eq!(storage.stats().unwrap().terms, 2);
    }

    #[test]
    fn test_resolve_readonly_unknown_fails() {
        let storage = Storage::open(&IndexConfig::in_memory()).unwrap();
        let err = storage
            .read(|conn| TermRegistry::new(conn).resolve("material:stone", false))
            .unwrap_err();
        assert!(matches!(err, FacetdexError::TermNotFound(name) if name == "material:stone"));
        assert_eq!(storage.stats().unwrap().terms, 0);
    }

    #[test]
    fn test_lookup_is_bidirectional() {
        let lookup = TermLookup::from_entries(vec![(1, "color:red".to_string()), (2, "price".to_string())]);
        assert_eq!(lookup.name(1), Some("color:red"));
        assert_eq!(lookup.id("price"), Some(2));
        assert_eq!(lookup.id("missing"), None);
        assert_eq!(lookup.len(), 2);
        let mut names: Vec<&str> = lookup.names().collect();
        names.sort();
        assert_eq!(names, vec!["color:red", "price"]);
    }
}
