//! Document store: payload persistence and the upsert transaction body.

use super::classify::{classify, ClassifiedFields};
use super::facet_set::{canonicalize, narrow_id};
use super::indexer::{clear_document, index_document};
use super::terms::TermRegistry;
use crate::error::{FacetdexError, Result};
use crate::types::{DocumentId, TermId, UPDATED_SCALAR};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key holding the document id in incoming documents.
pub const ID_FIELD: &str = "id";

pub struct DocumentStore<'c> {
    conn: &'c Connection,
}

impl<'c> DocumentStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        DocumentStore { conn }
    }

    pub fn insert(&self, payload: &[u8]) -> Result<DocumentId> {
        let id = self
            .conn
            .prepare_cached("INSERT INTO documents (payload) VALUES (?1) RETURNING id")?
            .query_row(params![payload], |row| row.get(0))?;
        Ok(id)
    }

    pub fn overwrite(&self, id: DocumentId, payload: &[u8]) -> Result<()> {
        let updated = self
            .conn
            .prepare_cached("UPDATE documents SET payload = ?1 WHERE id = ?2")?
            .execute(params![payload, id])?;
        if updated == 0 {
            return Err(FacetdexError::DocumentNotFound(id));
        }
        Ok(())
    }

    pub fn exists(&self, id: DocumentId) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .prepare_cached("SELECT 1 FROM documents WHERE id = ?1")?
            .query_row(params![id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    pub fn get(&self, id: DocumentId) -> Result<Value> {
        let bytes: Vec<u8> = self
            .conn
            .prepare_cached("SELECT payload FROM documents WHERE id = ?1")?
            .query_row(params![id], |row| row.get(0))
            .optional()?
            .ok_or(FacetdexError::DocumentNotFound(id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A validated document, ready to be written.
///
/// Building one does all the checks that can fail on caller input, so a
/// rejected document never opens a write transaction.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub id: Option<DocumentId>,
    pub payload: Vec<u8>,
    pub fields: ClassifiedFields,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: DocumentId,
    pub created: bool,
    pub results: usize,
}

impl PreparedDocument {
    pub fn parse(document: &Value) -> Result<Self> {
        let fields = document.as_object().ok_or_else(|| {
            FacetdexError::InvalidArgument("document must be a JSON object".to_string())
        })?;
        let id = parse_document_id(fields.get(ID_FIELD))?;

        let payload: Map<String, Value> = fields
            .iter()
            .filter(|(key, _)| key.as_str() != ID_FIELD)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let classified = classify(&payload);
        let payload = serde_json::to_vec(&Value::Object(payload))?;

        Ok(PreparedDocument {
            id,
            payload,
            fields: classified,
        })
    }

    /// Write the payload and regenerate the document's result rows.
    ///
    /// Must run inside a write transaction: a failure part way leaves the
    /// rollback to the caller's transaction guard.
    pub fn store(&self, conn: &Connection, updated_at: f64) -> Result<UpsertOutcome> {
        let documents = DocumentStore::new(conn);
        let (id, created) = match self.id {
            Some(id) => {
                if !documents.exists(id)? {
                    return Err(FacetdexError::DocumentNotFound(id));
                }
                documents.overwrite(id, &self.payload)?;
                clear_document(conn, id)?;
                (id, false)
            }
            None => (documents.insert(&self.payload)?, true),
        };

        let terms = TermRegistry::new(conn);
        let mut facets = Vec::with_capacity(self.fields.facets.len());
        for name in &self.fields.facets {
            facets.push(narrow_id(terms.resolve(name, true)?)?);
        }
        let facets = canonicalize(facets);

        let mut scalars: BTreeMap<TermId, f64> = BTreeMap::new();
        scalars.insert(terms.resolve(UPDATED_SCALAR, true)?, updated_at);
        for (name, value) in &self.fields.scalars {
            if name == UPDATED_SCALAR {
                continue;
            }
            scalars.insert(terms.resolve(name, true)?, *value);
        }
        let scalars: Vec<(TermId, f64)> = scalars.into_iter().collect();

        let results = index_document(conn, id, &facets, &scalars)?;
        Ok(UpsertOutcome {
            id,
            created,
            results,
        })
    }
}

/// Validate the optional `id` of an incoming document.
///
/// Absent or null means "assign a new id"; anything other than a positive
/// integer is rejected.
pub fn parse_document_id(value: Option<&Value>) -> Result<Option<DocumentId>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) if id > 0 => Ok(Some(id)),
            _ => Err(FacetdexError::InvalidArgument(format!(
                "document id must be a positive integer, got {}",
                n
            ))),
        },
        Some(other) => Err(FacetdexError::InvalidArgument(format!(
            "document id must be a positive integer, got {}",
            other
        ))),
    }
}

/// Current time in fractional seconds, the value of the `updated` scalar.
pub fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}
