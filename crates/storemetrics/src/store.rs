//! Persistent document cache
//!
//! Documents live in a single SQLite table keyed by their cache key. Writing
//! a key that already exists replaces the payload, keeps the original
//! creation time and bumps the version.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension, Row, params};
use storemetrics_core::{CacheDocument, CacheKey, DocumentMeta, DocumentPayload, StoreLocation};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt {column} '{value}' in document {key}")]
    Corrupt {
        key: String,
        column: &'static str,
        value: String,
    },

    #[error("document not found: {0}")]
    NotFound(CacheKey),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where cache documents are kept.
pub trait DocumentStore {
    /// Insert `document`, or replace the stored revision with the same key.
    /// Returns the metadata as stored.
    fn upsert(&mut self, document: CacheDocument) -> StoreResult<DocumentMeta>;

    fn get(&self, key: &CacheKey) -> StoreResult<Option<CacheDocument>>;

    fn meta(&self, key: &CacheKey) -> StoreResult<Option<DocumentMeta>>;

    /// Metadata of every stored document, ordered by key
    fn list(&self) -> StoreResult<Vec<DocumentMeta>>;

    /// Like [`DocumentStore::get`], failing when the key is absent
    fn require(&self, key: &CacheKey) -> StoreResult<CacheDocument> {
        self.get(key)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                domain TEXT NOT NULL,
                location TEXT NOT NULL,
                category TEXT NOT NULL,
                version INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                payload TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

fn timestamp(key: &str, column: &'static str, value: String) -> StoreResult<Timestamp> {
    value.parse().map_err(|_| StoreError::Corrupt {
        key: key.to_string(),
        column,
        value,
    })
}

/// Columns: key, version, created_at, updated_at
fn meta_from_row(row: &Row<'_>) -> rusqlite::Result<(String, u32, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn build_meta(raw: (String, u32, String, String)) -> StoreResult<DocumentMeta> {
    let (key, version, created_at, updated_at) = raw;
    Ok(DocumentMeta {
        created_at: timestamp(&key, "created_at", created_at)?,
        updated_at: timestamp(&key, "updated_at", updated_at)?,
        key: CacheKey::from_raw(key),
        version,
    })
}

impl DocumentStore for SqliteStore {
    fn upsert(&mut self, document: CacheDocument) -> StoreResult<DocumentMeta> {
        let tx = self.conn.transaction()?;

        let previous = tx
            .query_row(
                "SELECT key, version, created_at, updated_at FROM documents WHERE key = ?1",
                [document.key.as_str()],
                meta_from_row,
            )
            .optional()?
            .map(build_meta)
            .transpose()?;

        let document = match &previous {
            Some(meta) => document.revise(meta),
            None => document,
        };

        tx.execute(
            "INSERT OR REPLACE INTO documents
                (key, domain, location, category, version, created_at, updated_at, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                document.key.as_str(),
                document.domain.label(),
                document.location.label(),
                document.category,
                document.version,
                document.created_at.to_string(),
                document.updated_at.to_string(),
                serde_json::to_string(&document.payload)?,
            ],
        )?;
        tx.commit()?;

        debug!(key = %document.key, version = document.version, "stored document");
        Ok(document.meta())
    }

    fn get(&self, key: &CacheKey) -> StoreResult<Option<CacheDocument>> {
        let row = self
            .conn
            .query_row(
                "SELECT key, version, created_at, updated_at, location, category, payload
                 FROM documents WHERE key = ?1",
                [key.as_str()],
                |row| {
                    Ok((
                        meta_from_row(row)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;
        let Some((raw, location, category, payload)) = row else {
            return Ok(None);
        };

        let meta = build_meta(raw)?;
        let location: StoreLocation = location.parse().map_err(|_| StoreError::Corrupt {
            key: key.to_string(),
            column: "location",
            value: location.clone(),
        })?;
        let payload: DocumentPayload = serde_json::from_str(&payload)?;

        Ok(Some(CacheDocument {
            key: meta.key,
            domain: payload.domain(),
            location,
            category,
            version: meta.version,
            created_at: meta.created_at,
            updated_at: meta.updated_at,
            payload,
        }))
    }

    fn meta(&self, key: &CacheKey) -> StoreResult<Option<DocumentMeta>> {
        self.conn
            .query_row(
                "SELECT key, version, created_at, updated_at FROM documents WHERE key = ?1",
                [key.as_str()],
                meta_from_row,
            )
            .optional()?
            .map(build_meta)
            .transpose()
    }

    fn list(&self) -> StoreResult<Vec<DocumentMeta>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, version, created_at, updated_at FROM documents ORDER BY key")?;
        let rows = stmt.query_map([], meta_from_row)?;

        let mut metas = Vec::new();
        for row in rows {
            metas.push(build_meta(row?)?);
        }
        Ok(metas)
    }
}

#[cfg(test)]
mod tests {
    use storemetrics_core::model::{Cents, Day, DayNode, MetricTree, Month, MonthNode, RepairMetrics, YearNode};
    use storemetrics_core::{MetricsDomain, RepairCategory};

    use super::*;

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    fn repair_document(units: u64, now: Timestamp) -> CacheDocument {
        let values = RepairMetrics {
            revenue: Cents(units as i64 * 1_000),
            units_repaired: units,
        };
        let day = DayNode::new(Day::new(1).unwrap(), values);
        let tree = MetricTree::from_years(vec![YearNode::from_months(
            2024,
            vec![MonthNode::from_days(Month::May, vec![day])],
        )]);
        let payload = DocumentPayload::Repair {
            category: RepairCategory::Screen,
            tree,
        };
        CacheDocument::new("https://metrics.example", StoreLocation::Calgary, payload, now)
    }

    #[test]
    fn test_insert_then_get() {
        let mut store = SqliteStore::in_memory().unwrap();
        let document = repair_document(3, at(1_700_000_000));
        let meta = store.upsert(document.clone()).unwrap();
        assert_eq!(meta.version, 1);

        let stored = store.get(&document.key).unwrap().unwrap();
        assert_eq!(stored, document);
        assert_eq!(stored.domain, MetricsDomain::Repair);
        assert_eq!(stored.category, "Screen");
    }

    #[test]
    fn test_upsert_keeps_created_at_and_bumps_version() {
        let mut store = SqliteStore::in_memory().unwrap();
        let first = repair_document(3, at(1_700_000_000));
        store.upsert(first.clone()).unwrap();
        store.upsert(repair_document(4, at(1_700_000_100))).unwrap();
        let meta = store.upsert(repair_document(5, at(1_700_000_200))).unwrap();

        assert_eq!(meta.version, 3);
        assert_eq!(meta.created_at, at(1_700_000_000));
        assert_eq!(meta.updated_at, at(1_700_000_200));

        let stored = store.require(&first.key).unwrap();
        let DocumentPayload::Repair { tree, .. } = &stored.payload else {
            panic!("expected a repair payload");
        };
        assert_eq!(tree.totals.units_repaired, 5);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let store = SqliteStore::in_memory().unwrap();
        let key = CacheKey::derive("x", MetricsDomain::Customer, StoreLocation::Edmonton, "Overview");
        assert!(store.get(&key).unwrap().is_none());
        assert!(store.meta(&key).unwrap().is_none());
        assert!(matches!(store.require(&key), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.db");
        let document = repair_document(2, at(1_700_000_000));
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.upsert(document.clone()).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed, vec![document.meta()]);
    }
}
