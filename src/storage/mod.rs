mod migrations;

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use migrations::run_migrations;

const CURRENT_DOC_KEY: &str = "current_doc_id";

/// Durable key-value store for per-document engine state, backed by SQLite.
/// Values are JSON, bucketed per document fingerprint and, for page-scoped
/// keys, per page number. All calls are synchronous; callers on the typing
/// path treat failures as "no saved value" rather than propagating them.
#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open SQLite database {}", db_path.display()))?;
        Self::initialize(conn)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("failed to open in-memory SQLite database")?;
        Self::initialize(conn)
    }

    fn initialize(mut conn: Connection) -> Result<Self> {
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }
        if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
            error!("Failed to enable foreign keys: {err}");
        }

        run_migrations(&mut conn).context("failed to run database migrations")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read a page-scoped value. Absence is `Ok(None)`; a corrupt stored
    /// value is discarded with a warning rather than surfaced.
    pub fn get_page_value<T: DeserializeOwned>(
        &self,
        doc_id: &str,
        page: u32,
        key: &str,
    ) -> Result<Option<T>> {
        let raw: Option<String> = self
            .lock()
            .query_row(
                "SELECT value FROM document_values WHERE doc_id = ?1 AND page = ?2 AND key = ?3",
                params![doc_id, page, key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read {key} for {doc_id} page {page}"))?;

        Ok(raw.and_then(|json| decode_value(&json, doc_id, key)))
    }

    pub fn set_page_value<T: Serialize>(
        &self,
        doc_id: &str,
        page: u32,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let json =
            serde_json::to_string(value).with_context(|| format!("failed to encode {key}"))?;
        self.lock()
            .execute(
                "INSERT INTO document_values (doc_id, page, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(doc_id, page, key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![doc_id, page, key, json, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write {key} for {doc_id} page {page}"))?;
        Ok(())
    }

    /// Read a document-scoped value (page number bookmark and the like).
    pub fn get_document_value<T: DeserializeOwned>(
        &self,
        doc_id: &str,
        key: &str,
    ) -> Result<Option<T>> {
        let raw: Option<String> = self
            .lock()
            .query_row(
                "SELECT value FROM document_state WHERE doc_id = ?1 AND key = ?2",
                params![doc_id, key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read {key} for {doc_id}"))?;

        Ok(raw.and_then(|json| decode_value(&json, doc_id, key)))
    }

    pub fn set_document_value<T: Serialize>(
        &self,
        doc_id: &str,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let json =
            serde_json::to_string(value).with_context(|| format!("failed to encode {key}"))?;
        self.lock()
            .execute(
                "INSERT INTO document_state (doc_id, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(doc_id, key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![doc_id, key, json, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write {key} for {doc_id}"))?;
        Ok(())
    }

    pub fn set_current_document(&self, doc_id: &str) -> Result<()> {
        self.lock()
            .execute(
                "INSERT INTO app_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![CURRENT_DOC_KEY, doc_id],
            )
            .context("failed to record current document id")?;
        Ok(())
    }

    pub fn current_document(&self) -> Result<Option<String>> {
        self.lock()
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![CURRENT_DOC_KEY],
                |row| row.get(0),
            )
            .optional()
            .context("failed to read current document id")
    }
}

fn decode_value<T: DeserializeOwned>(json: &str, doc_id: &str, key: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("discarding corrupt stored {key} for {doc_id}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Position;

    #[test]
    fn page_value_round_trip() {
        let store = DocumentStore::in_memory().unwrap();
        let position = Position {
            block: 0,
            paragraph: 1,
            line: 2,
            word: 3,
            symbol: 4,
            is_space: true,
        };

        store
            .set_page_value("doc_a", 7, "position", &position)
            .unwrap();
        let restored: Option<Position> = store.get_page_value("doc_a", 7, "position").unwrap();
        assert_eq!(restored, Some(position));
    }

    #[test]
    fn values_are_bucketed_per_document_and_page() {
        let store = DocumentStore::in_memory().unwrap();
        store.set_page_value("doc_a", 1, "position", &1u32).unwrap();
        store.set_page_value("doc_a", 2, "position", &2u32).unwrap();
        store.set_page_value("doc_b", 1, "position", &3u32).unwrap();

        let a1: Option<u32> = store.get_page_value("doc_a", 1, "position").unwrap();
        let a2: Option<u32> = store.get_page_value("doc_a", 2, "position").unwrap();
        let b1: Option<u32> = store.get_page_value("doc_b", 1, "position").unwrap();
        assert_eq!((a1, a2, b1), (Some(1), Some(2), Some(3)));
    }

    #[test]
    fn absent_value_reads_as_none() {
        let store = DocumentStore::in_memory().unwrap();
        let missing: Option<Position> = store.get_page_value("doc_a", 1, "position").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn overwrite_keeps_latest_value() {
        let store = DocumentStore::in_memory().unwrap();
        store.set_page_value("doc_a", 1, "position", &1u32).unwrap();
        store.set_page_value("doc_a", 1, "position", &9u32).unwrap();
        let value: Option<u32> = store.get_page_value("doc_a", 1, "position").unwrap();
        assert_eq!(value, Some(9));
    }

    #[test]
    fn corrupt_stored_json_reads_as_none() {
        let store = DocumentStore::in_memory().unwrap();
        store
            .lock()
            .execute(
                "INSERT INTO document_values (doc_id, page, key, value, updated_at)
                 VALUES ('doc_a', 1, 'position', 'not json{', '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let value: Option<Position> = store.get_page_value("doc_a", 1, "position").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn current_document_slot() {
        let store = DocumentStore::in_memory().unwrap();
        assert_eq!(store.current_document().unwrap(), None);
        store.set_current_document("doc_a").unwrap();
        store.set_current_document("doc_b").unwrap();
        assert_eq!(store.current_document().unwrap(), Some("doc_b".into()));
    }

    #[test]
    fn document_scoped_values() {
        let store = DocumentStore::in_memory().unwrap();
        store.set_document_value("doc_a", "page_number", &4u32).unwrap();
        let page: Option<u32> = store.get_document_value("doc_a", "page_number").unwrap();
        assert_eq!(page, Some(4));
    }

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retype.db");

        {
            let store = DocumentStore::new(path.clone()).unwrap();
            store.set_page_value("doc_a", 1, "position", &5u32).unwrap();
        }

        let store = DocumentStore::new(path).unwrap();
        let value: Option<u32> = store.get_page_value("doc_a", 1, "position").unwrap();
        assert_eq!(value, Some(5));
    }
}
