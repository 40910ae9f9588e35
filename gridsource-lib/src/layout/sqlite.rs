//! SQLite-backed layout store.
//!
//! Each layout slot (`columnState`, `resetColumnState`, or a custom key) is
//! one row of the `layout` table holding the serialized column state.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::LayoutStore;
use crate::error::StoreError;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS layout (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";
const SELECT_LAYOUT: &str = "SELECT value FROM layout WHERE key = ?1";
const UPSERT_LAYOUT: &str = "INSERT INTO layout (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const DELETE_LAYOUT: &str = "DELETE FROM layout WHERE key = ?1";

/// Keeps column layouts across sessions in a SQLite file.
///
/// A grid restores its layout once on mount but saves it after every column
/// move, resize or visibility change, so slots are mirrored in memory after
/// the first read or write. The store assumes it is the only writer of its
/// database file.
///
/// # Example
///
/// ```ignore
/// use gridsource_lib::layout::{LayoutPersistence, SqliteLayoutStore};
///
/// let layouts = LayoutPersistence::new(SqliteLayoutStore::open("layouts.db").await?);
/// layouts.restore_into(&mut model).await;
/// ```
pub struct SqliteLayoutStore {
    client: Client,
    slots: DashMap<String, String>,
}

impl SqliteLayoutStore {
    /// Opens (or creates) the layout database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        debug!("Opened layout store at {}", path.display());
        Self::init(client).await
    }

    /// Opens a store whose layouts are lost when it is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;
        Self::init(client).await
    }

    async fn init(client: Client) -> Result<Self, StoreError> {
        client.conn(|conn| conn.execute(CREATE_TABLE, [])).await?;
        Ok(Self {
            client,
            slots: DashMap::new(),
        })
    }

    async fn load_slot(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();
        let layout = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(SELECT_LAYOUT)?;
                let mut rows = stmt.query([&key])?;
                match rows.next()? {
                    Some(row) => row.get::<_, String>(0).map(Some),
                    None => Ok(None),
                }
            })
            .await?;
        Ok(layout)
    }
}

#[async_trait]
impl LayoutStore for SqliteLayoutStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(layout) = self.slots.get(key) {
            return Ok(Some(layout.clone()));
        }

        let layout = self.load_slot(key).await?;
        if let Some(layout) = &layout {
            self.slots.insert(key.to_string(), layout.clone());
        }
        Ok(layout)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let params = (key.to_string(), value.clone());
        self.client
            .conn(move |conn| conn.execute(UPSERT_LAYOUT, rusqlite::params![params.0, params.1]))
            .await?;

        self.slots.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute(DELETE_LAYOUT, [&owned]))
            .await?;

        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = SqliteLayoutStore::open_in_memory().await.unwrap();
        assert_eq!(store.get("columnState").await.unwrap(), None);

        store.set("columnState", "[]".into()).await.unwrap();
        store.set("columnState", r#"[{"colId":"age"}]"#.into()).await.unwrap();
        assert_eq!(
            store.get("columnState").await.unwrap().as_deref(),
            Some(r#"[{"colId":"age"}]"#)
        );

        store.remove("columnState").await.unwrap();
        assert_eq!(store.get("columnState").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.db");

        {
            let store = SqliteLayoutStore::open(&path).await.unwrap();
            store.set("columnState", "saved".into()).await.unwrap();
        }

        let store = SqliteLayoutStore::open(&path).await.unwrap();
        assert_eq!(store.get("columnState").await.unwrap().as_deref(), Some("saved"));
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let store = SqliteLayoutStore::open_in_memory().await.unwrap();
        store.set("columnState", "edited".into()).await.unwrap();
        store.set("resetColumnState", "defaults".into()).await.unwrap();

        store.remove("columnState").await.unwrap();

        assert_eq!(store.get("columnState").await.unwrap(), None);
        assert_eq!(store.get("resetColumnState").await.unwrap().as_deref(), Some("defaults"));
    }
}
