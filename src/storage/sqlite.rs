use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use super::{schema, Store};
use crate::error::{Error, Result};

/// Local store backed by a single SQLite `records` table.
///
/// Each logical key maps to one row holding the JSON text of its record.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let parent = path
            .parent()
            .ok_or_else(|| Error::persistence("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent).map_err(Error::persistence)?;
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens the database in `data_dir`, or the platform data directory.
    pub fn open_default(data_dir: Option<&Path>) -> Result<Self> {
        Self::open(default_path(data_dir)?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::persistence("database lock poisoned"))
    }
}

pub fn default_path(data_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir.join("c2e.db"));
    }
    let dirs = directories::ProjectDirs::from("", "", "c2e")
        .ok_or_else(|| Error::persistence("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("c2e.db"))
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM records WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO records (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                (key, value, &now),
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn missing_key_reads_as_none() {
        assert_eq!(store().get("nope").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = store();
        store.set("k", "1".into()).unwrap();
        store.set("k", "2".into()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn unmigrated_store_reports_persistence_failure() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(matches!(
            store.get("k"),
            Err(Error::PersistenceUnavailable(_))
        ));
    }

    #[test]
    fn failed_batch_writes_nothing() {
        let store = store();
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON records WHEN NEW.key = 'bad'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let result = store.set_many(&[("good", "1".to_string()), ("bad", "2".to_string())]);

        assert!(matches!(result, Err(Error::PersistenceUnavailable(_))));
        assert_eq!(store.get("good").unwrap(), None);
    }

    #[test]
    fn explicit_data_dir_is_used() {
        let path = default_path(Some(Path::new("/tmp/c2e-data"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/c2e-data/c2e.db"));
    }
}
