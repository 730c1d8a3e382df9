//! Key-value persistence of the projects, recent and settings records.
//!
//! A [`Store`] is a dumb string-keyed blob store. [`StorageAdapter`] layers
//! the three logical records on top of it and handles their JSON encoding.
//! Every write replaces whole records; there are no partial or merge writes.

mod memory;
mod schema;
mod sqlite;

use std::sync::Arc;

use serde_json::{Map, Value};

pub use memory::MemoryStore;
pub use sqlite::{default_path, SqliteStore};

use crate::config::StorageKeys;
use crate::error::Result;
use crate::models::{Project, RecentList};

/// A persistent local key-value store.
///
/// Implementations report any refused read or write as
/// [`Error::PersistenceUnavailable`](crate::error::Error::PersistenceUnavailable).
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes every entry or none of them.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.set_many(&[(key, value)])
    }
}

/// Typed access to the three top-level records.
#[derive(Clone)]
pub struct StorageAdapter {
    store: Arc<dyn Store>,
    keys: StorageKeys,
    recent_limit: usize,
}

impl StorageAdapter {
    pub fn new(store: Arc<dyn Store>, keys: StorageKeys, recent_limit: usize) -> Self {
        Self {
            store,
            keys,
            recent_limit,
        }
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    pub fn read_projects(&self) -> Result<Vec<Project>> {
        match self.store.get(&self.keys.projects_key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn read_recent(&self) -> Result<RecentList> {
        match self.store.get(&self.keys.recent_key)? {
            Some(json) => {
                let ids: Vec<String> = serde_json::from_str(&json)?;
                Ok(RecentList::from_ids(ids, self.recent_limit))
            }
            None => Ok(RecentList::new()),
        }
    }

    pub fn write_recent(&self, recent: &RecentList) -> Result<()> {
        self.store
            .set(&self.keys.recent_key, serde_json::to_string(recent)?)
    }

    /// Replaces the projects and recent records in one atomic write.
    pub fn write_projects_and_recent(
        &self,
        projects: &[Project],
        recent: &RecentList,
    ) -> Result<()> {
        let entries = [
            (
                self.keys.projects_key.as_str(),
                serde_json::to_string(projects)?,
            ),
            (
                self.keys.recent_key.as_str(),
                serde_json::to_string(recent)?,
            ),
        ];
        self.store.set_many(&entries)
    }

    /// Opaque settings record; empty when never written.
    pub fn read_settings(&self) -> Result<Map<String, Value>> {
        match self.store.get(&self.keys.settings_key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Map::new()),
        }
    }

    pub fn write_settings(&self, settings: &Map<String, Value>) -> Result<()> {
        self.store
            .set(&self.keys.settings_key, serde_json::to_string(settings)?)
    }
}
