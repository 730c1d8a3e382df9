use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::Store;
use crate::error::{Error, Result};

/// In-process store with the failure modes of browser local storage.
///
/// An optional quota bounds the total size of keys and values in bytes, and
/// the store can be switched off entirely. Both surface as
/// [`Error::PersistenceUnavailable`]. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
    disabled: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Makes every subsequent read and write fail until re-enabled.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        if self.disabled.load(Ordering::SeqCst) {
            return Err(Error::persistence("storage is disabled"));
        }
        self.records
            .lock()
            .map_err(|_| Error::persistence("memory store lock poisoned"))
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut records = self.lock()?;

        if let Some(quota) = self.quota {
            let untouched: usize = records
                .iter()
                .filter(|(key, _)| !entries.iter().any(|(k, _)| *k == key.as_str()))
                .map(|(key, value)| key.len() + value.len())
                .sum();
            let incoming: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            if untouched + incoming > quota {
                return Err(Error::persistence(format!(
                    "quota of {} bytes exceeded",
                    quota
                )));
            }
        }

        for (key, value) in entries {
            records.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
