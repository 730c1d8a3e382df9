use serde::{Deserialize, Serialize};

/// Number of project ids kept in the recent list.
pub const RECENT_LIMIT: usize = 5;

/// Most-recently-used project ids, most recent first.
///
/// Entries are unique and the list never grows past its limit. Serialized as
/// a plain JSON array of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentList(Vec<String>);

impl RecentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a list from stored ids, dropping duplicates and anything past
    /// `limit`.
    pub fn from_ids(ids: Vec<String>, limit: usize) -> Self {
        let mut list = Self::new();
        for id in ids {
            if !list.contains(&id) {
                list.0.push(id);
            }
        }
        list.0.truncate(limit);
        list
    }

    /// Moves `id` to the front, inserting it if absent.
    pub fn touch(&mut self, id: &str, limit: usize) {
        self.0.retain(|existing| existing != id);
        self.0.insert(0, id.to_string());
        self.0.truncate(limit);
    }

    /// Returns whether `id` was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &RecentList) -> Vec<&str> {
        list.ids().iter().map(String::as_str).collect()
    }

    #[test]
    fn touch_moves_existing_id_to_front() {
        let mut list = RecentList::new();
        list.touch("a", RECENT_LIMIT);
        list.touch("b", RECENT_LIMIT);
        list.touch("a", RECENT_LIMIT);
        assert_eq!(ids(&list), ["a", "b"]);
    }

    #[test]
    fn touch_caps_length() {
        let mut list = RecentList::new();
        for id in ["1", "2", "3", "4", "5", "6", "7"] {
            list.touch(id, RECENT_LIMIT);
        }
        assert_eq!(ids(&list), ["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn from_ids_repairs_stored_lists() {
        let stored = ["a", "b", "a", "c", "d", "e", "f"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let list = RecentList::from_ids(stored, RECENT_LIMIT);
        assert_eq!(ids(&list), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn remove_reports_presence() {
        let mut list = RecentList::new();
        list.touch("a", RECENT_LIMIT);
        assert!(list.remove("a"));
        assert!(!list.remove("a"));
        assert!(list.is_empty());
    }
}
