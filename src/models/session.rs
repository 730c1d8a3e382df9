use serde::{Deserialize, Serialize};

/// Where the editing session stands relative to persisted storage.
///
/// - `NoActiveProject`: nothing is open
/// - `Clean`: the open project matches what was last persisted
/// - `Dirty`: elements changed since the last successful save
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoActiveProject,
    Clean,
    Dirty,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoActiveProject => "no_active_project",
            Self::Clean => "clean",
            Self::Dirty => "dirty",
        }
    }
}
