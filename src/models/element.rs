use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single content block within a project (quiz, header, poll, ...).
///
/// `kind` is a free-form tag; type-specific configuration lives in
/// `content.settings` and is opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: ElementContent,
    /// Ordering key, unique within a project's element sequence.
    pub position: u32,
}

impl Element {
    pub fn new(kind: &str, position: u32) -> Self {
        Self {
            id: format!("el_{}", Uuid::new_v4().simple()),
            kind: kind.to_string(),
            content: ElementContent {
                title: default_title(kind),
                settings: Map::new(),
            },
            position,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementContent {
    pub title: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

/// "quiz" becomes "New Quiz".
fn default_title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => format!("New {}{}", first.to_uppercase(), chars.as_str()),
        None => "New ".to_string(),
    }
}
