use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::element::Element;

/// Name given to projects created with a blank name.
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// A user's saved unit of work.
///
/// Projects are the top-level organizational unit. Each project holds an
/// ordered sequence of content elements plus the platform targets it is
/// previewed and published on. The serialized form uses the camelCase field
/// names of the persisted projects record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub data: ProjectData,
}

impl Project {
    /// Builds an empty project with default platform settings.
    ///
    /// `name` is taken as-is; callers normalize it with [`normalize_name`].
    pub fn new(id: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created: now,
            last_modified: now,
            data: ProjectData::default(),
        }
    }
}

/// Generates a fresh project id.
pub fn new_project_id() -> String {
    format!("proj_{}", Uuid::new_v4().simple())
}

/// Trims `name`, falls back to [`DEFAULT_PROJECT_NAME`] when blank, and
/// truncates to `max_len` characters.
pub fn normalize_name(name: Option<&str>, max_len: usize) -> String {
    let trimmed = name.map(str::trim).unwrap_or_default();
    let source = if trimmed.is_empty() {
        DEFAULT_PROJECT_NAME
    } else {
        trimmed
    };
    source.chars().take(max_len).collect()
}

/// Content and settings of a project, as exchanged with the editor surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    #[serde(default)]
    pub content: Vec<Element>,
    #[serde(default)]
    pub settings: ProjectSettings,
}

/// Platform targets a project is prepared for.
///
/// Stored records may carry an empty settings object or tags this build does
/// not know; missing fields take their defaults and unknown tags are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(deserialize_with = "known_platforms")]
    pub platforms: BTreeSet<Platform>,
    #[serde(deserialize_with = "known_platform")]
    pub default_platform: Platform,
}

fn known_platforms<'de, D>(deserializer: D) -> Result<BTreeSet<Platform>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Vec::<String>::deserialize(deserializer)?;
    Ok(tags.iter().filter_map(|tag| Platform::from_str(tag)).collect())
}

fn known_platform<'de, D>(deserializer: D) -> Result<Platform, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = String::deserialize(deserializer)?;
    Ok(Platform::from_str(&tag).unwrap_or(Platform::Website))
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.into_iter().collect(),
            default_platform: Platform::Website,
        }
    }
}

impl ProjectSettings {
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }
}

/// A publishing target.
///
/// - `Website`: embedded on a web page
/// - `Instagram` / `Linkedin`: social posts
/// - `Email`: newsletter body, no interactive scripting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Website,
    Instagram,
    Email,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Self::Website,
        Self::Instagram,
        Self::Email,
        Self::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Instagram => "instagram",
            Self::Email => "email",
            Self::Linkedin => "linkedin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "website" => Some(Self::Website),
            "instagram" => Some(Self::Instagram),
            "email" => Some(Self::Email),
            "linkedin" => Some(Self::Linkedin),
            _ => None,
        }
    }
}
