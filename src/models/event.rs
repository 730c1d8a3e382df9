use serde::{Deserialize, Serialize};

use super::project::Project;

/// Notifications raised by the studio core to its collaborators
/// (editor UI, preview, analytics, export).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail")]
pub enum StudioEvent {
    #[serde(rename = "project:created")]
    ProjectCreated { project: Project },
    #[serde(rename = "project:loaded")]
    ProjectLoaded { project: Project },
    #[serde(rename = "project:saved")]
    ProjectSaved { project: Project },
    #[serde(rename = "project:deleted")]
    ProjectDeleted {
        #[serde(rename = "projectId")]
        project_id: String,
    },
    #[serde(rename = "content:changed")]
    ContentChanged {},
}

impl StudioEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "project:created",
            Self::ProjectLoaded { .. } => "project:loaded",
            Self::ProjectSaved { .. } => "project:saved",
            Self::ProjectDeleted { .. } => "project:deleted",
            Self::ContentChanged {} => "content:changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_event_uses_wire_names() {
        let event = StudioEvent::ProjectDeleted {
            project_id: "proj_1".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "project:deleted");
        assert_eq!(json["detail"]["projectId"], "proj_1");
        assert_eq!(event.name(), "project:deleted");
    }
}
