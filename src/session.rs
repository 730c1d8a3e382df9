//! The single active project and whether it has unsaved changes.

use chrono::{DateTime, Utc};

use crate::models::{Project, SessionState};

#[derive(Debug, Default)]
pub struct Session {
    current_project: Option<Project>,
    dirty: bool,
    last_saved: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.current_project, self.dirty) {
            (None, _) => SessionState::NoActiveProject,
            (Some(_), false) => SessionState::Clean,
            (Some(_), true) => SessionState::Dirty,
        }
    }

    /// Makes `project` the active project in the `Clean` state.
    ///
    /// A freshly created or loaded project matches storage, so it also counts
    /// as saved at `saved_at`.
    pub fn open(&mut self, project: Project, saved_at: DateTime<Utc>) {
        self.current_project = Some(project);
        self.dirty = false;
        self.last_saved = Some(saved_at);
    }

    /// Content changed. Ignored when nothing is open.
    pub fn mark_dirty(&mut self) {
        if self.current_project.is_some() {
            self.dirty = true;
        }
    }

    /// Records a successful save of `project`.
    pub fn mark_saved(&mut self, project: Project, saved_at: DateTime<Utc>) {
        self.current_project = Some(project);
        self.dirty = false;
        self.last_saved = Some(saved_at);
    }

    pub fn close(&mut self) -> Option<Project> {
        self.dirty = false;
        self.last_saved = None;
        self.current_project.take()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project.as_ref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.current_project.as_ref().is_some_and(|p| p.id == id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }
}
