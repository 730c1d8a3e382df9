//! The studio core: one active project, its elements, and their persistence.
//!
//! [`Studio`] owns the [`Session`] and [`ElementCollection`] and is the only
//! path through which they change. Every mutation that alters content marks
//! the session dirty and publishes `content:changed`; project lifecycle calls
//! publish their own events on the [`EventBus`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use crate::config::StudioConfig;
use crate::editor::{ElementCollection, ProjectSurface};
use crate::error::{Error, Result};
use crate::events::EventBus;
use crate::models::*;
use crate::preview::PreviewState;
use crate::repository::ProjectRepository;
use crate::session::Session;
use crate::storage::{StorageAdapter, Store};

/// A studio shared between the command loop and the autosave task.
pub type SharedStudio = Arc<Mutex<Studio>>;

pub struct Studio {
    repository: ProjectRepository,
    session: Session,
    elements: ElementCollection,
    preview: PreviewState,
    events: EventBus,
}

impl Studio {
    pub fn new(repository: ProjectRepository, events: EventBus) -> Self {
        Self {
            repository,
            session: Session::new(),
            elements: ElementCollection::new(),
            preview: PreviewState::default(),
            events,
        }
    }

    /// Builds a studio over `store` using the keys and limits in `config`.
    pub fn with_store(store: Arc<dyn Store>, config: &StudioConfig) -> Self {
        let storage = StorageAdapter::new(store, config.storage.clone(), config.recent_limit);
        let repository = ProjectRepository::new(storage, config.max_project_name_length);
        Self::new(repository, EventBus::default())
    }

    pub fn into_shared(self) -> SharedStudio {
        Arc::new(Mutex::new(self))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.events.subscribe()
    }

    pub fn repository(&self) -> &ProjectRepository {
        &self.repository
    }

    // ============================================================
    // Project lifecycle
    // ============================================================

    pub fn create_project(&mut self, name: Option<&str>) -> Result<Project> {
        let project = self.repository.create(name)?;
        self.activate(project.clone());
        self.events.publish(StudioEvent::ProjectCreated {
            project: project.clone(),
        });
        Ok(project)
    }

    /// Opens a stored project. The session is untouched on failure.
    pub fn load_project(&mut self, id: &str) -> Result<Project> {
        let project = self.repository.load(id)?;
        self.activate(project.clone());
        tracing::info!("Loaded project {} ({})", project.id, project.name);
        self.events.publish(StudioEvent::ProjectLoaded {
            project: project.clone(),
        });
        Ok(project)
    }

    /// Reopens the most recently used project that still exists.
    pub fn restore_last_project(&mut self) -> Result<Option<Project>> {
        let recent = self.repository.recent_ids()?;
        for id in recent.ids() {
            match self.load_project(id) {
                Ok(project) => return Ok(Some(project)),
                Err(Error::NotFound(_)) => {
                    tracing::debug!("Skipping stale recent entry {}", id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Persists the active project with the live element list.
    ///
    /// Returns `None` when no project is open. On failure the session keeps
    /// its previous state, including the dirty flag.
    pub fn save_current_project(&mut self) -> Result<Option<Project>> {
        let Some(current) = self.session.current_project() else {
            return Ok(None);
        };

        let mut project = current.clone();
        project.data = self.elements.project_data();
        self.repository.save(&mut project)?;

        self.session.mark_saved(project.clone(), Utc::now());
        self.events.publish(StudioEvent::ProjectSaved {
            project: project.clone(),
        });
        Ok(Some(project))
    }

    /// Deletes a stored project, closing it first if it is the active one.
    pub fn delete_project(&mut self, id: &str) -> Result<()> {
        self.repository.delete(id)?;
        if self.session.is_active(id) {
            self.deactivate();
        }
        self.events.publish(StudioEvent::ProjectDeleted {
            project_id: id.to_string(),
        });
        Ok(())
    }

    /// Closes the active project without saving.
    pub fn close_project(&mut self) -> Option<Project> {
        let closed = self.session.current_project().cloned();
        self.deactivate();
        closed
    }

    pub fn projects(&self) -> Result<Vec<Project>> {
        self.repository.list()
    }

    pub fn recent_projects(&self) -> Result<Vec<Project>> {
        self.repository.list_recent()
    }

    fn activate(&mut self, project: Project) {
        self.elements.load_project_data(project.data.clone());
        self.preview = PreviewState::for_project(&project.data.settings);
        self.session.open(project, Utc::now());
    }

    fn deactivate(&mut self) {
        self.session.close();
        self.elements.load_project_data(ProjectData::default());
        self.preview = PreviewState::default();
    }

    // ============================================================
    // Elements
    // ============================================================

    pub fn add_element(&mut self, kind: &str) -> Result<Element> {
        self.require_project()?;
        let element = self.elements.add(kind)?;
        self.content_changed();
        Ok(element)
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        let removed = self.elements.remove(id);
        if removed {
            self.content_changed();
        }
        removed
    }

    pub fn select_element(&mut self, id: &str) {
        self.elements.select(id);
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.elements.selected()
    }

    pub fn elements(&self) -> &ElementCollection {
        &self.elements
    }

    fn content_changed(&mut self) {
        self.session.mark_dirty();
        self.events.publish(StudioEvent::ContentChanged {});
    }

    fn require_project(&self) -> Result<&Project> {
        self.session
            .current_project()
            .ok_or_else(|| Error::Validation("no project is open".to_string()))
    }

    // ============================================================
    // Session
    // ============================================================

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.session.last_saved()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.session.current_project()
    }

    // ============================================================
    // Preview & settings
    // ============================================================

    pub fn preview(&self) -> PreviewState {
        self.preview
    }

    pub fn set_preview_platform(&mut self, platform: Platform) -> bool {
        match self.session.current_project() {
            Some(project) => self
                .preview
                .set_platform(platform, &project.data.settings),
            None => false,
        }
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.preview.set_mode(mode);
    }

    pub fn settings(&self) -> Result<Map<String, Value>> {
        self.repository.storage().read_settings()
    }

    pub fn update_settings(&self, settings: &Map<String, Value>) -> Result<()> {
        self.repository.storage().write_settings(settings)
    }
}
