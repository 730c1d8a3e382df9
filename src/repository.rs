//! CRUD over projects, delegating to the [`StorageAdapter`].

use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::*;
use crate::storage::StorageAdapter;

#[derive(Clone)]
pub struct ProjectRepository {
    storage: StorageAdapter,
    max_name_len: usize,
}

impl ProjectRepository {
    pub fn new(storage: StorageAdapter, max_name_len: usize) -> Self {
        Self {
            storage,
            max_name_len,
        }
    }

    pub fn storage(&self) -> &StorageAdapter {
        &self.storage
    }

    /// Creates and persists an empty project, placing it first in the recent list.
    ///
    /// Blank names become [`DEFAULT_PROJECT_NAME`]; long names are truncated.
    pub fn create(&self, name: Option<&str>) -> Result<Project> {
        let mut projects = self.storage.read_projects()?;
        let mut recent = self.storage.read_recent()?;

        let id = loop {
            let candidate = new_project_id();
            if !projects.iter().any(|p| p.id == candidate) {
                break candidate;
            }
        };

        let project = Project::new(id, normalize_name(name, self.max_name_len), Utc::now());
        projects.push(project.clone());
        recent.touch(&project.id, self.storage.recent_limit());
        self.storage.write_projects_and_recent(&projects, &recent)?;

        tracing::info!("Created project {} ({})", project.id, project.name);
        Ok(project)
    }

    /// Fetches a project by id and marks it most recently used.
    pub fn load(&self, id: &str) -> Result<Project> {
        let project = self
            .storage
            .read_projects()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut recent = self.storage.read_recent()?;
        recent.touch(id, self.storage.recent_limit());
        self.storage.write_recent(&recent)?;

        Ok(project)
    }

    /// Upserts `project` by id after stamping `last_modified`.
    ///
    /// The projects and recent records are written together. `project` is only
    /// updated once the write has succeeded.
    pub fn save(&self, project: &mut Project) -> Result<()> {
        let mut projects = self.storage.read_projects()?;
        let mut recent = self.storage.read_recent()?;

        let mut saved = project.clone();
        saved.last_modified = Utc::now().max(saved.last_modified).max(saved.created);

        match projects.iter_mut().find(|p| p.id == saved.id) {
            Some(existing) => *existing = saved.clone(),
            None => projects.push(saved.clone()),
        }
        recent.touch(&saved.id, self.storage.recent_limit());
        self.storage.write_projects_and_recent(&projects, &recent)?;

        *project = saved;
        tracing::debug!("Saved project {}", project.id);
        Ok(())
    }

    /// Removes a project and its recent entry. Deleting an absent id succeeds.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut projects = self.storage.read_projects()?;
        let mut recent = self.storage.read_recent()?;

        let before = projects.len();
        projects.retain(|p| p.id != id);
        let removed_project = projects.len() != before;
        let removed_recent = recent.remove(id);

        if removed_project || removed_recent {
            self.storage.write_projects_and_recent(&projects, &recent)?;
            tracing::info!("Deleted project {}", id);
        }
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Project>> {
        self.storage.read_projects()
    }

    /// Recent projects in most-recent-first order. Ids with no stored project
    /// are skipped.
    pub fn list_recent(&self) -> Result<Vec<Project>> {
        let projects = self.storage.read_projects()?;
        let recent = self.storage.read_recent()?;

        Ok(recent
            .ids()
            .iter()
            .filter_map(|id| projects.iter().find(|p| &p.id == id).cloned())
            .collect())
    }

    pub fn recent_ids(&self) -> Result<RecentList> {
        self.storage.read_recent()
    }
}
