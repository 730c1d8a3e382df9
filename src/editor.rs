//! Ordered content elements of the active project and the current selection.

use crate::error::{Error, Result};
use crate::models::{Element, ProjectData, ProjectSettings};

/// What the studio core needs from an editing surface.
pub trait ProjectSurface {
    /// Snapshot of the surface's content for persistence.
    fn project_data(&self) -> ProjectData;

    /// Replaces the surface's content. Returns `false` if nothing was loaded.
    fn load_project_data(&mut self, data: ProjectData) -> bool;
}

/// Element list of the open project.
///
/// The selected id, when set, always names an element in the list.
#[derive(Debug, Default)]
pub struct ElementCollection {
    elements: Vec<Element>,
    settings: ProjectSettings,
    selected: Option<String>,
}

impl ElementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new element of `kind` and selects it.
    ///
    /// When the stored positions leave no room past the highest one, the
    /// collection is renumbered `0..len` in list order first.
    pub fn add(&mut self, kind: &str) -> Result<Element> {
        let position = match self.next_position() {
            Some(position) => position,
            None => {
                self.renumber()?;
                self.next_position()
                    .ok_or_else(|| Error::Validation("element collection is full".to_string()))?
            }
        };
        let element = Element::new(kind, position);
        self.elements.push(element.clone());
        self.selected = Some(element.id.clone());
        Ok(element)
    }

    /// `len`, or one past the highest stored position if that is larger.
    fn next_position(&self) -> Option<u32> {
        let len = u32::try_from(self.elements.len()).ok()?;
        let after_last = match self.elements.iter().map(|e| e.position).max() {
            Some(max) => max.checked_add(1)?,
            None => 0,
        };
        Some(after_last.max(len))
    }

    fn renumber(&mut self) -> Result<()> {
        for (index, element) in self.elements.iter_mut().enumerate() {
            element.position = u32::try_from(index)
                .map_err(|_| Error::Validation("element collection is full".to_string()))?;
        }
        tracing::debug!("Renumbered {} element positions", self.elements.len());
        Ok(())
    }

    /// Removes the element with `id`, clearing the selection if it pointed there.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id == id) else {
            return false;
        };
        self.elements.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        true
    }

    /// Selects `id` if present, otherwise clears the selection.
    pub fn select(&mut self, id: &str) {
        self.selected = self
            .elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.id.clone());
    }

    pub fn selected(&self) -> Option<&Element> {
        let id = self.selected.as_deref()?;
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_all(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Swaps in a loaded element list and clears the selection.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selected = None;
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ProjectSurface for ElementCollection {
    fn project_data(&self) -> ProjectData {
        ProjectData {
            content: self.get_all(),
            settings: self.settings.clone(),
        }
    }

    fn load_project_data(&mut self, data: ProjectData) -> bool {
        self.settings = data.settings;
        self.replace_all(data.content);
        true
    }
}
