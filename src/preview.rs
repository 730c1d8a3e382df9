//! Which platform and device frame the project is previewed in.

use crate::models::{Platform, PreviewMode, ProjectSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewState {
    platform: Platform,
    mode: PreviewMode,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            platform: Platform::Website,
            mode: PreviewMode::Desktop,
        }
    }
}

impl PreviewState {
    /// Starts on the project's default platform.
    pub fn for_project(settings: &ProjectSettings) -> Self {
        Self {
            platform: settings.default_platform,
            mode: PreviewMode::default(),
        }
    }

    /// Switches platform if the project targets it. Returns whether it changed.
    pub fn set_platform(&mut self, platform: Platform, settings: &ProjectSettings) -> bool {
        if !settings.supports(platform) {
            tracing::debug!("Ignoring unsupported preview platform {}", platform.as_str());
            return false;
        }
        self.platform = platform;
        true
    }

    pub fn set_mode(&mut self, mode: PreviewMode) {
        self.mode = mode;
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }
}
