//! Periodic flush of the active project while it has unsaved changes.
//!
//! The scheduler runs as a tokio task. Each tick tries the studio lock: a tick
//! that finds the studio busy (an explicit save or any other operation in
//! flight) is skipped rather than queued. Save failures leave the session
//! dirty so the next tick retries.

use std::sync::TryLockError;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::models::SessionState;
use crate::studio::{SharedStudio, Studio};

/// Result of a single autosave tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    NoActiveProject,
    Clean,
    /// Saved the project with this id.
    Saved(String),
    Failed,
    /// Another operation held the studio.
    Busy,
}

/// Saves the active project if it is dirty.
pub fn run_tick(studio: &mut Studio) -> TickOutcome {
    match studio.state() {
        SessionState::NoActiveProject => TickOutcome::NoActiveProject,
        SessionState::Clean => TickOutcome::Clean,
        SessionState::Dirty => match studio.save_current_project() {
            Ok(Some(project)) => {
                tracing::info!("Project {} autosaved", project.id);
                TickOutcome::Saved(project.id)
            }
            Ok(None) => TickOutcome::NoActiveProject,
            Err(e) => {
                tracing::warn!("Autosave failed, will retry: {}", e);
                TickOutcome::Failed
            }
        },
    }
}

/// One tick against a shared studio, skipped if the studio is locked.
pub fn tick(studio: &SharedStudio) -> TickOutcome {
    match studio.try_lock() {
        Ok(mut guard) => run_tick(&mut guard),
        Err(TryLockError::WouldBlock) => {
            tracing::debug!("Studio busy, skipping autosave tick");
            TickOutcome::Busy
        }
        Err(TryLockError::Poisoned(_)) => {
            tracing::error!("Studio lock poisoned, autosave skipped");
            TickOutcome::Failed
        }
    }
}

/// Handle to a running autosave task.
///
/// Dropping the handle aborts the task; [`AutosaveScheduler::stop`] shuts it
/// down and waits for it.
pub struct AutosaveScheduler {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutosaveScheduler {
    /// Spawns the timer. The first tick fires one `period` after start.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(studio: SharedStudio, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {
                        let outcome = tick(&studio);
                        tracing::debug!("Autosave tick: {:?}", outcome);
                    }
                }
            }

            tracing::debug!("Autosave stopped");
        });

        tracing::info!("Autosave every {}s", period.as_secs_f64());
        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Cancels the timer and waits for the task to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Autosave task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
