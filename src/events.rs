//! In-process fan-out of [`StudioEvent`]s to UI and module collaborators.
//!
//! Uses a tokio broadcast channel: each subscriber gets an independent
//! receiver buffering up to `capacity` events. Publishing never blocks and
//! never fails; with no subscribers the event is dropped.

use tokio::sync::broadcast;

use crate::models::StudioEvent;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StudioEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => tracing::trace!("Published {} to {} receivers", name, receivers),
            Err(_) => tracing::trace!("Published {} with no receivers", name),
        }
    }
}
