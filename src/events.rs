use tokio::sync::broadcast;

/// Notification that the backend document library changed, so views holding a
/// cached listing should refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryEvent {
    Changed,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LibraryEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.tx.subscribe()
    }

    /// Publishing with no subscribers is fine; the event is simply dropped.
    pub fn emit(&self, event: LibraryEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
