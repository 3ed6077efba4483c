//! Module-wide signals (lossy broadcast; a lagging listener just reloads).

use tokio::sync::broadcast;

use cinedex_core::MovieId;

/// Outcome name the delete dialog closes with.
pub const ITEM_DELETED_EVENT: &str = "deleted";

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieEvent {
    ItemDeleted(MovieId),
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<MovieEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Returns how many listeners received the event.
    pub fn publish(&self, event: MovieEvent) -> usize {
        tracing::debug!(?event, "publish movie event");
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MovieEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_listeners_is_harmless() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(MovieEvent::ItemDeleted(MovieId::new(1))), 0);
    }

    #[tokio::test]
    async fn listeners_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(MovieEvent::ItemDeleted(MovieId::new(4))), 1);
        assert_eq!(rx.recv().await.unwrap(), MovieEvent::ItemDeleted(MovieId::new(4)));
    }
}
