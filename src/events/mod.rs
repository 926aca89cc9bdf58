use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Changes applied to the inventory cache. Lists re-render when they see one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    InventoryFetchStarted,
    InventoryReplaced { count: usize },
    InventoryUpserted { id: Option<String> },
    InventoryDeleted { ids: Vec<String>, removed: usize },
    ProductsReplaced { count: usize },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: broadcast::Sender<Event>,
}

impl EventSender {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `event` to current subscribers. Having none is not an error.
    pub fn send(&self, event: Event) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            debug!(?event, "no subscribers for store event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for EventSender {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events_in_order() {
        let sender = EventSender::default();
        let mut rx = sender.subscribe();

        sender.send(Event::InventoryReplaced { count: 2 });
        sender.send(Event::InventoryUpserted {
            id: Some("1".into()),
        });

        assert_eq!(rx.recv().await.unwrap(), Event::InventoryReplaced { count: 2 });
        assert_eq!(
            rx.recv().await.unwrap(),
            Event::InventoryUpserted {
                id: Some("1".into())
            }
        );
    }

    #[test]
    fn sending_without_subscribers_is_silent() {
        EventSender::new(0).send(Event::InventoryFetchStarted);
    }
}
