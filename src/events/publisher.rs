use serde_json::Value;
use tokio::sync::broadcast;

use super::types::Notification;

/// Broadcast publisher for dispatch lifecycle events.
///
/// Assignment confirmations, releases, and conflicts flow through here to
/// whatever notification collaborator is attached. Publishing is synchronous
/// and never blocks the commit path.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    pub notification: Notification,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event with a notification payload and JSON context.
    ///
    /// A send with no subscribers is not an error — events are emitted
    /// whether or not anyone is listening.
    pub fn publish(
        &self,
        event_name: impl Into<String>,
        notification: Notification,
        context: Value,
    ) -> Result<(), PublishError> {
        let event = PublishedEvent {
            name: event_name.into(),
            notification,
            context,
            published_at: chrono::Utc::now(),
        };

        match self.sender.send(event) {
            Ok(_) => Ok(()),
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Error types for event publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::event_names;
    use serde_json::json;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::default();
        assert_eq!(publisher.subscriber_count(), 0);

        let result = publisher.publish(
            event_names::TASK_ASSIGNED,
            Notification::new("Task assigned", "T01 -> V002"),
            json!({"task_id": "T01"}),
        );
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let publisher = EventPublisher::new(8);
        let mut receiver = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 1);

        publisher
            .publish(
                event_names::TASK_COMPLETED,
                Notification::new("Task completed", "T01 weighed in at 320 kg"),
                json!({"task_id": "T01", "collected_weight_kg": 320.0}),
            )
            .unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.name, event_names::TASK_COMPLETED);
        assert_eq!(event.notification.title, "Task completed");
        assert_eq!(event.context["collected_weight_kg"], 320.0);
    }
}
