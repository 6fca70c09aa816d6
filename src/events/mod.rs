pub mod publisher;
pub mod types;

// Re-export key types for convenience
pub use publisher::{EventPublisher, PublishError, PublishedEvent};
pub use types::{event_names, Notification};
