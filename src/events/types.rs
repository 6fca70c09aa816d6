//! Event names and notification payloads for the outbound boundary.

use serde::{Deserialize, Serialize};

/// Well-known lifecycle event names.
pub mod event_names {
    pub const TASK_CREATED: &str = "task.created";
    pub const TASK_ASSIGNED: &str = "task.assigned";
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_CANCELLED: &str = "task.cancelled";
    pub const ASSIGNMENT_CONFLICT: &str = "assignment.conflict";
}

/// Human-facing notification payload delivered to the toast/notification
/// collaborator: a title and a description, nothing richer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
