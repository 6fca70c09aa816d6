use serde::{Deserialize, Serialize};

/// Events that can trigger task state transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TaskEvent {
    /// Bind the task to a vehicle/driver pair and start the collection
    Assign,
    /// Finish the collection with the weighed load in kilograms
    Complete { collected_weight_kg: f64 },
    /// Cancel the collection
    Cancel,
}

impl TaskEvent {
    /// String representation of the event type for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Complete { .. } => "complete",
            Self::Cancel => "cancel",
        }
    }

    /// Check if this event represents a terminal transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Cancel)
    }

    /// Extract the collected weight if this is a completion event.
    pub fn collected_weight(&self) -> Option<f64> {
        match self {
            Self::Complete {
                collected_weight_kg,
            } => Some(*collected_weight_kg),
            _ => None,
        }
    }
}

/// Events that can trigger vehicle duty transitions.
///
/// Operator side states (`Maintenance`, `Completed`) are set by direct edit,
/// not by events, so no variants exist for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VehicleEvent {
    /// Leave the depot for an assigned collection
    Depart,
    /// Return to the depot after release
    Return,
}

impl VehicleEvent {
    /// String representation of the event type for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Depart => "depart",
            Self::Return => "return",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(TaskEvent::Assign.event_type(), "assign");
        assert_eq!(
            TaskEvent::Complete {
                collected_weight_kg: 120.0
            }
            .event_type(),
            "complete"
        );
        assert_eq!(TaskEvent::Cancel.event_type(), "cancel");
        assert_eq!(VehicleEvent::Depart.event_type(), "depart");
    }

    #[test]
    fn test_terminal_events() {
        assert!(!TaskEvent::Assign.is_terminal());
        assert!(TaskEvent::Cancel.is_terminal());
        assert!(TaskEvent::Complete {
            collected_weight_kg: 0.0
        }
        .is_terminal());
    }

    #[test]
    fn test_collected_weight_extraction() {
        let event = TaskEvent::Complete {
            collected_weight_kg: 312.5,
        };
        assert_eq!(event.collected_weight(), Some(312.5));
        assert_eq!(TaskEvent::Cancel.collected_weight(), None);
    }
}
