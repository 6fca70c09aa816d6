use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Initial state when the task is scheduled
    Pending,
    /// Task is assigned and the collection is underway
    InProgress,
    /// Collection finished and weight recorded
    Completed,
    /// Task was cancelled by an operator
    Cancelled,
}

impl TaskStatus {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check if this is an active state (the task holds a vehicle and driver)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Vehicle duty states.
///
/// `Idle` and `OnRoute` oscillate under coordinator control; `Maintenance`
/// and `Completed` are operator-set side states that the coordinator never
/// enters or leaves automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    /// Parked and ready to receive work
    Idle,
    /// Out collecting for an in-progress task
    OnRoute,
    /// Pulled from rotation by an operator
    Maintenance,
    /// Shift closed out by an operator
    Completed,
}

impl VehicleStatus {
    /// Check if the vehicle can receive a new assignment
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if this is an operator-controlled side state
    pub fn is_operator_controlled(&self) -> bool {
        matches!(self, Self::Maintenance | Self::Completed)
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::OnRoute => write!(f, "on_route"),
            Self::Maintenance => write!(f, "maintenance"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "on_route" => Ok(Self::OnRoute),
            "maintenance" => Ok(Self::Maintenance),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid vehicle status: {s}")),
        }
    }
}

impl Default for VehicleStatus {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_terminal_check() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_vehicle_status_assignability() {
        assert!(VehicleStatus::Idle.is_assignable());
        assert!(!VehicleStatus::OnRoute.is_assignable());
        assert!(!VehicleStatus::Maintenance.is_assignable());
        assert!(!VehicleStatus::Completed.is_assignable());
    }

    #[test]
    fn test_operator_controlled_states() {
        assert!(VehicleStatus::Maintenance.is_operator_controlled());
        assert!(VehicleStatus::Completed.is_operator_controlled());
        assert!(!VehicleStatus::Idle.is_operator_controlled());
        assert!(!VehicleStatus::OnRoute.is_operator_controlled());
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            "completed".parse::<TaskStatus>().unwrap(),
            TaskStatus::Completed
        );

        assert_eq!(VehicleStatus::OnRoute.to_string(), "on_route");
        assert_eq!(
            "maintenance".parse::<VehicleStatus>().unwrap(),
            VehicleStatus::Maintenance
        );
        assert!("driving".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let status = TaskStatus::InProgress;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let parsed: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }
}
