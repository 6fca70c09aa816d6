//! # Structured Error Handling
//!
//! Crate-wide error taxonomy for the dispatch core. Validation errors are
//! returned synchronously to the caller for display; nothing here is fatal to
//! the process, and a failed operation never mutates unrelated entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity families managed by the registries, used for `NotFound` reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Vehicle,
    Driver,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Vehicle => write!(f, "vehicle"),
            Self::Driver => write!(f, "driver"),
        }
    }
}

/// The specific assignment precondition that failed.
///
/// Conflicts are semantic, not transient: the caller recovers by picking a
/// different target, never by automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// The task already references a vehicle (it may be mid-route).
    TaskAlreadyAssigned,
    /// The task is in a terminal state and cannot accept an assignment.
    TaskNotPending,
    /// The target vehicle is not `Idle` (on route, maintenance, or retired).
    VehicleNotIdle,
    /// The vehicle has no linked driver to dispatch with.
    NoDriverLinked,
    /// The linked driver is currently engaged on another task.
    DriverUnavailable,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaskAlreadyAssigned => write!(f, "task is already assigned to a vehicle"),
            Self::TaskNotPending => write!(f, "task is not in a pending state"),
            Self::VehicleNotIdle => write!(f, "vehicle is not idle"),
            Self::NoDriverLinked => write!(f, "vehicle has no linked driver"),
            Self::DriverUnavailable => write!(f, "driver is not available"),
        }
    }
}

/// Error type shared across the dispatch core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// An id did not resolve against its registry. No mutation occurred.
    #[error("{entity} `{id}` not found")]
    NotFound { entity: EntityKind, id: String },

    /// An assignment precondition failed at commit-time validation.
    /// Recoverable by the operator choosing a different target.
    #[error("assignment conflict: {0}")]
    Conflict(ConflictReason),

    /// The requested lifecycle transition is not legal from the current state.
    #[error("invalid transition from `{from}` on event `{event}`")]
    InvalidTransition { from: String, event: String },

    /// Input values failed validation (negative weight, empty address, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal consistency check failed after a commit attempt. The commit
    /// is rejected and state restored; observing this is a programming defect.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Environment or settings could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DispatchError {
    /// Build a `NotFound` for a task id.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Task,
            id: id.into(),
        }
    }

    /// Build a `NotFound` for a vehicle id.
    pub fn vehicle_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Vehicle,
            id: id.into(),
        }
    }

    /// Build a `NotFound` for a driver id.
    pub fn driver_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Driver,
            id: id.into(),
        }
    }

    /// Whether the caller can recover by adjusting the request (as opposed to
    /// an internal defect signal).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }

    /// The conflict reason, if this error is an assignment conflict.
    pub fn conflict_reason(&self) -> Option<ConflictReason> {
        match self {
            Self::Conflict(reason) => Some(*reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
