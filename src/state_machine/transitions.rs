//! Pure transition tables for the task and vehicle state machines.
//!
//! The coordinator consults these before touching any registry; an illegal
//! pairing surfaces as [`DispatchError::InvalidTransition`] with no mutation.

use super::events::{TaskEvent, VehicleEvent};
use super::states::{TaskStatus, VehicleStatus};
use crate::error::{DispatchError, Result};

/// Determine the target task state for an event, or reject the pairing.
pub fn task_target_state(current: TaskStatus, event: &TaskEvent) -> Result<TaskStatus> {
    let target = match (current, event) {
        (TaskStatus::Pending, TaskEvent::Assign) => TaskStatus::InProgress,
        (TaskStatus::InProgress, TaskEvent::Complete { .. }) => TaskStatus::Completed,
        (TaskStatus::InProgress, TaskEvent::Cancel) => TaskStatus::Cancelled,

        (from, event) => {
            return Err(DispatchError::InvalidTransition {
                from: from.to_string(),
                event: event.event_type().to_string(),
            })
        }
    };

    Ok(target)
}

/// Determine the target vehicle state for an event, or reject the pairing.
///
/// Operator side states never transition through events; releasing a task
/// whose vehicle sits in `Maintenance` simply skips the `Return` event.
pub fn vehicle_target_state(current: VehicleStatus, event: &VehicleEvent) -> Result<VehicleStatus> {
    let target = match (current, event) {
        (VehicleStatus::Idle, VehicleEvent::Depart) => VehicleStatus::OnRoute,
        (VehicleStatus::OnRoute, VehicleEvent::Return) => VehicleStatus::Idle,

        (from, event) => {
            return Err(DispatchError::InvalidTransition {
                from: from.to_string(),
                event: event.event_type().to_string(),
            })
        }
    };

    Ok(target)
}
