//! # Assignment Coordinator
//!
//! ## Architecture: Core Commit Path
//!
//! The coordinator executes every assignment and release as a single atomic
//! multi-entity update over the dispatch store. Eligibility is re-validated
//! immediately before committing — never trusted from the moment the UI
//! offered the option — because the fleet may have changed between proposal
//! and commit.
//!
//! ## Key Responsibilities
//!
//! - **Commit-time validation**: task pending and unassigned, vehicle idle,
//!   linked driver available; failures surface as typed conflicts with zero
//!   mutation
//! - **Atomic multi-entity commit**: task, vehicle, and driver records change
//!   as one logical unit or not at all
//! - **Post-commit verification**: engagement invariants are re-checked over
//!   the full store; a violation rolls the commit back and reports an
//!   internal defect rather than leaving partial state
//! - **Event emission**: assignment confirmations, releases, and conflicts
//!   are published to the notification collaborator
//!
//! Callers serialize access: the owning [`DispatchSystem`] holds the store
//! write lock for the whole validate-mutate-verify section, so at most one
//! assign/release is in flight and two near-simultaneous assigns to the same
//! vehicle can never both succeed.
//!
//! [`DispatchSystem`]: crate::orchestration::DispatchSystem

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{ConflictReason, DispatchError, Result};
use crate::events::{event_names, EventPublisher, Notification};
use crate::logging::log_assignment_operation;
use crate::models::{CollectionTask, Driver, Vehicle};
use crate::orchestration::store::DispatchStore;
use crate::state_machine::{
    task_target_state, vehicle_target_state, TaskEvent, TaskStatus, VehicleEvent, VehicleStatus,
};

/// Fields reported when a collection finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// Final weighed load in kilograms; must be non-negative.
    pub collected_weight_kg: f64,
    pub notes: Option<String>,
    pub photo_ref: Option<String>,
}

impl CompletionReport {
    /// Report with a weight and no attachments.
    pub fn with_weight(collected_weight_kg: f64) -> Self {
        Self {
            collected_weight_kg,
            notes: None,
            photo_ref: None,
        }
    }
}

/// Terminal outcome requested for a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReleaseOutcome {
    Completed(CompletionReport),
    Cancelled,
}

impl ReleaseOutcome {
    fn as_task_event(&self) -> TaskEvent {
        match self {
            Self::Completed(report) => TaskEvent::Complete {
                collected_weight_kg: report.collected_weight_kg,
            },
            Self::Cancelled => TaskEvent::Cancel,
        }
    }

    /// Short label for logging and event contexts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Committed records returned from a successful assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentReceipt {
    pub task: CollectionTask,
    pub vehicle: Vehicle,
    pub driver: Driver,
}

/// Committed records returned from a successful release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseReceipt {
    pub task: CollectionTask,
    pub vehicle: Vehicle,
    pub driver: Driver,
    pub outcome: ReleaseOutcome,
}

/// Resolved targets for a validated assignment, captured before mutation.
struct AssignmentPlan {
    driver_id: String,
    driver_name: String,
}

/// Pre-mutation copies of the three affected records, restored verbatim if
/// post-commit verification fails.
struct CommitSnapshot {
    task: CollectionTask,
    vehicle: Vehicle,
    driver: Driver,
}

impl CommitSnapshot {
    fn restore(self, store: &mut DispatchStore) {
        store.tasks.upsert(self.task);
        store.vehicles.upsert(self.vehicle);
        store.drivers.upsert(self.driver);
    }
}

/// Executes assignments and releases against the dispatch store.
#[derive(Debug, Clone, Default)]
pub struct AssignmentCoordinator {
    publisher: EventPublisher,
}

impl AssignmentCoordinator {
    /// Create a coordinator emitting events through the given publisher.
    pub fn new(publisher: EventPublisher) -> Self {
        Self { publisher }
    }

    /// Assign a pending task to an idle vehicle and its available driver.
    ///
    /// On success the task moves to `InProgress`, the vehicle to `OnRoute`,
    /// and the driver to unavailable — committed as one unit. On any
    /// validation failure nothing changes and the specific failed
    /// precondition comes back as [`DispatchError::Conflict`].
    pub fn assign(
        &self,
        store: &mut DispatchStore,
        task_id: &str,
        vehicle_id: &str,
    ) -> Result<AssignmentReceipt> {
        let plan = match self.validate_assign(store, task_id, vehicle_id) {
            Ok(plan) => plan,
            Err(err) => {
                self.publish_conflict(task_id, vehicle_id, &err);
                return Err(err);
            }
        };

        // Transition legality; validation has already pinned the source states.
        let task_target = task_target_state(store.tasks.get(task_id)?.status, &TaskEvent::Assign)?;
        let vehicle_target =
            vehicle_target_state(store.vehicles.get(vehicle_id)?.status, &VehicleEvent::Depart)?;

        let snapshot = self.snapshot(store, task_id, vehicle_id, &plan.driver_id)?;

        {
            let task = store.tasks.get_mut(task_id)?;
            task.status = task_target;
            task.vehicle_id = Some(vehicle_id.to_string());
            task.driver_name = Some(plan.driver_name.clone());
            task.touch();
        }
        {
            let vehicle = store.vehicles.get_mut(vehicle_id)?;
            vehicle.status = vehicle_target;
        }
        {
            let driver = store.drivers.get_mut(&plan.driver_id)?;
            driver.available = false;
        }

        self.verify_or_rollback(store, snapshot)?;

        let receipt = AssignmentReceipt {
            task: store.tasks.get(task_id)?.clone(),
            vehicle: store.vehicles.get(vehicle_id)?.clone(),
            driver: store.drivers.get(&plan.driver_id)?.clone(),
        };

        log_assignment_operation(
            "assign",
            task_id,
            Some(vehicle_id),
            Some(plan.driver_id.as_str()),
            "committed",
            None,
        );
        info!(
            task_id = %task_id,
            vehicle_id = %vehicle_id,
            driver = %plan.driver_name,
            "task assigned"
        );

        let _ = self.publisher.publish(
            event_names::TASK_ASSIGNED,
            Notification::new(
                "Task assigned",
                format!(
                    "{} -> {} ({})",
                    task_id, receipt.vehicle.name, plan.driver_name
                ),
            ),
            json!({
                "task_id": task_id,
                "vehicle_id": vehicle_id,
                "driver_id": plan.driver_id,
            }),
        );

        Ok(receipt)
    }

    /// Release an in-progress task to a terminal outcome.
    ///
    /// The vehicle returns to `Idle` and the driver to available unless the
    /// vehicle sits in an operator-controlled side state. A completion writes
    /// the collected weight (and any report attachments) atomically with the
    /// status transition.
    pub fn release(
        &self,
        store: &mut DispatchStore,
        task_id: &str,
        outcome: ReleaseOutcome,
    ) -> Result<ReleaseReceipt> {
        let task = store.tasks.get(task_id)?.clone();
        let event = outcome.as_task_event();
        let task_target = task_target_state(task.status, &event)?;

        if let ReleaseOutcome::Completed(report) = &outcome {
            if !report.collected_weight_kg.is_finite() || report.collected_weight_kg < 0.0 {
                return Err(DispatchError::Validation(format!(
                    "collected weight must be non-negative, got {}",
                    report.collected_weight_kg
                )));
            }
        }

        // An in-progress task always carries its engagement references; a
        // hole here is an internal defect, not a caller error.
        let vehicle_id = task.vehicle_id.clone().ok_or_else(|| {
            DispatchError::InvariantViolation(format!(
                "in-progress task `{task_id}` has no vehicle reference"
            ))
        })?;
        let vehicle = store.vehicles.get(&vehicle_id).cloned().map_err(|_| {
            DispatchError::InvariantViolation(format!(
                "in-progress task `{task_id}` references missing vehicle `{vehicle_id}`"
            ))
        })?;
        let driver_id = self.resolve_engaged_driver(store, &task, &vehicle)?;

        let snapshot = self.snapshot(store, task_id, &vehicle_id, &driver_id)?;

        {
            let task = store.tasks.get_mut(task_id)?;
            task.status = task_target;
            if let ReleaseOutcome::Completed(report) = &outcome {
                task.collected_weight_kg = report.collected_weight_kg;
                task.notes = report.notes.clone();
                task.photo_ref = report.photo_ref.clone();
            }
            task.touch();
        }
        {
            let vehicle = store.vehicles.get_mut(&vehicle_id)?;
            if vehicle.status == VehicleStatus::OnRoute {
                vehicle.status = vehicle_target_state(vehicle.status, &VehicleEvent::Return)?;
            } else {
                // Operator pulled the vehicle mid-route; leave its status alone.
                debug!(
                    vehicle_id = %vehicle_id,
                    status = %vehicle.status,
                    "release leaving operator-controlled vehicle status untouched"
                );
            }
            if let ReleaseOutcome::Completed(report) = &outcome {
                vehicle.add_load(report.collected_weight_kg);
            }
        }
        {
            let driver = store.drivers.get_mut(&driver_id)?;
            driver.available = true;
        }

        self.verify_or_rollback(store, snapshot)?;

        let receipt = ReleaseReceipt {
            task: store.tasks.get(task_id)?.clone(),
            vehicle: store.vehicles.get(&vehicle_id)?.clone(),
            driver: store.drivers.get(&driver_id)?.clone(),
            outcome: outcome.clone(),
        };

        log_assignment_operation(
            "release",
            task_id,
            Some(vehicle_id.as_str()),
            Some(driver_id.as_str()),
            outcome.label(),
            None,
        );

        let (event_name, notification) = match &outcome {
            ReleaseOutcome::Completed(report) => (
                event_names::TASK_COMPLETED,
                Notification::new(
                    "Task completed",
                    format!(
                        "{} weighed in at {} kg",
                        task_id, report.collected_weight_kg
                    ),
                ),
            ),
            ReleaseOutcome::Cancelled => (
                event_names::TASK_CANCELLED,
                Notification::new("Task cancelled", format!("{task_id} released its crew")),
            ),
        };
        let _ = self.publisher.publish(
            event_name,
            notification,
            json!({
                "task_id": task_id,
                "vehicle_id": vehicle_id,
                "driver_id": driver_id,
                "outcome": outcome.label(),
            }),
        );

        Ok(receipt)
    }

    /// Re-check every assignment precondition against current state.
    ///
    /// Precondition order fixes the reported reason: missing ids first, then
    /// task, vehicle, driver — so the operator sees the narrowest failure.
    fn validate_assign(
        &self,
        store: &DispatchStore,
        task_id: &str,
        vehicle_id: &str,
    ) -> Result<AssignmentPlan> {
        let task = store.tasks.get(task_id)?;
        let vehicle = store.vehicles.get(vehicle_id)?;

        if task.vehicle_id.is_some() {
            return Err(DispatchError::Conflict(ConflictReason::TaskAlreadyAssigned));
        }
        if task.status != TaskStatus::Pending {
            return Err(DispatchError::Conflict(ConflictReason::TaskNotPending));
        }
        if !vehicle.status.is_assignable() {
            return Err(DispatchError::Conflict(ConflictReason::VehicleNotIdle));
        }

        let driver_id = vehicle
            .driver_id
            .as_deref()
            .ok_or(DispatchError::Conflict(ConflictReason::NoDriverLinked))?;
        let driver = store.drivers.get(driver_id)?;
        if !driver.available {
            return Err(DispatchError::Conflict(ConflictReason::DriverUnavailable));
        }

        Ok(AssignmentPlan {
            driver_id: driver.driver_id.clone(),
            driver_name: driver.name.clone(),
        })
    }

    /// Resolve the driver engaged on a releasing task: by the vehicle's id
    /// relation first, by the task's denormalized name as a fallback.
    fn resolve_engaged_driver(
        &self,
        store: &DispatchStore,
        task: &CollectionTask,
        vehicle: &Vehicle,
    ) -> Result<String> {
        if let Some(driver_id) = vehicle.driver_id.as_deref() {
            if let Ok(driver) = store.drivers.get(driver_id) {
                return Ok(driver.driver_id.clone());
            }
        }
        if let Some(name) = task.driver_name.as_deref() {
            if let Some(driver) = store.drivers.find_by_name(name) {
                warn!(
                    task_id = %task.task_id,
                    driver = %name,
                    "engaged driver resolved by name fallback; vehicle relation is stale"
                );
                return Ok(driver.driver_id.clone());
            }
        }
        Err(DispatchError::InvariantViolation(format!(
            "no resolvable driver for in-progress task `{}` on vehicle `{}`",
            task.task_id, vehicle.vehicle_id
        )))
    }

    fn snapshot(
        &self,
        store: &DispatchStore,
        task_id: &str,
        vehicle_id: &str,
        driver_id: &str,
    ) -> Result<CommitSnapshot> {
        Ok(CommitSnapshot {
            task: store.tasks.get(task_id)?.clone(),
            vehicle: store.vehicles.get(vehicle_id)?.clone(),
            driver: store.drivers.get(driver_id)?.clone(),
        })
    }

    /// Post-commit invariant verification. A failure restores the snapshot
    /// so the store is byte-for-byte what it was before the call.
    fn verify_or_rollback(&self, store: &mut DispatchStore, snapshot: CommitSnapshot) -> Result<()> {
        if let Err(err) = store.check_invariants() {
            snapshot.restore(store);
            return Err(err);
        }
        Ok(())
    }

    fn publish_conflict(&self, task_id: &str, vehicle_id: &str, err: &DispatchError) {
        if let Some(reason) = err.conflict_reason() {
            let reason_text = reason.to_string();
            log_assignment_operation(
                "assign",
                task_id,
                Some(vehicle_id),
                None,
                "conflict",
                Some(reason_text.as_str()),
            );
            let _ = self.publisher.publish(
                event_names::ASSIGNMENT_CONFLICT,
                Notification::new("Assignment failed", reason.to_string()),
                json!({
                    "task_id": task_id,
                    "vehicle_id": vehicle_id,
                    "reason": reason,
                }),
            );
        }
    }
}
