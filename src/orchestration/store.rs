//! # Dispatch Store
//!
//! The single state container owning the three entity registries.
//!
//! All mutation funnels through the assignment coordinator while the store is
//! held behind one lock, so readers always observe a committed snapshot and
//! never a half-applied transaction.

use tracing::error;

use crate::error::{DispatchError, Result};
use crate::models::Driver;
use crate::registry::{DriverRegistry, TaskRegistry, VehicleRegistry};
use crate::state_machine::{TaskStatus, VehicleStatus};

/// Current state of the task, vehicle, and driver collections.
#[derive(Debug, Clone, Default)]
pub struct DispatchStore {
    pub tasks: TaskRegistry,
    pub vehicles: VehicleRegistry,
    pub drivers: DriverRegistry,
}

impl DispatchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the driver linked to a vehicle, if the relation is set and
    /// the id resolves.
    pub fn driver_for_vehicle(&self, vehicle_id: &str) -> Result<Option<&Driver>> {
        let vehicle = self.vehicles.get(vehicle_id)?;
        match vehicle.driver_id.as_deref() {
            Some(driver_id) => Ok(self.drivers.get(driver_id).ok()),
            None => Ok(None),
        }
    }

    /// Verify the engagement invariants over the full store:
    ///
    /// 1. Every in-progress task references an on-route vehicle whose linked
    ///    driver is unavailable.
    /// 2. No two in-progress tasks share a vehicle or a driver.
    ///
    /// Called by the coordinator after every commit attempt; a violation
    /// aborts the commit.
    pub fn check_invariants(&self) -> Result<()> {
        let mut engaged_vehicles: Vec<&str> = Vec::new();
        let mut engaged_drivers: Vec<&str> = Vec::new();

        for task in self.tasks.list() {
            if task.status != TaskStatus::InProgress {
                continue;
            }

            let vehicle_id = task.vehicle_id.as_deref().ok_or_else(|| {
                violation(format!(
                    "in-progress task `{}` has no vehicle reference",
                    task.task_id
                ))
            })?;

            let vehicle = self.vehicles.get(vehicle_id).map_err(|_| {
                violation(format!(
                    "in-progress task `{}` references missing vehicle `{vehicle_id}`",
                    task.task_id
                ))
            })?;

            if vehicle.status != VehicleStatus::OnRoute {
                return Err(violation(format!(
                    "in-progress task `{}` on vehicle `{vehicle_id}` with status `{}`",
                    task.task_id, vehicle.status
                )));
            }

            let driver_id = vehicle.driver_id.as_deref().ok_or_else(|| {
                violation(format!(
                    "on-route vehicle `{vehicle_id}` has no linked driver"
                ))
            })?;

            let driver = self.drivers.get(driver_id).map_err(|_| {
                violation(format!(
                    "on-route vehicle `{vehicle_id}` references missing driver `{driver_id}`"
                ))
            })?;

            if driver.available {
                return Err(violation(format!(
                    "driver `{driver_id}` is marked available while task `{}` is in progress",
                    task.task_id
                )));
            }

            if engaged_vehicles.contains(&vehicle_id) {
                return Err(violation(format!(
                    "vehicle `{vehicle_id}` is double-booked"
                )));
            }
            if engaged_drivers.contains(&driver_id) {
                return Err(violation(format!("driver `{driver_id}` is double-booked")));
            }
            engaged_vehicles.push(vehicle_id);
            engaged_drivers.push(driver_id);
        }

        Ok(())
    }
}

fn violation(message: String) -> DispatchError {
    error!(error = %message, "❌ INVARIANT_VIOLATION");
    DispatchError::InvariantViolation(message)
}
