//! # Status Synchronizer
//!
//! Recomputes the derived visibility sets after every committed mutation so
//! downstream consumers (filters, counts, progress indicators) never observe
//! a snapshot that violates the engagement invariants, even transiently.
//!
//! The recompute runs while the commit still holds the store write lock;
//! readers of the derived sets therefore see either the previous committed
//! snapshot or the new one, nothing in between.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CollectionTask, Vehicle};
use crate::orchestration::eligibility::{eligible_vehicles, pending_unassigned_tasks};
use crate::orchestration::store::DispatchStore;
use crate::state_machine::{TaskStatus, VehicleStatus};

/// Aggregate counts for progress indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    pub pending_tasks: usize,
    pub active_tasks: usize,
    pub completed_tasks: usize,
    pub cancelled_tasks: usize,
    pub idle_vehicles: usize,
    pub on_route_vehicles: usize,
    pub maintenance_vehicles: usize,
    pub available_drivers: usize,
}

impl DispatchStats {
    /// Compute counts from a store snapshot.
    pub fn from_store(store: &DispatchStore) -> Self {
        let mut stats = Self::default();
        for task in store.tasks.list() {
            match task.status {
                TaskStatus::Pending => stats.pending_tasks += 1,
                TaskStatus::InProgress => stats.active_tasks += 1,
                TaskStatus::Completed => stats.completed_tasks += 1,
                TaskStatus::Cancelled => stats.cancelled_tasks += 1,
            }
        }
        for vehicle in store.vehicles.list() {
            match vehicle.status {
                VehicleStatus::Idle => stats.idle_vehicles += 1,
                VehicleStatus::OnRoute => stats.on_route_vehicles += 1,
                VehicleStatus::Maintenance => stats.maintenance_vehicles += 1,
                VehicleStatus::Completed => {}
            }
        }
        stats.available_drivers = store
            .drivers
            .list()
            .iter()
            .filter(|driver| driver.available)
            .count();
        stats
    }
}

/// Derived visibility sets, swapped whole on every commit.
#[derive(Debug, Clone, Default)]
pub struct DerivedSets {
    pub pending_unassigned: Vec<CollectionTask>,
    pub eligible_vehicles: Vec<Vehicle>,
    pub stats: DispatchStats,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Keeps the derived sets in lockstep with the committed store state.
#[derive(Debug, Default)]
pub struct StatusSynchronizer {
    derived: RwLock<DerivedSets>,
}

impl StatusSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the derived sets from the given committed snapshot.
    pub fn recompute(&self, store: &DispatchStore) {
        let next = DerivedSets {
            pending_unassigned: pending_unassigned_tasks(store, None),
            eligible_vehicles: eligible_vehicles(store),
            stats: DispatchStats::from_store(store),
            refreshed_at: Some(Utc::now()),
        };
        debug!(
            pending = next.pending_unassigned.len(),
            eligible = next.eligible_vehicles.len(),
            active = next.stats.active_tasks,
            "derived sets refreshed"
        );
        *self.derived.write() = next;
    }

    /// Clone the last committed derived sets.
    pub fn derived(&self) -> DerivedSets {
        self.derived.read().clone()
    }
}
