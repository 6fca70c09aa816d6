//! # Eligibility Filter
//!
//! Pure read-side functions over a store snapshot: which tasks are waiting
//! for a vehicle, and which vehicle/driver pairs can receive work. No side
//! effects; calling twice with no intervening commit yields identical
//! results.

use crate::models::{CollectionTask, Vehicle};
use crate::orchestration::store::DispatchStore;

/// Tasks with status `Pending` and no vehicle assigned, optionally narrowed
/// by a case-insensitive substring match on address or customer id.
pub fn pending_unassigned_tasks(store: &DispatchStore, query: Option<&str>) -> Vec<CollectionTask> {
    let needle = query.map(str::to_lowercase).filter(|q| !q.is_empty());

    store
        .tasks
        .list()
        .iter()
        .filter(|task| task.is_unassigned())
        .filter(|task| match needle.as_deref() {
            Some(needle) => {
                task.address.to_lowercase().contains(needle)
                    || task.customer_id.to_lowercase().contains(needle)
            }
            None => true,
        })
        .cloned()
        .collect()
}

/// Vehicles that are `Idle` and whose linked driver resolves and is
/// currently available.
pub fn eligible_vehicles(store: &DispatchStore) -> Vec<Vehicle> {
    store
        .vehicles
        .list()
        .iter()
        .filter(|vehicle| vehicle.status.is_assignable())
        .filter(|vehicle| {
            vehicle
                .driver_id
                .as_deref()
                .and_then(|driver_id| store.drivers.get(driver_id).ok())
                .is_some_and(|driver| driver.available)
        })
        .cloned()
        .collect()
}
