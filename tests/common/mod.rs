//! Shared fixtures and invariant assertions for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use dispatch_core::{
    CollectionTask, DispatchConfig, DispatchSystem, Driver, TaskStatus, Vehicle, VehicleStatus,
};

/// System pre-populated with the demo fleet.
pub fn seeded_system() -> DispatchSystem {
    DispatchSystem::seeded(DispatchConfig::default())
}

/// Full registry snapshot for atomicity comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tasks: Vec<CollectionTask>,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
}

pub fn snapshot(system: &DispatchSystem) -> Snapshot {
    Snapshot {
        tasks: system.tasks(),
        vehicles: system.vehicles(),
        drivers: system.drivers(),
    }
}

/// Assert the engagement invariants over the system's public snapshot:
/// every in-progress task rides an on-route vehicle with an unavailable
/// driver, and no vehicle or driver serves two in-progress tasks.
pub fn assert_engagement_invariants(system: &DispatchSystem) {
    let tasks = system.tasks();
    let vehicles = system.vehicles();
    let drivers = system.drivers();

    let mut engaged_vehicles = HashSet::new();
    let mut engaged_drivers = HashSet::new();

    for task in tasks.iter().filter(|t| t.status == TaskStatus::InProgress) {
        let vehicle_id = task
            .vehicle_id
            .as_deref()
            .unwrap_or_else(|| panic!("in-progress task {} has no vehicle", task.task_id));
        let vehicle = vehicles
            .iter()
            .find(|v| v.vehicle_id == vehicle_id)
            .unwrap_or_else(|| panic!("vehicle {vehicle_id} missing"));
        assert_eq!(
            vehicle.status,
            VehicleStatus::OnRoute,
            "vehicle {vehicle_id} must be on route while task {} is active",
            task.task_id
        );

        let driver_id = vehicle
            .driver_id
            .as_deref()
            .unwrap_or_else(|| panic!("on-route vehicle {vehicle_id} has no driver"));
        let driver = drivers
            .iter()
            .find(|d| d.driver_id == driver_id)
            .unwrap_or_else(|| panic!("driver {driver_id} missing"));
        assert!(
            !driver.available,
            "driver {driver_id} must be engaged while task {} is active",
            task.task_id
        );

        assert!(
            engaged_vehicles.insert(vehicle_id.to_string()),
            "vehicle {vehicle_id} is double-booked"
        );
        assert!(
            engaged_drivers.insert(driver_id.to_string()),
            "driver {driver_id} is double-booked"
        );
    }
}
