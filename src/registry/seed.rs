//! Demo fleet fixtures.
//!
//! The mock data the panels ship with before a real backend exists: five
//! pending tasks, four vehicles, four drivers. `V004` sits in maintenance
//! with its driver marked unavailable, which keeps one permanently
//! ineligible pair around for conflict paths.

use chrono::NaiveDate;

use crate::models::{CollectionTask, Driver, MaterialType, Vehicle};
use crate::orchestration::DispatchStore;
use crate::state_machine::VehicleStatus;

fn task(
    id: &str,
    customer: &str,
    material: MaterialType,
    address: &str,
    date: NaiveDate,
) -> CollectionTask {
    CollectionTask::from_new(
        id.to_string(),
        crate::models::NewCollectionTask {
            task_id: Some(id.to_string()),
            customer_id: customer.to_string(),
            material,
            address: address.to_string(),
            scheduled_date: date,
        },
    )
    .expect("seed task fields are valid")
}

fn vehicle(id: &str, name: &str, driver_id: &str, status: VehicleStatus, load: f64) -> Vehicle {
    Vehicle {
        vehicle_id: id.to_string(),
        name: name.to_string(),
        driver_id: Some(driver_id.to_string()),
        status,
        capacity_kg: 5000.0,
        current_load_kg: load,
    }
}

fn driver(id: &str, name: &str, contact: &str, available: bool) -> Driver {
    Driver {
        driver_id: id.to_string(),
        name: name.to_string(),
        contact: contact.to_string(),
        available,
    }
}

/// Build a store populated with the demo fleet.
pub fn demo_store() -> DispatchStore {
    let mut store = DispatchStore::new();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date");

    store
        .tasks
        .replace_all(vec![
            task(
                "T01",
                "C101",
                MaterialType::Plastic,
                "14 Harbour Road",
                date(2026, 8, 10),
            ),
            task(
                "T02",
                "C102",
                MaterialType::Glass,
                "9 Mill Lane",
                date(2026, 8, 10),
            ),
            task(
                "T03",
                "C103",
                MaterialType::Paper,
                "221 Alder Street",
                date(2026, 8, 11),
            ),
            task(
                "T04",
                "C101",
                MaterialType::Metal,
                "Unit 5, Dockside Estate",
                date(2026, 8, 11),
            ),
            task(
                "T05",
                "C104",
                MaterialType::Mixed,
                "3 Crown Terrace",
                date(2026, 8, 12),
            ),
        ])
        .expect("seed task ids are unique");

    store
        .vehicles
        .replace_all(vec![
            vehicle("V001", "Compactor 12", "D1", VehicleStatus::Idle, 0.0),
            vehicle("V002", "Side Loader 7", "D2", VehicleStatus::Idle, 0.0),
            vehicle("V003", "Flatbed 3", "D3", VehicleStatus::Idle, 0.0),
            vehicle(
                "V004",
                "Compactor 9",
                "D4",
                VehicleStatus::Maintenance,
                1200.0,
            ),
        ])
        .expect("seed vehicle ids are unique");

    store
        .drivers
        .replace_all(vec![
            driver("D1", "Amara Okafor", "amara.okafor@fleet.example", true),
            driver("D2", "Jane Smith", "jane.smith@fleet.example", true),
            driver("D3", "Marcus Reed", "marcus.reed@fleet.example", true),
            driver("D4", "Elena Petrova", "elena.petrova@fleet.example", false),
        ])
        .expect("seed driver ids are unique");

    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_store_shape() {
        let store = demo_store();
        assert_eq!(store.tasks.len(), 5);
        assert_eq!(store.vehicles.len(), 4);
        assert_eq!(store.drivers.len(), 4);
    }

    #[test]
    fn test_demo_store_satisfies_invariants() {
        let store = demo_store();
        assert!(store.check_invariants().is_ok());
    }

    #[test]
    fn test_v004_pair_is_ineligible() {
        let store = demo_store();
        let v004 = store.vehicles.get("V004").unwrap();
        assert_eq!(v004.status, VehicleStatus::Maintenance);

        let d4 = store.drivers.get("D4").unwrap();
        assert!(d4.is_engaged());
    }

    #[test]
    fn test_jane_smith_drives_v002() {
        let store = demo_store();
        let v002 = store.vehicles.get("V002").unwrap();
        let driver = store
            .drivers
            .get(v002.driver_id.as_deref().unwrap())
            .unwrap();
        assert_eq!(driver.name, "Jane Smith");
        assert!(driver.available);
    }
}
