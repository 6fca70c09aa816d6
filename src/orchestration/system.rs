//! # Dispatch System
//!
//! ## Architecture: Explicit State Container
//!
//! `DispatchSystem` is the one service object owning the three registries,
//! constructed once per process or session. Presentation code never writes a
//! field directly: every mutation funnels through the assignment
//! coordinator's commit path under the store write lock, and every read
//! clones a committed snapshot under the read lock.
//!
//! ## Usage
//!
//! ```rust
//! use dispatch_core::{DispatchConfig, DispatchSystem};
//!
//! # fn example() -> dispatch_core::Result<()> {
//! let system = DispatchSystem::seeded(DispatchConfig::default());
//!
//! let receipt = system.assign("T01", "V002")?;
//! assert_eq!(receipt.driver.name, "Jane Smith");
//! # Ok(())
//! # }
//! ```

use parking_lot::RwLock;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use crate::events::{event_names, EventPublisher, Notification, PublishedEvent};
use crate::logging::log_registry_operation;
use crate::models::{CollectionTask, Driver, NewCollectionTask, Vehicle};
use crate::orchestration::command::{CommandOutcome, DispatchCommand};
use crate::orchestration::coordinator::{
    AssignmentCoordinator, AssignmentReceipt, CompletionReport, ReleaseOutcome, ReleaseReceipt,
};
use crate::orchestration::eligibility;
use crate::orchestration::status_sync::{DerivedSets, DispatchStats, StatusSynchronizer};
use crate::orchestration::store::DispatchStore;
use crate::registry::demo_store;

/// Service object owning the dispatch state for one process or session.
#[derive(Debug)]
pub struct DispatchSystem {
    store: RwLock<DispatchStore>,
    coordinator: AssignmentCoordinator,
    synchronizer: StatusSynchronizer,
    publisher: EventPublisher,
    config: DispatchConfig,
}

impl DispatchSystem {
    /// Create a system with empty registries, or the demo fleet when the
    /// configuration asks for it.
    pub fn new(config: DispatchConfig) -> Self {
        let store = if config.seed_demo_fleet {
            demo_store()
        } else {
            DispatchStore::new()
        };
        Self::from_store(config, store)
    }

    /// Create a system pre-populated with the demo fleet.
    pub fn seeded(config: DispatchConfig) -> Self {
        Self::from_store(config, demo_store())
    }

    /// Create a system around an existing store snapshot.
    pub fn from_store(config: DispatchConfig, store: DispatchStore) -> Self {
        let publisher = EventPublisher::new(config.event_channel_capacity);
        let system = Self {
            store: RwLock::new(store),
            coordinator: AssignmentCoordinator::new(publisher.clone()),
            synchronizer: StatusSynchronizer::new(),
            publisher,
            config,
        };
        system.synchronizer.recompute(&system.store.read());
        system
    }

    /// The configuration this system was built with.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Inbound: scheduling
    // ---------------------------------------------------------------------

    /// Schedule a new pending task. Generates an id unless the request
    /// carries one; an explicit id that already exists is rejected.
    pub fn create_task(&self, new: NewCollectionTask) -> Result<CollectionTask> {
        let mut store = self.store.write();

        let task_id = match &new.task_id {
            Some(id) => {
                if store.tasks.contains(id) {
                    return Err(DispatchError::Validation(format!(
                        "task id `{id}` already exists"
                    )));
                }
                id.clone()
            }
            None => format!("T-{}", Uuid::new_v4().simple()),
        };

        let task = CollectionTask::from_new(task_id.clone(), new)?;
        store.tasks.upsert(task.clone());
        self.synchronizer.recompute(&store);
        drop(store);

        log_registry_operation("create", "task", &task_id, "committed", None);
        let _ = self.publisher.publish(
            event_names::TASK_CREATED,
            Notification::new(
                "Task scheduled",
                format!("{} at {}", task.task_id, task.address),
            ),
            json!({"task_id": task.task_id, "customer_id": task.customer_id}),
        );

        Ok(task)
    }

    // ---------------------------------------------------------------------
    // Inbound: interaction surface
    // ---------------------------------------------------------------------

    /// Assign a pending task to an idle vehicle. The whole
    /// validate-mutate-verify section runs under the store write lock, so at
    /// most one assignment is in flight against the registries it touches.
    pub fn assign(&self, task_id: &str, vehicle_id: &str) -> Result<AssignmentReceipt> {
        let mut store = self.store.write();
        let receipt = self.coordinator.assign(&mut store, task_id, vehicle_id)?;
        self.synchronizer.recompute(&store);
        Ok(receipt)
    }

    /// Release an in-progress task to a terminal outcome.
    pub fn release(&self, task_id: &str, outcome: ReleaseOutcome) -> Result<ReleaseReceipt> {
        let mut store = self.store.write();
        let receipt = self.coordinator.release(&mut store, task_id, outcome)?;
        self.synchronizer.recompute(&store);
        Ok(receipt)
    }

    /// Record a completion report and close out the task.
    pub fn report_completion(
        &self,
        task_id: &str,
        report: CompletionReport,
    ) -> Result<ReleaseReceipt> {
        self.release(task_id, ReleaseOutcome::Completed(report))
    }

    /// Execute a command from the interaction surface.
    pub fn execute(&self, command: DispatchCommand) -> Result<CommandOutcome> {
        info!(command = command.label(), "dispatch command received");
        match command {
            DispatchCommand::CreateTask(new) => {
                self.create_task(new).map(CommandOutcome::TaskCreated)
            }
            DispatchCommand::Assign {
                task_id,
                vehicle_id,
            } => self
                .assign(&task_id, &vehicle_id)
                .map(CommandOutcome::Assigned),
            DispatchCommand::Cancel { task_id } => self
                .release(&task_id, ReleaseOutcome::Cancelled)
                .map(CommandOutcome::Released),
            DispatchCommand::ReportCompletion { task_id, report } => self
                .release(&task_id, ReleaseOutcome::Completed(report))
                .map(CommandOutcome::Released),
        }
    }

    // ---------------------------------------------------------------------
    // Outbound: read-only snapshots
    // ---------------------------------------------------------------------

    /// Snapshot of all tasks in insertion order.
    pub fn tasks(&self) -> Vec<CollectionTask> {
        self.store.read().tasks.list().to_vec()
    }

    /// Snapshot of all vehicles in insertion order.
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.store.read().vehicles.list().to_vec()
    }

    /// Snapshot of all drivers in insertion order.
    pub fn drivers(&self) -> Vec<Driver> {
        self.store.read().drivers.list().to_vec()
    }

    /// Look up one task by id.
    pub fn task(&self, task_id: &str) -> Result<CollectionTask> {
        self.store.read().tasks.get(task_id).cloned()
    }

    /// Look up one vehicle by id.
    pub fn vehicle(&self, vehicle_id: &str) -> Result<Vehicle> {
        self.store.read().vehicles.get(vehicle_id).cloned()
    }

    /// Look up one driver by id.
    pub fn driver(&self, driver_id: &str) -> Result<Driver> {
        self.store.read().drivers.get(driver_id).cloned()
    }

    /// Pending unassigned tasks, optionally narrowed by a search query,
    /// computed fresh against the latest committed state.
    pub fn pending_unassigned_tasks(&self, query: Option<&str>) -> Vec<CollectionTask> {
        eligibility::pending_unassigned_tasks(&self.store.read(), query)
    }

    /// Idle vehicles whose linked driver is available, computed fresh
    /// against the latest committed state.
    pub fn eligible_vehicles(&self) -> Vec<Vehicle> {
        eligibility::eligible_vehicles(&self.store.read())
    }

    /// The derived sets maintained by the status synchronizer.
    pub fn derived(&self) -> DerivedSets {
        self.synchronizer.derived()
    }

    /// Aggregate counts for progress indicators.
    pub fn stats(&self) -> DispatchStats {
        self.synchronizer.derived().stats
    }

    /// Subscribe to lifecycle and notification events.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.publisher.subscribe()
    }

    // ---------------------------------------------------------------------
    // Panel edits outside the assignment path
    // ---------------------------------------------------------------------

    /// Bulk-replace the task collection (panel refresh path).
    pub fn replace_all_tasks(&self, tasks: Vec<CollectionTask>) -> Result<()> {
        let mut store = self.store.write();
        store.tasks.replace_all(tasks)?;
        self.synchronizer.recompute(&store);
        Ok(())
    }

    /// Bulk-replace the vehicle collection. Every record must satisfy its
    /// own capacity and load bounds.
    pub fn replace_all_vehicles(&self, vehicles: Vec<Vehicle>) -> Result<()> {
        for vehicle in &vehicles {
            vehicle.validate()?;
        }
        let mut store = self.store.write();
        store.vehicles.replace_all(vehicles)?;
        self.synchronizer.recompute(&store);
        Ok(())
    }

    /// Bulk-replace the driver collection.
    pub fn replace_all_drivers(&self, drivers: Vec<Driver>) -> Result<()> {
        let mut store = self.store.write();
        store.drivers.replace_all(drivers)?;
        self.synchronizer.recompute(&store);
        Ok(())
    }

    /// Insert or replace a single task — the edit path for address or
    /// scheduling fixes. Deliberately skips cross-entity validation so a
    /// field edit never pays for eligibility checks.
    pub fn upsert_task(&self, task: CollectionTask) {
        let mut store = self.store.write();
        log_registry_operation("upsert", "task", &task.task_id, "committed", None);
        store.tasks.upsert(task);
        self.synchronizer.recompute(&store);
    }

    /// Insert or replace a single vehicle after validating its own bounds.
    pub fn upsert_vehicle(&self, vehicle: Vehicle) -> Result<()> {
        vehicle.validate()?;
        let mut store = self.store.write();
        log_registry_operation("upsert", "vehicle", &vehicle.vehicle_id, "committed", None);
        store.vehicles.upsert(vehicle);
        self.synchronizer.recompute(&store);
        Ok(())
    }

    /// Insert or replace a single driver.
    pub fn upsert_driver(&self, driver: Driver) {
        let mut store = self.store.write();
        log_registry_operation("upsert", "driver", &driver.driver_id, "committed", None);
        store.drivers.upsert(driver);
        self.synchronizer.recompute(&store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaterialType;
    use crate::state_machine::{TaskStatus, VehicleStatus};
    use chrono::NaiveDate;

    fn system() -> DispatchSystem {
        DispatchSystem::seeded(DispatchConfig::default())
    }

    fn new_task_request() -> NewCollectionTask {
        NewCollectionTask {
            task_id: None,
            customer_id: "C200".to_string(),
            material: MaterialType::Paper,
            address: "77 Station Approach".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
        }
    }

    #[test]
    fn test_new_honors_seed_flag() {
        let empty = DispatchSystem::new(DispatchConfig::default());
        assert!(empty.tasks().is_empty());

        let seeded = DispatchSystem::new(DispatchConfig {
            seed_demo_fleet: true,
            ..DispatchConfig::default()
        });
        assert_eq!(seeded.tasks().len(), 5);
    }

    #[test]
    fn test_create_task_generates_id_and_recomputes() {
        let system = system();
        let task = system.create_task(new_task_request()).unwrap();

        assert!(task.task_id.starts_with("T-"));
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(system.derived().pending_unassigned.len(), 6);
    }

    #[test]
    fn test_create_task_rejects_duplicate_explicit_id() {
        let system = system();
        let mut request = new_task_request();
        request.task_id = Some("T01".to_string());

        let err = system.create_task(request).unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
        assert_eq!(system.tasks().len(), 5);
    }

    #[test]
    fn test_assign_updates_derived_sets() {
        let system = system();
        system.assign("T01", "V002").unwrap();

        let derived = system.derived();
        assert_eq!(derived.stats.active_tasks, 1);
        assert!(derived.eligible_vehicles.iter().all(|v| v.vehicle_id != "V002"));
        assert_eq!(system.task("T01").unwrap().status, TaskStatus::InProgress);
    }

    #[test]
    fn test_execute_command_round_trip() {
        let system = system();
        let outcome = system
            .execute(DispatchCommand::Assign {
                task_id: "T01".to_string(),
                vehicle_id: "V002".to_string(),
            })
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::Assigned(_)));

        let outcome = system
            .execute(DispatchCommand::ReportCompletion {
                task_id: "T01".to_string(),
                report: CompletionReport::with_weight(412.0),
            })
            .unwrap();
        match outcome {
            CommandOutcome::Released(receipt) => {
                assert_eq!(receipt.task.collected_weight_kg, 412.0);
                assert_eq!(receipt.vehicle.status, VehicleStatus::Idle);
            }
            other => panic!("expected Released, got {other:?}"),
        }
    }

    #[test]
    fn test_report_completion_records_attachments() {
        let system = system();
        system.assign("T02", "V001").unwrap();

        let receipt = system
            .report_completion(
                "T02",
                CompletionReport {
                    collected_weight_kg: 95.0,
                    notes: Some("gate code 4417".to_string()),
                    photo_ref: Some("photos/t02-final.jpg".to_string()),
                },
            )
            .unwrap();

        assert_eq!(receipt.task.notes.as_deref(), Some("gate code 4417"));
        assert_eq!(
            receipt.task.photo_ref.as_deref(),
            Some("photos/t02-final.jpg")
        );
        assert_eq!(receipt.vehicle.current_load_kg, 95.0);
    }

    #[test]
    fn test_upsert_vehicle_validates_bounds() {
        let system = system();
        let mut vehicle = system.vehicle("V001").unwrap();
        vehicle.current_load_kg = -10.0;
        assert!(system.upsert_vehicle(vehicle).is_err());
    }

    #[test]
    fn test_subscriber_sees_assignment_event() {
        let system = system();
        let mut receiver = system.subscribe();

        system.assign("T01", "V002").unwrap();

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.name, event_names::TASK_ASSIGNED);
        assert!(event.notification.description.contains("Jane Smith"));
    }

    #[test]
    fn test_conflict_event_published_on_failed_assign() {
        let system = system();
        let mut receiver = system.subscribe();

        let _ = system.assign("T01", "V004").unwrap_err();

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.name, event_names::ASSIGNMENT_CONFLICT);
        assert_eq!(event.notification.title, "Assignment failed");
    }
}
