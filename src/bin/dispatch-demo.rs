//! # Dispatch Demo
//!
//! Operational smoke binary: seeds the demo fleet, walks one full
//! assign -> complete cycle plus a deliberate conflict, and prints the
//! resulting fleet picture with structured logging enabled.

use dispatch_core::{
    logging::init_structured_logging, CompletionReport, DispatchConfig, DispatchSystem,
};
use tracing::{info, warn};

fn main() -> dispatch_core::Result<()> {
    init_structured_logging();

    let config = DispatchConfig::from_env()?;
    let system = DispatchSystem::seeded(config);
    let mut events = system.subscribe();

    info!(
        pending = system.pending_unassigned_tasks(None).len(),
        eligible = system.eligible_vehicles().len(),
        "demo fleet seeded"
    );

    // Happy path: assign and complete
    let receipt = system.assign("T01", "V002")?;
    info!(
        task = %receipt.task.task_id,
        vehicle = %receipt.vehicle.name,
        driver = %receipt.driver.name,
        "assigned"
    );

    // Double-booking attempt comes back as a typed conflict, not a crash
    if let Err(err) = system.assign("T02", "V002") {
        warn!(error = %err, "second assignment rejected");
    }

    let receipt = system.report_completion("T01", CompletionReport::with_weight(320.5))?;
    info!(
        task = %receipt.task.task_id,
        weight_kg = receipt.task.collected_weight_kg,
        vehicle_status = %receipt.vehicle.status,
        "completed"
    );

    while let Ok(event) = events.try_recv() {
        info!(event = %event.name, title = %event.notification.title, "event observed");
    }

    let stats = system.stats();
    info!(
        pending = stats.pending_tasks,
        completed = stats.completed_tasks,
        idle_vehicles = stats.idle_vehicles,
        available_drivers = stats.available_drivers,
        "final fleet picture"
    );

    Ok(())
}
