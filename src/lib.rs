#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Dispatch Core Rust
//!
//! Rust core of the waste-collection logistics engine: matching pending
//! collection tasks to vehicles and drivers, preventing double-booking, and
//! keeping the task, vehicle, and driver collections mutually consistent as
//! work is assigned, completed, reassigned, and cancelled.
//!
//! ## Overview
//!
//! The surrounding product is mostly record CRUD and presentation; the hard
//! core is the **dispatch assignment engine** in this crate. It owns the only
//! real invariants in the system: an engaged driver corresponds to exactly
//! one in-progress task, an in-progress task always holds an on-route
//! vehicle, and no vehicle or driver is ever double-booked.
//!
//! ## Architecture
//!
//! All state lives in one explicit container ([`orchestration::DispatchSystem`])
//! constructed once per process or session. Mutations funnel through the
//! assignment coordinator, which re-validates eligibility at commit time and
//! applies each assignment or release as an atomic multi-entity update.
//! Reads clone committed snapshots; the status synchronizer keeps derived
//! visibility sets in lockstep with every commit.
//!
//! ## Module Organization
//!
//! - [`models`] - Collection tasks, vehicles, drivers
//! - [`registry`] - In-memory entity registries and demo fixtures
//! - [`state_machine`] - Task and vehicle lifecycle transition tables
//! - [`orchestration`] - Coordinator, eligibility filter, synchronizer, system
//! - [`events`] - Notification publisher (broadcast channel)
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use dispatch_core::{CompletionReport, DispatchConfig, DispatchSystem, TaskStatus};
//!
//! # fn main() -> dispatch_core::Result<()> {
//! let system = DispatchSystem::seeded(DispatchConfig::default());
//!
//! // Assign a pending task to an idle vehicle with an available driver
//! let receipt = system.assign("T01", "V002")?;
//! assert_eq!(receipt.task.status, TaskStatus::InProgress);
//! assert_eq!(receipt.driver.name, "Jane Smith");
//!
//! // Close it out with the weighed load
//! let receipt = system.report_completion("T01", CompletionReport::with_weight(320.0))?;
//! assert_eq!(receipt.task.collected_weight_kg, 320.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, including invariant property tests
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod registry;
pub mod state_machine;

pub use config::DispatchConfig;
pub use error::{ConflictReason, DispatchError, EntityKind, Result};
pub use events::{event_names, EventPublisher, Notification, PublishedEvent};
pub use models::{CollectionTask, Driver, MaterialType, NewCollectionTask, Vehicle};
pub use orchestration::{
    AssignmentReceipt, CommandOutcome, CompletionReport, DerivedSets, DispatchCommand,
    DispatchStats, DispatchStore, DispatchSystem, ReleaseOutcome, ReleaseReceipt,
};
pub use state_machine::{TaskStatus, VehicleStatus};
