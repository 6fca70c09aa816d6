//! # Dispatch Orchestration
//!
//! The hard core of the system: assignment, release, eligibility, and the
//! derived-state synchronization that keeps the three entity collections
//! mutually consistent.
//!
//! ## Core Components
//!
//! - **DispatchSystem**: the explicit state container owning the registries;
//!   every mutation funnels through it
//! - **AssignmentCoordinator**: validates and commits assignments/releases as
//!   atomic multi-entity updates
//! - **Eligibility filter**: pure read-side view of assignable work and
//!   eligible vehicle/driver pairs
//! - **StatusSynchronizer**: recomputes derived visibility sets on every
//!   commit so consumers never observe invariant-violating state
//! - **Command surface**: modality-independent entry point for the
//!   interaction layer

pub mod command;
pub mod coordinator;
pub mod eligibility;
pub mod status_sync;
pub mod store;
pub mod system;

// Re-export core types and components for easy access
pub use command::{CommandOutcome, DispatchCommand};
pub use coordinator::{
    AssignmentCoordinator, AssignmentReceipt, CompletionReport, ReleaseOutcome, ReleaseReceipt,
};
pub use eligibility::{eligible_vehicles, pending_unassigned_tasks};
pub use status_sync::{DerivedSets, DispatchStats, StatusSynchronizer};
pub use store::DispatchStore;
pub use system::DispatchSystem;
