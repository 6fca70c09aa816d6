//! # Data Models
//!
//! Entity types managed by the dispatch registries: collection tasks, fleet
//! vehicles, and drivers. Cross-entity invariants are owned by the
//! orchestration layer, never by the models themselves.

pub mod collection_task;
pub mod driver;
pub mod vehicle;

// Re-export main types for convenient access
pub use collection_task::{CollectionTask, MaterialType, NewCollectionTask};
pub use driver::Driver;
pub use vehicle::Vehicle;
