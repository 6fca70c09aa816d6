//! # Collection Task Model
//!
//! Core unit of collection work tied to one customer, address, and material
//! type.
//!
//! ## Overview
//!
//! A `CollectionTask` is created `Pending` by scheduling, bound to a vehicle
//! and driver by the assignment coordinator, and closed out by completion
//! reporting or cancellation. The coordinator owns the `status`, `vehicle_id`,
//! and `driver_name` fields; completion reporting owns `collected_weight_kg`,
//! `notes`, and `photo_ref`.
//!
//! ## Lifecycle
//!
//! `Pending -> InProgress -> {Completed, Cancelled}` — see
//! [`crate::state_machine::transitions`]. The collected weight is
//! authoritative only once the task is `Completed`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::state_machine::TaskStatus;

/// Material category collected by a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Plastic,
    Glass,
    Paper,
    Metal,
    Mixed,
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plastic => write!(f, "plastic"),
            Self::Glass => write!(f, "glass"),
            Self::Paper => write!(f, "paper"),
            Self::Metal => write!(f, "metal"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

impl std::str::FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "plastic" => Ok(Self::Plastic),
            "glass" => Ok(Self::Glass),
            "paper" => Ok(Self::Paper),
            "metal" => Ok(Self::Metal),
            "mixed" => Ok(Self::Mixed),
            _ => Err(format!("Invalid material type: {s}")),
        }
    }
}

/// A scheduled unit of collection work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionTask {
    pub task_id: String,
    pub customer_id: String,
    pub material: MaterialType,
    pub address: String,
    pub status: TaskStatus,
    pub scheduled_date: NaiveDate,
    /// Set by the coordinator while the task is active or after completion.
    pub vehicle_id: Option<String>,
    /// Denormalized display name of the assigned driver, resolved at
    /// assignment time through the driver registry.
    pub driver_name: Option<String>,
    /// Non-negative; zero until completion reporting writes the final weight.
    pub collected_weight_kg: f64,
    pub notes: Option<String>,
    pub photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New collection task for creation (without generated fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCollectionTask {
    /// Explicit id; one is generated when absent.
    pub task_id: Option<String>,
    pub customer_id: String,
    pub material: MaterialType,
    pub address: String,
    pub scheduled_date: NaiveDate,
}

impl CollectionTask {
    /// Materialize a pending task from a creation request.
    ///
    /// Rejects blank customer or address fields; scheduling panels validate
    /// upstream but the engine re-checks at the boundary.
    pub fn from_new(task_id: String, new: NewCollectionTask) -> Result<Self> {
        if new.customer_id.trim().is_empty() {
            return Err(DispatchError::Validation(
                "customer_id must not be empty".to_string(),
            ));
        }
        if new.address.trim().is_empty() {
            return Err(DispatchError::Validation(
                "address must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            task_id,
            customer_id: new.customer_id,
            material: new.material,
            address: new.address,
            status: TaskStatus::Pending,
            scheduled_date: new.scheduled_date,
            vehicle_id: None,
            driver_name: None,
            collected_weight_kg: 0.0,
            notes: None,
            photo_ref: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if the task is waiting for a vehicle.
    pub fn is_unassigned(&self) -> bool {
        self.status == TaskStatus::Pending && self.vehicle_id.is_none()
    }

    /// Bump the modification timestamp after a committed mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
