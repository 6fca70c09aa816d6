//! # Vehicle Model
//!
//! Fleet vehicle with duty status, load bounds, and a driver relation.
//!
//! The driver link is a foreign-key-style `driver_id` resolved through the
//! driver registry index, not a free-text name match, so two drivers sharing
//! a name can never be confused at assignment time.

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::state_machine::VehicleStatus;

/// A collection vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub name: String,
    /// Linked driver, resolved through the driver registry.
    pub driver_id: Option<String>,
    pub status: VehicleStatus,
    /// Rated payload in kilograms; strictly positive.
    pub capacity_kg: f64,
    /// Current load in kilograms; `0 <= load <= capacity`.
    pub current_load_kg: f64,
}

impl Vehicle {
    /// Validate the capacity and load bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.capacity_kg.is_finite() && self.capacity_kg > 0.0) {
            return Err(DispatchError::Validation(format!(
                "vehicle `{}` capacity must be positive, got {}",
                self.vehicle_id, self.capacity_kg
            )));
        }
        if !self.current_load_kg.is_finite()
            || self.current_load_kg < 0.0
            || self.current_load_kg > self.capacity_kg
        {
            return Err(DispatchError::Validation(format!(
                "vehicle `{}` load {} outside [0, {}]",
                self.vehicle_id, self.current_load_kg, self.capacity_kg
            )));
        }
        Ok(())
    }

    /// Remaining payload headroom in kilograms.
    pub fn remaining_capacity_kg(&self) -> f64 {
        (self.capacity_kg - self.current_load_kg).max(0.0)
    }

    /// Add collected weight to the current load, saturating at capacity.
    pub fn add_load(&mut self, weight_kg: f64) {
        self.current_load_kg = (self.current_load_kg + weight_kg).min(self.capacity_kg);
    }
}
