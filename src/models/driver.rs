//! # Driver Model
//!
//! A driver is engaged exactly when `available == false`, and engagement must
//! correspond to zero or one in-progress task at any time. The availability
//! flag is toggled only by the assignment coordinator and by direct operator
//! edit.

use serde::{Deserialize, Serialize};

/// A driver on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: String,
    pub name: String,
    pub contact: String,
    pub available: bool,
}

impl Driver {
    /// Check if the driver is currently bound to an in-progress task.
    pub fn is_engaged(&self) -> bool {
        !self.available
    }
}
