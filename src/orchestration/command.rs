//! # Command Surface
//!
//! Input-modality-independent entry point for the interaction layer. A drag
//! gesture, a menu selection, or an API call all collapse into the same
//! synchronous command with a structured result: success with the committed
//! records, or a typed error the UI surfaces verbatim. There is no optimistic
//! state to roll back — nothing outside the store ever claims an assignment
//! happened before the coordinator committed it.

use serde::{Deserialize, Serialize};

use crate::models::{CollectionTask, NewCollectionTask};
use crate::orchestration::coordinator::{
    AssignmentReceipt, CompletionReport, ReleaseOutcome, ReleaseReceipt,
};

/// Commands accepted from the interaction surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DispatchCommand {
    /// Schedule a new pending task.
    CreateTask(NewCollectionTask),
    /// Drop a dragged task onto a vehicle.
    Assign { task_id: String, vehicle_id: String },
    /// Cancel an in-progress task.
    Cancel { task_id: String },
    /// Close out an in-progress task with its weighed load.
    ReportCompletion {
        task_id: String,
        report: CompletionReport,
    },
}

/// Structured result of a committed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CommandOutcome {
    TaskCreated(CollectionTask),
    Assigned(AssignmentReceipt),
    Released(ReleaseReceipt),
}

impl DispatchCommand {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateTask(_) => "create_task",
            Self::Assign { .. } => "assign",
            Self::Cancel { .. } => "cancel",
            Self::ReportCompletion { .. } => "report_completion",
        }
    }

    /// The release outcome a command maps to, if it is a release.
    pub fn release_outcome(&self) -> Option<ReleaseOutcome> {
        match self {
            Self::Cancel { .. } => Some(ReleaseOutcome::Cancelled),
            Self::ReportCompletion { report, .. } => {
                Some(ReleaseOutcome::Completed(report.clone()))
            }
            _ => None,
        }
    }
}
