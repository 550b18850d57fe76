//! Error types for workspace domain validation and parsing.

use super::{BlockerId, TaskId, TaskStatus, TemplateId};
use thiserror::Error;

/// A field value rejected by domain validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable rejection reason.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors returned by workspace, task, and template domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The requested status change is not an edge of the state machine.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the task was in.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },

    /// The task carries no blocker with the given identifier.
    #[error("blocker {blocker_id} not found on task {task_id}")]
    BlockerNotFound {
        /// Task that was searched.
        task_id: TaskId,
        /// Blocker identifier that was not found.
        blocker_id: BlockerId,
    },

    /// No task with the identifier exists in the workspace.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// No template with the identifier exists in the workspace.
    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// A task with the same identifier is already part of the workspace.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A template with the same identifier is already part of the workspace.
    #[error("duplicate template identifier: {0}")]
    DuplicateTemplate(TemplateId),

    /// A task's parent link does not name the task that holds it.
    #[error("task {task_id} is linked to parent {recorded:?} but held by {holder:?}")]
    MisplacedSubtask {
        /// Task whose parent link is wrong.
        task_id: TaskId,
        /// Parent recorded on the task.
        recorded: Option<TaskId>,
        /// Task holding it, or `None` at the top level.
        holder: Option<TaskId>,
    },

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Error returned while parsing task statuses from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing an identifier from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} identifier: {value}")]
pub struct ParseIdError {
    /// Identifier kind, such as `task` or `workspace`.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}
