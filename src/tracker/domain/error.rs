//! Error types for tracker domain validation and parsing.

use super::{EntityKind, TaskStatus};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned while constructing or validating tracker values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    BlankField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field exceeds its maximum length.
    #[error("{field} must be at most {max} characters, got {actual}")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted character count.
        max: usize,
        /// Actual character count.
        actual: usize,
    },

    /// The task status value is not one of the supported statuses.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The task priority value is not one of the supported priorities.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),

    /// A referenced entity is owned by a different user than the actor.
    #[error("{kind} {id} belongs to another user")]
    ForeignOwnership {
        /// Kind of the referenced entity.
        kind: EntityKind,
        /// Identifier of the referenced entity.
        id: Uuid,
    },

    /// A task's completion timestamp disagrees with its status.
    #[error("task with status {status} has an inconsistent completion timestamp")]
    CompletionMismatch {
        /// Status carried by the rejected task data.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
