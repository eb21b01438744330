//! Service-level errors surfaced to the request-handling layer.

use crate::tracker::{
    domain::{EntityKind, TrackerDomainError},
    ports::StoreError,
};
use thiserror::Error;
use uuid::Uuid;

/// Coarse error classification for handlers mapping errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing, or outside the actor's scope.
    NotFound,
    /// Visible but the operation is denied.
    Forbidden,
    /// A referenced entity belongs to another user.
    ForeignOwnership,
    /// A uniqueness constraint was violated.
    AlreadyExists,
    /// Malformed input.
    InvalidArgument,
    /// Infrastructure failure.
    Internal,
}

/// Errors returned by tracker service operations.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// The entity does not exist or is outside the actor's scope. The two
    /// cases are deliberately indistinguishable.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity requested.
        kind: EntityKind,
        /// Requested identifier.
        id: Uuid,
    },

    /// The entity is visible to the actor but the operation is denied.
    #[error("access to {kind} {id} denied")]
    Forbidden {
        /// Kind of entity.
        kind: EntityKind,
        /// Entity identifier.
        id: Uuid,
    },

    /// A referenced project, label or task belongs to another user.
    #[error("{kind} {id} belongs to another user")]
    ForeignOwnership {
        /// Kind of the referenced entity.
        kind: EntityKind,
        /// Identifier of the referenced entity.
        id: Uuid,
    },

    /// The owner already has an entity of this kind with the same name.
    #[error("{kind} named '{name}' already exists")]
    AlreadyExists {
        /// Kind of entity.
        kind: EntityKind,
        /// The colliding name.
        name: String,
    },

    /// Input failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[source] TrackerDomainError),

    /// Persistence failed; the enclosing transaction was rolled back.
    #[error("internal failure: {0}")]
    Internal(#[source] StoreError),
}

impl TrackerError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::ForeignOwnership { .. } => ErrorKind::ForeignOwnership,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl AsRef<Uuid>) -> Self {
        Self::NotFound {
            kind,
            id: *id.as_ref(),
        }
    }
}

impl From<TrackerDomainError> for TrackerError {
    fn from(err: TrackerDomainError) -> Self {
        match err {
            TrackerDomainError::ForeignOwnership { kind, id } => {
                Self::ForeignOwnership { kind, id }
            }
            other => Self::InvalidArgument(other),
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName { kind, name } => Self::AlreadyExists { kind, name },
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            other @ (StoreError::DuplicateId { .. } | StoreError::Persistence(_)) => {
                Self::Internal(other)
            }
        }
    }
}

/// Result type for tracker service operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
