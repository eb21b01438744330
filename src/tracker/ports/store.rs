//! Store port: transactional access to projects, labels, tasks and comments.
//!
//! Services never talk to a connection directly. They hand a synchronous
//! closure to [`TrackerStore::transaction`], which runs it against a
//! [`UnitOfWork`] and commits only if the closure succeeds. Reference
//! validation and the write it guards therefore share one transaction.

use crate::tracker::domain::{
    Comment, CommentId, EntityKind, Label, LabelId, Project, ProjectId, Scope, Task, TaskId,
    TaskStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The owner already has an entity of this kind with the same name.
    #[error("{kind} named '{name}' already exists for this owner")]
    DuplicateName {
        /// Kind of entity whose name collided.
        kind: EntityKind,
        /// The colliding name.
        name: String,
    },

    /// An entity with the same identifier already exists.
    #[error("duplicate {kind} identifier: {id}")]
    DuplicateId {
        /// Kind of entity.
        kind: EntityKind,
        /// The duplicated identifier.
        id: Uuid,
    },

    /// The entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity.
        kind: EntityKind,
        /// The missing identifier.
        id: Uuid,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a [`StoreError::NotFound`] for `kind`.
    pub fn not_found(kind: EntityKind, id: impl AsRef<Uuid>) -> Self {
        Self::NotFound {
            kind,
            id: *id.as_ref(),
        }
    }
}

/// Project persistence within a unit of work.
pub trait ProjectRecords {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateName`] when the owner already has a
    /// project with this name.
    fn insert_project(&mut self, project: &Project) -> StoreResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the project does not exist or
    /// [`StoreError::DuplicateName`] when the new name collides.
    fn update_project(&mut self, project: &Project) -> StoreResult<()>;

    /// Finds a project by identifier.
    fn find_project(&mut self, id: ProjectId) -> StoreResult<Option<Project>>;

    /// Lists projects inside `scope`, newest first.
    fn list_projects(&mut self, scope: &Scope) -> StoreResult<Vec<Project>>;

    /// Deletes a project together with its tasks and their comments.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the project does not exist.
    fn delete_project(&mut self, id: ProjectId) -> StoreResult<()>;
}

/// Label persistence within a unit of work.
pub trait LabelRecords {
    /// Stores a new label.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateName`] when the owner already has a
    /// label with this name.
    fn insert_label(&mut self, label: &Label) -> StoreResult<()>;

    /// Persists changes to an existing label.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the label does not exist or
    /// [`StoreError::DuplicateName`] when the new name collides.
    fn update_label(&mut self, label: &Label) -> StoreResult<()>;

    /// Finds a label by identifier.
    fn find_label(&mut self, id: LabelId) -> StoreResult<Option<Label>>;

    /// Returns the labels among `ids` that exist. Missing ids are skipped.
    fn find_labels(&mut self, ids: &[LabelId]) -> StoreResult<Vec<Label>>;

    /// Lists labels inside `scope`, ordered by name.
    fn list_labels(&mut self, scope: &Scope) -> StoreResult<Vec<Label>>;

    /// Deletes a label and detaches it from every task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the label does not exist.
    fn delete_label(&mut self, id: LabelId) -> StoreResult<()>;
}

/// Task persistence within a unit of work.
pub trait TaskRecords {
    /// Stores a new task with its label associations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] when the identifier is taken.
    fn insert_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Persists all fields of an existing task, replacing its label set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the task does not exist.
    fn update_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Finds a task by identifier.
    fn find_task(&mut self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Lists tasks inside `scope`, newest first, optionally restricted to
    /// one status.
    fn list_tasks(&mut self, scope: &Scope, status: Option<TaskStatus>)
    -> StoreResult<Vec<Task>>;

    /// Counts tasks inside `scope` grouped by status. Statuses without
    /// tasks may be omitted.
    fn count_tasks_by_status(&mut self, scope: &Scope) -> StoreResult<Vec<(TaskStatus, u64)>>;

    /// Deletes a task, its comments and its label associations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the task does not exist.
    fn delete_task(&mut self, id: TaskId) -> StoreResult<()>;
}

/// Comment persistence within a unit of work.
pub trait CommentRecords {
    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] when the identifier is taken.
    fn insert_comment(&mut self, comment: &Comment) -> StoreResult<()>;

    /// Persists changes to an existing comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the comment does not exist.
    fn update_comment(&mut self, comment: &Comment) -> StoreResult<()>;

    /// Finds a comment by identifier.
    fn find_comment(&mut self, id: CommentId) -> StoreResult<Option<Comment>>;

    /// Lists comments inside `scope`, oldest first.
    fn list_comments(&mut self, scope: &Scope) -> StoreResult<Vec<Comment>>;

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the comment does not exist.
    fn delete_comment(&mut self, id: CommentId) -> StoreResult<()>;
}

/// Everything a transaction can read and write.
pub trait UnitOfWork: ProjectRecords + LabelRecords + TaskRecords + CommentRecords {}

impl<T> UnitOfWork for T where T: ProjectRecords + LabelRecords + TaskRecords + CommentRecords {}

/// Transactional tracker storage.
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Runs `work` inside a single transaction.
    ///
    /// Changes made through the unit of work become visible only when `work`
    /// returns `Ok`; an `Err` discards all of them.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a [`StoreError`] converted
    /// into `E` when the transaction itself cannot be opened or committed.
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static;
}
