//! Domain model for the task tracker.
//!
//! Holds the entities, the ownership policy used for single-object access,
//! the scope predicate used for listings, the relation checks run before
//! writes, and the task completion lifecycle. Nothing here touches storage.

mod actor;
mod comment;
mod error;
mod ids;
mod label;
mod ownership;
mod project;
mod relations;
mod scope;
mod stats;
mod task;
mod text;
mod timestamp;

pub use actor::Actor;
pub use comment::Comment;
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TrackerDomainError};
pub use ids::{CommentId, LabelId, ProjectId, TaskId, UserId};
pub use label::Label;
pub use ownership::{AccessMode, Controller, EntityKind, Owned, can_access};
pub use project::{PersistedProjectData, Project};
pub use relations::{validate_label_refs, validate_project_ref, validate_task_ref};
pub use scope::Scope;
pub use stats::StatusCounts;
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft, TaskPriority, TaskStatus};
pub use text::{CommentContent, LabelName, ProjectName, TaskTitle};
pub use timestamp::{TIMESTAMP_PRECISION_DIGITS, timestamp_now};
