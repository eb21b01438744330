//! Orchestration services for the task tracker.
//!
//! Each operation resolves scope and ownership, validates references and
//! applies the task lifecycle inside one store transaction.

mod comments;
mod error;
mod labels;
mod projects;
mod tasks;
mod tracker;

pub use comments::UpdateCommentRequest;
pub use error::{ErrorKind, TrackerError, TrackerResult};
pub use projects::{CreateProjectRequest, UpdateProjectRequest};
pub use tasks::{CreateTaskRequest, UpdateTaskRequest};
pub use tracker::TrackerService;
