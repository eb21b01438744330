//! Diesel row models for tracker persistence.

use super::schema::{comments, labels, projects, task_labels, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Project row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Label row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = labels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LabelRow {
    /// Label identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Label name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Task row, used for both reads and inserts. Labels live in
/// [`TaskLabelRow`].
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Parent project.
    pub project_id: Uuid,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Full-row changeset for task updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Parent project.
    pub project_id: Uuid,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Task to label association row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_labels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskLabelRow {
    /// Associated task.
    pub task_id: Uuid,
    /// Associated label.
    pub label_id: Uuid,
}

/// Comment row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: Uuid,
    /// Commented task.
    pub task_id: Uuid,
    /// Authoring user.
    pub author_id: Uuid,
    /// Comment body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
