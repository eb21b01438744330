//! Task aggregate root and the status/completion lifecycle.

use super::{
    Controller, EntityKind, LabelId, Owned, ParseTaskPriorityError, ParseTaskStatusError,
    ProjectId, TaskId, TaskTitle, TrackerDomainError, UserId, timestamp_now,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Task workflow status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is under way.
    Doing,
    /// Work is complete.
    Done,
}

impl TaskStatus {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Doing, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field values for a task that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Project the task belongs to.
    pub project_id: ProjectId,
    /// Task title.
    pub title: TaskTitle,
    /// Free-form description.
    pub description: String,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: TaskPriority,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Labels attached to the task.
    pub label_ids: BTreeSet<LabelId>,
}

impl TaskDraft {
    /// Creates a draft with default status, priority and no labels.
    #[must_use]
    pub fn new(project_id: ProjectId, title: TaskTitle) -> Self {
        Self {
            project_id,
            title,
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            label_ids: BTreeSet::new(),
        }
    }
}

/// Partial update of a task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// New project.
    pub project_id: Option<ProjectId>,
    /// New title.
    pub title: Option<TaskTitle>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<NaiveDate>>,
    /// Replacement label set.
    pub label_ids: Option<BTreeSet<LabelId>>,
}

/// Task aggregate root.
///
/// Deserialization goes through [`PersistedTaskData`] and rejects data whose
/// completion timestamp disagrees with its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedTaskData")]
pub struct Task {
    id: TaskId,
    owner_id: UserId,
    project_id: ProjectId,
    title: TaskTitle,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    label_ids: BTreeSet<LabelId>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner_id: UserId,
    /// Persisted project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted label associations.
    pub label_ids: BTreeSet<LabelId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task owned by `owner_id`.
    ///
    /// The completion timestamp is derived from the initial status.
    #[must_use]
    pub fn new(owner_id: UserId, draft: TaskDraft, clock: &impl Clock) -> Self {
        let mut task = Self {
            id: TaskId::new(),
            owner_id,
            project_id: draft.project_id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            label_ids: draft.label_ids,
            created_at: timestamp_now(clock),
            completed_at: None,
        };
        task.apply_status_invariant(clock);
        task
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            label_ids: data.label_ids,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the project the task belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the attached labels.
    #[must_use]
    pub const fn label_ids(&self) -> &BTreeSet<LabelId> {
        &self.label_ids
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp. Set exactly when the task is done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Assigns every supplied field and re-derives the completion timestamp.
    pub fn apply_changes(&mut self, changes: TaskChanges, clock: &impl Clock) {
        let TaskChanges {
            project_id,
            title,
            description,
            status,
            priority,
            due_date,
            label_ids,
        } = changes;

        if let Some(value) = project_id {
            self.project_id = value;
        }
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = due_date {
            self.due_date = value;
        }
        if let Some(value) = label_ids {
            self.label_ids = value;
        }
        self.apply_status_invariant(clock);
    }

    /// Enforces `completed_at.is_some() == (status == Done)`.
    ///
    /// A done task keeps an existing completion timestamp, so saving it again
    /// never moves the timestamp forward. Any other status clears it.
    pub fn apply_status_invariant(&mut self, clock: &impl Clock) {
        match self.status {
            TaskStatus::Done => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(timestamp_now(clock));
                }
            }
            TaskStatus::Todo | TaskStatus::Doing => self.completed_at = None,
        }
    }

    /// Removes `label_id` from the label set. Returns `true` when it was
    /// attached.
    pub fn detach_label(&mut self, label_id: LabelId) -> bool {
        self.label_ids.remove(&label_id)
    }
}

impl TryFrom<PersistedTaskData> for Task {
    type Error = TrackerDomainError;

    fn try_from(data: PersistedTaskData) -> Result<Self, Self::Error> {
        if data.completed_at.is_some() != (data.status == TaskStatus::Done) {
            return Err(TrackerDomainError::CompletionMismatch {
                status: data.status,
            });
        }
        Ok(Self::from_persisted(data))
    }
}

impl Owned for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn controller(&self) -> Controller {
        Controller::Owner(self.owner_id)
    }
}
