//! Task operations, including the status aggregation queries.

use super::{
    TrackerResult, TrackerService,
    tracker::{authorize, resolve_label_refs, resolve_project_ref},
};
use crate::tracker::{
    domain::{
        AccessMode, Actor, LabelId, ProjectId, Scope, StatusCounts, Task, TaskChanges, TaskDraft,
        TaskId, TaskPriority, TaskStatus, TaskTitle, TrackerDomainError,
    },
    ports::{TaskRecords, TrackerStore},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Request payload for creating a task.
///
/// Status and priority arrive as raw strings and are parsed when the request
/// is turned into a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: String,
    status: Option<String>,
    priority: Option<String>,
    due_date: Option<NaiveDate>,
    label_ids: Vec<LabelId>,
}

impl CreateTaskRequest {
    /// Creates a request for a task in `project_id`.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            status: None,
            priority: None,
            due_date: None,
            label_ids: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the initial priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Attaches labels. Duplicates collapse.
    #[must_use]
    pub fn with_labels(mut self, label_ids: impl IntoIterator<Item = LabelId>) -> Self {
        self.label_ids = label_ids.into_iter().collect();
        self
    }

    fn into_draft(self) -> Result<TaskDraft, TrackerDomainError> {
        let mut draft = TaskDraft::new(self.project_id, TaskTitle::new(self.title)?);
        draft.description = self.description;
        if let Some(raw) = self.status {
            draft.status = TaskStatus::try_from(raw.as_str())?;
        }
        if let Some(raw) = self.priority {
            draft.priority = TaskPriority::try_from(raw.as_str())?;
        }
        draft.due_date = self.due_date;
        draft.label_ids = self.label_ids.into_iter().collect();
        Ok(draft)
    }
}

/// Partial task update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    project_id: Option<ProjectId>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    due_date: Option<Option<NaiveDate>>,
    label_ids: Option<Vec<LabelId>>,
}

impl UpdateTaskRequest {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the task to another project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Changes the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Changes the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Removes the due date.
    #[must_use]
    pub const fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replaces the whole label set.
    #[must_use]
    pub fn with_labels(mut self, label_ids: impl IntoIterator<Item = LabelId>) -> Self {
        self.label_ids = Some(label_ids.into_iter().collect());
        self
    }

    fn into_changes(self) -> Result<TaskChanges, TrackerDomainError> {
        Ok(TaskChanges {
            project_id: self.project_id,
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description,
            status: self
                .status
                .map(|raw| TaskStatus::try_from(raw.as_str()))
                .transpose()?,
            priority: self
                .priority
                .map(|raw| TaskPriority::try_from(raw.as_str()))
                .transpose()?,
            due_date: self.due_date,
            label_ids: self
                .label_ids
                .map(|ids| ids.into_iter().collect::<BTreeSet<_>>()),
        })
    }
}

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a task owned by `actor`.
    ///
    /// The project and every label must exist and be owned by the actor.
    /// This holds for admins too.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::InvalidArgument`] for invalid fields,
    /// [`super::TrackerError::NotFound`] for a missing project or label and
    /// [`super::TrackerError::ForeignOwnership`] for one owned by another user.
    pub async fn create_task(&self, actor: Actor, request: CreateTaskRequest) -> TrackerResult<Task> {
        let draft = request.into_draft()?;
        let clock = Arc::clone(&self.clock);
        let task = self
            .store
            .transaction(move |uow| -> TrackerResult<Task> {
                resolve_project_ref(uow, actor, draft.project_id)?;
                resolve_label_refs(uow, actor, &draft.label_ids)?;
                let task = Task::new(actor.id(), draft, &*clock);
                uow.insert_task(&task)?;
                Ok(task)
            })
            .await?;
        tracing::info!(
            actor = %actor.id(),
            task = %task.id(),
            status = %task.status(),
            "task created"
        );
        Ok(task)
    }

    /// Retrieves a task visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the task is missing or not
    /// visible to the actor.
    pub async fn get_task(&self, actor: Actor, id: TaskId) -> TrackerResult<Task> {
        self.store
            .transaction(move |uow| -> TrackerResult<Task> {
                authorize(actor, uow.find_task(id)?, id, AccessMode::Read)
            })
            .await
    }

    /// Lists the tasks visible to `actor`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Internal`] when the store fails.
    pub async fn list_tasks(&self, actor: Actor) -> TrackerResult<Vec<Task>> {
        let scope = Scope::of::<Task>(actor);
        self.store
            .transaction(move |uow| -> TrackerResult<Vec<Task>> {
                Ok(uow.list_tasks(&scope, None)?)
            })
            .await
    }

    /// Applies a partial update to a task.
    ///
    /// Changed project or label references are re-validated, and the
    /// completion timestamp is re-derived from the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the task or a referenced
    /// entity is missing, [`super::TrackerError::Forbidden`] when the policy
    /// denies the write, [`super::TrackerError::ForeignOwnership`] for a foreign
    /// reference and [`super::TrackerError::InvalidArgument`] for invalid fields.
    pub async fn update_task(
        &self,
        actor: Actor,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TrackerResult<Task> {
        let changes = request.into_changes()?;
        let clock = Arc::clone(&self.clock);
        let task = self
            .store
            .transaction(move |uow| -> TrackerResult<Task> {
                let mut task = authorize(actor, uow.find_task(id)?, id, AccessMode::Write)?;
                if let Some(project_id) = changes.project_id {
                    resolve_project_ref(uow, actor, project_id)?;
                }
                if let Some(label_ids) = &changes.label_ids {
                    resolve_label_refs(uow, actor, label_ids)?;
                }
                task.apply_changes(changes, &*clock);
                uow.update_task(&task)?;
                Ok(task)
            })
            .await?;
        tracing::info!(
            actor = %actor.id(),
            task = %id,
            status = %task.status(),
            "task updated"
        );
        Ok(task)
    }

    /// Deletes a task and its comments.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the task is not visible and
    /// [`super::TrackerError::Forbidden`] when the policy denies the write.
    pub async fn delete_task(&self, actor: Actor, id: TaskId) -> TrackerResult<()> {
        self.store
            .transaction(move |uow| -> TrackerResult<()> {
                authorize(actor, uow.find_task(id)?, id, AccessMode::Write)?;
                uow.delete_task(id)?;
                Ok(())
            })
            .await?;
        tracing::info!(actor = %actor.id(), task = %id, "task deleted");
        Ok(())
    }

    /// Lists the visible tasks whose status matches `raw_status`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::InvalidArgument`] when `raw_status` is not one of
    /// `todo`, `doing` or `done`.
    pub async fn list_tasks_by_status(
        &self,
        actor: Actor,
        raw_status: &str,
    ) -> TrackerResult<Vec<Task>> {
        let status = TaskStatus::try_from(raw_status).map_err(TrackerDomainError::from)?;
        let scope = Scope::of::<Task>(actor);
        let tasks = self
            .store
            .transaction(move |uow| -> TrackerResult<Vec<Task>> {
                Ok(uow.list_tasks(&scope, Some(status))?)
            })
            .await?;
        tracing::debug!(actor = %actor.id(), %status, count = tasks.len(), "tasks filtered");
        Ok(tasks)
    }

    /// Counts the visible tasks per status. Every status is present.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Internal`] when the store fails.
    pub async fn task_stats(&self, actor: Actor) -> TrackerResult<StatusCounts> {
        let scope = Scope::of::<Task>(actor);
        let groups = self
            .store
            .transaction(move |uow| -> TrackerResult<Vec<(TaskStatus, u64)>> {
                Ok(uow.count_tasks_by_status(&scope)?)
            })
            .await?;
        Ok(StatusCounts::from_groups(groups))
    }
}
