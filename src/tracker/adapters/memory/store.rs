//! In-memory tracker store for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::tracker::{
    domain::{
        Comment, CommentId, EntityKind, Label, LabelId, Project, ProjectId, Scope, Task, TaskId,
        TaskStatus, UserId,
    },
    ports::{
        CommentRecords, LabelRecords, ProjectRecords, StoreError, StoreResult, TaskRecords,
        TrackerStore, UnitOfWork,
    },
};

/// Thread-safe in-memory tracker store.
///
/// Each transaction works on a copy of the state which replaces the shared
/// state only when the transaction succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryTrackerState {
    projects: HashMap<ProjectId, Project>,
    labels: HashMap<LabelId, Label>,
    tasks: HashMap<TaskId, Task>,
    comments: HashMap<CommentId, Comment>,
}

impl InMemoryTrackerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TrackerStore for InMemoryTrackerStore {
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let mut draft = state.clone();
        let outcome = work(&mut draft)?;
        *state = draft;
        Ok(outcome)
    }
}

impl InMemoryTrackerState {
    fn name_taken<'a>(
        mut existing: impl Iterator<Item = (Uuid, UserId, &'a str)>,
        id: Uuid,
        owner: UserId,
        name: &str,
    ) -> bool {
        existing.any(|(other_id, other_owner, other_name)| {
            other_id != id && other_owner == owner && other_name == name
        })
    }

    fn project_name_taken(&self, project: &Project) -> bool {
        Self::name_taken(
            self.projects
                .values()
                .map(|p| (p.id().into_inner(), p.owner_id(), p.name().as_str())),
            project.id().into_inner(),
            project.owner_id(),
            project.name().as_str(),
        )
    }

    fn label_name_taken(&self, label: &Label) -> bool {
        Self::name_taken(
            self.labels
                .values()
                .map(|l| (l.id().into_inner(), l.owner_id(), l.name().as_str())),
            label.id().into_inner(),
            label.owner_id(),
            label.name().as_str(),
        )
    }

    fn check_task_references(&self, task: &Task) -> StoreResult<()> {
        if !self.projects.contains_key(&task.project_id()) {
            return Err(StoreError::not_found(EntityKind::Project, task.project_id()));
        }
        if let Some(missing) = task
            .label_ids()
            .iter()
            .find(|id| !self.labels.contains_key(*id))
        {
            return Err(StoreError::not_found(EntityKind::Label, *missing));
        }
        Ok(())
    }

    fn remove_task_cascade(&mut self, id: TaskId) {
        self.tasks.remove(&id);
        self.comments.retain(|_, comment| comment.task_id() != id);
    }
}

impl ProjectRecords for InMemoryTrackerState {
    fn insert_project(&mut self, project: &Project) -> StoreResult<()> {
        if self.projects.contains_key(&project.id()) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Project,
                id: project.id().into_inner(),
            });
        }
        if self.project_name_taken(project) {
            return Err(StoreError::DuplicateName {
                kind: EntityKind::Project,
                name: project.name().as_str().to_owned(),
            });
        }
        self.projects.insert(project.id(), project.clone());
        Ok(())
    }

    fn update_project(&mut self, project: &Project) -> StoreResult<()> {
        if !self.projects.contains_key(&project.id()) {
            return Err(StoreError::not_found(EntityKind::Project, project.id()));
        }
        if self.project_name_taken(project) {
            return Err(StoreError::DuplicateName {
                kind: EntityKind::Project,
                name: project.name().as_str().to_owned(),
            });
        }
        self.projects.insert(project.id(), project.clone());
        Ok(())
    }

    fn find_project(&mut self, id: ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.projects.get(&id).cloned())
    }

    fn list_projects(&mut self, scope: &Scope) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .projects
            .values()
            .filter(|project| scope.admits(*project))
            .cloned()
            .collect();
        projects.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));
        Ok(projects)
    }

    fn delete_project(&mut self, id: ProjectId) -> StoreResult<()> {
        if self.projects.remove(&id).is_none() {
            return Err(StoreError::not_found(EntityKind::Project, id));
        }
        let doomed: Vec<TaskId> = self
            .tasks
            .values()
            .filter(|task| task.project_id() == id)
            .map(Task::id)
            .collect();
        for task_id in doomed {
            self.remove_task_cascade(task_id);
        }
        Ok(())
    }
}

impl LabelRecords for InMemoryTrackerState {
    fn insert_label(&mut self, label: &Label) -> StoreResult<()> {
        if self.labels.contains_key(&label.id()) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Label,
                id: label.id().into_inner(),
            });
        }
        if self.label_name_taken(label) {
            return Err(StoreError::DuplicateName {
                kind: EntityKind::Label,
                name: label.name().as_str().to_owned(),
            });
        }
        self.labels.insert(label.id(), label.clone());
        Ok(())
    }

    fn update_label(&mut self, label: &Label) -> StoreResult<()> {
        if !self.labels.contains_key(&label.id()) {
            return Err(StoreError::not_found(EntityKind::Label, label.id()));
        }
        if self.label_name_taken(label) {
            return Err(StoreError::DuplicateName {
                kind: EntityKind::Label,
                name: label.name().as_str().to_owned(),
            });
        }
        self.labels.insert(label.id(), label.clone());
        Ok(())
    }

    fn find_label(&mut self, id: LabelId) -> StoreResult<Option<Label>> {
        Ok(self.labels.get(&id).cloned())
    }

    fn find_labels(&mut self, ids: &[LabelId]) -> StoreResult<Vec<Label>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.labels.get(id).cloned())
            .collect())
    }

    fn list_labels(&mut self, scope: &Scope) -> StoreResult<Vec<Label>> {
        let mut labels: Vec<Label> = self
            .labels
            .values()
            .filter(|label| scope.admits(*label))
            .cloned()
            .collect();
        labels.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(labels)
    }

    fn delete_label(&mut self, id: LabelId) -> StoreResult<()> {
        if self.labels.remove(&id).is_none() {
            return Err(StoreError::not_found(EntityKind::Label, id));
        }
        for task in self.tasks.values_mut() {
            task.detach_label(id);
        }
        Ok(())
    }
}

impl TaskRecords for InMemoryTrackerState {
    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        if self.tasks.contains_key(&task.id()) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Task,
                id: task.id().into_inner(),
            });
        }
        self.check_task_references(task)?;
        self.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        if !self.tasks.contains_key(&task.id()) {
            return Err(StoreError::not_found(EntityKind::Task, task.id()));
        }
        self.check_task_references(task)?;
        self.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn find_task(&mut self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.tasks.get(&id).cloned())
    }

    fn list_tasks(
        &mut self,
        scope: &Scope,
        status: Option<TaskStatus>,
    ) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| scope.admits(*task))
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));
        Ok(tasks)
    }

    fn count_tasks_by_status(&mut self, scope: &Scope) -> StoreResult<Vec<(TaskStatus, u64)>> {
        let mut groups: HashMap<TaskStatus, u64> = HashMap::new();
        for task in self.tasks.values().filter(|task| scope.admits(*task)) {
            let count = groups.entry(task.status()).or_default();
            *count = count.saturating_add(1);
        }
        Ok(groups.into_iter().collect())
    }

    fn delete_task(&mut self, id: TaskId) -> StoreResult<()> {
        if !self.tasks.contains_key(&id) {
            return Err(StoreError::not_found(EntityKind::Task, id));
        }
        self.remove_task_cascade(id);
        Ok(())
    }
}

impl CommentRecords for InMemoryTrackerState {
    fn insert_comment(&mut self, comment: &Comment) -> StoreResult<()> {
        if self.comments.contains_key(&comment.id()) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Comment,
                id: comment.id().into_inner(),
            });
        }
        if !self.tasks.contains_key(&comment.task_id()) {
            return Err(StoreError::not_found(EntityKind::Task, comment.task_id()));
        }
        self.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    fn update_comment(&mut self, comment: &Comment) -> StoreResult<()> {
        if !self.comments.contains_key(&comment.id()) {
            return Err(StoreError::not_found(EntityKind::Comment, comment.id()));
        }
        if !self.tasks.contains_key(&comment.task_id()) {
            return Err(StoreError::not_found(EntityKind::Task, comment.task_id()));
        }
        self.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    fn find_comment(&mut self, id: CommentId) -> StoreResult<Option<Comment>> {
        Ok(self.comments.get(&id).cloned())
    }

    fn list_comments(&mut self, scope: &Scope) -> StoreResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|comment| scope.admits(*comment))
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at(), c.id()));
        Ok(comments)
    }

    fn delete_comment(&mut self, id: CommentId) -> StoreResult<()> {
        if self.comments.remove(&id).is_none() {
            return Err(StoreError::not_found(EntityKind::Comment, id));
        }
        Ok(())
    }
}
