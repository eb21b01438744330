//! `PostgreSQL` store implementation for tracker storage.

use super::{
    models::{CommentRow, LabelRow, ProjectRow, TaskChangeset, TaskLabelRow, TaskRow},
    schema::{comments, labels, projects, task_labels, tasks},
};
use crate::tracker::{
    domain::{
        Comment, CommentContent, CommentId, EntityKind, Label, LabelId, LabelName,
        PersistedProjectData, PersistedTaskData, Project, ProjectId, ProjectName, Scope, Task,
        TaskId, TaskPriority, TaskStatus, TaskTitle, UserId,
    },
    ports::{
        CommentRecords, LabelRecords, ProjectRecords, StoreError, StoreResult, TaskRecords,
        TrackerStore, UnitOfWork,
    },
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::dsl::{count_star, exists};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating the tracker tables, indexes and constraints.
pub const TRACKER_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-16-000000_create_tracker_tables/up.sql");

/// Unique constraints guarding `(owner_id, name)`.
const OWNER_NAME_CONSTRAINTS: [&str; 2] = ["uq_projects_owner_name", "uq_labels_owner_name"];

/// `PostgreSQL`-backed tracker store.
#[derive(Debug, Clone)]
pub struct PostgresTrackerStore {
    pool: TrackerPgPool,
}

impl PostgresTrackerStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    /// Creates the tracker tables on the connected database.
    ///
    /// Existing tables and indexes are left untouched, so running it against
    /// a provisioned database is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when a connection cannot be
    /// obtained or the schema statements fail.
    pub async fn apply_schema(&self) -> StoreResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(TRACKER_SCHEMA_SQL)
                .map_err(StoreError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

/// Failure inside a Diesel transaction: either the caller's work failed or
/// the database did.
enum TransactionFailure<E> {
    Work(E),
    Database(DieselError),
}

impl<E> From<DieselError> for TransactionFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

#[async_trait]
impl TrackerStore for PostgresTrackerStore {
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool
                .get()
                .map_err(|err| E::from(StoreError::persistence(err)))?;
            let connection: &mut PgConnection = &mut pooled;
            connection
                .transaction::<T, TransactionFailure<E>, _>(|conn| {
                    let mut unit = PgUnitOfWork { connection: conn };
                    work(&mut unit).map_err(TransactionFailure::Work)
                })
                .map_err(|failure| match failure {
                    TransactionFailure::Work(err) => err,
                    TransactionFailure::Database(err) => E::from(StoreError::persistence(err)),
                })
        })
        .await
        .map_err(|err| E::from(StoreError::persistence(err)))?
    }
}

/// Unit of work bound to a connection with an open transaction.
struct PgUnitOfWork<'c> {
    connection: &'c mut PgConnection,
}

impl ProjectRecords for PgUnitOfWork<'_> {
    fn insert_project(&mut self, project: &Project) -> StoreResult<()> {
        let connection = &mut *self.connection;
        // The pre-check gives a precise error; the unique constraint still
        // guards the window between check and insert.
        if project_name_taken(connection, project)? {
            return Err(duplicate_name(EntityKind::Project, project.name().as_str()));
        }
        diesel::insert_into(projects::table)
            .values(&project_to_row(project))
            .execute(connection)
            .map_err(|err| {
                classify_write_error(
                    err,
                    EntityKind::Project,
                    project.id().into_inner(),
                    Some(project.name().as_str()),
                )
            })?;
        Ok(())
    }

    fn update_project(&mut self, project: &Project) -> StoreResult<()> {
        let connection = &mut *self.connection;
        if project_name_taken(connection, project)? {
            return Err(duplicate_name(EntityKind::Project, project.name().as_str()));
        }
        let updated = diesel::update(projects::table.find(project.id().into_inner()))
            .set((
                projects::name.eq(project.name().as_str()),
                projects::description.eq(project.description()),
            ))
            .execute(connection)
            .map_err(|err| {
                classify_write_error(
                    err,
                    EntityKind::Project,
                    project.id().into_inner(),
                    Some(project.name().as_str()),
                )
            })?;
        ensure_affected(updated, EntityKind::Project, project.id())
    }

    fn find_project(&mut self, id: ProjectId) -> StoreResult<Option<Project>> {
        let row = projects::table
            .find(id.into_inner())
            .select(ProjectRow::as_select())
            .first::<ProjectRow>(self.connection)
            .optional()
            .map_err(StoreError::persistence)?;
        row.map(row_to_project).transpose()
    }

    fn list_projects(&mut self, scope: &Scope) -> StoreResult<Vec<Project>> {
        let mut query = projects::table
            .select(ProjectRow::as_select())
            .order((projects::created_at.desc(), projects::id.desc()))
            .into_boxed();
        if let Some(owner) = scope.controlled_by() {
            query = query.filter(projects::owner_id.eq(owner.into_inner()));
        }
        query
            .load::<ProjectRow>(self.connection)
            .map_err(StoreError::persistence)?
            .into_iter()
            .map(row_to_project)
            .collect()
    }

    fn delete_project(&mut self, id: ProjectId) -> StoreResult<()> {
        // Tasks, their comments and label links go with the project through
        // ON DELETE CASCADE.
        let deleted = diesel::delete(projects::table.find(id.into_inner()))
            .execute(self.connection)
            .map_err(StoreError::persistence)?;
        ensure_affected(deleted, EntityKind::Project, id)
    }
}

impl LabelRecords for PgUnitOfWork<'_> {
    fn insert_label(&mut self, label: &Label) -> StoreResult<()> {
        let connection = &mut *self.connection;
        if label_name_taken(connection, label)? {
            return Err(duplicate_name(EntityKind::Label, label.name().as_str()));
        }
        diesel::insert_into(labels::table)
            .values(&label_to_row(label))
            .execute(connection)
            .map_err(|err| {
                classify_write_error(
                    err,
                    EntityKind::Label,
                    label.id().into_inner(),
                    Some(label.name().as_str()),
                )
            })?;
        Ok(())
    }

    fn update_label(&mut self, label: &Label) -> StoreResult<()> {
        let connection = &mut *self.connection;
        if label_name_taken(connection, label)? {
            return Err(duplicate_name(EntityKind::Label, label.name().as_str()));
        }
        let updated = diesel::update(labels::table.find(label.id().into_inner()))
            .set(labels::name.eq(label.name().as_str()))
            .execute(connection)
            .map_err(|err| {
                classify_write_error(
                    err,
                    EntityKind::Label,
                    label.id().into_inner(),
                    Some(label.name().as_str()),
                )
            })?;
        ensure_affected(updated, EntityKind::Label, label.id())
    }

    fn find_label(&mut self, id: LabelId) -> StoreResult<Option<Label>> {
        let row = labels::table
            .find(id.into_inner())
            .select(LabelRow::as_select())
            .first::<LabelRow>(self.connection)
            .optional()
            .map_err(StoreError::persistence)?;
        row.map(row_to_label).transpose()
    }

    fn find_labels(&mut self, ids: &[LabelId]) -> StoreResult<Vec<Label>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        labels::table
            .filter(labels::id.eq_any(uuids))
            .select(LabelRow::as_select())
            .load::<LabelRow>(self.connection)
            .map_err(StoreError::persistence)?
            .into_iter()
            .map(row_to_label)
            .collect()
    }

    fn list_labels(&mut self, scope: &Scope) -> StoreResult<Vec<Label>> {
        let mut query = labels::table
            .select(LabelRow::as_select())
            .order((labels::name.asc(), labels::id.asc()))
            .into_boxed();
        if let Some(owner) = scope.controlled_by() {
            query = query.filter(labels::owner_id.eq(owner.into_inner()));
        }
        query
            .load::<LabelRow>(self.connection)
            .map_err(StoreError::persistence)?
            .into_iter()
            .map(row_to_label)
            .collect()
    }

    fn delete_label(&mut self, id: LabelId) -> StoreResult<()> {
        // task_labels rows cascade; the tasks themselves stay.
        let deleted = diesel::delete(labels::table.find(id.into_inner()))
            .execute(self.connection)
            .map_err(StoreError::persistence)?;
        ensure_affected(deleted, EntityKind::Label, id)
    }
}

impl TaskRecords for PgUnitOfWork<'_> {
    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        let connection = &mut *self.connection;
        diesel::insert_into(tasks::table)
            .values(&task_to_row(task))
            .execute(connection)
            .map_err(|err| {
                classify_write_error(err, EntityKind::Task, task.id().into_inner(), None)
            })?;
        insert_task_labels(connection, task)
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        let connection = &mut *self.connection;
        let task_id = task.id().into_inner();
        let updated = diesel::update(tasks::table.find(task_id))
            .set(&task_changeset(task))
            .execute(connection)
            .map_err(StoreError::persistence)?;
        ensure_affected(updated, EntityKind::Task, task.id())?;

        diesel::delete(task_labels::table.filter(task_labels::task_id.eq(task_id)))
            .execute(connection)
            .map_err(StoreError::persistence)?;
        insert_task_labels(connection, task)
    }

    fn find_task(&mut self, id: TaskId) -> StoreResult<Option<Task>> {
        let connection = &mut *self.connection;
        let Some(row) = tasks::table
            .find(id.into_inner())
            .select(TaskRow::as_select())
            .first::<TaskRow>(connection)
            .optional()
            .map_err(StoreError::persistence)?
        else {
            return Ok(None);
        };
        let label_ids = task_labels::table
            .filter(task_labels::task_id.eq(row.id))
            .select(task_labels::label_id)
            .load::<Uuid>(connection)
            .map_err(StoreError::persistence)?
            .into_iter()
            .map(LabelId::from_uuid)
            .collect();
        row_to_task(row, label_ids).map(Some)
    }

    fn list_tasks(
        &mut self,
        scope: &Scope,
        status: Option<TaskStatus>,
    ) -> StoreResult<Vec<Task>> {
        let connection = &mut *self.connection;
        let mut query = tasks::table
            .select(TaskRow::as_select())
            .order((tasks::created_at.desc(), tasks::id.desc()))
            .into_boxed();
        if let Some(owner) = scope.controlled_by() {
            query = query.filter(tasks::owner_id.eq(owner.into_inner()));
        }
        if let Some(wanted) = status {
            query = query.filter(tasks::status.eq(wanted.as_str()));
        }
        let rows = query
            .load::<TaskRow>(connection)
            .map_err(StoreError::persistence)?;

        let task_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut labels_by_task = load_label_links(connection, task_ids)?;
        rows.into_iter()
            .map(|row| {
                let label_ids = labels_by_task.remove(&row.id).unwrap_or_default();
                row_to_task(row, label_ids)
            })
            .collect()
    }

    fn count_tasks_by_status(&mut self, scope: &Scope) -> StoreResult<Vec<(TaskStatus, u64)>> {
        let connection = &mut *self.connection;
        let rows: Vec<(String, i64)> = match scope.controlled_by() {
            Some(owner) => tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .group_by(tasks::status)
                .select((tasks::status, count_star()))
                .load::<(String, i64)>(connection),
            None => tasks::table
                .group_by(tasks::status)
                .select((tasks::status, count_star()))
                .load::<(String, i64)>(connection),
        }
        .map_err(StoreError::persistence)?;

        rows.into_iter()
            .map(|(status, count)| {
                let parsed =
                    TaskStatus::try_from(status.as_str()).map_err(StoreError::persistence)?;
                let total = u64::try_from(count).map_err(StoreError::persistence)?;
                Ok((parsed, total))
            })
            .collect()
    }

    fn delete_task(&mut self, id: TaskId) -> StoreResult<()> {
        let deleted = diesel::delete(tasks::table.find(id.into_inner()))
            .execute(self.connection)
            .map_err(StoreError::persistence)?;
        ensure_affected(deleted, EntityKind::Task, id)
    }
}

impl CommentRecords for PgUnitOfWork<'_> {
    fn insert_comment(&mut self, comment: &Comment) -> StoreResult<()> {
        diesel::insert_into(comments::table)
            .values(&comment_to_row(comment))
            .execute(self.connection)
            .map_err(|err| {
                classify_write_error(err, EntityKind::Comment, comment.id().into_inner(), None)
            })?;
        Ok(())
    }

    fn update_comment(&mut self, comment: &Comment) -> StoreResult<()> {
        let updated = diesel::update(comments::table.find(comment.id().into_inner()))
            .set((
                comments::task_id.eq(comment.task_id().into_inner()),
                comments::content.eq(comment.content().as_str()),
            ))
            .execute(self.connection)
            .map_err(StoreError::persistence)?;
        ensure_affected(updated, EntityKind::Comment, comment.id())
    }

    fn find_comment(&mut self, id: CommentId) -> StoreResult<Option<Comment>> {
        let row = comments::table
            .find(id.into_inner())
            .select(CommentRow::as_select())
            .first::<CommentRow>(self.connection)
            .optional()
            .map_err(StoreError::persistence)?;
        row.map(row_to_comment).transpose()
    }

    fn list_comments(&mut self, scope: &Scope) -> StoreResult<Vec<Comment>> {
        let mut query = comments::table
            .select(CommentRow::as_select())
            .order((comments::created_at.asc(), comments::id.asc()))
            .into_boxed();
        if let Some(author) = scope.controlled_by() {
            query = query.filter(comments::author_id.eq(author.into_inner()));
        }
        query
            .load::<CommentRow>(self.connection)
            .map_err(StoreError::persistence)?
            .into_iter()
            .map(row_to_comment)
            .collect()
    }

    fn delete_comment(&mut self, id: CommentId) -> StoreResult<()> {
        let deleted = diesel::delete(comments::table.find(id.into_inner()))
            .execute(self.connection)
            .map_err(StoreError::persistence)?;
        ensure_affected(deleted, EntityKind::Comment, id)
    }
}

fn ensure_affected(rows: usize, kind: EntityKind, id: impl AsRef<Uuid>) -> StoreResult<()> {
    if rows == 0 {
        return Err(StoreError::not_found(kind, id));
    }
    Ok(())
}

fn duplicate_name(kind: EntityKind, name: &str) -> StoreError {
    StoreError::DuplicateName {
        kind,
        name: name.to_owned(),
    }
}

fn classify_write_error(
    err: DieselError,
    kind: EntityKind,
    id: Uuid,
    name: Option<&str>,
) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let violates_owner_name = info
                .constraint_name()
                .is_some_and(|constraint| OWNER_NAME_CONSTRAINTS.contains(&constraint));
            match name {
                Some(taken) if violates_owner_name => duplicate_name(kind, taken),
                _ => StoreError::DuplicateId { kind, id },
            }
        }
        other => StoreError::persistence(other),
    }
}

fn project_name_taken(connection: &mut PgConnection, project: &Project) -> StoreResult<bool> {
    diesel::select(exists(
        projects::table
            .filter(projects::owner_id.eq(project.owner_id().into_inner()))
            .filter(projects::name.eq(project.name().as_str()))
            .filter(projects::id.ne(project.id().into_inner())),
    ))
    .get_result::<bool>(connection)
    .map_err(StoreError::persistence)
}

fn label_name_taken(connection: &mut PgConnection, label: &Label) -> StoreResult<bool> {
    diesel::select(exists(
        labels::table
            .filter(labels::owner_id.eq(label.owner_id().into_inner()))
            .filter(labels::name.eq(label.name().as_str()))
            .filter(labels::id.ne(label.id().into_inner())),
    ))
    .get_result::<bool>(connection)
    .map_err(StoreError::persistence)
}

fn insert_task_labels(connection: &mut PgConnection, task: &Task) -> StoreResult<()> {
    let rows: Vec<TaskLabelRow> = task
        .label_ids()
        .iter()
        .map(|label_id| TaskLabelRow {
            task_id: task.id().into_inner(),
            label_id: label_id.into_inner(),
        })
        .collect();
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(task_labels::table)
        .values(&rows)
        .execute(connection)
        .map_err(StoreError::persistence)?;
    Ok(())
}

fn load_label_links(
    connection: &mut PgConnection,
    task_ids: Vec<Uuid>,
) -> StoreResult<HashMap<Uuid, BTreeSet<LabelId>>> {
    if task_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let links = task_labels::table
        .filter(task_labels::task_id.eq_any(task_ids))
        .select(TaskLabelRow::as_select())
        .load::<TaskLabelRow>(connection)
        .map_err(StoreError::persistence)?;
    let mut grouped: HashMap<Uuid, BTreeSet<LabelId>> = HashMap::new();
    for link in links {
        grouped
            .entry(link.task_id)
            .or_default()
            .insert(LabelId::from_uuid(link.label_id));
    }
    Ok(grouped)
}

fn project_to_row(project: &Project) -> ProjectRow {
    ProjectRow {
        id: project.id().into_inner(),
        owner_id: project.owner_id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().to_owned(),
        created_at: project.created_at(),
    }
}

fn row_to_project(row: ProjectRow) -> StoreResult<Project> {
    let name = ProjectName::new(row.name).map_err(StoreError::persistence)?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        name,
        description: row.description,
        created_at: row.created_at,
    }))
}

fn label_to_row(label: &Label) -> LabelRow {
    LabelRow {
        id: label.id().into_inner(),
        owner_id: label.owner_id().into_inner(),
        name: label.name().as_str().to_owned(),
        created_at: label.created_at(),
    }
}

fn row_to_label(row: LabelRow) -> StoreResult<Label> {
    let name = LabelName::new(row.name).map_err(StoreError::persistence)?;
    Ok(Label::from_persisted(
        LabelId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        name,
        row.created_at,
    ))
}

fn task_to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner_id().into_inner(),
        project_id: task.project_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        completed_at: task.completed_at(),
    }
}

fn task_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        project_id: task.project_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
    }
}

fn row_to_task(row: TaskRow, label_ids: BTreeSet<LabelId>) -> StoreResult<Task> {
    let TaskRow {
        id,
        owner_id,
        project_id,
        title,
        description,
        status,
        priority,
        due_date,
        created_at,
        completed_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner_id: UserId::from_uuid(owner_id),
        project_id: ProjectId::from_uuid(project_id),
        title: TaskTitle::new(title).map_err(StoreError::persistence)?,
        description,
        status: TaskStatus::try_from(status.as_str()).map_err(StoreError::persistence)?,
        priority: TaskPriority::try_from(priority.as_str()).map_err(StoreError::persistence)?,
        due_date,
        label_ids,
        created_at,
        completed_at,
    };
    Ok(Task::from_persisted(data))
}

fn comment_to_row(comment: &Comment) -> CommentRow {
    CommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task_id().into_inner(),
        author_id: comment.author_id().into_inner(),
        content: comment.content().as_str().to_owned(),
        created_at: comment.created_at(),
    }
}

fn row_to_comment(row: CommentRow) -> StoreResult<Comment> {
    let content = CommentContent::new(row.content).map_err(StoreError::persistence)?;
    Ok(Comment::from_persisted(
        CommentId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        UserId::from_uuid(row.author_id),
        content,
        row.created_at,
    ))
}
