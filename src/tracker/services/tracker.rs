//! The tracker service and the access helpers its operations share.

use crate::tracker::{
    domain::{
        AccessMode, Actor, EntityKind, LabelId, Owned, Project, ProjectId, Scope, Task, TaskId,
        TrackerDomainError, can_access, validate_label_refs, validate_project_ref,
        validate_task_ref,
    },
    ports::{LabelRecords, ProjectRecords, TaskRecords, TrackerStore, UnitOfWork},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use super::{TrackerError, TrackerResult};

/// Tracker orchestration service.
///
/// Every operation takes the acting [`Actor`] explicitly and runs inside a
/// single store transaction. Listings are filtered by [`Scope`];
/// operations on one entity additionally pass the ownership policy.
pub struct TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    pub(super) store: Arc<S>,
    pub(super) clock: Arc<C>,
}

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new tracker service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }
}

impl<S, C> Clone for TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

/// Resolves a single entity for `actor`.
///
/// Missing entities and entities outside the actor's scope both yield
/// [`TrackerError::NotFound`]; a visible entity the policy refuses yields
/// [`TrackerError::Forbidden`].
pub(super) fn authorize<E: Owned>(
    actor: Actor,
    found: Option<E>,
    id: impl AsRef<Uuid>,
    mode: AccessMode,
) -> TrackerResult<E> {
    let Some(entity) = found.filter(|entity| Scope::of::<E>(actor).admits(entity)) else {
        return Err(TrackerError::not_found(E::KIND, id));
    };
    if !can_access(actor, &entity, mode) {
        return Err(TrackerError::Forbidden {
            kind: E::KIND,
            id: *id.as_ref(),
        });
    }
    Ok(entity)
}

fn require<E>(found: Option<E>, kind: EntityKind, id: impl AsRef<Uuid>) -> TrackerResult<E> {
    found.ok_or_else(|| TrackerError::not_found(kind, id))
}

fn check_reference(actor: Actor, outcome: Result<(), TrackerDomainError>) -> TrackerResult<()> {
    outcome.map_err(|err| {
        tracing::warn!(actor = %actor.id(), error = %err, "reference rejected");
        TrackerError::from(err)
    })
}

/// Loads the project a task will point at and checks the actor owns it.
pub(super) fn resolve_project_ref(
    uow: &mut dyn UnitOfWork,
    actor: Actor,
    id: ProjectId,
) -> TrackerResult<Project> {
    let project = require(uow.find_project(id)?, EntityKind::Project, id)?;
    check_reference(actor, validate_project_ref(actor, &project))?;
    Ok(project)
}

/// Loads every label in `ids` and checks the actor owns all of them.
pub(super) fn resolve_label_refs(
    uow: &mut dyn UnitOfWork,
    actor: Actor,
    ids: &BTreeSet<LabelId>,
) -> TrackerResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let requested: Vec<LabelId> = ids.iter().copied().collect();
    let found = uow.find_labels(&requested)?;
    if let Some(missing) = requested
        .iter()
        .find(|id| !found.iter().any(|label| label.id() == **id))
    {
        return Err(TrackerError::not_found(EntityKind::Label, *missing));
    }
    check_reference(actor, validate_label_refs(actor, &found))
}

/// Loads the task a comment will point at and checks the actor owns it.
pub(super) fn resolve_task_ref(
    uow: &mut dyn UnitOfWork,
    actor: Actor,
    id: TaskId,
) -> TrackerResult<Task> {
    let task = require(uow.find_task(id)?, EntityKind::Task, id)?;
    check_reference(actor, validate_task_ref(actor, &task))?;
    Ok(task)
}
