//! Reference validation for writes that attach other entities.
//!
//! Unlike [`can_access`](super::can_access), these checks have no
//! administrator bypass: a reference is accepted only when the referenced
//! entity is owned by the acting user, whoever that user is.

use super::{Actor, EntityKind, Label, Project, Task, TrackerDomainError, UserId};
use uuid::Uuid;

fn ensure_owned_by(
    actor: Actor,
    owner_id: UserId,
    kind: EntityKind,
    id: Uuid,
) -> Result<(), TrackerDomainError> {
    if owner_id == actor.id() {
        Ok(())
    } else {
        Err(TrackerDomainError::ForeignOwnership { kind, id })
    }
}

/// Checks that the project a task points at belongs to `actor`.
///
/// # Errors
///
/// Returns [`TrackerDomainError::ForeignOwnership`] when it does not.
pub fn validate_project_ref(actor: Actor, project: &Project) -> Result<(), TrackerDomainError> {
    ensure_owned_by(
        actor,
        project.owner_id(),
        EntityKind::Project,
        project.id().into_inner(),
    )
}

/// Checks that every label in `labels` belongs to `actor`.
///
/// Labels are checked in iteration order and the first foreign label is
/// reported.
///
/// # Errors
///
/// Returns [`TrackerDomainError::ForeignOwnership`] naming the first label
/// owned by someone else.
pub fn validate_label_refs<'a>(
    actor: Actor,
    labels: impl IntoIterator<Item = &'a Label>,
) -> Result<(), TrackerDomainError> {
    labels.into_iter().try_for_each(|label| {
        ensure_owned_by(
            actor,
            label.owner_id(),
            EntityKind::Label,
            label.id().into_inner(),
        )
    })
}

/// Checks that the task a comment is attached to belongs to `actor`.
///
/// # Errors
///
/// Returns [`TrackerDomainError::ForeignOwnership`] when it does not.
pub fn validate_task_ref(actor: Actor, task: &Task) -> Result<(), TrackerDomainError> {
    ensure_owned_by(
        actor,
        task.owner_id(),
        EntityKind::Task,
        task.id().into_inner(),
    )
}
