//! Ownership policy for single-object access.
//!
//! Every tracker entity names exactly one controlling identity: projects,
//! labels and tasks through their owner, comments through their author.
//! The policy compares that identity with the acting user; administrators
//! bypass the comparison entirely.

use super::{Actor, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of entity managed by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A project.
    Project,
    /// A label.
    Label,
    /// A task.
    Task,
    /// A comment on a task.
    Comment,
}

impl EntityKind {
    /// Returns the lowercase entity name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Label => "label",
            Self::Task => "task",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity that controls access to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Controller {
    /// The entity is controlled by its owner.
    Owner(UserId),
    /// The entity is controlled by its author.
    Author(UserId),
}

impl Controller {
    /// Returns the controlling user regardless of relationship.
    #[must_use]
    pub const fn user_id(self) -> UserId {
        match self {
            Self::Owner(id) | Self::Author(id) => id,
        }
    }
}

/// Operation mode checked by [`can_access`].
///
/// Both modes are governed by the same predicate today; callers still state
/// their intent so that the two can diverge without touching call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Reading the entity.
    Read,
    /// Updating or deleting the entity.
    Write,
}

/// Entities subject to ownership checks.
pub trait Owned {
    /// Kind of entity implementing the trait.
    const KIND: EntityKind;

    /// Returns the identity controlling access to this entity.
    fn controller(&self) -> Controller;
}

/// Decides whether `actor` may access `entity` in the given mode.
///
/// # Examples
///
/// ```
/// use mockable::DefaultClock;
/// use taskflow::tracker::domain::{
///     AccessMode, Actor, Label, LabelName, UserId, can_access,
/// };
///
/// let owner = UserId::new();
/// let label = Label::new(owner, LabelName::new("urgent").expect("valid name"), &DefaultClock);
///
/// assert!(can_access(Actor::user(owner), &label, AccessMode::Write));
/// assert!(!can_access(Actor::user(UserId::new()), &label, AccessMode::Read));
/// assert!(can_access(Actor::admin(UserId::new()), &label, AccessMode::Write));
/// ```
#[must_use]
pub fn can_access<E: Owned>(actor: Actor, entity: &E, mode: AccessMode) -> bool {
    match mode {
        AccessMode::Read | AccessMode::Write => {
            actor.is_admin() || entity.controller().user_id() == actor.id()
        }
    }
}
