//! Scope resolution for bulk listings.
//!
//! A [`Scope`] is the row predicate applied to a listing before anything is
//! returned. Adapters translate it into their own query language; the
//! in-memory adapter evaluates [`Scope::admits`] directly.

use super::{Actor, EntityKind, Owned, UserId};

/// Predicate restricting a listing to the rows an actor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    kind: EntityKind,
    controlled_by: Option<UserId>,
}

impl Scope {
    /// Resolves the scope of `kind` entities visible to `actor`.
    ///
    /// Administrators receive an unrestricted scope. Everyone else sees the
    /// rows whose owner (or, for comments, author) is themselves.
    #[must_use]
    pub const fn resolve(actor: Actor, kind: EntityKind) -> Self {
        if actor.is_admin() {
            return Self::unrestricted(kind);
        }
        Self {
            kind,
            controlled_by: Some(actor.id()),
        }
    }

    /// Resolves the scope for entity type `E`.
    #[must_use]
    pub const fn of<E: Owned>(actor: Actor) -> Self {
        Self::resolve(actor, E::KIND)
    }

    /// Returns a scope matching every row of `kind`.
    #[must_use]
    pub(crate) const fn unrestricted(kind: EntityKind) -> Self {
        Self {
            kind,
            controlled_by: None,
        }
    }

    /// Returns the entity kind the scope applies to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the controlling user rows must match, or `None` when the
    /// scope is unrestricted.
    #[must_use]
    pub const fn controlled_by(&self) -> Option<UserId> {
        self.controlled_by
    }

    /// Returns `true` when the scope matches every row.
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn is_unrestricted(&self) -> bool {
        self.controlled_by.is_none()
    }

    /// Returns `true` when `entity` falls inside the scope.
    #[must_use]
    pub fn admits<E: Owned>(&self, entity: &E) -> bool {
        if E::KIND != self.kind {
            return false;
        }
        self.controlled_by
            .is_none_or(|user| entity.controller().user_id() == user)
    }
}
