//! The authenticated principal on whose behalf an operation runs.

use super::UserId;
use serde::{Deserialize, Serialize};

/// Authenticated principal issuing a request.
///
/// Identity is established upstream; the tracker only reads the user
/// identifier and the administrator flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    is_admin: bool,
}

impl Actor {
    /// Creates a regular, non-administrative actor.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }

    /// Creates an administrative actor.
    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self { id, is_admin: true }
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(self) -> UserId {
        self.id
    }

    /// Returns `true` when the actor has administrative rights.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        self.is_admin
    }
}
