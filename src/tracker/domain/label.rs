//! Label aggregate.

use super::{Controller, EntityKind, LabelId, LabelName, Owned, UserId, timestamp_now};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A tag a user attaches to their own tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    id: LabelId,
    owner_id: UserId,
    name: LabelName,
    created_at: DateTime<Utc>,
}

impl Label {
    /// Creates a new label owned by `owner_id`.
    #[must_use]
    pub fn new(owner_id: UserId, name: LabelName, clock: &impl Clock) -> Self {
        Self {
            id: LabelId::new(),
            owner_id,
            name,
            created_at: timestamp_now(clock),
        }
    }

    /// Reconstructs a label from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: LabelId,
        owner_id: UserId,
        name: LabelName,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            created_at,
        }
    }

    /// Returns the label identifier.
    #[must_use]
    pub const fn id(&self) -> LabelId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the label name.
    #[must_use]
    pub const fn name(&self) -> &LabelName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the label name.
    pub fn rename(&mut self, name: LabelName) {
        self.name = name;
    }
}

impl Owned for Label {
    const KIND: EntityKind = EntityKind::Label;

    fn controller(&self) -> Controller {
        Controller::Owner(self.owner_id)
    }
}
