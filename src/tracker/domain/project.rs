//! Project aggregate.

use super::{Controller, EntityKind, Owned, ProjectId, ProjectName, UserId, timestamp_now};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A named container of tasks owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: ProjectId,
    owner_id: UserId,
    name: ProjectName,
    description: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted owner.
    pub owner_id: UserId,
    /// Persisted name.
    pub name: ProjectName,
    /// Persisted description.
    pub description: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `owner_id`.
    #[must_use]
    pub fn new(
        owner_id: UserId,
        name: ProjectName,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            owner_id,
            name,
            description: description.into(),
            created_at: timestamp_now(clock),
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the free-form description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the project name.
    pub fn rename(&mut self, name: ProjectName) {
        self.name = name;
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

impl Owned for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn controller(&self) -> Controller {
        Controller::Owner(self.owner_id)
    }
}
