//! Project operations.

use super::{TrackerResult, TrackerService, tracker::authorize};
use crate::tracker::{
    domain::{AccessMode, Actor, Project, ProjectId, ProjectName, Scope},
    ports::{ProjectRecords, TrackerStore},
};
use mockable::Clock;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
}

impl CreateProjectRequest {
    /// Creates a request with an empty description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial project update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<String>,
}

impl UpdateProjectRequest {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the project.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a project owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::InvalidArgument`] for an invalid name
    /// and [`super::TrackerError::AlreadyExists`] when the actor already owns
    /// a project with that name.
    pub async fn create_project(
        &self,
        actor: Actor,
        request: CreateProjectRequest,
    ) -> TrackerResult<Project> {
        let name = ProjectName::new(request.name)?;
        let project = Project::new(actor.id(), name, request.description, &*self.clock);
        let stored = project.clone();
        self.store
            .transaction(move |uow| -> TrackerResult<()> {
                uow.insert_project(&stored)?;
                Ok(())
            })
            .await?;
        tracing::info!(actor = %actor.id(), project = %project.id(), "project created");
        Ok(project)
    }

    /// Retrieves a project visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the project is missing
    /// or not visible to the actor.
    pub async fn get_project(&self, actor: Actor, id: ProjectId) -> TrackerResult<Project> {
        self.store
            .transaction(move |uow| -> TrackerResult<Project> {
                authorize(actor, uow.find_project(id)?, id, AccessMode::Read)
            })
            .await
    }

    /// Lists the projects visible to `actor`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Internal`] when the store fails.
    pub async fn list_projects(&self, actor: Actor) -> TrackerResult<Vec<Project>> {
        let scope = Scope::of::<Project>(actor);
        let projects = self
            .store
            .transaction(move |uow| -> TrackerResult<Vec<Project>> {
                Ok(uow.list_projects(&scope)?)
            })
            .await?;
        tracing::debug!(actor = %actor.id(), count = projects.len(), "projects listed");
        Ok(projects)
    }

    /// Applies a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the project is not
    /// visible, [`super::TrackerError::InvalidArgument`] for an invalid name
    /// and [`super::TrackerError::AlreadyExists`] when the new name collides.
    pub async fn update_project(
        &self,
        actor: Actor,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> TrackerResult<Project> {
        let name = request.name.map(ProjectName::new).transpose()?;
        let description = request.description;
        let project = self
            .store
            .transaction(move |uow| -> TrackerResult<Project> {
                let mut project = authorize(actor, uow.find_project(id)?, id, AccessMode::Write)?;
                if let Some(value) = name {
                    project.rename(value);
                }
                if let Some(value) = description {
                    project.set_description(value);
                }
                uow.update_project(&project)?;
                Ok(project)
            })
            .await?;
        tracing::info!(actor = %actor.id(), project = %id, "project updated");
        Ok(project)
    }

    /// Deletes a project together with its tasks and their comments.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the project is not
    /// visible to the actor.
    pub async fn delete_project(&self, actor: Actor, id: ProjectId) -> TrackerResult<()> {
        self.store
            .transaction(move |uow| -> TrackerResult<()> {
                authorize(actor, uow.find_project(id)?, id, AccessMode::Write)?;
                uow.delete_project(id)?;
                Ok(())
            })
            .await?;
        tracing::info!(actor = %actor.id(), project = %id, "project deleted");
        Ok(())
    }
}
