//! Label operations.

use super::{TrackerResult, TrackerService, tracker::authorize};
use crate::tracker::{
    domain::{AccessMode, Actor, Label, LabelId, LabelName, Scope},
    ports::{LabelRecords, TrackerStore},
};
use mockable::Clock;

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a label owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::InvalidArgument`] for an invalid name
    /// and [`super::TrackerError::AlreadyExists`] when the actor already owns
    /// a label with that name.
    pub async fn create_label(&self, actor: Actor, name: impl Into<String>) -> TrackerResult<Label> {
        let label = Label::new(actor.id(), LabelName::new(name)?, &*self.clock);
        let stored = label.clone();
        self.store
            .transaction(move |uow| -> TrackerResult<()> {
                uow.insert_label(&stored)?;
                Ok(())
            })
            .await?;
        tracing::info!(actor = %actor.id(), label = %label.id(), "label created");
        Ok(label)
    }

    /// Retrieves a label visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the label is missing or
    /// not visible to the actor.
    pub async fn get_label(&self, actor: Actor, id: LabelId) -> TrackerResult<Label> {
        self.store
            .transaction(move |uow| -> TrackerResult<Label> {
                authorize(actor, uow.find_label(id)?, id, AccessMode::Read)
            })
            .await
    }

    /// Lists the labels visible to `actor`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Internal`] when the store fails.
    pub async fn list_labels(&self, actor: Actor) -> TrackerResult<Vec<Label>> {
        let scope = Scope::of::<Label>(actor);
        self.store
            .transaction(move |uow| -> TrackerResult<Vec<Label>> { Ok(uow.list_labels(&scope)?) })
            .await
    }

    /// Renames a label.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the label is not
    /// visible, [`super::TrackerError::InvalidArgument`] for an invalid name
    /// and [`super::TrackerError::AlreadyExists`] when the name collides.
    pub async fn update_label(
        &self,
        actor: Actor,
        id: LabelId,
        new_name: impl Into<String>,
    ) -> TrackerResult<Label> {
        let name = LabelName::new(new_name)?;
        let label = self
            .store
            .transaction(move |uow| -> TrackerResult<Label> {
                let mut label = authorize(actor, uow.find_label(id)?, id, AccessMode::Write)?;
                label.rename(name);
                uow.update_label(&label)?;
                Ok(label)
            })
            .await?;
        tracing::info!(actor = %actor.id(), label = %id, "label updated");
        Ok(label)
    }

    /// Deletes a label and detaches it from every task. The tasks remain.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the label is not
    /// visible to the actor.
    pub async fn delete_label(&self, actor: Actor, id: LabelId) -> TrackerResult<()> {
        self.store
            .transaction(move |uow| -> TrackerResult<()> {
                authorize(actor, uow.find_label(id)?, id, AccessMode::Write)?;
                uow.delete_label(id)?;
                Ok(())
            })
            .await?;
        tracing::info!(actor = %actor.id(), label = %id, "label deleted");
        Ok(())
    }
}
