//! Comment operations.

use super::{
    TrackerResult, TrackerService,
    tracker::{authorize, resolve_task_ref},
};
use crate::tracker::{
    domain::{AccessMode, Actor, Comment, CommentContent, CommentId, Scope, TaskId},
    ports::{CommentRecords, TrackerStore},
};
use mockable::Clock;
use std::sync::Arc;

/// Partial comment update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCommentRequest {
    content: Option<String>,
    task_id: Option<TaskId>,
}

impl UpdateCommentRequest {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the comment body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Moves the comment to another task.
    #[must_use]
    pub const fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }
}

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync + 'static,
{
    /// Adds a comment by `actor` to a task the actor owns.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::InvalidArgument`] for blank content,
    /// [`super::TrackerError::NotFound`] for a missing task and
    /// [`super::TrackerError::ForeignOwnership`] for a task owned by another
    /// user.
    pub async fn create_comment(
        &self,
        actor: Actor,
        task_id: TaskId,
        body: impl Into<String>,
    ) -> TrackerResult<Comment> {
        let content = CommentContent::new(body)?;
        let clock = Arc::clone(&self.clock);
        let comment = self
            .store
            .transaction(move |uow| -> TrackerResult<Comment> {
                resolve_task_ref(uow, actor, task_id)?;
                let comment = Comment::new(task_id, actor.id(), content, &*clock);
                uow.insert_comment(&comment)?;
                Ok(comment)
            })
            .await?;
        tracing::info!(
            actor = %actor.id(),
            comment = %comment.id(),
            task = %task_id,
            "comment created"
        );
        Ok(comment)
    }

    /// Retrieves a comment visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the comment is missing
    /// or not visible to the actor.
    pub async fn get_comment(&self, actor: Actor, id: CommentId) -> TrackerResult<Comment> {
        self.store
            .transaction(move |uow| -> TrackerResult<Comment> {
                authorize(actor, uow.find_comment(id)?, id, AccessMode::Read)
            })
            .await
    }

    /// Lists the comments authored by `actor`, oldest first. Admins see
    /// every comment.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Internal`] when the store fails.
    pub async fn list_comments(&self, actor: Actor) -> TrackerResult<Vec<Comment>> {
        let scope = Scope::of::<Comment>(actor);
        self.store
            .transaction(move |uow| -> TrackerResult<Vec<Comment>> {
                Ok(uow.list_comments(&scope)?)
            })
            .await
    }

    /// Edits a comment or moves it to another task.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the comment or the new
    /// task is missing and [`super::TrackerError::ForeignOwnership`] when the
    /// new task belongs to another user.
    pub async fn update_comment(
        &self,
        actor: Actor,
        id: CommentId,
        request: UpdateCommentRequest,
    ) -> TrackerResult<Comment> {
        let content = request.content.map(CommentContent::new).transpose()?;
        let task_id = request.task_id;
        let comment = self
            .store
            .transaction(move |uow| -> TrackerResult<Comment> {
                let mut comment = authorize(actor, uow.find_comment(id)?, id, AccessMode::Write)?;
                if let Some(target) = task_id {
                    resolve_task_ref(uow, actor, target)?;
                    comment.move_to(target);
                }
                if let Some(value) = content {
                    comment.edit(value);
                }
                uow.update_comment(&comment)?;
                Ok(comment)
            })
            .await?;
        tracing::info!(actor = %actor.id(), comment = %id, "comment updated");
        Ok(comment)
    }

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when the comment is not
    /// visible to the actor.
    pub async fn delete_comment(&self, actor: Actor, id: CommentId) -> TrackerResult<()> {
        self.store
            .transaction(move |uow| -> TrackerResult<()> {
                authorize(actor, uow.find_comment(id)?, id, AccessMode::Write)?;
                uow.delete_comment(id)?;
                Ok(())
            })
            .await?;
        tracing::info!(actor = %actor.id(), comment = %id, "comment deleted");
        Ok(())
    }
}
