//! Comment entity.

use super::{
    CommentContent, CommentId, Controller, EntityKind, Owned, TaskId, UserId, timestamp_now,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A note left by the task owner on one of their tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    id: CommentId,
    task_id: TaskId,
    author_id: UserId,
    content: CommentContent,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment authored by `author_id`.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        author_id: UserId,
        content: CommentContent,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: CommentId::new(),
            task_id,
            author_id,
            content,
            created_at: timestamp_now(clock),
        }
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: CommentId,
        task_id: TaskId,
        author_id: UserId,
        content: CommentContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            author_id,
            content,
            created_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the task the comment belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the authoring user.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the comment body.
    #[must_use]
    pub const fn content(&self) -> &CommentContent {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the comment body.
    pub fn edit(&mut self, content: CommentContent) {
        self.content = content;
    }

    /// Moves the comment to another task.
    pub const fn move_to(&mut self, task_id: TaskId) {
        self.task_id = task_id;
    }
}

impl Owned for Comment {
    const KIND: EntityKind = EntityKind::Comment;

    fn controller(&self) -> Controller {
        Controller::Author(self.author_id)
    }
}
