//! Comment operations against the in-memory store.

use super::helpers::{
    SteppedService, TestService, admin, alice, bob, seed_project, seed_task, service,
    stepped_service,
};
use rstest::rstest;
use taskflow::tracker::{
    domain::{Actor, Comment, EntityKind, TaskId},
    services::{ErrorKind, TrackerError, UpdateCommentRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_on_own_task_is_stored(service: TestService, alice: Actor) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Trip").await?;
    let task = seed_task(&service, alice, project, "Book hotel", "todo").await?;

    let comment = service.create_comment(alice, task.id(), "Near the station").await?;
    let fetched = service.get_comment(alice, comment.id()).await?;

    eyre::ensure!(fetched == comment, "fetched comment should match");
    eyre::ensure!(fetched.author_id() == alice.id(), "actor is the author");
    eyre::ensure!(fetched.task_id() == task.id(), "comment is on the task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_on_foreign_task_is_rejected(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, bob, "Trip").await?;
    let task = seed_task(&service, bob, project, "Book hotel", "todo").await?;

    let result = service.create_comment(alice, task.id(), "Let me help").await;

    eyre::ensure!(
        matches!(
            result,
            Err(TrackerError::ForeignOwnership {
                kind: EntityKind::Task,
                ..
            })
        ),
        "expected ForeignOwnership, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_cannot_comment_on_foreign_task(
    service: TestService,
    admin: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, bob, "Trip").await?;
    let task = seed_task(&service, bob, project, "Book hotel", "todo").await?;

    let result = service.create_comment(admin, task.id(), "Reviewed").await;

    eyre::ensure!(
        result.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::ForeignOwnership),
        "expected ForeignOwnership, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_on_missing_task_is_not_found(service: TestService, alice: Actor) {
    let result = service.create_comment(alice, TaskId::new(), "Hello").await;
    assert_eq!(result.map_err(|err| err.kind()).err(), Some(ErrorKind::NotFound));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_listed_oldest_first(
    stepped_service: SteppedService,
    alice: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&stepped_service, alice, "Trip").await?;
    let task = seed_task(&stepped_service, alice, project, "Book hotel", "todo").await?;
    let first = stepped_service.create_comment(alice, task.id(), "First").await?;
    let second = stepped_service.create_comment(alice, task.id(), "Second").await?;

    let listed: Vec<_> = stepped_service
        .list_comments(alice)
        .await?
        .iter()
        .map(Comment::id)
        .collect();

    eyre::ensure!(listed == [first.id(), second.id()], "unexpected order {listed:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn author_can_edit_and_delete_comment(service: TestService, alice: Actor) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Trip").await?;
    let task = seed_task(&service, alice, project, "Book hotel", "todo").await?;
    let comment = service.create_comment(alice, task.id(), "Draft").await?;

    let edited = service
        .update_comment(alice, comment.id(), UpdateCommentRequest::new().with_content("Final"))
        .await?;
    eyre::ensure!(edited.content().as_str() == "Final", "content replaced");
    eyre::ensure!(edited.created_at() == comment.created_at(), "created_at untouched");

    service.delete_comment(alice, comment.id()).await?;
    eyre::ensure!(service.list_comments(alice).await?.is_empty(), "comment deleted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_scoped_by_author(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Trip").await?;
    let task = seed_task(&service, alice, project, "Book hotel", "todo").await?;
    let comment = service.create_comment(alice, task.id(), "Mine").await?;

    eyre::ensure!(service.list_comments(bob).await?.is_empty(), "bob sees nothing");
    let result = service.get_comment(bob, comment.id()).await;
    eyre::ensure!(
        result.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "expected NotFound, got {result:?}"
    );
    Ok(())
}
