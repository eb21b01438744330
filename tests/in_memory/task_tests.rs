//! Task operations and reference validation against the in-memory store.

use super::helpers::{
    TestService, admin, alice, bob, seed_label, seed_project, seed_task, service,
};
use chrono::NaiveDate;
use rstest::rstest;
use taskflow::tracker::{
    domain::{Actor, EntityKind, TaskPriority, TaskStatus},
    services::{CreateTaskRequest, ErrorKind, TrackerError, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_stores_every_field(service: TestService, alice: Actor) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Launch").await?;
    let label = seed_label(&service, alice, "marketing").await?;
    let due = NaiveDate::from_ymd_opt(2026, 11, 30).ok_or_else(|| eyre::eyre!("bad date"))?;

    let created = service
        .create_task(
            alice,
            CreateTaskRequest::new(project, "Write press release")
                .with_description("Two paragraphs")
                .with_status("Doing")
                .with_priority("HIGH")
                .with_due_date(due)
                .with_labels([label]),
        )
        .await?;
    let fetched = service.get_task(alice, created.id()).await?;

    eyre::ensure!(fetched == created, "fetched task should match");
    eyre::ensure!(fetched.status() == TaskStatus::Doing, "status parsed");
    eyre::ensure!(fetched.priority() == TaskPriority::High, "priority parsed");
    eyre::ensure!(fetched.due_date() == Some(due), "due date kept");
    eyre::ensure!(fetched.label_ids().contains(&label), "label attached");
    eyre::ensure!(fetched.description() == "Two paragraphs", "description kept");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_in_foreign_project_is_rejected(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let bobs_project = seed_project(&service, bob, "Office").await?;

    let result = service
        .create_task(alice, CreateTaskRequest::new(bobs_project, "Sneak in"))
        .await;

    let Err(TrackerError::ForeignOwnership { kind, id }) = result else {
        eyre::bail!("expected ForeignOwnership, got {result:?}");
    };
    eyre::ensure!(kind == EntityKind::Project, "project should be reported");
    eyre::ensure!(id == bobs_project.into_inner(), "foreign project id reported");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_cannot_file_task_into_foreign_project(
    service: TestService,
    admin: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let bobs_project = seed_project(&service, bob, "Office").await?;

    let result = service
        .create_task(admin, CreateTaskRequest::new(bobs_project, "Audit"))
        .await;

    eyre::ensure!(
        result.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::ForeignOwnership),
        "expected ForeignOwnership for admin, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_label_rejects_the_whole_write(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Launch").await?;
    let mine = seed_label(&service, alice, "mine").await?;
    let theirs = seed_label(&service, bob, "theirs").await?;

    let result = service
        .create_task(
            alice,
            CreateTaskRequest::new(project, "Mixed labels").with_labels([mine, theirs]),
        )
        .await;

    let Err(TrackerError::ForeignOwnership { kind, id }) = result else {
        eyre::bail!("expected ForeignOwnership, got {result:?}");
    };
    eyre::ensure!(kind == EntityKind::Label, "label should be reported");
    eyre::ensure!(id == theirs.into_inner(), "foreign label id reported");
    eyre::ensure!(service.list_tasks(alice).await?.is_empty(), "nothing stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_project_is_not_found(service: TestService, alice: Actor) {
    let result = service
        .create_task(
            alice,
            CreateTaskRequest::new(taskflow::tracker::domain::ProjectId::new(), "Orphan"),
        )
        .await;

    assert!(matches!(
        result,
        Err(TrackerError::NotFound {
            kind: EntityKind::Project,
            ..
        })
    ));
}

#[rstest]
#[case::status("status", "archived")]
#[case::priority("priority", "critical")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_enum_values_are_invalid(
    service: TestService,
    alice: Actor,
    #[case] field: &str,
    #[case] raw: &str,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Launch").await?;
    let base = CreateTaskRequest::new(project, "Bad enum");
    let request = if field == "status" {
        base.with_status(raw)
    } else {
        base.with_priority(raw)
    };

    let result = service.create_task(alice, request).await;

    eyre::ensure!(
        result.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::InvalidArgument),
        "expected InvalidArgument, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_partial_fields(service: TestService, alice: Actor) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Launch").await?;
    let task = seed_task(&service, alice, project, "Draft copy", "todo").await?;

    let updated = service
        .update_task(
            alice,
            task.id(),
            UpdateTaskRequest::new()
                .with_title("Final copy")
                .with_priority("low"),
        )
        .await?;

    eyre::ensure!(updated.title().as_str() == "Final copy", "title changed");
    eyre::ensure!(updated.priority() == TaskPriority::Low, "priority changed");
    eyre::ensure!(updated.status() == TaskStatus::Todo, "status untouched");
    eyre::ensure!(updated.created_at() == task.created_at(), "created_at untouched");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stranger_cannot_update_or_delete_task(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Launch").await?;
    let task = seed_task(&service, alice, project, "Draft copy", "todo").await?;

    let update = service
        .update_task(bob, task.id(), UpdateTaskRequest::new().with_status("done"))
        .await;
    let delete = service.delete_task(bob, task.id()).await;

    eyre::ensure!(
        update.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "update should be NotFound, got {update:?}"
    );
    eyre::ensure!(
        delete.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "delete should be NotFound, got {delete:?}"
    );
    let untouched = service.get_task(alice, task.id()).await?;
    eyre::ensure!(untouched.status() == TaskStatus::Todo, "task unchanged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_can_update_any_task_but_not_relink_it(
    service: TestService,
    alice: Actor,
    admin: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Launch").await?;
    let other = seed_project(&service, alice, "Other").await?;
    let task = seed_task(&service, alice, project, "Draft copy", "todo").await?;

    let updated = service
        .update_task(admin, task.id(), UpdateTaskRequest::new().with_status("doing"))
        .await?;
    eyre::ensure!(updated.status() == TaskStatus::Doing, "admin may edit");
    eyre::ensure!(updated.owner_id() == alice.id(), "owner is preserved");

    let relink = service
        .update_task(admin, task.id(), UpdateTaskRequest::new().with_project(other))
        .await;
    eyre::ensure!(
        relink.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::ForeignOwnership),
        "admin relink should be ForeignOwnership, got {relink:?}"
    );
    Ok(())
}
