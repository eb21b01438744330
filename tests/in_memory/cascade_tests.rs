//! Deletion cascades across projects, tasks, comments and labels.

use super::helpers::{TestService, alice, seed_label, seed_project, seed_task, service};
use rstest::rstest;
use taskflow::tracker::{
    domain::Actor,
    services::{CreateTaskRequest, ErrorKind, TrackerError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_project_removes_tasks_and_comments(
    service: TestService,
    alice: Actor,
) -> eyre::Result<()> {
    let doomed = seed_project(&service, alice, "Doomed").await?;
    let kept = seed_project(&service, alice, "Kept").await?;
    let doomed_task = seed_task(&service, alice, doomed, "Goes away", "todo").await?;
    let kept_task = seed_task(&service, alice, kept, "Stays", "todo").await?;
    let doomed_comment = service.create_comment(alice, doomed_task.id(), "bye").await?;
    service.create_comment(alice, kept_task.id(), "hi").await?;

    service.delete_project(alice, doomed).await?;

    let task_lookup = service.get_task(alice, doomed_task.id()).await;
    let comment_lookup = service.get_comment(alice, doomed_comment.id()).await;
    eyre::ensure!(
        task_lookup.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "task should cascade, got {task_lookup:?}"
    );
    eyre::ensure!(
        comment_lookup.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "comment should cascade, got {comment_lookup:?}"
    );
    eyre::ensure!(service.list_tasks(alice).await?.len() == 1, "other task kept");
    eyre::ensure!(service.list_comments(alice).await?.len() == 1, "other comment kept");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_task_removes_its_comments(service: TestService, alice: Actor) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Home").await?;
    let task = seed_task(&service, alice, project, "Paint", "todo").await?;
    service.create_comment(alice, task.id(), "white?").await?;

    service.delete_task(alice, task.id()).await?;

    eyre::ensure!(service.list_comments(alice).await?.is_empty(), "comments cascade");
    eyre::ensure!(service.list_projects(alice).await?.len() == 1, "project survives");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_label_detaches_it_from_tasks(
    service: TestService,
    alice: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Home").await?;
    let doomed = seed_label(&service, alice, "doomed").await?;
    let kept = seed_label(&service, alice, "kept").await?;
    let task = service
        .create_task(
            alice,
            CreateTaskRequest::new(project, "Paint").with_labels([doomed, kept]),
        )
        .await?;

    service.delete_label(alice, doomed).await?;

    let reloaded = service.get_task(alice, task.id()).await?;
    eyre::ensure!(!reloaded.label_ids().contains(&doomed), "label detached");
    eyre::ensure!(reloaded.label_ids().contains(&kept), "other label kept");
    eyre::ensure!(reloaded.title() == task.title(), "task otherwise intact");
    Ok(())
}
