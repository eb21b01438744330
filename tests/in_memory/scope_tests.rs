//! Visibility of listings and single-object lookups.

use super::helpers::{
    TestService, admin, alice, bob, seed_label, seed_project, seed_task, service,
};
use rstest::rstest;
use taskflow::tracker::{
    domain::{Actor, Project},
    services::{ErrorKind, TrackerError},
};

/// Seeds one project, label, task and comment for each of `owners`.
async fn seed_everything(service: &TestService, owners: &[Actor]) -> eyre::Result<()> {
    for owner in owners {
        let project = seed_project(service, *owner, "Shared name").await?;
        seed_label(service, *owner, "shared-label").await?;
        let task = seed_task(service, *owner, project, "Shared task", "todo").await?;
        service.create_comment(*owner, task.id(), "note").await?;
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_only_list_their_own_rows(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    seed_everything(&service, &[alice, bob]).await?;

    let projects = service.list_projects(alice).await?;
    let labels = service.list_labels(alice).await?;
    let tasks = service.list_tasks(alice).await?;
    let comments = service.list_comments(alice).await?;

    eyre::ensure!(projects.iter().all(|p| p.owner_id() == alice.id()), "projects leak");
    eyre::ensure!(labels.iter().all(|l| l.owner_id() == alice.id()), "labels leak");
    eyre::ensure!(tasks.iter().all(|t| t.owner_id() == alice.id()), "tasks leak");
    eyre::ensure!(comments.iter().all(|c| c.author_id() == alice.id()), "comments leak");
    eyre::ensure!(
        [projects.len(), labels.len(), tasks.len(), comments.len()] == [1, 1, 1, 1],
        "each listing should hold exactly alice's row"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_lists_rows_of_every_owner(
    service: TestService,
    alice: Actor,
    bob: Actor,
    admin: Actor,
) -> eyre::Result<()> {
    seed_everything(&service, &[alice, bob]).await?;

    eyre::ensure!(service.list_projects(admin).await?.len() == 2, "all projects");
    eyre::ensure!(service.list_labels(admin).await?.len() == 2, "all labels");
    eyre::ensure!(service.list_tasks(admin).await?.len() == 2, "all tasks");
    eyre::ensure!(service.list_comments(admin).await?.len() == 2, "all comments");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_and_foreign_ids_look_the_same(
    service: TestService,
    alice: Actor,
    bob: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Private").await?;

    let foreign = service.get_project(bob, project).await;
    let unknown = service
        .get_project(bob, taskflow::tracker::domain::ProjectId::new())
        .await;

    eyre::ensure!(
        foreign.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "foreign id should be NotFound, got {foreign:?}"
    );
    eyre::ensure!(
        unknown.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::NotFound),
        "unknown id should be NotFound, got {unknown:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_can_read_and_delete_any_project(
    service: TestService,
    alice: Actor,
    admin: Actor,
) -> eyre::Result<()> {
    let project = seed_project(&service, alice, "Private").await?;

    let fetched: Project = service.get_project(admin, project).await?;
    eyre::ensure!(fetched.owner_id() == alice.id(), "admin sees alice's project");

    service.delete_project(admin, project).await?;
    eyre::ensure!(service.list_projects(alice).await?.is_empty(), "project deleted");
    Ok(())
}
