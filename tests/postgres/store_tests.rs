//! CRUD, uniqueness and ordering against `PostgreSQL`.

use super::helpers::{TestDatabase, user};
use chrono::NaiveDate;
use rstest::rstest;
use taskflow::tracker::{
    domain::{Actor, EntityKind, Label, Project, TaskPriority, UserId},
    services::{
        CreateProjectRequest, CreateTaskRequest, ErrorKind, TrackerError, UpdateProjectRequest,
        UpdateTaskRequest,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_round_trips_through_the_database() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();

    let created = db
        .service
        .create_project(alice, CreateProjectRequest::new("Atlas").with_description("Maps"))
        .await?;
    let fetched = db.service.get_project(alice, created.id()).await?;

    eyre::ensure!(fetched == created, "expected {created:?}, got {fetched:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_names_are_already_exists() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();
    db.service
        .create_project(alice, CreateProjectRequest::new("Atlas"))
        .await?;
    db.service.create_label(alice, "maps").await?;

    let project = db
        .service
        .create_project(alice, CreateProjectRequest::new("Atlas"))
        .await;
    let label = db.service.create_label(alice, "maps").await;

    eyre::ensure!(
        matches!(project, Err(TrackerError::AlreadyExists { kind: EntityKind::Project, .. })),
        "expected project AlreadyExists, got {project:?}"
    );
    eyre::ensure!(
        matches!(label, Err(TrackerError::AlreadyExists { kind: EntityKind::Label, .. })),
        "expected label AlreadyExists, got {label:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rename_collision_is_already_exists() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();
    db.service
        .create_project(alice, CreateProjectRequest::new("Atlas"))
        .await?;
    let other = db
        .service
        .create_project(alice, CreateProjectRequest::new("Globe"))
        .await?;

    let result = db
        .service
        .update_project(alice, other.id(), UpdateProjectRequest::new().with_name("Atlas"))
        .await;

    eyre::ensure!(
        result.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::AlreadyExists),
        "expected AlreadyExists, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_fields_and_labels_round_trip() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();
    let project = db
        .service
        .create_project(alice, CreateProjectRequest::new("Atlas"))
        .await?;
    let first = db.service.create_label(alice, "north").await?;
    let second = db.service.create_label(alice, "south").await?;
    let due = NaiveDate::from_ymd_opt(2026, 6, 30).ok_or_else(|| eyre::eyre!("bad date"))?;

    let created = db
        .service
        .create_task(
            alice,
            CreateTaskRequest::new(project.id(), "Survey coast")
                .with_priority("high")
                .with_due_date(due)
                .with_labels([first.id(), second.id()]),
        )
        .await?;
    let fetched = db.service.get_task(alice, created.id()).await?;
    eyre::ensure!(fetched == created, "expected {created:?}, got {fetched:?}");
    eyre::ensure!(fetched.priority() == TaskPriority::High, "priority stored");

    let updated = db
        .service
        .update_task(
            alice,
            created.id(),
            UpdateTaskRequest::new().with_labels([second.id()]).clear_due_date(),
        )
        .await?;
    let reloaded = db.service.get_task(alice, created.id()).await?;
    eyre::ensure!(reloaded == updated, "update persisted");
    eyre::ensure!(reloaded.label_ids().len() == 1, "label set replaced");
    eyre::ensure!(reloaded.due_date().is_none(), "due date cleared");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_label_rolls_back_the_write() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();
    let bob = Actor::user(UserId::new());
    let project = db
        .service
        .create_project(alice, CreateProjectRequest::new("Atlas"))
        .await?;
    let theirs = db.service.create_label(bob, "theirs").await?;

    let result = db
        .service
        .create_task(
            alice,
            CreateTaskRequest::new(project.id(), "Borrow").with_labels([theirs.id()]),
        )
        .await;

    eyre::ensure!(
        result.as_ref().map_err(TrackerError::kind).err() == Some(ErrorKind::ForeignOwnership),
        "expected ForeignOwnership, got {result:?}"
    );
    eyre::ensure!(db.service.list_tasks(alice).await?.is_empty(), "nothing stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_scoped_and_ordered() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();
    let bob = user();
    let admin = Actor::admin(UserId::new());
    let older = db
        .service
        .create_project(alice, CreateProjectRequest::new("Older"))
        .await?;
    let newer = db
        .service
        .create_project(alice, CreateProjectRequest::new("Newer"))
        .await?;
    db.service
        .create_project(bob, CreateProjectRequest::new("Bob's"))
        .await?;
    for name in ["zeta", "alpha"] {
        db.service.create_label(alice, name).await?;
    }

    let projects: Vec<_> = db
        .service
        .list_projects(alice)
        .await?
        .iter()
        .map(Project::id)
        .collect();
    let labels: Vec<String> = db
        .service
        .list_labels(alice)
        .await?
        .iter()
        .map(|label: &Label| label.name().as_str().to_owned())
        .collect();

    eyre::ensure!(projects == [newer.id(), older.id()], "newest first, got {projects:?}");
    eyre::ensure!(labels == ["alpha", "zeta"], "by name, got {labels:?}");
    eyre::ensure!(db.service.list_projects(admin).await?.len() == 3, "admin sees all");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schema_can_be_applied_again() -> eyre::Result<()> {
    let Some(db) = TestDatabase::provision().await? else {
        return Ok(());
    };
    let alice = user();
    let project = db
        .service
        .create_project(alice, CreateProjectRequest::new("Atlas"))
        .await?;

    db.store.apply_schema().await?;

    let fetched = db.service.get_project(alice, project.id()).await?;
    eyre::ensure!(fetched == project, "existing rows survive a second apply");
    Ok(())
}
