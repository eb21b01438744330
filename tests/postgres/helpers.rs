//! Shared test helpers for `PostgreSQL` integration tests.

use super::super::test_helpers::test_database_url;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Error as PoolConnectionError, Pool};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use taskflow::tracker::{
    adapters::postgres::{PostgresTrackerStore, TrackerPgPool},
    domain::{Actor, UserId},
    services::TrackerService,
};

/// Clock returning whole seconds, one second apart, so timestamps survive
/// the database's microsecond precision unchanged.
#[derive(Debug, Default)]
pub struct WholeSecondClock {
    ticks: AtomicI64,
}

impl Clock for WholeSecondClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
            + TimeDelta::seconds(tick)
    }
}

/// Service type used by `PostgreSQL` tests.
pub type PgService = TrackerService<PostgresTrackerStore, WholeSecondClock>;

/// Service reading the system clock at full precision.
pub type LivePgService = TrackerService<PostgresTrackerStore, DefaultClock>;

/// Pins every pooled connection to the test schema.
#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, PoolConnectionError> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), PoolConnectionError> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(PoolConnectionError::QueryError)
    }
}

/// A throwaway schema holding the tracker tables for one test.
pub struct TestDatabase {
    pool: TrackerPgPool,
    schema: String,
    /// Store wired to the schema.
    pub store: Arc<PostgresTrackerStore>,
    /// Service wired to the schema.
    pub service: PgService,
    /// Service sharing the store but using the system clock.
    pub live: LivePgService,
}

impl TestDatabase {
    /// Provisions a fresh schema, or returns `None` when no test database is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub async fn provision() -> eyre::Result<Option<Self>> {
        let Some(url) = test_database_url() else {
            return Ok(None);
        };
        let schema = format!("taskflow_test_{}", uuid::Uuid::new_v4().simple());

        let admin_pool = Pool::builder()
            .max_size(1)
            .build(ConnectionManager::<PgConnection>::new(url.as_str()))?;
        admin_pool
            .get()?
            .batch_execute(&format!("CREATE SCHEMA {schema}"))?;

        let pool = Pool::builder()
            .max_size(2)
            .connection_customizer(Box::new(SearchPath(schema.clone())))
            .build(ConnectionManager::<PgConnection>::new(url.as_str()))?;
        let store = Arc::new(PostgresTrackerStore::new(pool.clone()));
        store.apply_schema().await?;

        Ok(Some(Self {
            pool,
            schema,
            service: TrackerService::new(Arc::clone(&store), Arc::new(WholeSecondClock::default())),
            live: TrackerService::new(Arc::clone(&store), Arc::new(DefaultClock)),
            store,
        }))
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let statement = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        let dropped = self
            .pool
            .get()
            .map_err(|err| err.to_string())
            .and_then(|mut conn| conn.batch_execute(&statement).map_err(|err| err.to_string()));
        drop(dropped);
    }
}

/// Returns a fresh ordinary user.
#[must_use]
pub fn user() -> Actor {
    Actor::user(UserId::new())
}
