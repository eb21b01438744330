//! Applies the tracker schema to the configured `PostgreSQL` database.
//!
//! Usage:
//!
//! ```text
//! taskflow-schema [config-path]
//! ```
//!
//! `config-path` optionally names a JSON file deserializing into
//! [`TaskflowConfig`]. `TASKFLOW_*` environment variables override it, and
//! `TASKFLOW_DATABASE_URL` must be set by one of the two. Log output is
//! controlled through `TASKFLOW_LOG`.

use std::path::PathBuf;
use taskflow::config::{ConfigError, TaskflowConfig};
use taskflow::telemetry;
use taskflow::tracker::adapters::postgres::PostgresTrackerStore;
use taskflow::tracker::ports::StoreError;
use thiserror::Error;
use tokio::runtime::Builder;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while applying the schema.
#[derive(Debug, Error)]
enum SchemaToolError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("schema application failed: {0}")]
    Apply(#[source] StoreError),
}

fn main() -> Result<(), BoxError> {
    let tracing_installed = telemetry::init_tracing();
    tracing::debug!(tracing_installed, "starting schema tool");
    run(std::env::args_os().skip(1).map(PathBuf::from)).map_err(|err| {
        tracing::error!(error = %err, "schema tool failed");
        err.into()
    })
}

fn run(mut args: impl Iterator<Item = PathBuf>) -> Result<(), SchemaToolError> {
    let config_path = args.next();
    if let Some(extra) = args.next() {
        return Err(SchemaToolError::InvalidArgs(format!(
            "unexpected argument '{}'; expected at most a config path",
            extra.display()
        )));
    }

    let config = TaskflowConfig::load(config_path.as_deref())?;
    let store = PostgresTrackerStore::new(config.build_pool()?);
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SchemaToolError::RuntimeInit)?;
    runtime
        .block_on(store.apply_schema())
        .map_err(SchemaToolError::Apply)?;
    tracing::info!("tracker schema applied");
    Ok(())
}
