//! Taskflow: a multi-tenant task tracker core.
//!
//! Users own projects and labels, file tasks with a status, priority and
//! optional due date, and discuss tasks through comments. Every operation
//! acts on behalf of an authenticated [`tracker::domain::Actor`]; ordinary
//! users see and change only what they own while administrators see
//! everything.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Entities, the ownership policy, scope resolution,
//!   reference validation and the completion lifecycle
//! - **Ports**: The transactional store contract
//! - **Adapters**: In-memory and `PostgreSQL` stores
//! - **Services**: Operations exposed to a request-handling layer
//!
//! # Modules
//!
//! - [`tracker`]: The task tracking bounded context
//! - [`config`]: Runtime configuration and connection pooling
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod telemetry;
pub mod tracker;
