//! Multi-tenant task tracking.
//!
//! Users own projects and labels, file tasks into their projects and leave
//! comments on their tasks. Admins can read and modify everything but, like
//! every other user, may only link a task to their own project and labels.
//! The module follows hexagonal architecture:
//!
//! - Domain types and policies in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
