//! Port contracts for tracker persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.

pub mod store;

pub use store::{
    CommentRecords, LabelRecords, ProjectRecords, StoreError, StoreResult, TaskRecords,
    TrackerStore, UnitOfWork,
};
