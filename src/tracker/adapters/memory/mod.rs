//! In-memory adapters for tracker storage.

mod store;

pub use store::InMemoryTrackerStore;
