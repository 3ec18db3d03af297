// ============================================================================
// Alert Dashboard Library
// ============================================================================

pub mod app;
pub mod config;
pub mod connection;
pub mod core;
pub mod dashboard;
pub mod inspect;
pub mod reader;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use crate::core::{Alert, BucketIndex, DashboardDocument, Priority, StoreError, Timed};
pub use connection::StoreConfig;
pub use dashboard::{Dashboard, DashboardPage, LoadMoreResponse};
pub use reader::{BucketReader, PriorityBucket};
pub use storage::{DocumentStore, FakeStore, InMemoryDocumentStore, MongoDocumentStore};
pub use web::{AppState, build_router};
