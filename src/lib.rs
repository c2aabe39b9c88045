// tasklist - Single-screen task list persisted as one key-value snapshot

pub mod config;
pub mod filter;
pub mod kv;
pub mod models;
pub mod snapshot;
pub mod status;
pub mod store;

// Re-export main types for convenience
pub use config::{BackendKind, Config};
pub use filter::{Filter, Visibility, search};
pub use kv::{FileKv, KeyValueStore, MemoryKv, SqliteKv};
pub use models::{Task, TaskId, now_ms};
pub use status::{Status, StatusBanner};
pub use store::{Change, EditMode, LoadOutcome, TaskStore};
