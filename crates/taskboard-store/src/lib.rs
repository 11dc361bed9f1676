//! File-backed task store for the board engine.
//!
//! A board lives in a `.taskboard/` directory holding its configuration,
//! the task list, and the meeting minutes. Every mutation is a locked
//! read-modify-write of one JSON file.

pub mod config;
pub mod error;
pub mod lockfile;
pub mod query;
pub mod repository;

pub use config::BoardConfig;
pub use error::StoreError;
pub use repository::{NewTask, Repository, TaskPatch};
