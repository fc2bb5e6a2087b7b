//! tasklist-core library.
//!
//! The task model, title validation, and the in-memory [`store::TaskStore`]
//! that every presentation layer drives.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for recoverable input errors;
//!   `anyhow::Result` for configuration loading.
//! - **Logging**: `tracing` macros (`debug!` for store mutations).

pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use error::{ErrorCode, ValidationError};
pub use model::{Filter, MAX_TITLE_CHARS, Task, TaskId};
pub use store::{Action, Outcome, Snapshot, Stats, TaskStore};
