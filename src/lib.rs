//! Single-user task tracker: a JSON-backed task store and its terminal UI.

pub mod app;
pub mod error;
pub mod store;
pub mod task;
pub mod ui;

pub use app::App;
pub use error::{Result, TaskError};
pub use store::{ChartCounts, PriorityCounts, Statistics, TaskStore, DEFAULT_TASK_FILE};
pub use task::{Priority, Status, Task, TaskId, TaskRecord};
