//! Table models built on [`crate::db::Model`]

mod week;
mod words;

pub use week::{NewTask, TaskStatus, TaskType, Week};
pub use words::{WordRow, Words};
