// Task log table and its enum columns

use crate::db::{Database, FieldMap, Model};
use crate::error::AppResult;

pub struct Week;

impl Model for Week {
    const TABLE: &'static str = "week";
}

/// `week.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Doing = 1,
    Done = 2,
    Deleted = 3,
}

impl TaskStatus {
    pub const fn code(self) -> i64 {
        self as i64
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Doing => "in progress",
            Self::Done => "done",
            Self::Deleted => "deleted",
        }
    }
}

/// `week.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Daily = 1,
    Weekly = 2,
}

impl TaskType {
    pub const fn code(self) -> i64 {
        self as i64
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily task",
            Self::Weekly => "weekly task",
        }
    }
}

/// A task about to be logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub content: String,
    pub starttime: String,
    /// Finished tasks carry an end time
    pub endtime: Option<String>,
    pub task_type: TaskType,
}

impl NewTask {
    pub const fn status(&self) -> TaskStatus {
        if self.endtime.is_some() {
            TaskStatus::Done
        } else {
            TaskStatus::Doing
        }
    }

    /// Type and status labels, for log lines
    pub fn summary(&self) -> String {
        format!("{}, {}", self.task_type.label(), self.status().label())
    }

    pub fn fields(&self) -> FieldMap {
        let mut fields = FieldMap::new()
            .with("content", self.content.clone())
            .with("starttime", self.starttime.clone())
            .with("type", self.task_type.code());
        if let Some(end) = &self.endtime {
            fields.set("endtime", end.clone());
        }
        fields.set("status", self.status().code());
        fields
    }
}

impl Week {
    pub fn create(db: &Database, task: &NewTask) -> AppResult<i64> {
        Self::insert(db, &task.fields())
    }
}
