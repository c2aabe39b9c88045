// Data models for the task list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a task within one collection
///
/// Ids are handed out by the store from a monotonic counter, so two tasks in
/// the same collection never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the id space is used up
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(rename = "isDone")]
    pub is_done: bool,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_done: false,
        }
    }

    pub fn toggle(&mut self) {
        self.is_done = !self.is_done;
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        assert!(ts > 0);
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_new_task_is_not_done() {
        let task = Task::new(TaskId::new(1), "Buy milk");
        assert_eq!(task.id, TaskId::new(1));
        assert_eq!(task.title, "Buy milk");
        assert!(!task.is_done);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut task = Task::new(TaskId::new(1), "Buy milk");
        task.toggle();
        assert!(task.is_done);
        task.toggle();
        assert!(!task.is_done);
    }

    #[test]
    fn test_task_wire_format() {
        let task = Task::new(TaskId::new(7), "Clean house");
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"id":7,"title":"Clean house","isDone":false}"#);
    }

    #[test]
    fn test_task_id_parse() {
        assert_eq!("42".parse::<TaskId>().unwrap(), TaskId::new(42));
        assert_eq!(" 3 ".parse::<TaskId>().unwrap(), TaskId::new(3));
        assert!("abc".parse::<TaskId>().is_err());
        assert!("-1".parse::<TaskId>().is_err());
    }

    #[test]
    fn test_task_id_next() {
        assert_eq!(TaskId::new(1).next(), Some(TaskId::new(2)));
        assert_eq!(TaskId::new(u64::MAX).next(), None);
    }
}
