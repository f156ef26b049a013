use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};

/// Date layout used for user input and for the task file.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse `YYYY-MM-DD` text into a calendar date.
pub fn parse_due_date(text: &str) -> Result<NaiveDate> {
    parse_strict(text).ok_or_else(|| TaskError::InvalidDueDate {
        input: text.to_string(),
    })
}

/// Exactly four year digits, two month digits, two day digits. chrono alone
/// would also take short or signed years and leading whitespace.
fn parse_strict(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok || text.starts_with("0000") {
        return None;
    }
    NaiveDate::parse_from_str(text, DUE_DATE_FORMAT).ok()
}

/// Session-scoped handle for a task. Assigned by the store, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Chart category order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub const fn cycle_next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub const fn cycle_prev(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One to-do item. Status only ever moves from `Pending` to `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    status: Status,
}

impl Task {
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            due_date,
            priority,
            status: Status::Pending,
        }
    }

    /// Rebuild a task from its stored form under a freshly assigned id.
    pub fn from_record(id: TaskId, record: TaskRecord) -> Self {
        Self {
            id,
            title: record.title,
            description: record.description,
            due_date: record.due_date,
            priority: record.priority,
            status: record.status,
        }
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
        }
    }

    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Mark as completed. Returns the previous status.
    pub fn complete(&mut self) -> Status {
        std::mem::replace(&mut self.status, Status::Completed)
    }

    /// Undo a completion that could not be saved.
    pub(crate) fn restore_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// Stored form of a task: exactly the five user-visible fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    #[serde(with = "due_date_format")]
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: Status,
}

mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_strict, DUE_DATE_FORMAT};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DUE_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_strict(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("due_date {text:?} is not YYYY-MM-DD"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_due_date_accepts_iso_dates() {
        assert_eq!(parse_due_date("2024-03-01").unwrap(), date(2024, 3, 1));
        assert_eq!(parse_due_date("2024-02-29").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn parse_due_date_rejects_other_layouts() {
        let inputs = [
            "",
            "tomorrow",
            "03/01/2024",
            "2024/03/01",
            "2023-02-29",
            "2024-13-01",
            "24-03-01",
            "0-1-1",
            "2024-3-1",
            "-2024-03-01",
            "+12024-03-01",
            " 2024-03-01",
            "2024-03-01 ",
            "0000-01-01",
        ];
        for input in inputs {
            let err = parse_due_date(input).unwrap_err();
            assert!(
                matches!(&err, TaskError::InvalidDueDate { input: got, .. } if got == input),
                "{input:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn new_task_starts_pending() {
        let task = Task::new(TaskId::new(1), "Pay rent", "", date(2024, 3, 1), Priority::High);
        assert_eq!(task.status(), Status::Pending);
        assert!(task.is_pending());
    }

    #[test]
    fn complete_is_one_way_and_idempotent() {
        let mut task = Task::new(TaskId::new(1), "Pay rent", "", date(2024, 3, 1), Priority::High);
        assert_eq!(task.complete(), Status::Pending);
        assert_eq!(task.complete(), Status::Completed);
        assert_eq!(task.status(), Status::Completed);
    }

    #[test]
    fn record_serializes_five_fields() {
        let task = Task::new(TaskId::new(7), "Call mom", "weekly", date(2024, 3, 2), Priority::Low);
        let value = serde_json::to_value(task.to_record()).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Call mom",
                "description": "weekly",
                "due_date": "2024-03-02",
                "priority": "Low",
                "status": "Pending",
            })
        );
    }

    #[test]
    fn record_rejects_malformed_due_date() {
        let value = json!({
            "title": "x",
            "description": "",
            "due_date": "2024-3-x",
            "priority": "Low",
            "status": "Pending",
        });
        assert!(serde_json::from_value::<TaskRecord>(value).is_err());
    }

    #[test]
    fn record_rejects_signed_year() {
        let value = json!({
            "title": "x",
            "description": "",
            "due_date": "+12024-03-01",
            "priority": "Low",
            "status": "Pending",
        });
        assert!(serde_json::from_value::<TaskRecord>(value).is_err());
    }

    #[test]
    fn record_rejects_missing_keys() {
        let value = json!({
            "title": "x",
            "due_date": "2024-03-01",
            "priority": "Low",
            "status": "Pending",
        });
        assert!(serde_json::from_value::<TaskRecord>(value).is_err());
    }

    #[test]
    fn record_rejects_unknown_priority() {
        let value = json!({
            "title": "x",
            "description": "",
            "due_date": "2024-03-01",
            "priority": "Urgent",
            "status": "Pending",
        });
        assert!(serde_json::from_value::<TaskRecord>(value).is_err());
    }

    #[test]
    fn from_record_keeps_completed_status() {
        let record = TaskRecord {
            title: "done".into(),
            description: String::new(),
            due_date: date(2024, 1, 5),
            priority: Priority::Medium,
            status: Status::Completed,
        };
        let task = Task::from_record(TaskId::new(3), record.clone());
        assert_eq!(task.id(), TaskId::new(3));
        assert_eq!(task.status(), Status::Completed);
        assert_eq!(task.to_record(), record);
    }

    #[test]
    fn priority_cycles_through_all_levels() {
        let mut p = Priority::default();
        assert_eq!(p, Priority::Medium);
        for _ in 0..Priority::ALL.len() {
            p = p.cycle_next();
        }
        assert_eq!(p, Priority::Medium);
        assert_eq!(Priority::Low.cycle_prev(), Priority::High);
    }
}
