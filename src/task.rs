//! Task data structures and related functionality.
//!
//! A `Task` is embedded in an employee record. In memory it carries one canonical
//! `TaskStatus`; on the wire it keeps the four boolean flags (`newTask`, `active`,
//! `completed`, `failed`) of the store layout. Reading migrates any flag
//! combination into a status, writing regenerates the flags from the status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::parse_date_input_from;
use crate::error::{Error, FieldErrors, Result};
use crate::fields::*;

/// A unit of work assigned to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredTask", into = "StoredTask")]
pub struct Task {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: String,
    pub priority: Option<Priority>,
    pub status: TaskStatus,
}

/// The boolean status quad of the store layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFlags {
    pub new_task: bool,
    pub active: bool,
    pub completed: bool,
    pub failed: bool,
}

impl TaskFlags {
    /// Resolve the flags to one status.
    ///
    /// Precedence is fixed: completed, failed, new, active. A task with no flag
    /// set is treated as active.
    pub fn status(self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else if self.failed {
            TaskStatus::Failed
        } else if self.new_task {
            TaskStatus::New
        } else {
            TaskStatus::Active
        }
    }
}

impl From<TaskStatus> for TaskFlags {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::New => TaskFlags { new_task: true, active: true, ..Default::default() },
            TaskStatus::Active => TaskFlags { active: true, ..Default::default() },
            TaskStatus::Completed => TaskFlags { completed: true, ..Default::default() },
            TaskStatus::Failed => TaskFlags { failed: true, ..Default::default() },
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    new_task: bool,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    failed: bool,
    title: String,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
}

fn default_category() -> String {
    "General".to_string()
}

impl From<StoredTask> for Task {
    fn from(raw: StoredTask) -> Self {
        let flags = TaskFlags {
            new_task: raw.new_task,
            active: raw.active,
            completed: raw.completed,
            failed: raw.failed,
        };
        Task {
            title: raw.title,
            description: raw.description,
            date: raw.date,
            category: raw.category,
            priority: raw.priority,
            status: flags.status(),
        }
    }
}

impl From<Task> for StoredTask {
    fn from(task: Task) -> Self {
        let flags = TaskFlags::from(task.status);
        StoredTask {
            active: flags.active,
            new_task: flags.new_task,
            completed: flags.completed,
            failed: flags.failed,
            title: task.title,
            description: task.description,
            date: task.date,
            category: task.category,
            priority: task.priority,
        }
    }
}

/// Read-only, display-ready projection of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// `<employee id>-<1-based position>`, stable while tasks are only appended.
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub date: NaiveDate,
    pub category: String,
    pub priority: Priority,
}

/// Build the derived id of the task at `index` in an employee's task list.
pub fn task_id(employee_id: &str, index: usize) -> String {
    format!("{}-{}", employee_id, index + 1)
}

/// Split a derived task id back into employee id and task index.
pub fn parse_task_id(id: &str) -> Result<(&str, usize)> {
    let invalid = || Error::InvalidArgument(format!("'{}' is not a task id (expected e.g. emp002-3)", id));
    let (employee_id, position) = id.rsplit_once('-').ok_or_else(invalid)?;
    let position: usize = position.parse().map_err(|_| invalid())?;
    if employee_id.is_empty() || position == 0 {
        return Err(invalid());
    }
    Ok((employee_id, position - 1))
}

/// Unvalidated input of the task creation form.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub employee_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub category: String,
    pub priority: Option<Priority>,
}

impl TaskDraft {
    /// Validate every field and build a new task.
    ///
    /// All failures are collected before returning so the caller can show
    /// them next to their fields. `employee_exists` resolves the target id.
    pub fn validate(&self, today: NaiveDate, employee_exists: impl Fn(&str) -> bool) -> Result<Task> {
        let mut errors = FieldErrors::new();

        let employee_id = self.employee_id.trim();
        if employee_id.is_empty() {
            errors.add(FormField::Employee, "Please select an employee");
        } else if !employee_exists(employee_id) {
            errors.add(FormField::Employee, format!("Unknown employee '{}'", employee_id));
        }
        if self.title.trim().is_empty() {
            errors.add(FormField::Title, "Title is required");
        }
        if self.description.trim().is_empty() {
            errors.add(FormField::Description, "Description is required");
        }

        let date = if self.date.trim().is_empty() {
            errors.add(FormField::Date, "Date is required");
            None
        } else {
            match parse_date_input_from(&self.date, today) {
                Some(d) if d < today => {
                    errors.add(FormField::Date, "Date cannot be in the past");
                    None
                }
                Some(d) => Some(d),
                None => {
                    errors.add(FormField::Date, "Invalid date (use YYYY-MM-DD, 'tomorrow', 'in 3d', ...)");
                    None
                }
            }
        };

        if self.category.trim().is_empty() {
            errors.add(FormField::Category, "Category is required");
        }

        errors.into_result()?;
        // Every field checked above; date is Some when no error was recorded.
        let date = date.ok_or_else(|| Error::InvalidArgument("date".into()))?;

        Ok(Task {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            date,
            category: self.category.trim().to_string(),
            priority: self.priority,
            status: TaskStatus::New,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(n: bool, a: bool, c: bool, f: bool) -> TaskFlags {
        TaskFlags { new_task: n, active: a, completed: c, failed: f }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn draft() -> TaskDraft {
        TaskDraft {
            employee_id: "emp002".into(),
            title: "Ship report".into(),
            description: "Quarterly numbers".into(),
            date: "2025-05-02".into(),
            category: "Backend".into(),
            priority: None,
        }
    }

    #[test]
    fn test_status_conformance_table() {
        use TaskStatus::*;
        // (newTask, active, completed, failed) -> status, all 16 combinations.
        let table = [
            ((false, false, false, false), Active),
            ((false, false, false, true), Failed),
            ((false, false, true, false), Completed),
            ((false, false, true, true), Completed),
            ((false, true, false, false), Active),
            ((false, true, false, true), Failed),
            ((false, true, true, false), Completed),
            ((false, true, true, true), Completed),
            ((true, false, false, false), New),
            ((true, false, false, true), Failed),
            ((true, false, true, false), Completed),
            ((true, false, true, true), Completed),
            ((true, true, false, false), New),
            ((true, true, false, true), Failed),
            ((true, true, true, false), Completed),
            ((true, true, true, true), Completed),
        ];
        for ((n, a, c, f), expected) in table {
            assert_eq!(flags(n, a, c, f).status(), expected, "flags n={n} a={a} c={c} f={f}");
        }
    }

    #[test]
    fn test_flags_from_status_resolve_back() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskFlags::from(status).status(), status);
        }
        assert_eq!(TaskFlags::from(TaskStatus::New), flags(true, true, false, false));
    }

    #[test]
    fn test_inconsistent_wire_flags_are_migrated() {
        let json = r#"{"active":true,"newTask":true,"completed":true,"failed":true,
            "title":"x","description":"y","date":"2025-05-01","category":"Design"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["completed"], true);
        assert_eq!(value["active"], false);
        assert_eq!(value["newTask"], false);
        assert_eq!(value["failed"], false);
        assert!(value.get("priority").is_none());
    }

    #[test]
    fn test_missing_category_defaults_to_general() {
        let json = r#"{"title":"x","description":"y","date":"2025-05-01"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.category, "General");
        assert_eq!(task.status, TaskStatus::Active);
    }

    #[test]
    fn test_task_id_round_trip() {
        assert_eq!(task_id("emp002", 0), "emp002-1");
        assert_eq!(parse_task_id("emp002-5").unwrap(), ("emp002", 4));
        assert!(parse_task_id("emp002").is_err());
        assert!(parse_task_id("emp002-0").is_err());
        assert!(parse_task_id("-3").is_err());
    }

    #[test]
    fn test_valid_draft_builds_new_task() {
        let task = draft().validate(today(), |id| id == "emp002").unwrap();
        assert_eq!(task.status, TaskStatus::New);
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
        assert_eq!(task.title, "Ship report");
    }

    #[test]
    fn test_today_is_not_in_the_past() {
        let mut d = draft();
        d.date = "today".into();
        assert_eq!(d.validate(today(), |_| true).unwrap().date, today());
    }

    #[test]
    fn test_out_of_range_offset_is_an_invalid_date() {
        let mut d = draft();
        d.date = "in 99999999999d".into();
        match d.validate(today(), |_| true) {
            Err(Error::Validation(errors)) => {
                assert!(errors.get(FormField::Date).is_some_and(|m| m.starts_with("Invalid date")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_past_date_is_rejected() {
        let mut d = draft();
        d.date = "2025-04-30".into();
        match d.validate(today(), |_| true) {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors.get(FormField::Date), Some("Date cannot be in the past"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_blank_fields_reported_together() {
        let d = TaskDraft { date: "  ".into(), ..Default::default() };
        match d.validate(today(), |_| true) {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.get(FormField::Employee), Some("Please select an employee"));
                assert_eq!(errors.get(FormField::Title), Some("Title is required"));
                assert_eq!(errors.get(FormField::Description), Some("Description is required"));
                assert_eq!(errors.get(FormField::Date), Some("Date is required"));
                assert_eq!(errors.get(FormField::Category), Some("Category is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_employee_is_a_field_error() {
        match draft().validate(today(), |_| false) {
            Err(Error::Validation(errors)) => {
                assert!(errors.get(FormField::Employee).unwrap().contains("emp002"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
