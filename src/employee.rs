//! Employee records and their aggregate task counters.

use serde::{Deserialize, Serialize};

use crate::fields::TaskStatus;
use crate::task::Task;

/// A person with credentials and an embedded, ordered task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredEmployee", into = "StoredEmployee")]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub email: String,
    pub password: String,
    pub tasks: Vec<Task>,
}

/// Per-employee task counts, shown on the employee dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounters {
    pub active: u32,
    pub new_task: u32,
    pub completed: u32,
    pub failed: u32,
}

impl TaskCounters {
    /// Count tasks by status. A new task is also counted as active.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counters = TaskCounters::default();
        for task in tasks {
            match task.status {
                TaskStatus::New => {
                    counters.new_task += 1;
                    counters.active += 1;
                }
                TaskStatus::Active => counters.active += 1,
                TaskStatus::Completed => counters.completed += 1,
                TaskStatus::Failed => counters.failed += 1,
            }
        }
        counters
    }
}

impl Employee {
    /// Counters derived from the current task list.
    pub fn counters(&self) -> TaskCounters {
        TaskCounters::from_tasks(&self.tasks)
    }
}

// `taskNumber` is written for layout compatibility and ignored on read.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEmployee {
    id: String,
    first_name: String,
    email: String,
    password: String,
    #[serde(default, skip_deserializing)]
    task_number: TaskCounters,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl From<StoredEmployee> for Employee {
    fn from(raw: StoredEmployee) -> Self {
        Employee {
            id: raw.id,
            first_name: raw.first_name,
            email: raw.email,
            password: raw.password,
            tasks: raw.tasks,
        }
    }
}

impl From<Employee> for StoredEmployee {
    fn from(employee: Employee) -> Self {
        StoredEmployee {
            task_number: employee.counters(),
            id: employee.id,
            first_name: employee.first_name,
            email: employee.email,
            password: employee.password,
            tasks: employee.tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEHA: &str = r#"{
        "id": "emp002", "firstName": "Neha", "email": "employee2@example.com", "password": "123",
        "taskNumber": { "active": 9, "newTask": 9, "completed": 9, "failed": 9 },
        "tasks": [
            {"active": true, "newTask": true, "completed": false, "failed": false,
             "title": "a", "description": "d", "date": "2025-05-02", "category": "Backend"},
            {"active": false, "newTask": false, "completed": true, "failed": false,
             "title": "b", "description": "d", "date": "2025-04-29", "category": "Development"},
            {"active": false, "newTask": false, "completed": false, "failed": true,
             "title": "c", "description": "d", "date": "2025-04-26", "category": "Testing"},
            {"active": true, "newTask": true, "completed": false, "failed": false,
             "title": "e", "description": "d", "date": "2025-05-03", "category": "Communication"}
        ]
    }"#;

    #[test]
    fn test_stored_counters_are_ignored_and_recomputed() {
        let employee: Employee = serde_json::from_str(NEHA).unwrap();
        assert_eq!(
            employee.counters(),
            TaskCounters { active: 2, new_task: 2, completed: 1, failed: 1 }
        );

        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["taskNumber"]["active"], 2);
        assert_eq!(value["taskNumber"]["newTask"], 2);
        assert_eq!(value["firstName"], "Neha");
    }

    #[test]
    fn test_json_round_trip_is_structurally_equal() {
        let employee: Employee = serde_json::from_str(NEHA).unwrap();
        let json = serde_json::to_string(&employee).unwrap();
        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(back, employee);
    }

    #[test]
    fn test_active_status_counts_only_as_active() {
        let mut employee: Employee = serde_json::from_str(NEHA).unwrap();
        employee.tasks[0].status = TaskStatus::Active;
        let counters = employee.counters();
        assert_eq!(counters.active, 2);
        assert_eq!(counters.new_task, 1);
    }
}
