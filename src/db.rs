//! Task repository and utility functions.
//!
//! This module provides the `Database` struct, the in-memory form of the
//! `employees` record, with flattening into display views and the mutation
//! operations. Every mutation rewrites the whole record. It also holds the date
//! parsing and table printing helpers shared by the CLI.

use chrono::{Datelike, Duration, NaiveDate};
use tracing::info;

use crate::auth::Identity;
use crate::employee::{Employee, TaskCounters};
use crate::error::{Error, Result};
use crate::fields::*;
use crate::store::{Store, EMPLOYEES_KEY};
use crate::task::{parse_task_id, task_id, TaskDraft, TaskView};

/// In-memory copy of the `employees` record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Database {
    pub employees: Vec<Employee>,
}

impl Database {
    /// Load the employee list from the store. A missing record is empty.
    pub fn load(store: &Store) -> Result<Self> {
        let employees = store.get_json(EMPLOYEES_KEY)?.unwrap_or_default();
        Ok(Database { employees })
    }

    /// Rewrite the whole employee list to the store.
    pub fn save(&self, store: &mut Store) -> Result<()> {
        store.set_json(EMPLOYEES_KEY, &self.employees)
    }

    /// Get an employee by id.
    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    fn employee_mut(&mut self, id: &str) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == id)
    }

    /// Flatten every employee's tasks into display views.
    ///
    /// Employees keep store order and each employee's tasks keep their order.
    pub fn flatten(&self) -> Vec<TaskView> {
        self.employees.iter().flat_map(views_of).collect()
    }

    /// Views of one employee's tasks. Unknown ids have no tasks.
    pub fn tasks_of(&self, employee_id: &str) -> Vec<TaskView> {
        self.employee(employee_id).map(views_of).unwrap_or_default()
    }

    /// Counters of one employee, recomputed from the tasks.
    pub fn counters_of(&self, employee_id: &str) -> Option<TaskCounters> {
        self.employee(employee_id).map(Employee::counters)
    }

    /// Validate a draft and append it to its employee, then persist.
    ///
    /// Nothing changes when validation fails. Returns the new task's view.
    pub fn create_task(&mut self, store: &mut Store, draft: &TaskDraft, today: NaiveDate) -> Result<TaskView> {
        let task = draft.validate(today, |id| self.employee(id).is_some())?;
        let employee_id = draft.employee_id.trim();
        let employee = self
            .employee_mut(employee_id)
            .ok_or_else(|| Error::EmployeeNotFound(employee_id.to_string()))?;
        employee.tasks.push(task);
        let index = employee.tasks.len() - 1;
        let view = view_of(employee, index);

        self.save(store)?;
        info!(task = %view.id, employee = %view.employee_id, "created task");
        Ok(view)
    }

    /// Change the status of the task with the given derived id.
    ///
    /// Admins may change any task, everyone else only their own.
    pub fn set_status(&mut self, store: &mut Store, actor: &Identity, id: &str, status: TaskStatus) -> Result<TaskView> {
        let (employee_id, index) = parse_task_id(id)?;
        if !actor.is_admin() && actor.id != employee_id {
            return Err(Error::Forbidden(format!("task {} belongs to another employee", id)));
        }
        let employee = self
            .employee_mut(employee_id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let task = employee
            .tasks
            .get_mut(index)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        task.status = status;
        let view = view_of(employee, index);

        self.save(store)?;
        info!(task = %view.id, status = status.label(), "changed task status");
        Ok(view)
    }
}

fn view_of(employee: &Employee, index: usize) -> TaskView {
    let task = &employee.tasks[index];
    TaskView {
        id: task_id(&employee.id, index),
        employee_id: employee.id.clone(),
        employee_name: employee.first_name.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        date: task.date,
        category: task.category.clone(),
        priority: task.priority.unwrap_or_default(),
    }
}

fn views_of(employee: &Employee) -> Vec<TaskView> {
    (0..employee.tasks.len()).map(|i| view_of(employee, i)).collect()
}

/// Parse a due date typed into the create form or `--date`.
///
/// Accepts `YYYY-MM-DD`, "today", "tomorrow", "end of week"/"eow",
/// "end of month"/"eom", weekday names ("fri", "next monday") and offsets
/// such as "in 3d", "in 2w" or "in 1m" (30 days). Offsets too large for a
/// calendar date yield `None`.
pub fn parse_date_input_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return shift_days(today, 1),
        "end of week" | "eow" => {
            let to_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            return shift_days(today, to_sunday);
        }
        "end of month" | "eom" => {
            let (year, month) = match today.month() {
                12 => (today.year() + 1, 1),
                m => (today.year(), m + 1),
            };
            return NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt();
        }
        _ => {}
    }

    if let Some(offset) = s.strip_prefix("in ") {
        return parse_offset_days(offset.trim()).and_then(|days| shift_days(today, days));
    }

    if let Some(target) = parse_weekday(&s) {
        let current = i64::from(today.weekday().num_days_from_monday());
        let ahead = (target + 7 - current) % 7;
        let days = if s.starts_with("next ") { ahead + 7 } else { ahead };
        return shift_days(today, days);
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// "3d", "2w" or "1m" as a number of days.
fn parse_offset_days(offset: &str) -> Option<i64> {
    let unit = offset.chars().last()?;
    let count: i64 = offset[..offset.len() - unit.len_utf8()].trim().parse().ok()?;
    match unit {
        'd' => Some(count),
        'w' => count.checked_mul(7),
        'm' => count.checked_mul(30),
        _ => None,
    }
}

/// Monday-based index of "fri", "friday", "this friday" or "next friday".
fn parse_weekday(s: &str) -> Option<i64> {
    const NAMES: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];
    let name = s.strip_prefix("next ").or_else(|| s.strip_prefix("this ")).unwrap_or(s);
    NAMES
        .iter()
        .position(|full| *full == name || (name.len() == 3 && full.starts_with(name)))
        .map(|i| i as i64)
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_add_signed(d))
}

/// Format a date relative to today ("today", "tomorrow", "in 3d", "2d ago").
pub fn format_date_relative(date: NaiveDate, today: NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {}d", d),
        d => format!("{}d ago", -d),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print task views in a formatted table.
pub fn print_table(tasks: &[&TaskView]) {
    println!(
        "{:<10} {:<10} {:<12} {:<7} {:<11} {:<14} {}",
        "ID", "Employee", "Status", "Pri", "Date", "Category", "Title"
    );
    for t in tasks {
        println!(
            "{:<10} {:<10} {:<12} {:<7} {:<11} {:<14} {}",
            t.id,
            truncate(&t.employee_name, 10),
            t.status.label(),
            t.priority.label(),
            t.date,
            truncate(&t.category, 14),
            t.title
        );
    }
}

/// Print the four dashboard counters of an employee.
pub fn print_counters(name: &str, counters: &TaskCounters) {
    println!("{}'s Task Dashboard", name);
    println!("  New Tasks    {:>3}", counters.new_task);
    println!("  In Progress  {:>3}", counters.active);
    println!("  Completed    {:>3}", counters.completed);
    println!("  Failed       {:>3}", counters.failed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Role;

    fn seeded() -> (Store, Database) {
        let store = Store::seeded().unwrap();
        let db = Database::load(&store).unwrap();
        (store, db)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft_for(employee_id: &str, date: &str) -> TaskDraft {
        TaskDraft {
            employee_id: employee_id.into(),
            title: "Prepare demo".into(),
            description: "Slides for Friday".into(),
            date: date.into(),
            category: "Meeting".into(),
            priority: None,
        }
    }

    fn actor(id: &str, role: Role) -> Identity {
        Identity { id: id.into(), email: format!("{id}@me.com"), role, name: None }
    }

    #[test]
    fn test_flatten_counts_and_order() {
        let (_, db) = seeded();
        let views = db.flatten();
        let expected: usize = db.employees.iter().map(|e| e.tasks.len()).sum();
        assert_eq!(views.len(), expected);
        assert_eq!(views.len(), 19);

        // Employee order is preserved and each employee's tasks stay in order.
        let neha: Vec<&TaskView> = views.iter().filter(|v| v.employee_id == "emp002").collect();
        let titles: Vec<&str> = neha.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Database Optimization", "Code Review", "API Testing", "Client Call"]);
        assert_eq!(neha[2].id, "emp002-3");
        assert_eq!(views[0].employee_id, "emp001");
        assert_eq!(views.last().unwrap().employee_id, "emp005");
    }

    #[test]
    fn test_missing_priority_defaults_to_medium() {
        let (_, db) = seeded();
        assert!(db.flatten().iter().all(|v| v.priority == Priority::Medium));
    }

    #[test]
    fn test_create_task_for_neha() {
        let (mut store, mut db) = seeded();
        let today = ymd(2025, 5, 1);
        let before = db.counters_of("emp002").unwrap();
        assert_eq!(before, TaskCounters { active: 2, new_task: 2, completed: 1, failed: 1 });

        let view = db.create_task(&mut store, &draft_for("emp002", "tomorrow"), today).unwrap();
        assert_eq!(view.id, "emp002-5");
        assert_eq!(view.status, TaskStatus::New);
        assert_eq!(view.date, ymd(2025, 5, 2));

        let after = db.counters_of("emp002").unwrap();
        assert_eq!(after, TaskCounters { active: 3, new_task: 3, completed: 1, failed: 1 });
        assert_eq!(db.tasks_of("emp002").len(), 5);

        // Other employees are untouched and the store holds the new list.
        assert_eq!(db.counters_of("emp001").unwrap().active, 1);
        assert_eq!(Database::load(&store).unwrap(), db);
    }

    #[test]
    fn test_create_task_with_past_date_changes_nothing() {
        let (mut store, mut db) = seeded();
        let before = db.clone();
        let stored_before = store.get_item(EMPLOYEES_KEY).map(str::to_string);

        let err = db.create_task(&mut store, &draft_for("emp002", "2025-04-30"), ymd(2025, 5, 1));
        assert!(matches!(err, Err(Error::Validation(_))));
        assert_eq!(db, before);
        assert_eq!(store.get_item(EMPLOYEES_KEY).map(str::to_string), stored_before);
    }

    #[test]
    fn test_create_task_for_unknown_employee_fails_validation() {
        let (mut store, mut db) = seeded();
        let err = db.create_task(&mut store, &draft_for("emp999", "2025-05-02"), ymd(2025, 5, 1));
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn test_set_status_recomputes_counters() {
        let (mut store, mut db) = seeded();
        let admin = actor("admin001", Role::Admin);
        db.set_status(&mut store, &admin, "emp002-1", TaskStatus::Completed).unwrap();

        let counters = db.counters_of("emp002").unwrap();
        assert_eq!(counters, TaskCounters { active: 1, new_task: 1, completed: 2, failed: 1 });
        assert_eq!(Database::load(&store).unwrap(), db);
    }

    #[test]
    fn test_employee_can_only_change_own_tasks() {
        let (mut store, mut db) = seeded();
        let arjun = actor("emp001", Role::Employee);
        assert!(db.set_status(&mut store, &arjun, "emp001-1", TaskStatus::Active).is_ok());
        assert!(matches!(
            db.set_status(&mut store, &arjun, "emp002-1", TaskStatus::Failed),
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            db.set_status(&mut store, &arjun, "emp001-9", TaskStatus::Failed),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let (_, db) = seeded();
        let mut other = Store::in_memory();
        db.save(&mut other).unwrap();
        assert_eq!(Database::load(&other).unwrap(), db);
    }

    #[test]
    fn test_parse_date_input() {
        let today = ymd(2025, 5, 1); // Thursday
        assert_eq!(parse_date_input_from("today", today), Some(today));
        assert_eq!(parse_date_input_from("Tomorrow", today), Some(ymd(2025, 5, 2)));
        assert_eq!(parse_date_input_from("in 3d", today), Some(ymd(2025, 5, 4)));
        assert_eq!(parse_date_input_from("in 2w", today), Some(ymd(2025, 5, 15)));
        assert_eq!(parse_date_input_from("friday", today), Some(ymd(2025, 5, 2)));
        assert_eq!(parse_date_input_from("next thursday", today), Some(ymd(2025, 5, 8)));
        assert_eq!(parse_date_input_from("eom", today), Some(ymd(2025, 5, 31)));
        assert_eq!(parse_date_input_from("2025-06-10", today), Some(ymd(2025, 6, 10)));
        assert_eq!(parse_date_input_from("someday", today), None);
        assert_eq!(parse_date_input_from("eow", today), Some(ymd(2025, 5, 4)));
        assert_eq!(parse_date_input_from("yesterday", today), None);
    }

    #[test]
    fn test_huge_date_offsets_are_rejected() {
        let today = ymd(2025, 5, 1);
        assert_eq!(parse_date_input_from("in 99999999999d", today), None);
        assert_eq!(parse_date_input_from("in 999999999999999999m", today), None);
        assert_eq!(parse_date_input_from("in 9223372036854775807w", today), None);
        assert_eq!(parse_date_input_from("in d", today), None);
    }

    #[test]
    fn test_format_date_relative() {
        let today = ymd(2025, 5, 1);
        assert_eq!(format_date_relative(today, today), "today");
        assert_eq!(format_date_relative(ymd(2025, 5, 2), today), "tomorrow");
        assert_eq!(format_date_relative(ymd(2025, 5, 6), today), "in 5d");
        assert_eq!(format_date_relative(ymd(2025, 4, 29), today), "2d ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Communication", 8), "Communi…");
    }
}
