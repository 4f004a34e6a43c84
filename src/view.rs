//! Filtering and sorting of task views.
//!
//! All functions here are pure: they take a list of views and a query and return
//! a new list. Filters left as `None` match everything ("All").

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::fields::*;
use crate::task::TaskView;

/// Filter and sort settings for a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    /// Exact employee first name.
    pub employee: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: String,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl Default for TaskQuery {
    fn default() -> Self {
        TaskQuery {
            status: None,
            employee: None,
            category: None,
            search: String::new(),
            sort: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl TaskQuery {
    pub fn matches(&self, task: &TaskView) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(ref name) = self.employee {
            if &task.employee_name != name {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if &task.category != category {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !task.title.to_lowercase().contains(&needle)
            && !task.description.to_lowercase().contains(&needle)
        {
            return false;
        }
        true
    }

    /// Apply the filters, then sort. Ties keep their input order.
    pub fn apply<'a>(&self, tasks: &'a [TaskView]) -> Vec<&'a TaskView> {
        let mut out: Vec<&TaskView> = tasks.iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| {
            let ord = compare(a, b, self.sort);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        out
    }

    /// Select a sort field. Re-selecting the current field flips the direction,
    /// a new field starts ascending.
    pub fn select_sort(&mut self, field: SortField) {
        if self.sort == field {
            self.direction = self.direction.toggle();
        } else {
            self.sort = field;
            self.direction = SortDirection::Asc;
        }
    }

    /// Reset status, employee and category filters to "All".
    pub fn clear_filters(&mut self) {
        self.status = None;
        self.employee = None;
        self.category = None;
    }
}

fn compare(a: &TaskView, b: &TaskView, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Employee => a.employee_name.cmp(&b.employee_name),
        SortField::Status => a.status.label().cmp(b.status.label()),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
    }
}

/// Distinct employee names, sorted.
pub fn employee_names(tasks: &[TaskView]) -> Vec<String> {
    let names: BTreeSet<&str> = tasks.iter().map(|t| t.employee_name.as_str()).collect();
    names.into_iter().map(String::from).collect()
}

/// Distinct categories, sorted.
pub fn categories(tasks: &[TaskView]) -> Vec<String> {
    let cats: BTreeSet<&str> = tasks.iter().map(|t| t.category.as_str()).collect();
    cats.into_iter().map(String::from).collect()
}

/// Number of tasks per status, in `TaskStatus::ALL` order.
pub fn status_counts<'a>(tasks: impl IntoIterator<Item = &'a TaskView>) -> [(TaskStatus, usize); 4] {
    let mut counts = TaskStatus::ALL.map(|s| (s, 0usize));
    for task in tasks {
        if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == task.status) {
            entry.1 += 1;
        }
    }
    counts
}

/// Step through `None` followed by each option, wrapping around.
/// Used by the pickers that cycle a filter through "All" and its values.
pub fn cycle_option<T: Clone + PartialEq>(current: &Option<T>, options: &[T], forward: bool) -> Option<T> {
    let len = options.len() + 1;
    let pos = match current {
        None => 0,
        Some(v) => options.iter().position(|o| o == v).map_or(0, |i| i + 1),
    };
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    if next == 0 {
        None
    } else {
        Some(options[next - 1].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::Store;
    use chrono::NaiveDate;

    fn views() -> Vec<TaskView> {
        Database::load(&Store::seeded().unwrap()).unwrap().flatten()
    }

    fn view(id: &str, name: &str, status: TaskStatus, date: (i32, u32, u32), priority: Priority) -> TaskView {
        TaskView {
            id: id.into(),
            employee_id: id.into(),
            employee_name: name.into(),
            title: format!("title {id}"),
            description: String::new(),
            status,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: "General".into(),
            priority,
        }
    }

    #[test]
    fn test_all_filters_return_everything() {
        let tasks = views();
        let query = TaskQuery { sort: SortField::Employee, direction: SortDirection::Asc, ..Default::default() };
        assert_eq!(query.apply(&tasks).len(), tasks.len());
    }

    #[test]
    fn test_status_filter_returns_exact_subset() {
        let tasks = views();
        for status in TaskStatus::ALL {
            let query = TaskQuery { status: Some(status), ..Default::default() };
            let got = query.apply(&tasks);
            let expected = tasks.iter().filter(|t| t.status == status).count();
            assert_eq!(got.len(), expected);
            assert!(got.iter().all(|t| t.status == status));
        }
    }

    #[test]
    fn test_employee_and_category_filters() {
        let tasks = views();
        let query = TaskQuery {
            employee: Some("Kabir".into()),
            category: Some("DevOps".into()),
            ..Default::default()
        };
        let got = query.apply(&tasks);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Setup Monitoring");
    }

    #[test]
    fn test_search_matches_title_or_description() {
        let tasks = views();
        let query = TaskQuery { search: "GRAFANA".into(), ..Default::default() };
        let got = query.apply(&tasks);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Setup Monitoring");

        let query = TaskQuery { search: "fix".into(), ..Default::default() };
        assert!(query.apply(&tasks).len() >= 3);
    }

    #[test]
    fn test_date_sort_both_directions() {
        let tasks = views();
        let mut query = TaskQuery::default();
        let desc = query.apply(&tasks);
        assert!(desc.windows(2).all(|w| w[0].date >= w[1].date));

        query.direction = SortDirection::Asc;
        let asc = query.apply(&tasks);
        assert!(asc.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_status_sort_is_lexicographic_on_labels() {
        let tasks = vec![
            view("a", "A", TaskStatus::New, (2025, 5, 1), Priority::Low),
            view("b", "B", TaskStatus::Active, (2025, 5, 1), Priority::Low),
            view("c", "C", TaskStatus::Failed, (2025, 5, 1), Priority::Low),
            view("d", "D", TaskStatus::Completed, (2025, 5, 1), Priority::Low),
        ];
        let query = TaskQuery { sort: SortField::Status, direction: SortDirection::Asc, ..Default::default() };
        let labels: Vec<&str> = query.apply(&tasks).iter().map(|t| t.status.label()).collect();
        assert_eq!(labels, ["Completed", "Failed", "In Progress", "New"]);
    }

    #[test]
    fn test_priority_sort_uses_rank_and_is_stable() {
        let tasks = vec![
            view("a", "A", TaskStatus::New, (2025, 5, 1), Priority::Medium),
            view("b", "B", TaskStatus::New, (2025, 5, 1), Priority::High),
            view("c", "C", TaskStatus::New, (2025, 5, 1), Priority::Low),
            view("d", "D", TaskStatus::New, (2025, 5, 1), Priority::High),
        ];
        let query = TaskQuery { sort: SortField::Priority, direction: SortDirection::Desc, ..Default::default() };
        let ids: Vec<&str> = query.apply(&tasks).iter().map(|t| t.id.as_str()).collect();
        // Reversing the comparison keeps equal elements in input order.
        assert_eq!(ids, ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_select_sort_toggles_or_resets() {
        let mut query = TaskQuery::default();
        query.select_sort(SortField::Date);
        assert_eq!(query.direction, SortDirection::Asc);
        query.select_sort(SortField::Employee);
        assert_eq!((query.sort, query.direction), (SortField::Employee, SortDirection::Asc));
        query.select_sort(SortField::Employee);
        assert_eq!(query.direction, SortDirection::Desc);
    }

    #[test]
    fn test_distinct_names_and_categories() {
        let tasks = views();
        assert_eq!(employee_names(&tasks), ["Arjun", "Kabir", "Neha", "Riya", "Tanvi"]);
        let cats = categories(&tasks);
        assert!(cats.windows(2).all(|w| w[0] < w[1]));
        assert!(cats.contains(&"DevOps".to_string()));
    }

    #[test]
    fn test_status_counts() {
        let tasks = views();
        let counts = status_counts(&tasks);
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, tasks.len());
        assert_eq!(counts[0], (TaskStatus::New, 8));
        assert_eq!(counts[2], (TaskStatus::Completed, 6));
        assert_eq!(counts[3], (TaskStatus::Failed, 5));
    }

    #[test]
    fn test_cycle_option() {
        let opts = ["a".to_string(), "b".to_string()];
        let mut cur = None;
        cur = cycle_option(&cur, &opts, true);
        assert_eq!(cur.as_deref(), Some("a"));
        cur = cycle_option(&cur, &opts, true);
        cur = cycle_option(&cur, &opts, true);
        assert_eq!(cur, None);
        assert_eq!(cycle_option(&cur, &opts, false).as_deref(), Some("b"));
    }
}
