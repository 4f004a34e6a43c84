//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used by the admin board to
//! assign a new task to an employee, including field ordering and the
//! conversion into a `TaskDraft` for validation.

use crate::{
    db::Database,
    error::FieldErrors,
    fields::{FormField, Priority, CATEGORIES},
    task::TaskDraft,
    tui::input::InputField,
};

/// Global order constants for the create form fields.
pub const EMPLOYEE_GLOBAL_ORDER: usize = 0;
pub const TITLE_GLOBAL_ORDER: usize = 1;
pub const DESCRIPTION_GLOBAL_ORDER: usize = 2;
pub const DATE_GLOBAL_ORDER: usize = 3;
pub const CATEGORY_GLOBAL_ORDER: usize = 4;
pub const PRIORITY_GLOBAL_ORDER: usize = 5;

const FIELD_COUNT: usize = 6;

/// Form for creating a task.
///
/// Selectors hold an index where 0 means "nothing chosen yet", matching the
/// placeholder option of each picker.
pub struct TaskForm {
    pub employee_selector: usize,
    pub title: InputField,
    pub description: InputField,
    pub date: InputField,
    pub category_selector: usize,
    pub priority_selector: usize,
    pub current_field: usize,
    /// `(id, first name)` of every employee, in stored order.
    pub employees: Vec<(String, String)>,
    pub priorities: Vec<Option<Priority>>,
    pub errors: FieldErrors,
}

impl TaskForm {
    /// Create an empty form listing the employees of `db`.
    pub fn new(db: &Database) -> Self {
        let mut form = Self {
            employee_selector: 0,
            title: InputField::new(),
            description: InputField::new(),
            date: InputField::new(),
            category_selector: 0,
            priority_selector: 0,
            current_field: EMPLOYEE_GLOBAL_ORDER,
            employees: db
                .employees
                .iter()
                .map(|e| (e.id.clone(), e.first_name.clone()))
                .collect(),
            priorities: vec![None, Some(Priority::Low), Some(Priority::Medium), Some(Priority::High)],
            errors: FieldErrors::new(),
        };
        form.update_active_field();
        form
    }

    fn fields_mut(&mut self) -> [&mut InputField; 3] {
        [&mut self.title, &mut self.description, &mut self.date]
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_GLOBAL_ORDER => Some(&mut self.title),
            DESCRIPTION_GLOBAL_ORDER => Some(&mut self.description),
            DATE_GLOBAL_ORDER => Some(&mut self.date),
            _ => None,
        }
    }

    /// Whether the focused field is a picker rather than a text input.
    pub fn on_selector(&self) -> bool {
        matches!(
            self.current_field,
            EMPLOYEE_GLOBAL_ORDER | CATEGORY_GLOBAL_ORDER | PRIORITY_GLOBAL_ORDER
        )
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        for field in self.fields_mut() {
            field.active = false;
        }
        if let Some(field) = self.active_input() {
            field.active = true;
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    /// Move the cursor in a text field, or step the focused picker.
    pub fn handle_left_right(&mut self, right: bool) {
        let step = |current: usize, len: usize| {
            if right {
                (current + 1) % len
            } else {
                (current + len - 1) % len
            }
        };
        match self.current_field {
            EMPLOYEE_GLOBAL_ORDER => {
                self.employee_selector = step(self.employee_selector, self.employees.len() + 1);
            }
            CATEGORY_GLOBAL_ORDER => {
                self.category_selector = step(self.category_selector, CATEGORIES.len() + 1);
            }
            PRIORITY_GLOBAL_ORDER => {
                self.priority_selector = step(self.priority_selector, self.priorities.len());
            }
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    pub fn employee_label(&self) -> String {
        match self.employee_selector.checked_sub(1).and_then(|i| self.employees.get(i)) {
            Some((id, name)) => format!("{} ({})", name, id),
            None => "Select an employee".to_string(),
        }
    }

    pub fn category_label(&self) -> &'static str {
        self.category_selector
            .checked_sub(1)
            .and_then(|i| CATEGORIES.get(i).copied())
            .unwrap_or("Select a category")
    }

    pub fn priority_label(&self) -> &'static str {
        match self.priorities.get(self.priority_selector).copied().flatten() {
            Some(p) => p.label(),
            None => "Default (Medium)",
        }
    }

    /// Collect the current input for validation.
    pub fn to_draft(&self) -> TaskDraft {
        let employee_id = self
            .employee_selector
            .checked_sub(1)
            .and_then(|i| self.employees.get(i))
            .map(|(id, _)| id.clone())
            .unwrap_or_default();
        let category = self
            .category_selector
            .checked_sub(1)
            .and_then(|i| CATEGORIES.get(i))
            .map(|c| c.to_string())
            .unwrap_or_default();
        TaskDraft {
            employee_id,
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            date: self.date.value.clone(),
            category,
            priority: self.priorities.get(self.priority_selector).copied().flatten(),
        }
    }

    /// Clear every field after a successful submission. The employee list stays.
    pub fn reset(&mut self) {
        self.employee_selector = 0;
        for field in self.fields_mut() {
            field.clear();
        }
        self.category_selector = 0;
        self.priority_selector = 0;
        self.current_field = EMPLOYEE_GLOBAL_ORDER;
        self.errors = FieldErrors::new();
        self.update_active_field();
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn form() -> TaskForm {
        let store = Store::seeded().unwrap();
        TaskForm::new(&Database::load(&store).unwrap())
    }

    #[test]
    fn test_empty_form_draft() {
        let form = form();
        assert_eq!(form.employees.len(), 5);
        let draft = form.to_draft();
        assert!(draft.employee_id.is_empty());
        assert!(draft.category.is_empty());
        assert_eq!(draft.priority, None);
        assert_eq!(form.employee_label(), "Select an employee");
    }

    #[test]
    fn test_selectors_and_text_fields() {
        let mut form = form();
        form.handle_left_right(true);
        form.handle_left_right(true);
        assert_eq!(form.to_draft().employee_id, "emp002");

        form.next_field();
        assert!(form.title.active);
        for c in "Fix bug".chars() {
            form.handle_char(c);
        }
        form.next_field();
        form.next_field();
        assert!(form.date.active);
        assert!(!form.title.active);

        form.next_field();
        form.handle_left_right(false);
        assert_eq!(form.category_label(), CATEGORIES[CATEGORIES.len() - 1]);

        form.next_field();
        form.handle_left_right(false);
        assert_eq!(form.priority_label(), "High");

        let draft = form.to_draft();
        assert_eq!(draft.title, "Fix bug");
        assert_eq!(draft.priority, Some(Priority::High));
        assert_eq!(draft.category, CATEGORIES[CATEGORIES.len() - 1]);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut form = form();
        form.prev_field();
        assert_eq!(form.current_field, PRIORITY_GLOBAL_ORDER);
        assert!(form.on_selector());
        form.next_field();
        assert_eq!(form.current_field, EMPLOYEE_GLOBAL_ORDER);
    }

    #[test]
    fn test_reset_keeps_employees() {
        let mut form = form();
        form.handle_left_right(true);
        form.next_field();
        form.handle_char('x');
        form.reset();
        assert_eq!(form.employee_selector, 0);
        assert!(form.title.value.is_empty());
        assert_eq!(form.employees.len(), 5);
    }
}
