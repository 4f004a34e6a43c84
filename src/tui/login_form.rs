//! Login form for the terminal user interface.

use crate::tui::input::InputField;

pub const EMAIL_FIELD: usize = 0;
pub const PASSWORD_FIELD: usize = 1;

/// Email and password inputs plus the last failure message.
pub struct LoginForm {
    pub email: InputField,
    pub password: InputField,
    pub current_field: usize,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let mut form = Self {
            email: InputField::new(),
            password: InputField::masked(),
            current_field: EMAIL_FIELD,
            error: None,
        };
        form.email.active = true;
        form
    }

    fn active_input(&mut self) -> &mut InputField {
        if self.current_field == PASSWORD_FIELD {
            &mut self.password
        } else {
            &mut self.email
        }
    }

    /// Toggle focus between the two fields.
    pub fn switch_field(&mut self) {
        self.current_field = if self.current_field == EMAIL_FIELD { PASSWORD_FIELD } else { EMAIL_FIELD };
        self.email.active = self.current_field == EMAIL_FIELD;
        self.password.active = self.current_field == PASSWORD_FIELD;
    }

    pub fn handle_char(&mut self, c: char) {
        self.error = None;
        self.active_input().handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.error = None;
        self.active_input().handle_backspace();
    }

    pub fn handle_left_right(&mut self, right: bool) {
        let field = self.active_input();
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    /// Forget what was typed, as after a successful login or a logout.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = LoginForm::new();
        for c in "a@b.c".chars() {
            form.handle_char(c);
        }
        form.switch_field();
        form.handle_char('1');
        assert_eq!(form.email.value, "a@b.c");
        assert_eq!(form.password.value, "1");
        assert_eq!(form.password.display(), "•");
        assert!(form.password.active && !form.email.active);
    }

    #[test]
    fn test_editing_clears_error() {
        let mut form = LoginForm::new();
        form.error = Some("Invalid credentials".into());
        form.handle_char('x');
        assert!(form.error.is_none());
        form.clear();
        assert!(form.email.value.is_empty());
    }
}
