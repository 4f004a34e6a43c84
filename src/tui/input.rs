//! Input field handling for the terminal user interface.

/// A single-line text input with a cursor counted in characters.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
    /// Render as bullets instead of the typed text.
    pub masked: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty input field whose text is hidden when rendered.
    pub fn masked() -> Self {
        Self { masked: true, ..Self::default() }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Empty the field, keeping its masking.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Text to draw: the value, or one bullet per character when masked.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.char_len())
        } else {
            self.value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_with_multibyte_chars() {
        let mut field = InputField::new();
        for c in "Neé".chars() {
            field.handle_char(c);
        }
        field.move_cursor_left();
        field.handle_char('x');
        assert_eq!(field.value, "Nexé");
        field.handle_backspace();
        field.handle_delete();
        assert_eq!(field.value, "Ne");
        assert_eq!(field.cursor, 2);
    }

    #[test]
    fn test_masked_display() {
        let mut field = InputField::masked();
        field.handle_char('1');
        field.handle_char('2');
        assert_eq!(field.display(), "••");
        assert_eq!(field.value, "12");
        field.clear();
        assert!(field.masked);
        assert_eq!(field.display(), "");
    }
}
