//! Single-line text input handling for the terminal user interface.

use unicode_width::UnicodeWidthChar;

/// A text input with a cursor measured in characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    /// Insert a character at the cursor.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character under the cursor.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    /// Move the cursor one character left.
    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right, stopping at the end.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor before the first character.
    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor after the last character.
    pub fn move_cursor_end(&mut self) {
        self.cursor = self.len();
    }

    /// The slice of text that fits in `width` terminal columns with the
    /// cursor in view, and the cursor's column inside that slice.
    ///
    /// Columns are display width, so wide characters take two.
    pub fn visible_window(&self, width: usize) -> (String, usize) {
        let widths: Vec<usize> = self.value.chars().map(|c| c.width().unwrap_or(0)).collect();
        let cursor = self.cursor.min(widths.len());
        // The cursor needs a free column after the text before it.
        let before: usize = widths[..cursor].iter().sum();
        let start = if before < width {
            0
        } else {
            let mut start = cursor;
            let mut used = 0;
            while start > 0 && used + widths[start - 1] < width {
                used += widths[start - 1];
                start -= 1;
            }
            start
        };

        let mut shown = String::new();
        let mut used = 0;
        for (c, w) in self.value.chars().zip(&widths).skip(start) {
            if used + w > width {
                break;
            }
            used += w;
            shown.push(c);
        }
        let cursor_x = widths[start..cursor].iter().sum();
        (shown, cursor_x)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}
