/// Query input line of the palette
#[derive(Debug, Default)]
pub struct QueryInput {
    pub query: String,
    /// Byte offset of the cursor, always on a char boundary
    pub cursor_pos: usize,
    pub focused: bool,
}

impl QueryInput {
    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) -> bool {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        true
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.query.remove(prev);
        self.cursor_pos = prev;
        true
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.query.len() {
            return false;
        }
        self.query.remove(self.cursor_pos);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.cursor_pos = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
        }
    }

    pub fn home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_keeps_cursor_on_char_boundaries() {
        let mut input = QueryInput::default();
        for c in "café".chars() {
            input.insert(c);
        }
        assert_eq!(input.cursor_pos, "café".len());

        assert!(input.backspace());
        assert_eq!(input.query, "caf");

        input.move_left();
        input.insert('é');
        assert_eq!(input.query, "caéf");

        input.home();
        assert!(!input.backspace());
        assert!(input.delete());
        assert_eq!(input.query, "aéf");

        input.move_right();
        input.move_right();
        assert_eq!(input.cursor_pos, "aé".len());
        input.end();
        assert!(!input.delete());
    }
}
