use crate::Position;

/// What the assistant needs from a host editor.
pub trait Editor {
    /// Text of line `n` without its line ending
    fn line(&self, n: usize) -> Option<String>;

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, pos: Position);

    /// Replace the text between `from` and `to` (same line, half-open) with `text`
    fn replace_range(&mut self, text: &str, from: Position, to: Position);

    /// Character offset of `pos` from the start of the document
    fn pos_to_offset(&self, pos: Position) -> usize;
}

/// A plain in-memory document, one `String` per line.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
    cursor: Position,
    trailing_newline: bool,
    crlf: bool,
}

impl LineBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor: Position::default(),
            trailing_newline: text.ends_with('\n'),
            crlf: text.contains("\r\n"),
        }
    }

    /// The document text, with the line terminator it was read with
    pub fn to_text(&self) -> String {
        let ending = self.line_ending();
        let mut text = self.lines.join(ending);
        if self.trailing_newline {
            text.push_str(ending);
        }
        text
    }

    pub fn line_ending(&self) -> &'static str {
        if self.crlf {
            "\r\n"
        } else {
            "\n"
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Insert `text` (no newlines) at the cursor and move the cursor past it
    pub fn insert(&mut self, text: &str) {
        let at = self.cursor;
        self.replace_range(text, at, at);
        self.cursor.column = at.column + text.chars().count();
    }

    /// Clamp a position to the existing lines and columns
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len().saturating_sub(1));
        let width = self.lines.get(line).map_or(0, |l| l.chars().count());
        Position::new(line, pos.column.min(width))
    }
}

fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(idx, _)| idx)
}

impl Editor for LineBuffer {
    fn line(&self, n: usize) -> Option<String> {
        self.lines.get(n).cloned()
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let Some(line) = self.lines.get_mut(from.line) else {
            return;
        };
        let start = byte_index(line, from.column);
        let end = if to.line == from.line {
            byte_index(line, to.column.max(from.column))
        } else {
            line.len()
        };
        line.replace_range(start..end, text);
    }

    fn pos_to_offset(&self, pos: Position) -> usize {
        let ending = self.line_ending().len();
        let before: usize = self
            .lines
            .iter()
            .take(pos.line)
            .map(|l| l.chars().count() + ending)
            .sum();
        before + pos.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_trailing_newline() {
        let buffer = LineBuffer::from_text("one\ntwo\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.to_text(), "one\ntwo\n");
        assert_eq!(LineBuffer::from_text("x").to_text(), "x");
        assert_eq!(LineBuffer::from_text("").line_count(), 1);
    }

    #[test]
    fn test_round_trip_keeps_crlf() {
        let mut buffer = LineBuffer::from_text("Helo\r\nwrold\r\n");
        assert_eq!(buffer.line(0).unwrap(), "Helo");
        assert_eq!(buffer.line_ending(), "\r\n");
        assert_eq!(buffer.to_text(), "Helo\r\nwrold\r\n");

        buffer.replace_range("Hello", Position::new(0, 0), Position::new(0, 4));
        assert_eq!(buffer.to_text(), "Hello\r\nwrold\r\n");
        assert_eq!(LineBuffer::from_text("a\r\nb").to_text(), "a\r\nb");
    }

    #[test]
    fn test_replace_range_uses_character_columns() {
        let mut buffer = LineBuffer::from_text("naïve helo");
        buffer.replace_range("hello", Position::new(0, 6), Position::new(0, 10));
        assert_eq!(buffer.line(0).unwrap(), "naïve hello");
    }

    #[test]
    fn test_insert_moves_cursor() {
        let mut buffer = LineBuffer::from_text("ab");
        buffer.set_cursor(Position::new(0, 1));
        buffer.insert("XY");
        assert_eq!(buffer.line(0).unwrap(), "aXYb");
        assert_eq!(buffer.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut buffer = LineBuffer::from_text("short\nlonger line");
        buffer.set_cursor(Position::new(9, 99));
        assert_eq!(buffer.cursor(), Position::new(1, 11));
    }

    #[test]
    fn test_pos_to_offset() {
        let buffer = LineBuffer::from_text("ab\ncdé\nf");
        assert_eq!(buffer.pos_to_offset(Position::new(0, 1)), 1);
        assert_eq!(buffer.pos_to_offset(Position::new(1, 0)), 3);
        assert_eq!(buffer.pos_to_offset(Position::new(2, 0)), 7);

        let crlf = LineBuffer::from_text("ab\r\ncd");
        assert_eq!(crlf.pos_to_offset(Position::new(1, 1)), 5);
    }
}
