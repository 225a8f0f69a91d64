use super::editor::Editor;
use crate::{Position, WordSpan};

/// Replace `span` with `suggestion` and put the cursor back where it belongs.
///
/// A cursor saved on the same line and strictly right of the word's start
/// (inside the word included) shifts by the change in length; any other
/// cursor is restored as it was. Returns the new cursor.
pub fn apply<E: Editor + ?Sized>(
    editor: &mut E,
    span: &WordSpan,
    suggestion: &str,
    saved_cursor: Position,
) -> Position {
    editor.replace_range(suggestion, span.from, span.to);

    let cursor = if saved_cursor.line == span.from.line && saved_cursor.column > span.from.column {
        let old_len = span.word.chars().count();
        let new_len = suggestion.chars().count();
        let column = (saved_cursor.column + new_len).saturating_sub(old_len);
        Position::new(saved_cursor.line, column)
    } else {
        saved_cursor
    };

    editor.set_cursor(cursor);
    cursor
}
