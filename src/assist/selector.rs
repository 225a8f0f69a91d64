use crate::{Position, WordSpan};

/// Index of the word an action at `cursor` should target.
///
/// In order of preference:
/// 1. the first word whose `[from, to]` contains the cursor column, both ends
///    inclusive, so a cursor just past the last letter still counts;
/// 2. the nearest word ending at or before the cursor;
/// 3. the nearest word starting after the cursor;
/// 4. the first word.
///
/// Returns `None` only for an empty list.
pub fn closest_index(words: &[WordSpan], cursor: Position) -> Option<usize> {
    let ch = cursor.column;

    if let Some(inside) = words
        .iter()
        .position(|w| w.from.column <= ch && ch <= w.to.column)
    {
        return Some(inside);
    }

    let left = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.to.column <= ch)
        .min_by_key(|(_, w)| ch - w.to.column)
        .map(|(i, _)| i);
    if left.is_some() {
        return left;
    }

    let right = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.from.column > ch)
        .min_by_key(|(_, w)| w.from.column - ch)
        .map(|(i, _)| i);
    if right.is_some() {
        return right;
    }

    if words.is_empty() {
        None
    } else {
        Some(0)
    }
}

pub fn closest(words: &[WordSpan], cursor: Position) -> Option<&WordSpan> {
    closest_index(words, cursor).map(|i| &words[i])
}
