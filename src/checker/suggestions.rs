use crate::checker::dictionary::Dictionary;

/// How many same-length words the short-word fallback looks at
const SHORT_WORD_SCAN_LIMIT: usize = 200;

/// Generate spelling suggestions for a lowercase word, best first
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    let len = word.chars().count();
    let mut candidates: Vec<(usize, String)> = Vec::new();

    let push = |candidates: &mut Vec<(usize, String)>, candidate: String, max_distance| {
        if candidate == word || candidates.iter().any(|(_, c)| *c == candidate) {
            return;
        }
        let distance = edit_distance(word, &candidate);
        if distance <= max_distance {
            candidates.push((distance, candidate));
        }
    };

    // 1. Common single-edit transformations
    for transform in generate_transformations(word) {
        if dictionary.contains(&transform) {
            push(&mut candidates, transform, 2);
        }
    }

    // 2. Prefix matching
    if len >= 3 {
        for candidate in dictionary.words_with_prefix(prefix(word, 3)) {
            push(&mut candidates, candidate, 2);
        }
    }

    // 3. Shorter prefix when still short of suggestions
    if candidates.len() < max_suggestions && len >= 2 {
        for candidate in dictionary.words_with_prefix(prefix(word, 2)) {
            push(&mut candidates, candidate, 3);
        }
    }

    // 4. Very short words: scan words of similar length
    if candidates.len() < max_suggestions && len <= 3 {
        for candidate in dictionary.words_near_length(len, SHORT_WORD_SCAN_LIMIT) {
            push(&mut candidates, candidate, 2);
        }
    }

    // stable sort keeps discovery order among equal distances
    candidates.sort_by_key(|(distance, _)| *distance);
    candidates
        .into_iter()
        .map(|(_, candidate)| candidate)
        .take(max_suggestions)
        .collect()
}

fn prefix(word: &str, chars: usize) -> &str {
    match word.char_indices().nth(chars) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}

/// Edit distance where an adjacent swap counts as one edit
/// (optimal string alignment)
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut before_previous = vec![0; b_chars.len() + 1];
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            let mut best = (previous[j + 1] + 1) // deletion
                .min(current[j] + 1) // insertion
                .min(previous[j] + cost); // substitution
            if i > 0 && j > 0 && *a_char == b_chars[j - 1] && a_chars[i - 1] == *b_char {
                best = best.min(before_previous[j - 1] + 1); // transposition
            }
            current[j + 1] = best;
        }
        std::mem::swap(&mut before_previous, &mut previous);
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Generate common transformations of a word
fn generate_transformations(word: &str) -> Vec<String> {
    let mut transformations = Vec::new();
    let chars: Vec<char> = word.chars().collect();

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        let mut new_word = chars.clone();
        new_word.swap(i, i + 1);
        transformations.push(new_word.iter().collect());
    }

    // Insertions
    for i in 0..=chars.len() {
        for ch in 'a'..='z' {
            let mut new_word = chars.clone();
            new_word.insert(i, ch);
            transformations.push(new_word.iter().collect());
        }
    }

    // Deletions
    for i in 0..chars.len() {
        let mut new_word = chars.clone();
        new_word.remove(i);
        transformations.push(new_word.iter().collect());
    }

    // Replacements (common typos)
    let common_replacements = [
        ('a', 'e'),
        ('e', 'i'),
        ('i', 'o'),
        ('o', 'u'),
        ('b', 'v'),
        ('c', 'k'),
        ('f', 'v'),
        ('g', 'j'),
        ('m', 'n'),
        ('s', 'z'),
        ('t', 'd'),
    ];

    for (i, &ch) in chars.iter().enumerate() {
        for &(from, to) in &common_replacements {
            let replacement = if ch == from {
                to
            } else if ch == to {
                from
            } else {
                continue;
            };
            let mut new_word = chars.clone();
            new_word[i] = replacement;
            transformations.push(new_word.iter().collect());
        }
    }

    transformations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> Dictionary {
        Dictionary::from_words(&[
            "hello", "help", "held", "world", "word", "the", "then", "tea", "receive",
        ])
        .unwrap()
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("hello", "hello"), 0);
        assert_eq!(edit_distance("hello", "hallo"), 1);
        assert_eq!(edit_distance("hello", "hullo"), 1);
        assert_eq!(edit_distance("hello", "world"), 4);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn test_edit_distance_counts_swap_once() {
        assert_eq!(edit_distance("teh", "the"), 1);
        assert_eq!(edit_distance("wrold", "world"), 1);
        assert_eq!(edit_distance("teh", "tea"), 1);
        assert_eq!(edit_distance("ab", "ba"), 1);
    }

    #[test]
    fn test_transformations() {
        let transforms = generate_transformations("hello");
        assert!(transforms.contains(&"hllo".to_string())); // deletion
        assert!(transforms.contains(&"ehllo".to_string())); // transposition
        assert!(transforms.contains(&"helllo".to_string())); // insertion
    }

    #[test]
    fn test_generate_ranks_closest_first() {
        let suggestions = generate("helo", &dict(), 10);
        assert_eq!(suggestions.first().map(String::as_str), Some("hello"));
        assert!(suggestions.contains(&"help".to_string()));
        assert!(!suggestions.contains(&"world".to_string()));
    }

    #[test]
    fn test_generate_transposition() {
        assert_eq!(generate("wrold", &dict(), 1), vec!["world".to_string()]);
        assert_eq!(generate("recieve", &dict(), 1), vec!["receive".to_string()]);
    }

    #[test]
    fn test_generate_short_word() {
        let suggestions = generate("teh", &dict(), 5);
        assert_eq!(suggestions.first().map(String::as_str), Some("the"));
        assert!(suggestions.contains(&"tea".to_string()));
    }

    #[test]
    fn test_generate_respects_limit_and_nothing_close() {
        assert!(generate("helo", &dict(), 2).len() <= 2);
        assert!(generate("zzzzzzzz", &dict(), 5).is_empty());
    }
}
