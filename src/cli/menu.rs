use crate::assist::{MenuChoice, MenuPresenter, MenuRequest};
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use tracing::warn;

const ADD_TO_DICTIONARY: &str = "Add to dictionary";

/// Correction menu drawn in the terminal with arrow-key selection.
pub struct TerminalMenu {
    term: Term,
    theme: ColorfulTheme,
}

impl TerminalMenu {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalMenu {
    fn default() -> Self {
        Self::new()
    }
}

/// Menu rows: suggestions first, then the dictionary action
pub fn menu_items(request: &MenuRequest) -> Vec<String> {
    let mut items: Vec<String> = request.suggestions.clone();
    items.push(ADD_TO_DICTIONARY.to_string());
    items
}

/// Translate a selected row back into a choice
pub fn choice_for(request: &MenuRequest, index: usize) -> Option<MenuChoice> {
    match request.suggestions.get(index) {
        Some(suggestion) => Some(MenuChoice::Replace(suggestion.clone())),
        None if index == request.suggestions.len() => Some(MenuChoice::AddToDictionary),
        None => None,
    }
}

impl MenuPresenter for TerminalMenu {
    fn present(&mut self, request: &MenuRequest) -> Option<MenuChoice> {
        let items = menu_items(request);
        let prompt = format!(
            "'{}' (line {}, col {})",
            request.span.word, request.span.from.line, request.span.from.column
        );

        let picked = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_on_opt(&self.term);

        match picked {
            Ok(Some(index)) => choice_for(request, index),
            Ok(None) => None,
            Err(e) => {
                warn!("menu failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, WordSpan};

    fn request() -> MenuRequest {
        MenuRequest {
            span: WordSpan::new("wrold", 0, 5),
            suggestions: vec!["world".to_string(), "wold".to_string()],
            saved_cursor: Position::new(0, 7),
            anchor: 5,
        }
    }

    #[test]
    fn test_items_end_with_dictionary_action() {
        assert_eq!(menu_items(&request()), vec!["world", "wold", "Add to dictionary"]);
    }

    #[test]
    fn test_choice_for_index() {
        let request = request();
        assert_eq!(
            choice_for(&request, 1),
            Some(MenuChoice::Replace("wold".to_string()))
        );
        assert_eq!(choice_for(&request, 2), Some(MenuChoice::AddToDictionary));
        assert_eq!(choice_for(&request, 3), None);
    }
}
