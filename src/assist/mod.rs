pub mod apply;
pub mod editor;
pub mod selector;
pub mod session;

pub use editor::{Editor, LineBuffer};
pub use session::{Clock, CyclingSession, ManualClock, SessionState, SystemClock};

use crate::checker::{scan_line, Oracle};
use crate::config::MAX_MENU_SUGGESTIONS;
use crate::dict::custom::{CustomDictionary, SettingsStore};
use crate::{Position, WordSpan};
use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// A correction menu waiting for the user's pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuRequest {
    pub span: WordSpan,
    /// At most ten, best first
    pub suggestions: Vec<String>,
    /// Cursor when the menu opened; the edit is applied relative to it
    pub saved_cursor: Position,
    /// Document offset of the word, for placing the menu
    pub anchor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Replace(String),
    AddToDictionary,
}

/// Renders a [`MenuRequest`] and reports what the user picked.
pub trait MenuPresenter {
    /// `None` when the menu was dismissed
    fn present(&mut self, request: &MenuRequest) -> Option<MenuChoice>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No dictionary is loaded
    NotInitialized,
    /// The current line has nothing misspelled
    NoMisspelling,
    NoSuggestions { span: WordSpan },
    Replaced {
        span: WordSpan,
        replacement: String,
        cursor: Position,
    },
    Menu(MenuRequest),
    Added { word: String, persisted: bool },
    Dismissed,
}

/// Spell-check commands for one editor view.
///
/// Owns the view's cycling session, the dictionary (if one could be loaded)
/// and the user's custom words.
pub struct Assistant<O, S, C = SystemClock>
where
    O: Oracle,
    S: SettingsStore,
    C: Clock,
{
    oracle: Option<O>,
    store: S,
    custom: CustomDictionary,
    session: CyclingSession<C>,
    max_suggestions: usize,
}

impl<O: Oracle, S: SettingsStore> Assistant<O, S, SystemClock> {
    pub fn new(oracle: Option<O>, store: S, timeout: Duration) -> Self {
        Self::with_clock(oracle, store, timeout, SystemClock)
    }
}

impl<O: Oracle, S: SettingsStore, C: Clock> Assistant<O, S, C> {
    pub fn with_clock(mut oracle: Option<O>, store: S, timeout: Duration, clock: C) -> Self {
        let custom = CustomDictionary::load_from(&store);
        if let Some(oracle) = oracle.as_mut() {
            for word in custom.words() {
                oracle.add(word);
            }
        }
        debug!(custom_words = custom.len(), initialized = oracle.is_some(), "assistant ready");

        Self {
            oracle,
            store,
            custom,
            session: CyclingSession::with_clock(timeout, clock),
            max_suggestions: MAX_MENU_SUGGESTIONS,
        }
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max.clamp(1, MAX_MENU_SUGGESTIONS);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn custom_dictionary(&self) -> &CustomDictionary {
        &self.custom
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&mut self) -> &mut CyclingSession<C> {
        &mut self.session
    }

    /// The host reports an edit anywhere in the document
    pub fn document_changed(&mut self) {
        self.session.invalidate();
    }

    /// The host reports a cursor move
    pub fn cursor_moved(&mut self, cursor: Position) {
        self.session.cursor_moved(cursor);
    }

    /// Misspelled words on `line`, or `None` without a dictionary
    pub fn misspelled<E: Editor + ?Sized>(&self, editor: &E, line: usize) -> Option<Vec<WordSpan>> {
        let oracle = self.oracle.as_ref()?;
        let text = editor.line(line).unwrap_or_default();
        Some(scan_line(oracle, &text, line))
    }

    pub fn suggestions(&self, word: &str) -> Vec<String> {
        match &self.oracle {
            Some(oracle) => {
                let mut suggestions = oracle.suggest(word);
                suggestions.truncate(self.max_suggestions);
                suggestions
            }
            None => Vec::new(),
        }
    }

    /// Replace the word nearest the cursor with its best suggestion
    pub fn accept_top<E: Editor + ?Sized>(&mut self, editor: &mut E) -> Outcome {
        let cursor = editor.cursor();
        let Some(words) = self.misspelled(editor, cursor.line) else {
            return Outcome::NotInitialized;
        };
        let Some(span) = selector::closest(&words, cursor) else {
            return Outcome::NoMisspelling;
        };
        let Some(best) = self.suggestions(&span.word).into_iter().next() else {
            return Outcome::NoSuggestions { span: span.clone() };
        };

        self.replace(editor, span.clone(), best, cursor)
    }

    /// Target the next word for a correction menu on the cursor's line
    pub fn open_menu<E: Editor + ?Sized>(&mut self, editor: &E) -> Outcome {
        let Some(oracle) = self.oracle.as_ref() else {
            return Outcome::NotInitialized;
        };

        let cursor = editor.cursor();
        let text = editor.line(cursor.line).unwrap_or_default();
        let Some(span) = self.session.open(cursor, &text, oracle).cloned() else {
            return Outcome::NoMisspelling;
        };

        let suggestions = self.suggestions(&span.word);
        let anchor = editor.pos_to_offset(span.from);
        Outcome::Menu(MenuRequest {
            span,
            suggestions,
            saved_cursor: cursor,
            anchor,
        })
    }

    /// Carry out the user's pick from a menu opened by [`Self::open_menu`]
    pub fn choose<E: Editor + ?Sized>(
        &mut self,
        editor: &mut E,
        request: &MenuRequest,
        choice: MenuChoice,
    ) -> Result<Outcome> {
        match choice {
            MenuChoice::Replace(suggestion) => Ok(self.replace(
                editor,
                request.span.clone(),
                suggestion,
                request.saved_cursor,
            )),
            MenuChoice::AddToDictionary => self.add_to_dictionary(&request.span.word),
        }
    }

    /// Open a menu, show it, and apply whatever the user picks
    pub fn run_menu<E, P>(&mut self, editor: &mut E, presenter: &mut P) -> Result<Outcome>
    where
        E: Editor + ?Sized,
        P: MenuPresenter + ?Sized,
    {
        let request = match self.open_menu(editor) {
            Outcome::Menu(request) => request,
            other => return Ok(other),
        };
        match presenter.present(&request) {
            Some(choice) => self.choose(editor, &request, choice),
            None => Ok(Outcome::Dismissed),
        }
    }

    /// Accept `word` now and remember it for later sessions
    pub fn add_to_dictionary(&mut self, word: &str) -> Result<Outcome> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(Outcome::Added {
                word: String::new(),
                persisted: false,
            });
        }

        if let Some(oracle) = self.oracle.as_mut() {
            oracle.add(word);
        }
        // cached words may include the one just accepted
        self.session.invalidate();

        // only commit the new list once the store has it
        let mut updated = self.custom.clone();
        let persisted = updated.insert(word);
        if persisted {
            updated.save_to(&mut self.store)?;
            self.custom = updated;
            info!(word, "added word to custom dictionary");
        }

        Ok(Outcome::Added {
            word: word.to_string(),
            persisted,
        })
    }

    fn replace<E: Editor + ?Sized>(
        &mut self,
        editor: &mut E,
        span: WordSpan,
        replacement: String,
        saved_cursor: Position,
    ) -> Outcome {
        let cursor = apply::apply(editor, &span, &replacement, saved_cursor);
        self.document_changed();
        debug!(word = %span.word, replacement = %replacement, "applied suggestion");

        Outcome::Replaced {
            span,
            replacement,
            cursor,
        }
    }
}
