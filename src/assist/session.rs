//! Cycling through the misspelled words of one line.
//!
//! The first `open` on a line targets the word closest to the cursor; each
//! further `open` on the same line moves to the next word, wrapping around.
//! The session forgets everything when the document changes, when the cursor
//! leaves the line, or when it sits idle longer than its timeout.

use super::selector::closest_index;
use crate::checker::{scan_line, Oracle};
use crate::{Position, WordSpan};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Source of the current time for expiry checks.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Populated,
    Selected,
}

/// At most one pending expiry; arming replaces the previous deadline.
#[derive(Debug, Default)]
struct Expiry {
    deadline: Option<Instant>,
}

impl Expiry {
    fn arm(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn fired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

pub struct CyclingSession<C: Clock = SystemClock> {
    words: Vec<WordSpan>,
    selected: Option<usize>,
    line_checked: Option<usize>,
    expiry: Expiry,
    timeout: Duration,
    clock: C,
}

impl CyclingSession<SystemClock> {
    pub fn new(timeout: Duration) -> Self {
        Self::with_clock(timeout, SystemClock)
    }
}

impl Default for CyclingSession<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl<C: Clock> CyclingSession<C> {
    pub fn with_clock(timeout: Duration, clock: C) -> Self {
        Self {
            words: Vec::new(),
            selected: None,
            line_checked: None,
            expiry: Expiry::default(),
            timeout,
            clock,
        }
    }

    /// Drop all cached words and cancel the pending expiry
    pub fn invalidate(&mut self) {
        if self.line_checked.is_some() {
            debug!(line = ?self.line_checked, "cycling session reset");
        }
        self.words.clear();
        self.selected = None;
        self.line_checked = None;
        self.expiry.cancel();
    }

    /// The cursor moved; anything cached for another line is stale.
    pub fn cursor_moved(&mut self, cursor: Position) {
        if self.line_checked.is_some_and(|line| line != cursor.line) {
            self.invalidate();
        }
    }

    /// Pick the word to offer for `cursor`, advancing on repeated calls.
    ///
    /// `line_text` must be the current text of `cursor.line`. Returns `None`
    /// when the line has no misspelled words.
    pub fn open<O: Oracle + ?Sized>(
        &mut self,
        cursor: Position,
        line_text: &str,
        oracle: &O,
    ) -> Option<&WordSpan> {
        self.expire_if_due();

        if self.line_checked != Some(cursor.line) {
            self.invalidate();
            let words = scan_line(oracle, line_text, cursor.line);
            if words.is_empty() {
                return None;
            }
            self.words = words;
            self.line_checked = Some(cursor.line);
        }

        let next = match self.selected {
            Some(current) => (current + 1) % self.words.len(),
            None => closest_index(&self.words, cursor)?,
        };
        debug!(
            line = cursor.line,
            index = next,
            count = self.words.len(),
            "cycling session selected word"
        );

        self.selected = Some(next);
        self.expiry.arm(self.clock.now() + self.timeout);
        self.words.get(next)
    }

    pub fn state(&mut self) -> SessionState {
        self.expire_if_due();
        match (self.line_checked, self.selected) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::Populated,
            (Some(_), Some(_)) => SessionState::Selected,
        }
    }

    /// Currently selected word, if the session is still alive
    pub fn selected(&mut self) -> Option<&WordSpan> {
        self.expire_if_due();
        self.selected.and_then(|i| self.words.get(i))
    }

    pub fn selected_index(&mut self) -> Option<usize> {
        self.expire_if_due();
        self.selected
    }

    pub fn line_checked(&self) -> Option<usize> {
        self.line_checked
    }

    fn expire_if_due(&mut self) {
        if self.expiry.fired(self.clock.now()) {
            debug!("cycling session expired");
            self.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::SpellChecker;

    const LINE: &str = "Helo wrold teh end";

    fn checker() -> SpellChecker {
        SpellChecker::from_words(&["hello", "world", "the", "end", "fine"]).unwrap()
    }

    fn session() -> (CyclingSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (CyclingSession::with_clock(DEFAULT_TIMEOUT, clock.clone()), clock)
    }

    fn open_word(
        session: &mut CyclingSession<ManualClock>,
        checker: &SpellChecker,
        column: usize,
    ) -> Option<String> {
        session
            .open(Position::new(0, column), LINE, checker)
            .map(|w| w.word.clone())
    }

    #[test]
    fn test_starts_empty() {
        let (mut session, _) = session();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_first_open_uses_proximity() {
        let checker = checker();
        let (mut session, _) = session();
        assert_eq!(open_word(&mut session, &checker, 7).as_deref(), Some("wrold"));
        assert_eq!(session.state(), SessionState::Selected);
        assert_eq!(session.line_checked(), Some(0));
    }

    #[test]
    fn test_repeated_open_cycles_and_wraps() {
        let checker = checker();
        let (mut session, clock) = session();
        let mut visited = Vec::new();
        for _ in 0..4 {
            session.open(Position::new(0, 7), LINE, &checker);
            visited.push(session.selected_index().unwrap());
            clock.advance(Duration::from_millis(200));
        }
        assert_eq!(visited, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_cursor_position_ignored_while_cycling() {
        let checker = checker();
        let (mut session, _) = session();
        assert_eq!(open_word(&mut session, &checker, 0).as_deref(), Some("Helo"));
        // same line, different column: still advances
        assert_eq!(open_word(&mut session, &checker, 0).as_deref(), Some("wrold"));
    }

    #[test]
    fn test_expiry_restarts_from_cursor() {
        let checker = checker();
        let (mut session, clock) = session();
        assert_eq!(open_word(&mut session, &checker, 0).as_deref(), Some("Helo"));
        assert_eq!(open_word(&mut session, &checker, 0).as_deref(), Some("wrold"));

        clock.advance(Duration::from_millis(1000));
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(open_word(&mut session, &checker, 0).as_deref(), Some("Helo"));
    }

    #[test]
    fn test_each_step_restarts_the_timer() {
        let checker = checker();
        let (mut session, clock) = session();
        open_word(&mut session, &checker, 0);
        for _ in 0..5 {
            clock.advance(Duration::from_millis(900));
            open_word(&mut session, &checker, 0);
        }
        assert_eq!(session.state(), SessionState::Selected);
        clock.advance(Duration::from_millis(999));
        assert_eq!(session.state(), SessionState::Selected);
        clock.advance(Duration::from_millis(1));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_moving_to_another_line_resets() {
        let checker = checker();
        let (mut session, _) = session();
        open_word(&mut session, &checker, 0);
        open_word(&mut session, &checker, 0);

        session.cursor_moved(Position::new(0, 3));
        assert_eq!(session.state(), SessionState::Selected);

        session.cursor_moved(Position::new(1, 0));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_open_on_new_line_rescans() {
        let checker = checker();
        let (mut session, _) = session();
        open_word(&mut session, &checker, 0);
        let word = session
            .open(Position::new(4, 0), "fine speling", &checker)
            .cloned();
        assert_eq!(word, Some(WordSpan::new("speling", 4, 5)));
        assert_eq!(session.line_checked(), Some(4));
    }

    #[test]
    fn test_clean_line_stays_empty() {
        let checker = checker();
        let (mut session, _) = session();
        assert!(session.open(Position::new(2, 0), "the end", &checker).is_none());
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.line_checked(), None);
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let checker = checker();
        let (mut session, clock) = session();
        open_word(&mut session, &checker, 0);
        session.invalidate();
        assert_eq!(session.state(), SessionState::Empty);

        // a cancelled deadline must not fire later on a fresh selection
        clock.advance(Duration::from_millis(500));
        assert_eq!(open_word(&mut session, &checker, 7).as_deref(), Some("wrold"));
        clock.advance(Duration::from_millis(600));
        assert_eq!(session.state(), SessionState::Selected);
    }
}
