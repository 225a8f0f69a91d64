use super::output::describe;
use crate::assist::{Assistant, Clock, Editor, LineBuffer, MenuPresenter, SystemClock};
use crate::checker::Oracle;
use crate::dict::custom::SettingsStore;
use crate::{Outcome, Position};
use anyhow::{Context, Result};
use colored::*;
use console::Term;
use std::fs;
use std::path::PathBuf;

const HELP: &str = "\
commands:
  goto <line> <column>   move the cursor (0-based)
  accept                 replace the word nearest the cursor with its top suggestion
  menu                   open the correction menu; repeat to cycle through the line
  add <word>             add a word to the custom dictionary
  insert <text>          type text at the cursor
  show                   print the document with the cursor
  write                  save the file
  quit                   leave (unsaved edits are lost)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Goto(Position),
    Accept,
    Menu,
    Add(String),
    Insert(String),
    Show,
    Write,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim_end_matches(['\r', '\n']);
    let (name, rest) = match input.trim_start().split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (input.trim(), ""),
    };

    match name {
        "g" | "goto" => {
            let mut numbers = rest.split_whitespace().map(str::parse::<usize>);
            match (numbers.next(), numbers.next(), numbers.next()) {
                (Some(Ok(line)), Some(Ok(column)), None) => {
                    Ok(Command::Goto(Position::new(line, column)))
                }
                _ => Err("usage: goto <line> <column>".to_string()),
            }
        }
        "a" | "accept" => Ok(Command::Accept),
        "m" | "menu" => Ok(Command::Menu),
        "add" => match rest.trim() {
            "" => Err("usage: add <word>".to_string()),
            word => Ok(Command::Add(word.to_string())),
        },
        "i" | "insert" => Ok(Command::Insert(rest.to_string())),
        "s" | "show" => Ok(Command::Show),
        "w" | "write" => Ok(Command::Write),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

/// Next input line, or `None` once piped input runs out
fn read_command(term: &Term) -> Result<Option<String>> {
    if term.is_term() {
        return term.read_line().map(Some).context("Failed to read command");
    }

    let mut line = String::new();
    let read = std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read command")?;
    Ok((read > 0).then_some(line))
}

/// Interactive editing of one file.
pub struct Repl<O: Oracle, S: SettingsStore, C: Clock = SystemClock> {
    assistant: Assistant<O, S, C>,
    buffer: LineBuffer,
    path: PathBuf,
    colored: bool,
}

impl<O: Oracle, S: SettingsStore, C: Clock> Repl<O, S, C> {
    pub fn open(assistant: Assistant<O, S, C>, path: PathBuf, colored: bool) -> Result<Self> {
        let text = if path.exists() {
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?
        } else {
            String::new()
        };

        Ok(Self {
            assistant,
            buffer: LineBuffer::from_text(&text),
            path,
            colored,
        })
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn run<P: MenuPresenter>(&mut self, presenter: &mut P) -> Result<()> {
        let term = Term::stdout();

        if !self.assistant.is_initialized() {
            println!("{}", describe(&Outcome::NotInitialized, self.colored));
        }
        println!("Editing {} ('help' for commands)", self.path.display());
        self.show();

        loop {
            term.write_str("> ")?;
            let Some(input) = read_command(&term)? else {
                break;
            };

            match parse_command(&input) {
                Ok(command) => {
                    if self.execute(command, presenter)? == Flow::Exit {
                        break;
                    }
                }
                Err(message) if message.is_empty() => {}
                Err(message) => println!("{}", message),
            }
        }

        Ok(())
    }

    pub fn execute<P: MenuPresenter + ?Sized>(
        &mut self,
        command: Command,
        presenter: &mut P,
    ) -> Result<Flow> {
        match command {
            Command::Goto(pos) => {
                self.buffer.set_cursor(pos);
                self.assistant.cursor_moved(self.buffer.cursor());
                self.show_cursor_line();
            }
            Command::Accept => {
                let outcome = self.assistant.accept_top(&mut self.buffer);
                println!("{}", describe(&outcome, self.colored));
                self.show_cursor_line();
            }
            Command::Menu => {
                let outcome = self.assistant.run_menu(&mut self.buffer, presenter)?;
                println!("{}", describe(&outcome, self.colored));
                self.show_cursor_line();
            }
            Command::Add(word) => {
                let outcome = self.assistant.add_to_dictionary(&word)?;
                println!("{}", describe(&outcome, self.colored));
            }
            Command::Insert(text) => {
                self.buffer.insert(&text);
                self.assistant.document_changed();
                self.show_cursor_line();
            }
            Command::Show => self.show(),
            Command::Write => {
                fs::write(&self.path, self.buffer.to_text())
                    .with_context(|| format!("Failed to write file: {}", self.path.display()))?;
                println!("Wrote {}", self.path.display());
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn show(&self) {
        let cursor = self.buffer.cursor();
        for (n, line) in self.buffer.lines().iter().enumerate() {
            if n == cursor.line {
                self.print_line_with_cursor(n, line, cursor.column);
            } else if self.colored {
                println!("{:>4}  {}", n.to_string().dimmed(), line);
            } else {
                println!("{:>4}  {}", n, line);
            }
        }
    }

    fn show_cursor_line(&self) {
        let cursor = self.buffer.cursor();
        let line = self.buffer.line(cursor.line).unwrap_or_default();
        self.print_line_with_cursor(cursor.line, &line, cursor.column);
    }

    fn print_line_with_cursor(&self, n: usize, line: &str, column: usize) {
        let split = line
            .char_indices()
            .nth(column)
            .map_or(line.len(), |(idx, _)| idx);
        let (before, after) = line.split_at(split);
        if self.colored {
            println!("{:>4}> {}{}{}", n.to_string().cyan(), before, "|".yellow().bold(), after);
        } else {
            println!("{:>4}> {}|{}", n, before, after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::{ManualClock, MenuChoice, MenuRequest};
    use crate::checker::SpellChecker;
    use crate::dict::custom::MemorySettingsStore;
    use std::time::Duration;
    use tempfile::tempdir;

    struct PickFirst;

    impl MenuPresenter for PickFirst {
        fn present(&mut self, request: &MenuRequest) -> Option<MenuChoice> {
            request.suggestions.first().cloned().map(MenuChoice::Replace)
        }
    }

    fn repl(path: PathBuf) -> Repl<SpellChecker, MemorySettingsStore, ManualClock> {
        let checker = SpellChecker::from_words(&["hello", "world", "the"]).unwrap();
        let assistant = Assistant::with_clock(
            Some(checker),
            MemorySettingsStore::default(),
            Duration::from_millis(1000),
            ManualClock::new(),
        );
        Repl::open(assistant, path, false).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("goto 2 7"), Ok(Command::Goto(Position::new(2, 7))));
        assert_eq!(parse_command("a\n"), Ok(Command::Accept));
        assert_eq!(parse_command("menu"), Ok(Command::Menu));
        assert_eq!(parse_command("add Rustacean"), Ok(Command::Add("Rustacean".to_string())));
        assert_eq!(parse_command("insert  two words"), Ok(Command::Insert(" two words".to_string())));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert!(parse_command("goto 1").is_err());
        assert!(parse_command("add").is_err());
        assert!(parse_command("frobnicate").is_err());
        assert_eq!(parse_command("   "), Err(String::new()));
    }

    #[test]
    fn test_edit_session_writes_corrections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "Helo wrold\n").unwrap();

        let mut repl = repl(path.clone());
        let mut presenter = PickFirst;

        repl.execute(Command::Goto(Position::new(0, 2)), &mut presenter).unwrap();
        repl.execute(Command::Accept, &mut presenter).unwrap();
        repl.execute(Command::Menu, &mut presenter).unwrap();
        assert_eq!(repl.buffer().to_text(), "Hello world\n");

        repl.execute(Command::Write, &mut presenter).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello world\n");

        assert_eq!(repl.execute(Command::Quit, &mut presenter).unwrap(), Flow::Exit);
    }

    #[test]
    fn test_insert_resets_cycle() {
        let dir = tempdir().unwrap();
        let mut repl = repl(dir.path().join("new.txt"));
        let mut presenter = PickFirst;

        repl.execute(Command::Insert("teh".to_string()), &mut presenter).unwrap();
        assert_eq!(repl.buffer().to_text(), "teh");
        repl.execute(Command::Menu, &mut presenter).unwrap();
        assert_eq!(repl.buffer().to_text(), "the");
    }
}
