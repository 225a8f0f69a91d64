use crate::{Outcome, WordSpan};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// One misspelled word with what the dictionary offers for it.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    #[serde(flatten)]
    pub span: WordSpan,
    pub suggestions: Vec<String>,
    /// The word an action at the given cursor would target
    pub targeted: bool,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    file: String,
    line: usize,
    text: &'a str,
    misspelled: &'a [ScanEntry],
}

pub fn print_scan(
    file_path: &Path,
    line: usize,
    text: &str,
    entries: &[ScanEntry],
    colored_output: bool,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Text => print_text_scan(file_path, line, text, entries, colored_output),
        OutputFormat::Json => print_json_scan(file_path, line, text, entries),
    }
}

fn print_text_scan(
    file_path: &Path,
    line: usize,
    text: &str,
    entries: &[ScanEntry],
    colored_output: bool,
) {
    let header = format!("{}:{}", file_path.display(), line);

    if entries.is_empty() {
        if colored_output {
            println!("{} {}", "✓".green().bold(), header.dimmed());
        } else {
            println!("OK {}", header);
        }
        return;
    }

    if colored_output {
        println!("{}", header.bold().underline());
        println!("  {}", highlight(text, entries));
    } else {
        println!("{}", header);
        println!("  {}", text);
    }

    for entry in entries {
        let location = format!("{}-{}", entry.span.from.column, entry.span.to.column);
        let marker = if entry.targeted { "*" } else { " " };
        let suggestions = entry.suggestions.join(", ");

        if colored_output {
            println!(
                " {} {} {} {} {}",
                marker.yellow().bold(),
                location.blue().bold(),
                entry.span.word.red().bold(),
                "→".dimmed(),
                suggestions.green()
            );
        } else {
            println!(" {} {} {} -> {}", marker, location, entry.span.word, suggestions);
        }
    }
}

fn print_json_scan(file_path: &Path, line: usize, text: &str, entries: &[ScanEntry]) {
    let output = JsonOutput {
        file: file_path.display().to_string(),
        line,
        text,
        misspelled: entries,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing JSON: {}", e),
    }
}

/// The line with every misspelled word underlined in red
fn highlight(text: &str, entries: &[ScanEntry]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut column = 0;

    for entry in entries {
        let (from, to) = (entry.span.from.column, entry.span.to.column.min(chars.len()));
        if from < column || from > to {
            continue;
        }
        out.extend(&chars[column..from]);
        let word: String = chars[from..to].iter().collect();
        out.push_str(&word.red().underline().to_string());
        column = to;
    }
    out.extend(&chars[column..]);
    out
}

/// A one-line notice describing what a command did
pub fn describe(outcome: &Outcome, colored_output: bool) -> String {
    let (symbol, message) = match outcome {
        Outcome::NotInitialized => (
            "!",
            "Spell checker not initialized: no dictionary is installed".to_string(),
        ),
        Outcome::NoMisspelling => ("✓", "No misspelled words on this line".to_string()),
        Outcome::NoSuggestions { span } => ("?", format!("No suggestions for '{}'", span.word)),
        Outcome::Replaced {
            span, replacement, ..
        } => ("✓", format!("Replaced '{}' with '{}'", span.word, replacement)),
        Outcome::Menu(request) => (
            "·",
            format!(
                "'{}' at {}:{}",
                request.span.word, request.span.from.line, request.span.from.column
            ),
        ),
        Outcome::Added { word, persisted } => {
            if *persisted {
                ("✓", format!("Added '{}' to the custom dictionary", word))
            } else {
                ("✓", format!("'{}' is already in the custom dictionary", word))
            }
        }
        Outcome::Dismissed => ("·", "Menu dismissed".to_string()),
    };

    if !colored_output {
        return format!("{} {}", symbol, message);
    }

    let symbol = match outcome {
        Outcome::NotInitialized => symbol.red().bold(),
        Outcome::NoSuggestions { .. } => symbol.yellow().bold(),
        Outcome::Menu(_) | Outcome::Dismissed => symbol.dimmed(),
        _ => symbol.green().bold(),
    };
    format!("{} {}", symbol, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_describe_plain() {
        let outcome = Outcome::Replaced {
            span: WordSpan::new("Helo", 0, 0),
            replacement: "Hello".to_string(),
            cursor: Position::new(0, 3),
        };
        assert_eq!(describe(&outcome, false), "✓ Replaced 'Helo' with 'Hello'");
        assert!(describe(&Outcome::NotInitialized, false).contains("not initialized"));
    }

    #[test]
    fn test_json_entry_shape() {
        let entry = ScanEntry {
            span: WordSpan::new("wrold", 2, 5),
            suggestions: vec!["world".to_string()],
            targeted: true,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["word"], "wrold");
        assert_eq!(value["from"]["column"], 5);
        assert_eq!(value["to"]["column"], 10);
        assert_eq!(value["targeted"], true);
    }

    #[test]
    fn test_highlight_keeps_text_without_colors() {
        colored::control::set_override(false);
        let entries = vec![ScanEntry {
            span: WordSpan::new("wrold", 0, 5),
            suggestions: Vec::new(),
            targeted: false,
        }];
        assert_eq!(highlight("Helo wrold!", &entries), "Helo wrold!");
        colored::control::unset_override();
    }
}
