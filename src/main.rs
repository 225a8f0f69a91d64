use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use spellcycle::assist::{selector, Assistant, Editor, LineBuffer};
use spellcycle::checker::dictionary::DictionaryError;
use spellcycle::cli::menu::TerminalMenu;
use spellcycle::cli::output::{self, OutputFormat, ScanEntry};
use spellcycle::cli::repl::Repl;
use spellcycle::dict::{self, JsonSettingsStore};
use spellcycle::{Config, Outcome, Position, SpellChecker};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spellcycle")]
#[command(version, about = "Fix misspellings near the cursor, one line at a time", long_about = None)]
struct Cli {
    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// Directory holding installed dictionaries
    #[arg(long, global = true, env = "SPELLCYCLE_DICT_DIR")]
    dict_dir: Option<PathBuf>,

    /// Settings file holding the custom dictionary
    #[arg(long, global = true, env = "SPELLCYCLE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List misspelled words on one line of a file
    Scan {
        file: PathBuf,

        /// Line to check (0-based)
        #[arg(long, default_value_t = 0)]
        line: usize,

        /// Cursor column; marks the word an action there would target
        #[arg(long)]
        cursor: Option<usize>,

        /// Output format (text, json)
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,
    },
    /// Edit a file interactively, fixing words near the cursor
    Edit { file: PathBuf },
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Build a dictionary from a local word list (one word per line)
    Install { wordlist: PathBuf },
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_US, en_GB)
        language: String,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
    /// Add a word to the custom dictionary
    Add { word: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }
    let colored = !cli.no_color;

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellcycle", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.language.clone(), cli.dict_dir.clone(), cli.settings.clone())?;

    match cli.command {
        Some(Commands::Scan {
            file,
            line,
            cursor,
            format,
        }) => scan(&config, file, line, cursor, format, colored),
        Some(Commands::Edit { file }) => edit(&config, file, colored),
        Some(Commands::Dict { action }) => handle_dict(&config, action, colored),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spellcycle=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Load the dictionary, treating a missing one as "not initialized"
fn load_checker(config: &Config) -> Result<Option<SpellChecker>> {
    match SpellChecker::load(config) {
        Ok(checker) => Ok(Some(checker)),
        Err(e @ DictionaryError::NotInstalled { .. }) => {
            warn!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to load dictionary"),
    }
}

fn assistant(config: &Config) -> Result<Assistant<SpellChecker, JsonSettingsStore>> {
    let checker = load_checker(config)?;
    let store = JsonSettingsStore::new(config.settings_path());
    Ok(Assistant::new(checker, store, config.cycle_timeout()).with_max_suggestions(config.max_suggestions))
}

fn scan(
    config: &Config,
    file: PathBuf,
    line: usize,
    cursor: Option<usize>,
    format: OutputFormat,
    colored: bool,
) -> Result<()> {
    let content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let buffer = LineBuffer::from_text(&content);
    let assistant = assistant(config)?;

    let Some(words) = assistant.misspelled(&buffer, line) else {
        eprintln!("{}", output::describe(&Outcome::NotInitialized, colored));
        return Ok(());
    };

    let target = cursor.and_then(|column| selector::closest_index(&words, Position::new(line, column)));
    let entries: Vec<ScanEntry> = words
        .into_iter()
        .enumerate()
        .map(|(i, span)| ScanEntry {
            suggestions: assistant.suggestions(&span.word),
            span,
            targeted: target == Some(i),
        })
        .collect();

    let text = buffer.line(line).unwrap_or_default();
    output::print_scan(&file, line, &text, &entries, colored, format);
    Ok(())
}

fn edit(config: &Config, file: PathBuf, colored: bool) -> Result<()> {
    let assistant = assistant(config)?;
    let mut repl = Repl::open(assistant, file, colored)?;
    repl.run(&mut TerminalMenu::new())
}

fn handle_dict(config: &Config, action: DictCommands, colored: bool) -> Result<()> {
    let dir = config.dictionary_dir();
    match action {
        DictCommands::List => dict::manager::list_dictionaries(&dir)?,
        DictCommands::Install { wordlist } => {
            dict::manager::install_from_file(&dir, &config.language, &wordlist)?
        }
        DictCommands::Download { language } => dict::manager::download_dictionary(&dir, &language)?,
        DictCommands::Info { language } => dict::manager::show_info(&dir, &language)?,
        DictCommands::Add { word } => {
            let mut assistant = assistant(config)?;
            let outcome = assistant.add_to_dictionary(&word)?;
            println!("{}", output::describe(&outcome, colored));
        }
    }
    Ok(())
}
