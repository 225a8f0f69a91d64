use crate::checker::dictionary::Dictionary;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Pinned commit so a download always yields the same word list
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Normalize a raw word list: one word per line, lowercased, blanks and single letters dropped
pub fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && line.chars().count() > 1)
        .collect()
}

/// Build `<language>.dict` in `dir` from a raw word list
pub fn install_wordlist(dir: &Path, language: &str, content: &str) -> Result<(PathBuf, usize)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create dictionary directory: {}", dir.display()))?;

    let words = parse_wordlist(content);
    let dict_path = Dictionary::path_for(dir, language);
    Dictionary::build_from_words(&words, &dict_path)?;

    info!(language, words = words.len(), path = %dict_path.display(), "installed dictionary");
    Ok((dict_path, words.len()))
}

/// Dictionaries present in `dir`, sorted by language
pub fn installed(dir: &Path) -> Result<Vec<DictionaryInfo>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("dict") {
            continue;
        }
        let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let size_bytes = fs::metadata(&path)?.len();
        found.push(DictionaryInfo {
            language: language.to_string(),
            path: path.clone(),
            size_bytes,
        });
    }

    found.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(found)
}

pub fn list_dictionaries(dir: &Path) -> Result<()> {
    let dictionaries = installed(dir)?;

    if dictionaries.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to download a dictionary.",
            "spellcycle dict download en_US".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    for dict in &dictionaries {
        println!(
            "  {} {} ({})",
            "✓".green(),
            dict.language.cyan().bold(),
            format!("{}KB", dict.size_bytes / 1024).dimmed()
        );
    }

    println!();
    println!("Dictionary directory: {}", dir.display().to_string().dimmed());

    Ok(())
}

/// Install a dictionary from a local word list file
pub fn install_from_file(dir: &Path, language: &str, wordlist: &Path) -> Result<()> {
    let content = fs::read_to_string(wordlist)
        .with_context(|| format!("Failed to read word list: {}", wordlist.display()))?;

    let (dict_path, count) = install_wordlist(dir, language, &content)?;
    println!(
        "{} Installed {} words for {}: {}",
        "✓".green().bold(),
        count.to_string().yellow(),
        language.cyan(),
        dict_path.display().to_string().dimmed()
    );
    Ok(())
}

pub fn download_dictionary(dir: &Path, language: &str) -> Result<()> {
    let wordlist_url = match language {
        "en_US" | "en_GB" => format!("{}/words_alpha.txt", WORDLIST_BASE_URL),
        other => {
            anyhow::bail!(
                "Language '{}' is not available for download. Use `spellcycle dict install` with a local word list.",
                other
            );
        }
    };

    println!(
        "{} dictionary for {} (version: {})...",
        "Downloading".cyan().bold(),
        language.yellow(),
        WORDLIST_VERSION.dimmed()
    );
    println!("Source: {}", wordlist_url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Downloading...");

    let response =
        reqwest::blocking::get(&wordlist_url).context("Failed to download dictionary")?;

    if !response.status().is_success() {
        pb.finish_and_clear();
        anyhow::bail!("Failed to download dictionary: HTTP {}", response.status());
    }

    let content = response.text().context("Failed to read downloaded word list")?;
    pb.set_message("Building dictionary...");

    let (dict_path, count) = install_wordlist(dir, language, &content)?;
    pb.finish_and_clear();

    println!(
        "{} Dictionary installed ({} words): {}",
        "✓".green().bold(),
        count.to_string().yellow(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

pub fn show_info(dir: &Path, language: &str) -> Result<()> {
    let dict_path = Dictionary::path_for(dir, language);

    if !dict_path.exists() {
        println!(
            "{} Dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to download it.",
            format!("spellcycle dict download {}", language).cyan()
        );
        return Ok(());
    }

    let metadata = fs::metadata(&dict_path)?;

    println!("{}", format!("Dictionary: {}", language).bold());
    println!("  Path: {}", dict_path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  Format: FST (Finite State Transducer)");

    match Dictionary::load_from_path(&dict_path) {
        Ok(dict) => println!("  Words: {}", dict.len().to_string().yellow()),
        Err(e) => println!("  {}: {}", "Error loading dictionary".red(), e),
    }

    Ok(())
}
