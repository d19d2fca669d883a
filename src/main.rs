//! Command-line front end. Prints one passphrase per run, or the list of
//! supported languages.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use diceware::config::{load_config, validate_length, ConfigError, FileConfig, Overrides, Settings};
use diceware::passphrase::{generate, GenerateError};
use diceware::wordlist::{load_word_map, WordListError, LANGUAGES};
use diceware::words::WordModifier;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    WordList(#[from] WordListError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[derive(Debug, Parser)]
#[command(name = "diceware", version)]
#[command(about = "Generate diceware passphrases from dice-indexed word lists")]
struct Cli {
    /// List all supported languages and exit.
    #[arg(long)]
    available_languages: bool,

    /// Force the inclusion of digits in the passphrase.
    #[arg(long)]
    digits: bool,

    /// Specify the language to use for word selection.
    #[arg(long)]
    lang: Option<String>,

    /// Set the desired number of words in the passphrase.
    #[arg(long, value_parser = parse_length)]
    length: Option<usize>,

    /// Force all words to be lowercase.
    #[arg(long, conflicts_with = "upper")]
    lower: bool,

    /// Add delimiting symbols between words.
    #[arg(long)]
    symbols: bool,

    /// Force all words to be uppercase.
    #[arg(long)]
    upper: bool,

    /// JSON settings file.
    #[arg(long, env = "DICEWARE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the word list files (default `data`). Lists are not
    /// bundled: English is read from `wordlist.txt`, other languages from
    /// `wordlist.<code>.txt`, one `<dice code> <word>` line per entry, as in
    /// the published diceware lists.
    #[arg(long, env = "DICEWARE_WORDLIST_DIR")]
    wordlist_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let modifier = if self.lower {
            Some(WordModifier::LowerCase)
        } else if self.upper {
            Some(WordModifier::UpperCase)
        } else {
            None
        };
        Overrides {
            language: self.lang.clone(),
            length: self.length,
            modifier,
            digits: self.digits,
            symbols: self.symbols,
            wordlist_dir: self.wordlist_dir.clone(),
        }
    }
}

fn parse_length(arg: &str) -> Result<usize, String> {
    let length: usize = arg.parse().map_err(|e| format!("{e}"))?;
    validate_length(length).map_err(|e| e.to_string())
}

fn print_languages() {
    println!("Passphrase languages available:");
    for lang in LANGUAGES {
        println!("\t{}\t{}", lang.code, lang.description);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if cli.available_languages {
        print_languages();
        return Ok(());
    }

    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, cli.overrides())?;
    let word_map = load_word_map(
        &settings.wordlist_dir,
        &settings.language,
        settings.pinned_digest.as_deref(),
    )?;
    debug!(entries = word_map.len(), "word list ready");

    let passphrase = Zeroizing::new(generate(&word_map, &settings.request)?);
    println!("{}", passphrase.as_str());
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            eprintln!("{}", usage_error(&err));
            return ExitCode::FAILURE;
        }
    };
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("diceware: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Rewrites a clap error into the `diceware: ` form used for every failure.
fn usage_error(err: &clap::Error) -> String {
    let text = err.to_string();
    let message = text.trim_start_matches("error: ").trim_end();
    format!("diceware: {message}")
}
