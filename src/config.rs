//! Settings loader. Values come from built-in defaults, then an optional JSON
//! file, then command-line overrides, in increasing order of precedence.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::passphrase::{GenerationRequest, MAX_WORDS, MIN_WORDS};
use crate::words::WordModifier;

/// Language used when neither the config file nor the command line picks one.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Directory searched for word list files by default.
pub const DEFAULT_WORDLIST_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("insufficient length to provide adequate security")]
    LengthTooShort(usize),
    #[error("passphrase too long")]
    LengthTooLong(usize),
}

/// On-disk settings. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub language: Option<String>,
    pub length: Option<usize>,
    pub modifier: Option<WordModifier>,
    pub digits: Option<bool>,
    pub symbols: Option<bool>,
    pub wordlist_dir: Option<PathBuf>,
    /// Pinned SHA-256 digests of word list files, keyed by language code.
    #[serde(default)]
    pub checksums: HashMap<String, String>,
}

/// Values supplied on the command line. Boolean switches can only turn a
/// feature on.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub language: Option<String>,
    pub length: Option<usize>,
    pub modifier: Option<WordModifier>,
    pub digits: bool,
    pub symbols: bool,
    pub wordlist_dir: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub language: String,
    pub wordlist_dir: PathBuf,
    pub pinned_digest: Option<String>,
    pub request: GenerationRequest,
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let language = overrides
            .language
            .or(file.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let length = validate_length(overrides.length.or(file.length).unwrap_or(MIN_WORDS))?;
        let pinned_digest = file.checksums.get(&language).cloned();

        let settings = Settings {
            wordlist_dir: overrides
                .wordlist_dir
                .or(file.wordlist_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDLIST_DIR)),
            pinned_digest,
            request: GenerationRequest {
                length,
                modifier: overrides.modifier.or(file.modifier).unwrap_or_default(),
                force_digits: overrides.digits || file.digits.unwrap_or(false),
                add_delimiters: overrides.symbols || file.symbols.unwrap_or(false),
            },
            language,
        };
        debug!(
            language = %settings.language,
            length = settings.request.length,
            modifier = %settings.request.modifier,
            digits = settings.request.force_digits,
            symbols = settings.request.add_delimiters,
            pinned = settings.pinned_digest.is_some(),
            "resolved settings"
        );
        Ok(settings)
    }
}

/// Checks a requested word count against the supported bounds.
pub fn validate_length(length: usize) -> Result<usize, ConfigError> {
    if length < MIN_WORDS {
        return Err(ConfigError::LengthTooShort(length));
    }
    if length > MAX_WORDS {
        return Err(ConfigError::LengthTooLong(length));
    }
    Ok(length)
}

/// Reads a JSON settings file.
pub fn load_config(path: impl AsRef<Path>) -> Result<FileConfig, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading config file");
    let raw_json = fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))
}
