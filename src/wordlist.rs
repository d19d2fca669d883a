//! Word lists indexed by dice code, one per supported language.
//! Lists are plain text files with one `<dice code><whitespace><word>` entry
//! per line. A single malformed line rejects the whole list so generation
//! never runs against a partial dictionary.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::dice::DiceCode;
use crate::integrity::{sha256_hex, verify_sha256, IntegrityError};

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("no word list configured for '{0}' language")]
    UnknownLanguage(String),
    #[error("unable to open word list file {} for {language} language: {source}", .path.display())]
    Io {
        language: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to read word list for '{language}' language: {source}")]
    Read {
        language: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid format for line '{line}' from '{language}' language")]
    MalformedEntry { language: String, line: String },
    #[error("bad dice value '{dice_value}' for word '{word}' from '{language}' language")]
    InvalidDiceCode {
        language: String,
        dice_value: String,
        word: String,
        #[source]
        source: ParseIntError,
    },
    #[error("word list for '{language}' language failed integrity check: {source}")]
    Integrity {
        language: String,
        #[source]
        source: IntegrityError,
    },
}

/// A supported dictionary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub description: &'static str,
    /// File name inside the word list directory.
    pub file_name: &'static str,
}

/// Every supported language, sorted by code.
pub static LANGUAGES: &[Language] = &[
    Language { code: "beale", description: "alternative Beale list", file_name: "wordlist.beale.txt" },
    Language { code: "cat", description: "Catalan", file_name: "wordlist.cat.txt" },
    Language { code: "de", description: "German", file_name: "wordlist.de.txt" },
    Language { code: "en", description: "English", file_name: "wordlist.txt" },
    Language { code: "es", description: "Spanish", file_name: "wordlist.es.txt" },
    Language { code: "eu", description: "Euskera", file_name: "wordlist.eu.txt" },
    Language { code: "fi", description: "Finnish", file_name: "wordlist.fi.txt" },
    Language { code: "fr", description: "French", file_name: "wordlist.fr.txt" },
    Language { code: "it", description: "Italian", file_name: "wordlist.it.txt" },
    Language { code: "la", description: "Latin", file_name: "wordlist.la.txt" },
    Language { code: "pt", description: "Portuguese", file_name: "wordlist.pt.txt" },
];

impl Language {
    pub fn find(code: &str) -> Result<&'static Language, WordListError> {
        LANGUAGES
            .iter()
            .find(|lang| lang.code == code)
            .ok_or_else(|| WordListError::UnknownLanguage(code.to_string()))
    }
}

/// Mapping of dice codes to dictionary words. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordMap {
    words: HashMap<DiceCode, String>,
}

impl WordMap {
    pub fn get(&self, code: DiceCode) -> Option<&str> {
        self.words.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when every one of the 7776 dice codes has a word.
    pub fn is_complete(&self) -> bool {
        self.words.len() == DiceCode::COUNT
    }

    /// Parses a word list. Later duplicates replace earlier entries.
    pub fn parse(language: &str, reader: impl BufRead) -> Result<Self, WordListError> {
        let mut words = HashMap::with_capacity(DiceCode::COUNT);
        for line in reader.lines() {
            let line = line.map_err(|source| WordListError::Read {
                language: language.to_string(),
                source,
            })?;
            let (code, word) = parse_entry(language, &line)?;
            if words.insert(code, word.to_string()).is_some() {
                warn!(language, %code, "duplicate dice code in word list");
            }
        }
        Ok(Self { words })
    }
}

impl FromIterator<(DiceCode, String)> for WordMap {
    fn from_iter<I: IntoIterator<Item = (DiceCode, String)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

/// Splits `<five faces><whitespace><word>[whitespace]` into its parts.
fn parse_entry<'a>(language: &str, line: &'a str) -> Result<(DiceCode, &'a str), WordListError> {
    let malformed = || WordListError::MalformedEntry {
        language: language.to_string(),
        line: line.to_string(),
    };

    let prefix = line.get(..5).ok_or_else(malformed)?;
    if !prefix.bytes().all(|b| (b'1'..=b'6').contains(&b)) {
        return Err(malformed());
    }
    let rest = &line[5..];
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return Err(malformed());
    }
    let mut fields = rest.split_ascii_whitespace();
    let word = fields.next().ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }

    let value: u32 = prefix.parse().map_err(|source| WordListError::InvalidDiceCode {
        language: language.to_string(),
        dice_value: prefix.to_string(),
        word: word.to_string(),
        source,
    })?;
    let code = DiceCode::new(value).ok_or_else(malformed)?;
    Ok((code, word))
}

/// Loads the word list for `language` from `dir`, optionally checking it
/// against a pinned SHA-256 digest first.
pub fn load_word_map(dir: &Path, language: &str, pinned_digest: Option<&str>) -> Result<WordMap, WordListError> {
    let lang = Language::find(language)?;
    let path = dir.join(lang.file_name);
    debug!(language = lang.code, path = %path.display(), "loading word list");

    let bytes = fs::read(&path).map_err(|source| WordListError::Io {
        language: lang.description,
        path: path.clone(),
        source,
    })?;

    match pinned_digest {
        Some(pin) => {
            verify_sha256(&bytes, pin).map_err(|source| WordListError::Integrity {
                language: lang.code.to_string(),
                source,
            })?;
            debug!(language = lang.code, "word list matches pinned digest");
        }
        None => debug!(language = lang.code, digest = %sha256_hex(&bytes), "word list digest"),
    }

    let map = WordMap::parse(lang.code, bytes.as_slice())?;
    if !map.is_complete() {
        warn!(
            language = lang.code,
            entries = map.len(),
            expected = DiceCode::COUNT,
            "word list does not cover every dice code"
        );
    }
    Ok(map)
}
