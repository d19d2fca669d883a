//! Word selection and capitalization.

use std::fmt::{self, Display};

use serde::Deserialize;
use thiserror::Error;

use crate::dice::DiceCode;
use crate::wordlist::WordMap;

/// Capitalization policy applied to every dictionary word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum WordModifier {
    /// Uppercase the first character only.
    #[default]
    #[serde(rename = "title", alias = "pascal")]
    TitleCase,
    #[serde(rename = "lower")]
    LowerCase,
    #[serde(rename = "upper")]
    UpperCase,
}

impl Display for WordModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WordModifier::TitleCase => "title",
            WordModifier::LowerCase => "lower",
            WordModifier::UpperCase => "upper",
        };
        f.write_str(name)
    }
}

impl WordModifier {
    pub fn apply(self, word: &str) -> String {
        match self {
            WordModifier::UpperCase => word.to_uppercase(),
            WordModifier::LowerCase => word.to_lowercase(),
            WordModifier::TitleCase => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// The dictionary has no entry for a generated code.
#[derive(Debug, Error)]
#[error("no word for dice code {0}; the word list is incomplete")]
pub struct UnknownDiceCode(pub DiceCode);

/// Looks up `code` and applies `modifier` to the word found.
pub fn select(word_map: &WordMap, code: DiceCode, modifier: WordModifier) -> Result<String, UnknownDiceCode> {
    word_map
        .get(code)
        .map(|word| modifier.apply(word))
        .ok_or(UnknownDiceCode(code))
}
