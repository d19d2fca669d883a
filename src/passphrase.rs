//! Passphrase assembly: dice throws become words, then digits and delimiters
//! are optionally mixed in before everything is joined into a single line.

use std::num::NonZeroU32;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::dice::{throw, RandomSourceError, SecureDie};
use crate::shuffle::shuffle;
use crate::wordlist::WordMap;
use crate::words::{select, UnknownDiceCode, WordModifier};

/// Fewest words considered to give adequate security.
pub const MIN_WORDS: usize = 5;
/// Most words a passphrase may hold.
pub const MAX_WORDS: usize = 16;

/// Symbols that may be placed between words.
pub static DELIMITERS: [&str; 27] = [
    "!", "?", "@", "#", "$", "%", "&", "+", "-", "*", "/", "=", "<", ">", "(", ")", "[", "]", "{", "}", "_",
    ".", ":", ",", ";", "'", "\"",
];

const DIGIT_TOKEN_BOUND: NonZeroU32 = match NonZeroU32::new(10_000) {
    Some(bound) => bound,
    None => unreachable!(),
};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    RandomSource(#[from] RandomSourceError),
    #[error(transparent)]
    UnknownDiceCode(#[from] UnknownDiceCode),
}

/// Parameters for one passphrase. `length` is trusted to lie within
/// [`MIN_WORDS`, `MAX_WORDS`]; callers validate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub length: usize,
    pub modifier: WordModifier,
    pub force_digits: bool,
    pub add_delimiters: bool,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            length: MIN_WORDS,
            modifier: WordModifier::default(),
            force_digits: false,
            add_delimiters: false,
        }
    }
}

/// Generates a passphrase using the operating system's CSPRNG.
pub fn generate(word_map: &WordMap, request: &GenerationRequest) -> Result<String, GenerateError> {
    generate_with(&mut SecureDie::new(OsRng), word_map, request)
}

/// Generates a passphrase drawing every random decision from `die`.
///
/// Token buffers are wiped on every exit path, including errors.
pub fn generate_with<R: RngCore + CryptoRng>(
    die: &mut SecureDie<R>,
    word_map: &WordMap,
    request: &GenerationRequest,
) -> Result<String, GenerateError> {
    let mut words = Zeroizing::new(Vec::with_capacity(request.length));
    for _ in 0..request.length {
        let code = throw(die)?;
        words.push(select(word_map, code, request.modifier)?);
    }

    if request.force_digits {
        inject_digits(die, &mut words)?;
    }
    if request.add_delimiters {
        inject_delimiters(die, &mut words)?;
    }

    Ok(words.concat())
}

/// Ensures at least one digit is present.
///
/// When no word already contains a digit, one word is dropped at random and a
/// number in `[0, 9999]` takes a random position instead, so the result holds
/// one fewer dictionary word.
pub fn inject_digits<R: RngCore + CryptoRng>(
    die: &mut SecureDie<R>,
    words: &mut Vec<String>,
) -> Result<(), RandomSourceError> {
    if words.iter().any(|w| w.bytes().any(|b| b.is_ascii_digit())) {
        debug!("passphrase already contains a digit; leaving words untouched");
        return Ok(());
    }

    shuffle(die, words)?;
    if !words.is_empty() {
        words.remove(0).zeroize();
    }
    let number = die.below(DIGIT_TOKEN_BOUND)?;
    words.push(number.to_string());
    debug!(words = words.len() - 1, "replaced one word with a numeric token");
    shuffle(die, words)
}

/// Interleaves a random delimiter symbol into every gap between tokens.
///
/// All symbols are drawn before `words` is touched, so a failing source leaves
/// it as it was.
pub fn inject_delimiters<R: RngCore + CryptoRng>(
    die: &mut SecureDie<R>,
    words: &mut Vec<String>,
) -> Result<(), RandomSourceError> {
    let gaps = words.len().saturating_sub(1);
    let mut alphabet = DELIMITERS.to_vec();
    let mut symbols = Vec::with_capacity(gaps);
    for _ in 0..gaps {
        shuffle(die, &mut alphabet)?;
        symbols.push(alphabet[0]);
    }

    let mut delimited = Vec::with_capacity(words.len() + gaps);
    for (idx, word) in words.drain(..).enumerate() {
        if idx > 0 {
            delimited.push(symbols[idx - 1].to_string());
        }
        delimited.push(word);
    }
    *words = delimited;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::testing::ScriptedRng;
    use crate::dice::DiceCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_map() -> WordMap {
        [(11111, "a"), (12345, "apathy"), (66666, "@")]
            .into_iter()
            .map(|(code, word)| (DiceCode::new(code).expect("valid code"), word.to_string()))
            .collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn title_cases_each_word_independently() {
        let rng = ScriptedRng::for_codes(&[11111, 12345, 66666]);
        let mut die = SecureDie::new(rng);
        let request = GenerationRequest {
            length: 3,
            ..GenerationRequest::default()
        };
        let phrase = generate_with(&mut die, &sample_map(), &request).expect("generation should succeed");
        assert_eq!(phrase, "AApathy@");
    }

    #[test]
    fn upper_case_applies_to_words() {
        let rng = ScriptedRng::for_codes(&[12345, 11111]);
        let mut die = SecureDie::new(rng);
        let request = GenerationRequest {
            length: 2,
            modifier: WordModifier::UpperCase,
            ..GenerationRequest::default()
        };
        let phrase = generate_with(&mut die, &sample_map(), &request).expect("generation should succeed");
        assert_eq!(phrase, "APATHYA");
    }

    #[test]
    fn missing_word_aborts_generation() {
        let rng = ScriptedRng::for_codes(&[11111, 22222]);
        let mut die = SecureDie::new(rng);
        let request = GenerationRequest {
            length: 2,
            ..GenerationRequest::default()
        };
        let err = generate_with(&mut die, &sample_map(), &request).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownDiceCode(UnknownDiceCode(code)) if code.value() == 22222));
    }

    #[test]
    fn exhausted_source_aborts_generation() {
        let mut die = SecureDie::new(ScriptedRng::for_codes(&[11111]));
        let err = generate_with(&mut die, &sample_map(), &GenerationRequest::default()).unwrap_err();
        assert!(matches!(err, GenerateError::RandomSource(_)));
    }

    #[test]
    fn digit_injection_replaces_one_word() {
        // First shuffle: pick idx 2 ("c"), idx 0 ("a"), then "b"; "c" is dropped.
        // Number draw: 42. Second shuffle: idx 2 ("42"), idx 0 ("a"), then "b".
        let rng = ScriptedRng::new([2, 0, 42, 2, 0]);
        let mut die = SecureDie::new(rng);
        let mut tokens = words(&["a", "b", "c"]);
        inject_digits(&mut die, &mut tokens).expect("injection");
        assert_eq!(tokens, words(&["42", "a", "b"]));
        assert_eq!(die_remaining(die), 0);
    }

    #[test]
    fn incidental_digit_leaves_words_untouched() {
        let mut die = SecureDie::new(ScriptedRng::new(Vec::new()));
        let input = words(&["b4", "later", "gator"]);
        let mut tokens = input.clone();
        inject_digits(&mut die, &mut tokens).expect("no randomness needed");
        assert_eq!(tokens, input);
    }

    #[test]
    fn failed_digit_injection_keeps_every_token() {
        // The source dies during the first shuffle.
        let mut die = SecureDie::new(ScriptedRng::new([2]));
        let mut tokens = words(&["a", "b", "c"]);
        assert!(inject_digits(&mut die, &mut tokens).is_err());
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(sorted, words(&["a", "b", "c"]));

        // The source dies during the second shuffle, after the swap.
        let mut die = SecureDie::new(ScriptedRng::new([2, 0, 42]));
        let mut tokens = words(&["a", "b", "c"]);
        assert!(inject_digits(&mut die, &mut tokens).is_err());
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(sorted, words(&["42", "a", "b"]));
    }

    #[test]
    fn delimiters_fill_every_gap() {
        let mut die = SecureDie::new(StdRng::seed_from_u64(9));
        let mut tokens = words(&["one", "two", "three", "four", "five"]);
        inject_delimiters(&mut die, &mut tokens).expect("delimiters");
        assert_eq!(tokens.len(), 9);
        for (idx, token) in tokens.iter().enumerate() {
            if idx % 2 == 1 {
                assert!(DELIMITERS.contains(&token.as_str()), "{token} is not a delimiter");
            } else {
                assert!(!DELIMITERS.contains(&token.as_str()));
            }
        }
    }

    #[test]
    fn delimiters_skip_single_word() {
        let mut die = SecureDie::new(ScriptedRng::new(Vec::new()));
        let mut tokens = words(&["solo"]);
        inject_delimiters(&mut die, &mut tokens).expect("delimiters");
        assert_eq!(tokens, words(&["solo"]));
    }

    #[test]
    fn failed_delimiter_draw_leaves_words_in_place() {
        let mut die = SecureDie::new(ScriptedRng::new([0, 0, 0]));
        let input = words(&["one", "two", "three"]);
        let mut tokens = input.clone();
        assert!(inject_delimiters(&mut die, &mut tokens).is_err());
        assert_eq!(tokens, input);
    }

    fn uniform_map(word: &str) -> WordMap {
        (0..DiceCode::COUNT as u32)
            .map(|mut n| {
                let mut faces = [0u8; 5];
                for slot in faces.iter_mut().rev() {
                    *slot = (n % 6) as u8 + 1;
                    n /= 6;
                }
                (DiceCode::from_faces(faces).expect("valid faces"), word.to_string())
            })
            .collect()
    }

    #[test]
    fn forced_digits_shorten_the_passphrase_by_one_word() {
        let map = uniform_map("word");
        assert!(map.is_complete());
        let mut die = SecureDie::new(StdRng::seed_from_u64(3));
        let request = GenerationRequest {
            length: MIN_WORDS,
            modifier: WordModifier::LowerCase,
            force_digits: true,
            add_delimiters: false,
        };
        for _ in 0..50 {
            let phrase = generate_with(&mut die, &map, &request).expect("generation should succeed");
            assert_eq!(phrase.matches("word").count(), MIN_WORDS - 1);
            let digits = phrase.replace("word", "");
            assert!(!digits.is_empty() && digits.len() <= 4);
            assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn every_length_produces_the_requested_words() {
        let map = uniform_map("x");
        let mut die = SecureDie::new(StdRng::seed_from_u64(11));
        for length in MIN_WORDS..=MAX_WORDS {
            let request = GenerationRequest {
                length,
                ..GenerationRequest::default()
            };
            let phrase = generate_with(&mut die, &map, &request).expect("generation should succeed");
            assert_eq!(phrase, "X".repeat(length));
        }
    }

    #[test]
    fn digits_and_delimiters_combine() {
        let map = uniform_map("word");
        let mut die = SecureDie::new(StdRng::seed_from_u64(5));
        let request = GenerationRequest {
            length: MIN_WORDS,
            modifier: WordModifier::TitleCase,
            force_digits: true,
            add_delimiters: true,
        };
        let phrase = generate_with(&mut die, &map, &request).expect("generation should succeed");
        assert_eq!(phrase.matches("Word").count(), MIN_WORDS - 1);
        let symbols = phrase
            .chars()
            .filter(|c| DELIMITERS.iter().any(|d| d.starts_with(*c)))
            .count();
        assert_eq!(symbols, MIN_WORDS - 1);
        let first = phrase.chars().next().expect("non-empty");
        let last = phrase.chars().last().expect("non-empty");
        assert!(first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());
    }

    fn die_remaining(die: SecureDie<ScriptedRng>) -> usize {
        die.into_inner().remaining()
    }
}
