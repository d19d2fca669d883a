//! Diceware passphrase generation. Dice are simulated with the operating
//! system's CSPRNG, words come from per-language lists keyed by dice code, and
//! digits or delimiter symbols can be mixed in at random positions.
//!
//! Word lists are not bundled with the crate. [`wordlist::load_word_map`] reads
//! them from a directory (`data/` for the binary unless overridden): English
//! from `wordlist.txt` and every other language from `wordlist.<code>.txt`, as
//! named in [`wordlist::LANGUAGES`]. Each line holds a five-digit dice code and
//! a word separated by whitespace, the layout of the published diceware lists.
//! A SHA-256 pin per language can be set in the config file to reject a
//! modified list.

pub mod config;
pub mod dice;
pub mod integrity;
pub mod passphrase;
pub mod shuffle;
pub mod wordlist;
pub mod words;
