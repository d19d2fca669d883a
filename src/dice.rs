//! Simulated dice backed by a cryptographically secure random source.
//! Every draw goes through rejection sampling so that no face is favoured,
//! and a failing entropy source is surfaced instead of papered over.

use std::fmt::{self, Display};
use std::num::{NonZeroU32, NonZeroUsize};

use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// Number of dice thrown per dictionary lookup.
pub const DICE_PER_THROW: usize = 5;

const SIX: NonZeroU32 = match NonZeroU32::new(6) {
    Some(faces) => faces,
    None => unreachable!(),
};

/// The secure random source failed or is unavailable. Generation must abort.
#[derive(Debug, Error)]
#[error("secure random source failed: {0}")]
pub struct RandomSourceError(#[source] rand::Error);

/// A die backed by a `CryptoRng`. Statistical PRNGs are rejected at the type level.
pub struct SecureDie<R: RngCore + CryptoRng> {
    rng: R,
}

impl<R: RngCore + CryptoRng> SecureDie<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Rolls a die with `faces` sides and returns a value in `[1, faces]`.
    pub fn roll(&mut self, faces: NonZeroU32) -> Result<u32, RandomSourceError> {
        Ok(self.below(faces)? + 1)
    }

    /// Returns a uniformly distributed value in `[0, bound)`.
    ///
    /// Raw 32-bit draws above the largest multiple of `bound` are discarded so
    /// the modulo reduction stays unbiased.
    pub fn below(&mut self, bound: NonZeroU32) -> Result<u32, RandomSourceError> {
        let bound = bound.get();
        let zone = u32::MAX - (u32::MAX - bound + 1) % bound;
        loop {
            let mut buf = [0u8; 4];
            self.rng.try_fill_bytes(&mut buf).map_err(RandomSourceError)?;
            let value = u32::from_le_bytes(buf);
            if value <= zone {
                return Ok(value % bound);
            }
        }
    }

    /// Zero-based index into a collection of `len` elements.
    pub(crate) fn index(&mut self, len: NonZeroUsize) -> Result<usize, RandomSourceError> {
        match NonZeroU32::try_from(len) {
            Ok(bound) => Ok(self.below(bound)? as usize),
            Err(_) => Ok(self.below_wide(len.get() as u64)? as usize),
        }
    }

    /// 64-bit counterpart of [`SecureDie::below`] for bounds past `u32::MAX`.
    /// `bound` is non-zero.
    fn below_wide(&mut self, bound: u64) -> Result<u64, RandomSourceError> {
        let zone = u64::MAX - (u64::MAX - bound + 1) % bound;
        loop {
            let mut buf = [0u8; 8];
            self.rng.try_fill_bytes(&mut buf).map_err(RandomSourceError)?;
            let value = u64::from_le_bytes(buf);
            if value <= zone {
                return Ok(value % bound);
            }
        }
    }
}

/// A five-dice code such as `12345`, the lookup key into a word map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiceCode(u32);

impl DiceCode {
    pub const MIN: DiceCode = DiceCode(11111);
    pub const MAX: DiceCode = DiceCode(66666);
    /// Count of distinct valid codes (6^5).
    pub const COUNT: usize = 7776;

    /// Builds a code from five faces in throw order. Every face must lie in `[1, 6]`.
    pub fn from_faces(faces: [u8; DICE_PER_THROW]) -> Option<Self> {
        let mut accum = 0u32;
        for face in faces {
            if !(1..=6).contains(&face) {
                return None;
            }
            accum = accum * 10 + u32::from(face);
        }
        Some(DiceCode(accum))
    }

    /// Accepts `value` only if it has five decimal digits, each in `[1, 6]`.
    pub fn new(value: u32) -> Option<Self> {
        let code = DiceCode(value);
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return None;
        }
        code.faces().iter().all(|f| (1..=6).contains(f)).then_some(code)
    }

    /// Die faces, most significant first.
    pub fn faces(self) -> [u8; DICE_PER_THROW] {
        let mut faces = [0u8; DICE_PER_THROW];
        let mut rest = self.0;
        for slot in faces.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        faces
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Display for DiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Throws five six-sided dice and combines them into a dice code.
pub fn throw<R: RngCore + CryptoRng>(die: &mut SecureDie<R>) -> Result<DiceCode, RandomSourceError> {
    let mut accum = 0u32;
    for _ in 0..DICE_PER_THROW {
        accum = accum * 10 + die.roll(SIX)?;
    }
    Ok(DiceCode(accum))
}
