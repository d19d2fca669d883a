//! Uniform shuffling by repeated secure selection without replacement.

use std::num::NonZeroUsize;

use rand::{CryptoRng, RngCore};

use crate::dice::{RandomSourceError, SecureDie};

/// Removes and returns one element of `pool` chosen uniformly at random.
///
/// Returns `None` for an empty pool. A single-element pool is drained without
/// consuming randomness. The relative order of the remaining elements is kept.
pub fn pick<T, R: RngCore + CryptoRng>(
    die: &mut SecureDie<R>,
    pool: &mut Vec<T>,
) -> Result<Option<T>, RandomSourceError> {
    let Some(len) = NonZeroUsize::new(pool.len()) else {
        return Ok(None);
    };
    if len.get() == 1 {
        return Ok(pool.pop());
    }
    let idx = die.index(len)?;
    Ok(Some(pool.remove(idx)))
}

/// Reorders `items` so that every permutation is equally likely.
///
/// If the random source fails midway, every element is returned to `items`
/// before the error propagates, so the caller keeps ownership of all of them.
pub fn shuffle<T, R: RngCore + CryptoRng>(
    die: &mut SecureDie<R>,
    items: &mut Vec<T>,
) -> Result<(), RandomSourceError> {
    let mut result = Vec::with_capacity(items.len());
    loop {
        match pick(die, items) {
            Ok(Some(item)) => result.push(item),
            Ok(None) => break,
            Err(err) => {
                items.append(&mut result);
                return Err(err);
            }
        }
    }
    *items = result;
    Ok(())
}
