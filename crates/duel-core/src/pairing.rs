//! Selection of the next pair to compare.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Item;

/// Errors that can occur when selecting a pair.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    /// The pool holds fewer than two items.
    #[error("no pair available: pool has {0} item(s)")]
    NoPairAvailable(usize),
}

/// How the next pair is drawn from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairStrategy {
    /// Two distinct items drawn uniformly at random.
    Uniform,
    /// First item drawn from those with the fewest games, second from the rest
    /// of the pool.
    #[default]
    LeastPlayed,
}

/// Draws two distinct items from `pool` using `strategy`.
///
/// The order of the returned pair carries no meaning.
///
/// # Errors
///
/// Returns [`PairingError::NoPairAvailable`] if the pool has fewer than two items.
pub fn select_pair<'a, R: Rng>(
    pool: &'a [Item],
    strategy: PairStrategy,
    rng: &mut R,
) -> Result<(&'a Item, &'a Item), PairingError> {
    if pool.len() < 2 {
        return Err(PairingError::NoPairAvailable(pool.len()));
    }

    let (first, second) = match strategy {
        PairStrategy::Uniform => uniform_indices(pool.len(), rng),
        PairStrategy::LeastPlayed => least_played_indices(pool, rng),
    };
    Ok((&pool[first], &pool[second]))
}

fn uniform_indices<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let first = rng.gen_range(0..len);
    let mut second = rng.gen_range(0..len);
    while second == first {
        second = rng.gen_range(0..len);
    }
    (first, second)
}

fn least_played_indices<R: Rng>(pool: &[Item], rng: &mut R) -> (usize, usize) {
    // Caller guarantees at least two items
    let min_games = pool.iter().map(|item| item.games_played).min().unwrap_or(0);

    let least_played: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, item)| item.games_played == min_games)
        .map(|(idx, _)| idx)
        .collect();
    let first = least_played.choose(rng).copied().unwrap_or(0);

    let rest: Vec<usize> = (0..pool.len()).filter(|&idx| idx != first).collect();
    let second = rest.choose(rng).copied().unwrap_or(first);
    (first, second)
}
