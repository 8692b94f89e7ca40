//! Tournament phases and the rules that move a session between them.

use serde::{Deserialize, Serialize};

use crate::elo::K_FACTOR;
use crate::item::Item;

/// Stage of a ranking session.
///
/// A session starts in [`Phase::Elimination`] and may move to
/// [`Phase::Finals`] exactly once. Finals is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Elimination,
    Finals,
}

impl Phase {
    /// Returns the persisted name of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Elimination => "elimination",
            Phase::Finals => "finals",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constants governing rating updates and the phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TournamentRules {
    /// K-factor passed to every rating update.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Games every item must reach before elimination is complete.
    #[serde(default = "default_min_games_per_item")]
    pub min_games_per_item: u32,
    /// Size of the finals pool.
    #[serde(default = "default_finalists_count")]
    pub finalists_count: usize,
}

fn default_k_factor() -> f64 {
    K_FACTOR
}

fn default_min_games_per_item() -> u32 {
    3
}

fn default_finalists_count() -> usize {
    32
}

impl Default for TournamentRules {
    fn default() -> Self {
        Self {
            k_factor: default_k_factor(),
            min_games_per_item: default_min_games_per_item(),
            finalists_count: default_finalists_count(),
        }
    }
}

/// Returns true once the pool is non-empty and every item has played at
/// least `min_games` comparisons.
pub fn is_elimination_complete(items: &[Item], min_games: u32) -> bool {
    !items.is_empty() && items.iter().all(|item| item.games_played >= min_games)
}

/// Projects the top `count` items by rating, highest first.
///
/// Ties keep their order in `items`. This is recomputed on demand and never
/// stored.
pub fn finalists(items: &[Item], count: usize) -> Vec<Item> {
    let mut sorted = items.to_vec();
    // sort_by is stable, so equal ratings stay in pool order
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted.truncate(count);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, rating: f64, games: u32) -> Item {
        Item {
            id,
            url: format!("{id}.png"),
            rating,
            games_played: games,
        }
    }

    #[test]
    fn test_default_rules() {
        let rules = TournamentRules::default();
        assert_eq!(rules.k_factor, 32.0);
        assert_eq!(rules.min_games_per_item, 3);
        assert_eq!(rules.finalists_count, 32);
    }

    #[test]
    fn test_empty_pool_is_never_complete() {
        assert!(!is_elimination_complete(&[], 0));
    }

    #[test]
    fn test_elimination_complete_requires_every_item() {
        let items = vec![item(1, 1500.0, 3), item(2, 1500.0, 2), item(3, 1500.0, 5)];
        assert!(!is_elimination_complete(&items, 3));
        assert!(is_elimination_complete(&items, 2));
    }

    #[test]
    fn test_finalists_sorted_descending_with_stable_ties() {
        let items = vec![
            item(1, 1500.0, 0),
            item(2, 1532.0, 0),
            item(3, 1500.0, 0),
            item(4, 1468.0, 0),
            item(5, 1532.0, 0),
        ];

        let top = finalists(&items, 4);
        let ids: Vec<_> = top.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 5, 1, 3]);
    }

    #[test]
    fn test_finalists_capped_by_pool_size() {
        let items = vec![item(1, 1500.0, 0), item(2, 1600.0, 0)];
        assert_eq!(finalists(&items, 32).len(), 2);
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Finals).unwrap(), "\"finals\"");
        assert_eq!(Phase::Elimination.to_string(), "elimination");
    }
}
