//! Ranking session: the only place where ratings, games, and phase change.
//!
//! A [`Session`] owns the item list, the current [`Phase`], and the undo
//! [`HistoryStack`]. It is an explicit value passed to every operation, so
//! several sessions can coexist and nothing is shared globally.
//!
//! `vote`, `undo`, and `advance_phase` take `&mut self` and run to completion
//! before returning; the borrow checker serializes them per session.

use std::borrow::Cow;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{validate_catalog, validate_ids, CatalogError};
use crate::elo::{update_ratings, Outcome};
use crate::history::{HistoryEntry, HistoryStack};
use crate::item::{CatalogRecord, Item, ItemId};
use crate::pairing::{select_pair, PairStrategy, PairingError};
use crate::phase::{finalists, is_elimination_complete, Phase, TournamentRules};

/// Errors reported by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No usable catalog or snapshot to build a session from.
    #[error("data unavailable: {0}")]
    DataUnavailable(#[from] CatalogError),

    /// `advance_phase` was called while the transition is not allowed.
    #[error("not eligible to advance phase: {0}")]
    NotEligible(&'static str),
}

/// Result of a [`Session::vote`] call.
///
/// Only [`VoteOutcome::Recorded`] changes state. The other variants leave
/// the session untouched and exist so callers can detect misuse.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// The vote was committed.
    Recorded {
        /// Winner after the update.
        winner: Item,
        /// Loser after the update.
        loser: Item,
        /// Whether elimination is now complete and the session may advance.
        advance_ready: bool,
    },
    /// The id is not part of the active pool.
    UnknownItem(ItemId),
    /// Winner and loser are the same item.
    SameItem(ItemId),
}

impl VoteOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, VoteOutcome::Recorded { .. })
    }
}

/// Persistable snapshot of a session. History is not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub items: Vec<Item>,
    #[serde(default)]
    pub phase: Phase,
}

/// One row of the ranking view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    /// 1-based position in the ranking.
    pub place: usize,
    pub item: Item,
    /// Whether the item is currently among the finalists.
    pub finalist: bool,
}

/// A ranking session over a fixed catalog.
#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<Item>,
    phase: Phase,
    history: HistoryStack,
    rules: TournamentRules,
}

impl Session {
    /// Starts a new session from catalog records.
    ///
    /// Every item starts with the record's `elo` as its rating and zero games.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DataUnavailable`] if the catalog is empty or
    /// contains duplicate ids. No partial session is created.
    pub fn start(catalog: Vec<CatalogRecord>, rules: TournamentRules) -> Result<Self, SessionError> {
        validate_catalog(&catalog)?;
        Ok(Self {
            items: catalog.into_iter().map(Item::from).collect(),
            phase: Phase::Elimination,
            history: HistoryStack::new(),
            rules,
        })
    }

    /// Rebuilds a session from a persisted snapshot, with empty history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DataUnavailable`] if the snapshot has no
    /// items or repeats an id.
    pub fn restore(state: SessionState, rules: TournamentRules) -> Result<Self, SessionError> {
        validate_ids(state.items.iter().map(|item| item.id))?;
        Ok(Self {
            items: state.items,
            phase: state.phase,
            history: HistoryStack::new(),
            rules,
        })
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &TournamentRules {
        &self.rules
    }

    /// Number of votes that can be undone.
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Looks up an item by id in the full item list.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items eligible for pairing: everything during elimination, the
    /// finalists during finals.
    pub fn active_pool(&self) -> Cow<'_, [Item]> {
        match self.phase {
            Phase::Elimination => Cow::Borrowed(&self.items),
            Phase::Finals => Cow::Owned(self.finalists()),
        }
    }

    /// Draws the next pair from the active pool.
    ///
    /// # Errors
    ///
    /// Returns [`PairingError::NoPairAvailable`] if the pool has fewer than
    /// two items.
    pub fn next_pair<R: Rng>(
        &self,
        strategy: PairStrategy,
        rng: &mut R,
    ) -> Result<(Item, Item), PairingError> {
        let pool = self.active_pool();
        let (a, b) = select_pair(&pool, strategy, rng)?;
        Ok((a.clone(), b.clone()))
    }

    /// Records a decisive win of `winner_id` over `loser_id`.
    ///
    /// Both ids must be in the active pool and distinct; otherwise nothing
    /// changes. A snapshot of the pre-vote state is pushed for undo, both
    /// ratings are updated, and both items gain one game. No other item is
    /// touched.
    pub fn vote(&mut self, winner_id: ItemId, loser_id: ItemId) -> VoteOutcome {
        if winner_id == loser_id {
            return VoteOutcome::SameItem(winner_id);
        }

        let missing = {
            let pool = self.active_pool();
            [winner_id, loser_id]
                .into_iter()
                .find(|id| !pool.iter().any(|item| item.id == *id))
        };
        if let Some(id) = missing {
            return VoteOutcome::UnknownItem(id);
        }

        let (Some(w), Some(l)) = (self.position(winner_id), self.position(loser_id)) else {
            return VoteOutcome::UnknownItem(winner_id);
        };

        self.history.push(HistoryEntry {
            items: self.items.clone(),
            phase: self.phase,
        });

        let (winner_rating, loser_rating) = update_ratings(
            self.items[w].rating,
            self.items[l].rating,
            Outcome::Win,
            self.rules.k_factor,
        );
        self.items[w].rating = winner_rating;
        self.items[w].games_played += 1;
        self.items[l].rating = loser_rating;
        self.items[l].games_played += 1;

        VoteOutcome::Recorded {
            winner: self.items[w].clone(),
            loser: self.items[l].clone(),
            advance_ready: self.can_advance(),
        }
    }

    /// Reverts the most recent vote.
    ///
    /// Items and phase are replaced by the stored snapshot. Returns false and
    /// changes nothing if there is no history. Undone votes cannot be redone.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(entry) => {
                self.items = entry.items;
                self.phase = entry.phase;
                true
            }
            None => false,
        }
    }

    /// True when the pool is non-empty and every item has reached the
    /// minimum number of games.
    pub fn is_elimination_complete(&self) -> bool {
        is_elimination_complete(&self.items, self.rules.min_games_per_item)
    }

    /// True when `advance_phase` would succeed.
    pub fn can_advance(&self) -> bool {
        self.phase == Phase::Elimination && self.is_elimination_complete()
    }

    /// Moves from elimination to finals.
    ///
    /// Ratings and games of every item are kept. From now on the active pool
    /// is the finalist projection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEligible`] if the session is already in
    /// finals or some item has too few games.
    pub fn advance_phase(&mut self) -> Result<(), SessionError> {
        if self.phase == Phase::Finals {
            return Err(SessionError::NotEligible("already in finals"));
        }
        if !self.is_elimination_complete() {
            return Err(SessionError::NotEligible(
                "not every item has played the minimum number of games",
            ));
        }
        self.phase = Phase::Finals;
        Ok(())
    }

    /// All items sorted by rating, highest first, ties in catalog order.
    pub fn ranking(&self) -> Vec<Item> {
        finalists(&self.items, self.items.len())
    }

    /// The current top `finalists_count` items by rating.
    pub fn finalists(&self) -> Vec<Item> {
        finalists(&self.items, self.rules.finalists_count)
    }

    /// Ranking rows with their place and finalist flag.
    pub fn ranked(&self) -> Vec<RankedItem> {
        let cutoff = self.rules.finalists_count;
        self.ranking()
            .into_iter()
            .enumerate()
            .map(|(idx, item)| RankedItem {
                place: idx + 1,
                item,
                finalist: idx < cutoff,
            })
            .collect()
    }

    /// Snapshot for persistence.
    pub fn state(&self) -> SessionState {
        SessionState {
            items: self.items.clone(),
            phase: self.phase,
        }
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}
