//! Core rules for ranking a fixed catalog by repeated pairwise votes.
//!
//! This crate provides the pieces a voting front end needs:
//! - [`update_ratings`] for Elo rating updates after a single comparison
//! - [`select_pair`] for choosing the next pair under a [`PairStrategy`]
//! - [`Phase`] and [`TournamentRules`] for the elimination/finals progression
//! - [`HistoryStack`] for exact single-step undo
//! - [`Session`], which ties the above together behind `vote`, `undo`, and
//!   `advance_phase`
//! - catalog parsing and the versioned persisted-state codec
//!
//! Everything here is synchronous and in-memory. Loading files, talking to a
//! database, and presenting pairs are left to the caller.

mod catalog;
mod elo;
mod history;
mod item;
mod pairing;
mod persist;
mod phase;
mod session;

pub use catalog::{parse_catalog, CatalogError};
pub use elo::{expected_score, update_ratings, Outcome, DEFAULT_RATING, K_FACTOR};
pub use history::{HistoryEntry, HistoryStack};
pub use item::{CatalogRecord, Item, ItemId};
pub use pairing::{select_pair, PairStrategy, PairingError};
pub use persist::{
    decode_state, encode_state, MemoryStore, PersistError, StateShape, StateStore, STATE_KEY,
};
pub use phase::{finalists, is_elimination_complete, Phase, TournamentRules};
pub use session::{RankedItem, Session, SessionError, SessionState, VoteOutcome};
