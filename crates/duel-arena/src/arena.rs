//! Session driver that keeps the persisted state in step with every change.
//!
//! An [`Arena`] owns one [`Session`] and a [`StateStore`]. On open it resumes
//! the stored snapshot, or starts fresh from the catalog when there is none
//! or it cannot be understood. After every vote, undo, or phase change that
//! altered the session, the full snapshot is written back.

use duel_core::{
    decode_state, encode_state, CatalogError, Item, ItemId, PairStrategy, PairingError,
    PersistError, Session, SessionError, StateStore, VoteOutcome, STATE_KEY,
};
use rand::Rng;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::load_catalog;
use crate::config::ArenaConfig;

/// Errors raised while driving a session.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// The catalog file could not be read.
    #[error("data unavailable: failed to read catalog {path:?}: {source}")]
    CatalogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The catalog file was read but is not usable.
    #[error("data unavailable: {0}")]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Pairing(#[from] PairingError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The state store failed.
    #[error("storage error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> ArenaError {
    ArenaError::Store(Box::new(e))
}

/// A persisted ranking session.
pub struct Arena<S: StateStore> {
    config: ArenaConfig,
    store: S,
    session: Session,
}

impl<S: StateStore> Arena<S> {
    /// Resumes the stored session or starts a new one from the catalog.
    ///
    /// A stored snapshot in an unrecognized shape is treated as absent.
    ///
    /// # Errors
    ///
    /// Fails if there is no usable snapshot and the catalog cannot be loaded,
    /// or if the store cannot be read.
    pub fn open(config: ArenaConfig, store: S) -> Result<Self, ArenaError> {
        let session = match restore_session(&config, &store)? {
            Some(session) => session,
            None => start_session(&config)?,
        };
        Ok(Self {
            config,
            store,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Draws the next pair from the session's active pool.
    pub fn next_pair<R: Rng>(
        &self,
        strategy: PairStrategy,
        rng: &mut R,
    ) -> Result<(Item, Item), ArenaError> {
        Ok(self.session.next_pair(strategy, rng)?)
    }

    /// Records a vote and persists the new state if it was accepted.
    pub fn vote(&mut self, winner: ItemId, loser: ItemId) -> Result<VoteOutcome, ArenaError> {
        let outcome = self.session.vote(winner, loser);
        match &outcome {
            VoteOutcome::Recorded {
                winner, loser, ..
            } => {
                debug!(
                    "Vote recorded: {} ({}) beat {} ({})",
                    winner.id, winner.rating, loser.id, loser.rating
                );
                self.persist()?;
            }
            VoteOutcome::UnknownItem(id) => {
                warn!("Vote ignored: item {} is not in the active pool", id);
            }
            VoteOutcome::SameItem(id) => {
                warn!("Vote ignored: item {} cannot beat itself", id);
            }
        }
        Ok(outcome)
    }

    /// Undoes the last vote of this run. Returns false if there was none.
    pub fn undo(&mut self) -> Result<bool, ArenaError> {
        if !self.session.undo() {
            debug!("Nothing to undo");
            return Ok(false);
        }
        info!("Undid last vote ({} left)", self.session.history_depth());
        self.persist()?;
        Ok(true)
    }

    /// Advances from elimination to finals and persists the new phase.
    pub fn advance_phase(&mut self) -> Result<(), ArenaError> {
        self.session.advance_phase()?;
        info!(
            "Advanced to {} with {} finalists",
            self.session.phase(),
            self.session.finalists().len()
        );
        self.persist()
    }

    /// Discards the stored state and starts over from the catalog.
    ///
    /// The catalog is loaded before anything is deleted, so a missing
    /// catalog leaves the current state intact.
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        let session = start_session(&self.config)?;
        self.store.remove(STATE_KEY).map_err(store_error)?;
        self.session = session;
        info!("Session reset from catalog");
        Ok(())
    }

    /// Writes the current snapshot to the store.
    pub fn persist(&mut self) -> Result<(), ArenaError> {
        let encoded = encode_state(&self.session.state())?;
        self.store
            .save(STATE_KEY, &encoded)
            .map_err(store_error)?;
        debug!("Persisted session state ({} bytes)", encoded.len());
        Ok(())
    }
}

fn restore_session<S: StateStore>(
    config: &ArenaConfig,
    store: &S,
) -> Result<Option<Session>, ArenaError> {
    let Some(text) = store.load(STATE_KEY).map_err(store_error)? else {
        return Ok(None);
    };

    let Some((state, shape)) = decode_state(&text) else {
        warn!("Stored state has an unrecognized shape, reloading catalog");
        return Ok(None);
    };

    match Session::restore(state, config.rules) {
        Ok(session) => {
            info!(
                "Resumed session: {} items, phase {} (stored as {:?})",
                session.items().len(),
                session.phase(),
                shape
            );
            Ok(Some(session))
        }
        Err(e) => {
            warn!("Stored state is unusable ({}), reloading catalog", e);
            Ok(None)
        }
    }
}

fn start_session(config: &ArenaConfig) -> Result<Session, ArenaError> {
    let catalog = load_catalog(&config.catalog_path)?;
    let session = Session::start(catalog, config.rules)?;
    info!(
        "Started session from {:?} with {} items",
        config.catalog_path,
        session.items().len()
    );
    Ok(session)
}
