//! Duel Arena - a command-line front end for pairwise Elo ranking.
//!
//! This crate drives a [`duel_core::Session`] from the terminal: it loads the
//! catalog, resumes or persists state in SQLite, and renders rankings.
//!
//! # Modules
//!
//! - [`arena`] - Session driver that persists after every change
//! - [`catalog`] - Reading the JSON catalog from disk
//! - [`config`] - `arena.toml` loading and validation
//! - [`output`] - Ranking, finalist, and status rendering
//! - [`play`] - Interactive voting loop
//! - [`storage`] - SQLite key-value store for the session snapshot

pub mod arena;
pub mod catalog;
pub mod config;
pub mod output;
pub mod play;
pub mod storage;
