//! Interactive voting loop.
//!
//! Presents one pair at a time and reads a single command per line. The loop
//! only observes committed state. A new pair is drawn after every change,
//! except after an undo, which shows the undone pair again so it can be
//! decided anew.

use duel_core::{Item, PairStrategy, PairingError, Phase, StateStore, VoteOutcome};
use rand::Rng;
use std::io::{BufRead, Write};

use crate::arena::{Arena, ArenaError};

/// A command typed at the voting prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    /// The first item of the pair wins.
    PickFirst,
    /// The second item of the pair wins.
    PickSecond,
    Undo,
    Advance,
    Quit,
}

impl PlayCommand {
    /// Parses a prompt line. Returns `None` for anything unrecognized.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "1" => Some(PlayCommand::PickFirst),
            "2" => Some(PlayCommand::PickSecond),
            "u" | "undo" => Some(PlayCommand::Undo),
            "a" | "advance" => Some(PlayCommand::Advance),
            "q" | "quit" | "exit" => Some(PlayCommand::Quit),
            _ => None,
        }
    }
}

/// Counts of what happened during one `play` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub votes: usize,
    pub undos: usize,
}

const HELP: &str = "Commands: 1 or 2 pick the winner, u undo, a advance to finals, q quit";

/// Runs the voting loop until `q` or end of input.
///
/// # Errors
///
/// Returns an error if reading input, writing output, or persisting state
/// fails.
pub fn run_play<S, R, I, O>(
    arena: &mut Arena<S>,
    strategy: PairStrategy,
    rng: &mut R,
    input: I,
    out: &mut O,
) -> Result<PlaySummary, ArenaError>
where
    S: StateStore,
    R: Rng,
    I: BufRead,
    O: Write,
{
    let mut summary = PlaySummary::default();
    let mut lines = input.lines();
    // Pairs voted on during this run, most recent last
    let mut voted: Vec<(Item, Item)> = Vec::new();
    let mut replay: Option<(Item, Item)> = None;
    writeln!(out, "{}", HELP)?;

    loop {
        let pair = match replay.take() {
            Some(pair) => pair,
            None => match arena.next_pair(strategy, rng) {
                Ok(pair) => pair,
                Err(ArenaError::Pairing(PairingError::NoPairAvailable(n))) => {
                    writeln!(out, "Not enough items to compare ({} in pool).", n)?;
                    break;
                }
                Err(e) => return Err(e),
            },
        };

        write_prompt(out, arena, &pair)?;

        // Re-prompt the same pair until something changes
        let changed = loop {
            let Some(line) = lines.next().transpose()? else {
                return Ok(summary);
            };
            let Some(command) = PlayCommand::parse(&line) else {
                writeln!(out, "{}", HELP)?;
                prompt_again(out)?;
                continue;
            };
            match command {
                PlayCommand::PickFirst | PlayCommand::PickSecond => {
                    let (winner, loser) = if command == PlayCommand::PickFirst {
                        (&pair.0, &pair.1)
                    } else {
                        (&pair.1, &pair.0)
                    };
                    if let VoteOutcome::Recorded {
                        winner,
                        loser,
                        advance_ready,
                    } = arena.vote(winner.id, loser.id)?
                    {
                        summary.votes += 1;
                        voted.push(pair.clone());
                        writeln!(
                            out,
                            "#{} -> {:.0}, #{} -> {:.0}",
                            winner.id, winner.rating, loser.id, loser.rating
                        )?;
                        if advance_ready {
                            writeln!(
                                out,
                                "Every item has played enough games. Type 'a' to advance to finals."
                            )?;
                        }
                    }
                    break true;
                }
                PlayCommand::Undo => {
                    if arena.undo()? {
                        summary.undos += 1;
                        writeln!(out, "Last vote undone.")?;
                        replay = voted.pop().map(|(a, b)| refreshed(arena, a, b));
                        break true;
                    }
                    voted.clear();
                    writeln!(out, "Nothing to undo.")?;
                    prompt_again(out)?;
                }
                PlayCommand::Advance => match arena.advance_phase() {
                    Ok(()) => {
                        voted.clear();
                        writeln!(
                            out,
                            "Finals started with {} items.",
                            arena.session().finalists().len()
                        )?;
                        break true;
                    }
                    Err(ArenaError::Session(e)) => {
                        writeln!(out, "{}", e)?;
                        prompt_again(out)?;
                    }
                    Err(e) => return Err(e),
                },
                PlayCommand::Quit => break false,
            }
        };

        if !changed {
            break;
        }
    }

    Ok(summary)
}

/// Re-reads both items so a replayed pair shows the restored ratings.
fn refreshed<S: StateStore>(arena: &Arena<S>, a: Item, b: Item) -> (Item, Item) {
    let session = arena.session();
    let a = session.item(a.id).cloned().unwrap_or(a);
    let b = session.item(b.id).cloned().unwrap_or(b);
    (a, b)
}

fn prompt_again<O: Write>(out: &mut O) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

fn write_prompt<S: StateStore, O: Write>(
    out: &mut O,
    arena: &Arena<S>,
    pair: &(Item, Item),
) -> std::io::Result<()> {
    let session = arena.session();
    let phase = match session.phase() {
        Phase::Elimination => "Elimination",
        Phase::Finals => "Finals",
    };
    let undo = if session.can_undo() { ", u to undo" } else { "" };

    writeln!(out)?;
    writeln!(out, "[{}] Which is better?{}", phase, undo)?;
    for (key, item) in [("1", &pair.0), ("2", &pair.1)] {
        writeln!(
            out,
            "  {}) #{} {}  ({:.0}, {} games)",
            key, item.id, item.url, item.rating, item.games_played
        )?;
    }
    prompt_again(out)
}
