//! Text and JSON rendering of rankings and session status.

use duel_core::{Item, RankedItem, Session};
use serde::Serialize;
use std::io::{self, Write};

/// JSON representation of a ranking listing.
#[derive(Serialize)]
struct RankingJson<'a> {
    /// Current phase: "elimination" or "finals".
    phase: &'a str,
    /// Total number of items in the session.
    total: usize,
    /// Ranked rows, best first.
    rows: &'a [RankedItem],
}

/// Writes the ranking as an aligned table.
///
/// During elimination, rows that would currently make the finals are marked
/// with `*`.
pub fn write_ranking<W: Write>(out: &mut W, session: &Session, limit: Option<usize>) -> io::Result<()> {
    let rows = limited(session.ranked(), limit);
    let mark_finalists = session.phase() == duel_core::Phase::Elimination;

    writeln!(
        out,
        "Ranking ({} items, phase: {})",
        session.items().len(),
        session.phase()
    )?;
    writeln!(out, "{:>5}  {:>6}  {:>8}  {:>5}  URL", "Place", "Id", "Rating", "Games")?;
    writeln!(out, "{}", "-".repeat(48))?;
    for row in &rows {
        let mark = if mark_finalists && row.finalist { "*" } else { " " };
        writeln!(
            out,
            "{:>4}{}  {:>6}  {:>8.0}  {:>5}  {}",
            row.place, mark, row.item.id, row.item.rating, row.item.games_played, row.item.url
        )?;
    }
    Ok(())
}

/// Renders the ranking as pretty-printed JSON.
pub fn ranking_json(session: &Session, limit: Option<usize>) -> serde_json::Result<String> {
    let rows = limited(session.ranked(), limit);
    serde_json::to_string_pretty(&RankingJson {
        phase: session.phase().as_str(),
        total: session.items().len(),
        rows: &rows,
    })
}

/// Writes the finalists as a table.
pub fn write_items<W: Write>(out: &mut W, title: &str, items: &[Item]) -> io::Result<()> {
    writeln!(out, "{} ({})", title, items.len())?;
    for (idx, item) in items.iter().enumerate() {
        writeln!(
            out,
            "{:>4}. #{:<6} {:>6.0}  ({} games)  {}",
            idx + 1,
            item.id,
            item.rating,
            item.games_played,
            item.url
        )?;
    }
    Ok(())
}

/// Writes a short summary of the session's progress.
///
/// `last_saved` is the store's timestamp for the snapshot, if one was written.
pub fn write_status<W: Write>(
    out: &mut W,
    session: &Session,
    last_saved: Option<&str>,
) -> io::Result<()> {
    let rules = session.rules();
    let items = session.items();
    let min_games = items.iter().map(|i| i.games_played).min().unwrap_or(0);
    let below = items
        .iter()
        .filter(|i| i.games_played < rules.min_games_per_item)
        .count();

    writeln!(out, "Phase:            {}", session.phase())?;
    writeln!(out, "Items:            {}", items.len())?;
    writeln!(out, "Fewest games:     {}", min_games)?;
    writeln!(
        out,
        "Below minimum:    {} (minimum {} games)",
        below, rules.min_games_per_item
    )?;
    writeln!(out, "Finalists:        {}", session.finalists().len())?;
    writeln!(
        out,
        "Ready to advance: {}",
        if session.can_advance() { "yes" } else { "no" }
    )?;
    writeln!(out, "Last saved:       {}", last_saved.unwrap_or("never"))?;
    Ok(())
}

fn limited(mut rows: Vec<RankedItem>, limit: Option<usize>) -> Vec<RankedItem> {
    if let Some(n) = limit {
        rows.truncate(n);
    }
    rows
}
