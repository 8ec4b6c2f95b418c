use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

use super::models::{CardCounts, DeckEntry, DeckRecord, DeckResult, TournamentRecord};
use crate::errors;

/// Matches "4 Lightning Strike", "4x Lightning Strike" and "1X Island"
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\s*[xX]?\s+(\S.*)$").unwrap())
}

/// Parse one decklist line into (card name, copies).
pub fn parse_line(line: &str) -> Result<(String, u32)> {
    let trimmed = line.trim();
    let captures = line_pattern()
        .captures(trimmed)
        .ok_or_else(|| anyhow::anyhow!("Unparseable decklist line: '{}'", line))?;

    let count: u32 = captures[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid card count in line: '{}'", line))?;
    if count == 0 {
        anyhow::bail!("Zero card count in line: '{}'", line);
    }

    Ok((captures[2].trim().to_string(), count))
}

/// Parse a full board, accumulating repeated card names.
pub fn parse_board(lines: &[String]) -> Result<CardCounts> {
    let mut counts = CardCounts::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (name, count) = parse_line(line)?;
        *counts.entry(name).or_insert(0) += count;
    }
    Ok(counts)
}

/// Parse a raw deck record into an immutable [`DeckEntry`].
///
/// `deck_index` is the deck's position within its tournament record and seeds
/// the entry id; a deck with an unparseable board is a malformed record and
/// the whole deck is rejected.
pub fn parse_deck(
    tournament: &TournamentRecord,
    deck_index: usize,
    record: &DeckRecord,
) -> Result<DeckEntry> {
    use anyhow::Context as _;

    let context = || errors::malformed_deck_context(&record.player, &tournament.id);

    let mainboard = parse_board(&record.mainboard).with_context(context)?;
    if mainboard.is_empty() {
        return Err(anyhow::anyhow!("Empty mainboard").context(context()));
    }
    let sideboard = parse_board(&record.sideboard).with_context(context)?;

    Ok(DeckEntry {
        id: format!("{}#{}", tournament.id, deck_index),
        tournament_id: tournament.id.clone(),
        player: record.player.clone(),
        date: tournament.date,
        format: tournament.format.clone(),
        source: tournament.source.clone(),
        mainboard,
        sideboard,
        result: DeckResult {
            wins: record.wins,
            losses: record.losses,
            rank: record.rank,
        },
    })
}
