use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::ClassifiedDeck;

/// What the dedup pass removed.
#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    pub input_count: usize,
    pub output_count: usize,
    pub duplicate_rate: f64,
}

/// Canonical dedup key. Player names are trimmed and case-folded so that
/// "Alice " and "alice" collapse to one entry.
fn dedup_key(deck: &ClassifiedDeck) -> (String, String, NaiveDate) {
    (
        deck.entry.player.trim().to_lowercase(),
        deck.entry.tournament_id.clone(),
        deck.entry.date,
    )
}

/// Remove repeated (player, tournament, date) decks, keeping the first
/// occurrence of each key. Idempotent: running it again changes nothing.
pub fn dedup_decks(decks: Vec<ClassifiedDeck>) -> (Vec<ClassifiedDeck>, DedupReport) {
    let input_count = decks.len();
    let mut seen = HashSet::with_capacity(input_count);
    let mut kept = Vec::with_capacity(input_count);

    for deck in decks {
        if seen.insert(dedup_key(&deck)) {
            kept.push(deck);
        }
    }

    let output_count = kept.len();
    let duplicate_rate = if input_count == 0 {
        0.0
    } else {
        (input_count - output_count) as f64 / input_count as f64
    };

    if input_count != output_count {
        info!(
            "Deduplicated {} decks down to {} ({:.1}% duplicates)",
            input_count,
            output_count,
            duplicate_rate * 100.0
        );
    }

    (
        kept,
        DedupReport {
            input_count,
            output_count,
            duplicate_rate,
        },
    )
}
