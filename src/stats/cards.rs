use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::ClassifiedDeck;

#[derive(Debug, Clone, Serialize)]
pub struct CardUsage {
    pub card: String,
    /// Decks playing at least one copy (main or side)
    pub deck_count: usize,
    /// Fraction of the deck population playing the card
    pub inclusion_rate: f64,
    /// Mean copies among decks that play it
    pub average_copies: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardAnalysis {
    pub overall: Vec<CardUsage>,
    pub by_archetype: BTreeMap<String, Vec<CardUsage>>,
}

fn usage_table(decks: Vec<&ClassifiedDeck>) -> Vec<CardUsage> {
    let population = decks.len();
    let mut deck_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_copies: BTreeMap<String, u64> = BTreeMap::new();

    for deck in decks {
        for (card, copies) in deck.entry.combined_counts() {
            *deck_counts.entry(card.clone()).or_insert(0) += 1;
            *total_copies.entry(card).or_insert(0) += copies as u64;
        }
    }

    let mut usages: Vec<CardUsage> = deck_counts
        .into_iter()
        .map(|(card, deck_count)| {
            let copies = total_copies[&card];
            CardUsage {
                average_copies: copies as f64 / deck_count as f64,
                inclusion_rate: deck_count as f64 / population as f64,
                deck_count,
                card,
            }
        })
        .collect();

    usages.sort_by(|a, b| b.deck_count.cmp(&a.deck_count).then_with(|| a.card.cmp(&b.card)));
    usages
}

/// Per-card inclusion frequency and average copies across the classified
/// table, with a per-archetype partition.
pub fn analyze_cards(decks: &[ClassifiedDeck]) -> CardAnalysis {
    let overall = usage_table(decks.iter().collect());

    let mut per_archetype: BTreeMap<String, Vec<&ClassifiedDeck>> = BTreeMap::new();
    for deck in decks {
        per_archetype.entry(deck.label.clone()).or_default().push(deck);
    }
    let by_archetype = per_archetype
        .into_iter()
        .map(|(archetype, group)| (archetype, usage_table(group)))
        .collect();

    CardAnalysis {
        overall,
        by_archetype,
    }
}
