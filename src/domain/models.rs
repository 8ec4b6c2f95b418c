use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::color::ColorIdentity;

/// Card name → number of copies. Ordered so that serialized output and
/// iteration order are reproducible across runs.
pub type CardCounts = BTreeMap<String, u32>;

/// Match record attached to a deck: wins/losses when the source reports them,
/// final standing otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckResult {
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub rank: Option<u32>,
}

/// A parsed tournament deck. Created once from a raw record by an external
/// collector and never mutated by the analysis core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
    pub id: String,
    pub tournament_id: String,
    pub player: String,
    pub date: NaiveDate,
    pub format: String,
    pub source: String,
    pub mainboard: CardCounts,
    pub sideboard: CardCounts,
    pub result: DeckResult,
}

impl DeckEntry {
    /// Distinct card names across mainboard and sideboard.
    pub fn card_names(&self) -> impl Iterator<Item = &str> {
        self.mainboard
            .keys()
            .map(|s| s.as_str())
            .chain(
                self.sideboard
                    .keys()
                    .filter(|name| !self.mainboard.contains_key(*name))
                    .map(|s| s.as_str()),
            )
    }

    /// Combined mainboard+sideboard counts, as seen by the rule matcher.
    pub fn combined_counts(&self) -> CardCounts {
        let mut counts = self.mainboard.clone();
        for (name, count) in &self.sideboard {
            *counts.entry(name.clone()).or_insert(0) += count;
        }
        counts
    }
}

/// A deck after classification: archetype, color identity and the composite
/// label downstream reporting displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedDeck {
    #[serde(flatten)]
    pub entry: DeckEntry,
    pub archetype: String,
    pub color_identity: ColorIdentity,
    pub label: String,
}

// --- Raw collector records ---

/// Tournament record as delivered by a collector, decklists still unparsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub date: NaiveDate,
    pub format: String,
    #[serde(default)]
    pub source: String,
    pub decks: Vec<DeckRecord>,
}

/// Raw deck inside a tournament record; board entries are textual lines
/// like "4 Lightning Strike" or "4x Lightning Strike"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckRecord {
    pub player: String,
    #[serde(default)]
    pub mainboard: Vec<String>,
    #[serde(default)]
    pub sideboard: Vec<String>,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
    #[serde(default)]
    pub rank: Option<u32>,
}
