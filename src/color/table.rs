use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::identity::{Color, ColorIdentity, ColorSet};
use crate::domain::DeckEntry;
use crate::errors;

/// One entry of the bulk card database extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardColorEntry {
    pub name: String,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Read-only card name → color set lookup, loaded once from a bulk card
/// database and shared across worker threads.
pub struct ColorTable {
    colors: HashMap<String, ColorSet>,
}

impl ColorTable {
    pub fn from_entries(entries: Vec<CardColorEntry>) -> Self {
        let mut colors = HashMap::with_capacity(entries.len());
        for entry in entries {
            let set = ColorSet::from_colors(
                entry
                    .colors
                    .iter()
                    .filter_map(|s| s.chars().next())
                    .filter_map(Color::from_letter),
            );
            colors.insert(entry.name, set);
        }
        Self { colors }
    }

    /// Load the table from a bulk card database JSON file. A missing or
    /// unreadable file is structural misconfiguration and aborts the run.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| errors::load_context("card color table", path))?;
        let entries: Vec<CardColorEntry> =
            serde_json::from_str(&json).context(errors::parse_context("card color table"))?;

        info!("Loaded color table with {} cards", entries.len());
        Ok(Self::from_entries(entries))
    }

    pub fn lookup(&self, card_name: &str) -> Option<ColorSet> {
        self.colors.get(card_name).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Result of resolving a deck's color identity. Unknown card names contribute
/// no color; their count is kept for data-quality reporting.
#[derive(Debug, Clone)]
pub struct IdentityResolution {
    pub identity: ColorIdentity,
    pub unknown_cards: usize,
}

/// Union of the colors of every distinct card in the deck (main and side),
/// intersected with WUBRG. Independent of card enumeration order.
pub fn resolve_identity(deck: &DeckEntry, table: &ColorTable) -> IdentityResolution {
    let mut colors = ColorSet::new();
    let mut unknown_cards = 0;

    for name in deck.card_names() {
        match table.lookup(name) {
            Some(set) => colors = colors.union(&set),
            None => unknown_cards += 1,
        }
    }

    IdentityResolution {
        identity: ColorIdentity::from_set(colors),
        unknown_cards,
    }
}
