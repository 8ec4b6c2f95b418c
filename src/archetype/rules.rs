use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::CardCounts;
use crate::errors;

fn default_min_count() -> u32 {
    1
}

/// One card option inside a clause, with the minimum number of copies that
/// satisfies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRequirement {
    pub card: String,
    #[serde(default = "default_min_count")]
    pub min_count: u32,
}

/// A clause is satisfied when at least one of its card options is present at
/// or above its minimum count. A rule requires every clause (AND of ORs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleClause {
    pub any: Vec<CardRequirement>,
}

impl RuleClause {
    pub fn is_satisfied(&self, counts: &CardCounts) -> bool {
        self.any
            .iter()
            .any(|req| counts.get(&req.card).copied().unwrap_or(0) >= req.min_count)
    }
}

/// Declarative archetype rule. `name` may contain `{colors}`, which is
/// replaced with the deck's color identity name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeRule {
    pub id: String,
    pub name: String,
    pub priority: i32,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub requires: Vec<RuleClause>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl ArchetypeRule {
    /// Total number of card options across required clauses. Breaks priority
    /// ties: the more specific rule wins.
    pub fn specificity(&self) -> usize {
        self.requires.iter().map(|clause| clause.any.len()).sum()
    }

    /// Empty `formats` means the rule applies everywhere.
    pub fn applies_to_format(&self, format: &str) -> bool {
        self.formats.is_empty() || self.formats.iter().any(|f| f.eq_ignore_ascii_case(format))
    }

    pub fn matches(&self, counts: &CardCounts) -> bool {
        let excluded = self
            .excludes
            .iter()
            .any(|card| counts.get(card).copied().unwrap_or(0) > 0);
        if excluded {
            return false;
        }
        self.requires.iter().all(|clause| clause.is_satisfied(counts))
    }

    pub fn render_name(&self, identity_name: &str) -> String {
        self.name.replace("{colors}", identity_name)
    }
}

/// The ordered rule set. Evaluation order is fixed at construction:
/// priority ascending, then specificity descending, then rule id — so the
/// outcome never depends on rule file ordering beyond the priority field.
pub struct RuleSet {
    rules: Vec<ArchetypeRule>,
}

impl RuleSet {
    pub fn new(mut rules: Vec<ArchetypeRule>) -> Self {
        rules.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.specificity().cmp(&a.specificity()))
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { rules }
    }

    /// Load rules from a JSON rule file. A missing or unreadable file is
    /// structural misconfiguration and aborts the run.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| errors::load_context("archetype rule set", path))?;
        let rules: Vec<ArchetypeRule> =
            serde_json::from_str(&json).context(errors::parse_context("archetype rule set"))?;

        info!("Loaded {} archetype rules", rules.len());
        Ok(Self::new(rules))
    }

    pub fn for_format<'a>(&'a self, format: &'a str) -> impl Iterator<Item = &'a ArchetypeRule> {
        self.rules.iter().filter(move |r| r.applies_to_format(format))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
