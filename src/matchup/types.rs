use serde::Serialize;

/// Aggregate win/loss counts for one archetype over the analysis window.
///
/// This is the synthesizer's whole input surface. A future per-match capture
/// feed only has to produce these records (or replace the synthesizer behind
/// the same output type) without touching the statistics engine or the
/// ordering policy.
#[derive(Debug, Clone)]
pub struct ArchetypeRecord {
    pub archetype: String,
    pub wins: u32,
    pub losses: u32,
}

impl ArchetypeRecord {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            0.5
        } else {
            self.wins as f64 / games as f64
        }
    }
}

/// One estimated pairwise matchup.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupCell {
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub sample_size: u32,
    pub low_confidence: bool,
}

/// Archetype×archetype matchup estimates. Rows and columns share one axis
/// order, produced by the ordering policy — the same order chart generators
/// receive, so matrix axes and chart bars always line up.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupMatrix {
    pub archetypes: Vec<String>,
    pub win_rate: Vec<Vec<f64>>,
    pub ci_low: Vec<Vec<f64>>,
    pub ci_high: Vec<Vec<f64>>,
    pub sample_size: Vec<Vec<u32>>,
    pub low_confidence: Vec<Vec<bool>>,
    /// Always true for this synthesizer: values are modeled estimates derived
    /// from aggregate win rates, not measured match results.
    pub synthetic: bool,
}

impl MatchupMatrix {
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn index_of(&self, archetype: &str) -> Option<usize> {
        self.archetypes.iter().position(|a| a == archetype)
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<MatchupCell> {
        let i = self.index_of(row)?;
        let j = self.index_of(column)?;
        let win_rate = self.win_rate[i][j];
        let sample_size = self.sample_size[i][j];
        Some(MatchupCell {
            wins: (win_rate * sample_size as f64).round() as u32,
            losses: ((1.0 - win_rate) * sample_size as f64).round() as u32,
            win_rate,
            ci_low: self.ci_low[i][j],
            ci_high: self.ci_high[i][j],
            sample_size,
            low_confidence: self.low_confidence[i][j],
        })
    }
}
