pub mod cards;
pub mod clustering;
pub mod correlation;
pub mod diversity;
pub mod trend;

pub use cards::{analyze_cards, CardAnalysis, CardUsage};
pub use clustering::{cluster_archetypes, ArchetypeFeatures, ClusteringAnalysis};
pub use correlation::{analyze_correlations, pearson, CorrelationAnalysis};
pub use diversity::{compute_diversity, DiversityMetrics};
pub use trend::{analyze_trends, ArchetypeTrend, TrendAnalysis, TrendClass};

use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AnalysisSettings;
use crate::domain::ClassifiedDeck;

/// Per-archetype aggregate over the analysis window. Also the input handed to
/// the matchup synthesizer.
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeAggregate {
    pub archetype: String,
    pub decks: usize,
    pub share: f64,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

/// The full statistics report; each field is independently consumable.
#[derive(Debug, Clone, Serialize)]
pub struct MetagameReport {
    pub total_decks: usize,
    pub archetypes: Vec<ArchetypeAggregate>,
    pub diversity_metrics: DiversityMetrics,
    pub temporal_trends: TrendAnalysis,
    pub clustering_analysis: ClusteringAnalysis,
    pub correlation_analysis: CorrelationAnalysis,
    pub card_analysis: CardAnalysis,
}

/// Restrict the table to an inclusive date window.
pub fn window_decks(
    decks: Vec<ClassifiedDeck>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<ClassifiedDeck> {
    decks
        .into_iter()
        .filter(|deck| {
            from.is_none_or(|start| deck.entry.date >= start)
                && to.is_none_or(|end| deck.entry.date <= end)
        })
        .collect()
}

/// Aggregate deck counts, shares and win/loss totals per archetype label,
/// sorted by name. Archetypes with no reported results get a neutral 0.5
/// win rate.
pub fn aggregate_archetypes(decks: &[ClassifiedDeck]) -> Vec<ArchetypeAggregate> {
    let total = decks.len();
    let mut buckets: BTreeMap<String, (usize, u32, u32)> = BTreeMap::new();

    for deck in decks {
        let bucket = buckets.entry(deck.label.clone()).or_insert((0, 0, 0));
        bucket.0 += 1;
        bucket.1 += deck.entry.result.wins.unwrap_or(0);
        bucket.2 += deck.entry.result.losses.unwrap_or(0);
    }

    buckets
        .into_iter()
        .map(|(archetype, (count, wins, losses))| {
            let games = wins + losses;
            ArchetypeAggregate {
                archetype,
                decks: count,
                share: count as f64 / total.max(1) as f64,
                wins,
                losses,
                win_rate: if games == 0 {
                    0.5
                } else {
                    wins as f64 / games as f64
                },
            }
        })
        .collect()
}

/// Run the whole statistics engine over an already classified, deduplicated
/// deck table. All decks must be classified before this is called; every
/// computation here reads the table immutably.
pub fn analyze(decks: &[ClassifiedDeck], settings: &AnalysisSettings) -> MetagameReport {
    info!("Analyzing {} classified decks", decks.len());

    let archetypes = aggregate_archetypes(decks);
    let counts: Vec<(String, usize)> = archetypes
        .iter()
        .map(|a| (a.archetype.clone(), a.decks))
        .collect();

    let diversity_metrics = compute_diversity(&counts);
    let temporal_trends = analyze_trends(decks, settings);

    let slopes: BTreeMap<&str, f64> = temporal_trends
        .trends
        .iter()
        .map(|t| (t.archetype.as_str(), t.slope))
        .collect();
    let features: Vec<ArchetypeFeatures> = archetypes
        .iter()
        .map(|a| ArchetypeFeatures {
            archetype: a.archetype.clone(),
            win_rate: a.win_rate,
            share: a.share,
            trend_slope: slopes.get(a.archetype.as_str()).copied().unwrap_or(0.0),
        })
        .collect();
    let clustering_analysis = cluster_archetypes(&features, settings);

    let (_, share_series) = trend::share_series(decks);
    let correlation_analysis = analyze_correlations(&share_series, settings);

    let card_analysis = analyze_cards(decks);

    MetagameReport {
        total_decks: decks.len(),
        archetypes,
        diversity_metrics,
        temporal_trends,
        clustering_analysis,
        correlation_analysis,
        card_analysis,
    }
}
