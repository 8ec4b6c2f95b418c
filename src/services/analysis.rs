use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::archetype::{classify, RuleSet};
use crate::color::{resolve_identity, ColorTable};
use crate::config::AppConfig;
use crate::dedup::{dedup_decks, DedupReport};
use crate::domain::{decklist, ClassifiedDeck, TournamentRecord};
use crate::errors;
use crate::matchup::{synthesize_matrix, ArchetypeRecord, MatchupMatrix};
use crate::ordering::OrderingPolicy;
use crate::stats::{self, MetagameReport};

/// Paths to the three input files every run needs.
pub struct PipelineInputs {
    pub decks: PathBuf,
    pub cards: PathBuf,
    pub rules: PathBuf,
}

/// Date window and axis pin for an analysis run.
#[derive(Default)]
pub struct AnalysisWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub pin: Option<String>,
}

/// What survived classification, and what was dropped on the way.
pub struct ClassificationOutcome {
    pub decks: Vec<ClassifiedDeck>,
    pub malformed_decks: usize,
    pub unknown_cards: usize,
    pub dedup: DedupReport,
}

pub struct AnalysisService {
    config: AppConfig,
}

impl AnalysisService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Classify only: write the classified deck table for external consumers.
    pub fn run_classify(&self, inputs: &PipelineInputs, output: &Path) -> Result<()> {
        info!("=== Starting Classification ===");
        let outcome = self.classify_inputs(inputs)?;
        write_json(output, &outcome.decks)?;
        info!("=== Classification Complete ===");
        self.print_classification_summary(&outcome);
        Ok(())
    }

    /// Full pipeline: classify, dedup, statistics, matchup matrix.
    pub fn run_analyze(
        &self,
        inputs: &PipelineInputs,
        window: &AnalysisWindow,
        output_dir: &Path,
    ) -> Result<()> {
        info!("=== Starting Metagame Analysis ===");
        let outcome = self.classify_inputs(inputs)?;

        let windowed = stats::window_decks(outcome.decks.clone(), window.from, window.to);
        info!("  → {} decks inside the analysis window", windowed.len());

        let report = stats::analyze(&windowed, &self.config.analysis);

        let policy = OrderingPolicy::new(window.pin.clone());
        let matrix = self.synthesize_matchups(&report, &policy);
        info!("  → Synthesized matchup matrix for {} archetypes", matrix.len());

        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
        write_json(&output_dir.join("classified_decks.json"), &outcome.decks)?;
        write_json(&output_dir.join("metagame_report.json"), &report)?;
        write_json(&output_dir.join("matchup_matrix.json"), &matrix)?;
        info!("=== Analysis Complete ===");

        self.print_classification_summary(&outcome);
        print_report_summary(&report, &matrix);
        Ok(())
    }

    fn classify_inputs(&self, inputs: &PipelineInputs) -> Result<ClassificationOutcome> {
        let table = ColorTable::load_from_file(&inputs.cards)?;
        let rules = RuleSet::load_from_file(&inputs.rules)?;
        let tournaments = load_tournaments(&inputs.decks)?;
        info!("  → Loaded {} tournament records", tournaments.len());

        let outcome = classify_tournaments(&tournaments, &table, &rules);
        info!(
            "  → Classified {} decks ({} malformed skipped, {} unknown card names)",
            outcome.dedup.input_count, outcome.malformed_decks, outcome.unknown_cards
        );
        Ok(outcome)
    }

    fn synthesize_matchups(&self, report: &MetagameReport, policy: &OrderingPolicy) -> MatchupMatrix {
        let records: Vec<ArchetypeRecord> = report
            .archetypes
            .iter()
            .map(|a| ArchetypeRecord {
                archetype: a.archetype.clone(),
                wins: a.wins,
                losses: a.losses,
            })
            .collect();
        let weights: HashMap<String, f64> = report
            .archetypes
            .iter()
            .map(|a| (a.archetype.clone(), a.share))
            .collect();
        synthesize_matrix(&records, &weights, policy, &self.config.matchup)
    }

    fn print_classification_summary(&self, outcome: &ClassificationOutcome) {
        println!("{}", "Classification".bold());
        println!("  decks kept:       {}", outcome.decks.len().to_string().green());
        println!(
            "  duplicates:       {} ({:.1}%)",
            outcome.dedup.input_count - outcome.dedup.output_count,
            outcome.dedup.duplicate_rate * 100.0
        );
        if outcome.malformed_decks > 0 {
            println!(
                "  malformed decks:  {}",
                outcome.malformed_decks.to_string().yellow()
            );
        }
        if outcome.unknown_cards > 0 {
            println!(
                "  unknown cards:    {}",
                outcome.unknown_cards.to_string().yellow()
            );
        }
    }
}

/// Per-deck classification is pure and independent, so decks run across
/// worker threads; the color table and rule set are the only shared state and
/// are read-only. Everything after this is aggregate work over the result.
pub fn classify_tournaments(
    tournaments: &[TournamentRecord],
    table: &ColorTable,
    rules: &RuleSet,
) -> ClassificationOutcome {
    let candidates: Vec<(usize, usize)> = tournaments
        .iter()
        .enumerate()
        .flat_map(|(t, tournament)| (0..tournament.decks.len()).map(move |d| (t, d)))
        .collect();

    let results: Vec<Result<(ClassifiedDeck, usize)>> = candidates
        .par_iter()
        .map(|&(t, d)| {
            let tournament = &tournaments[t];
            let entry = decklist::parse_deck(tournament, d, &tournament.decks[d])?;
            let resolution = resolve_identity(&entry, table);
            let deck = classify(entry, resolution.identity, rules);
            Ok((deck, resolution.unknown_cards))
        })
        .collect();

    let mut decks = Vec::with_capacity(results.len());
    let mut malformed_decks = 0;
    let mut unknown_cards = 0;
    for result in results {
        match result {
            Ok((deck, unknown)) => {
                decks.push(deck);
                unknown_cards += unknown;
            }
            Err(error) => {
                warn!("Skipping deck: {:#}", error);
                malformed_decks += 1;
            }
        }
    }

    let (decks, dedup) = dedup_decks(decks);
    ClassificationOutcome {
        decks,
        malformed_decks,
        unknown_cards,
        dedup,
    }
}

fn load_tournaments(path: &Path) -> Result<Vec<TournamentRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| errors::load_context("tournament deck records", path))?;
    serde_json::from_str(&json).context(errors::parse_context("tournament deck records"))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    fs::write(path, json).with_context(|| format!("Failed to write: {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn print_report_summary(report: &MetagameReport, matrix: &MatchupMatrix) {
    println!("{}", "Metagame".bold());
    println!("  archetypes:       {}", report.diversity_metrics.archetype_count);
    println!(
        "  shannon index:    {:.3} (effective {:.1})",
        report.diversity_metrics.shannon_index, report.diversity_metrics.effective_archetypes
    );
    println!("  simpson index:    {:.3}", report.diversity_metrics.simpson_index);
    println!(
        "  clusters:         {} (silhouette {:.2})",
        report.clustering_analysis.effective_clusters,
        report.clustering_analysis.silhouette_score
    );
    if !matrix.is_empty() {
        println!(
            "  matchup matrix:   {}x{} {}",
            matrix.len(),
            matrix.len(),
            "(synthesized estimates, not measured results)".yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{ArchetypeRule, CardRequirement, RuleClause};
    use crate::color::CardColorEntry;
    use crate::domain::DeckRecord;

    fn color_table() -> ColorTable {
        ColorTable::from_entries(vec![
            CardColorEntry {
                name: "Monastery Swiftspear".to_string(),
                colors: vec!["R".to_string()],
            },
            CardColorEntry {
                name: "Lightning Strike".to_string(),
                colors: vec!["R".to_string()],
            },
            CardColorEntry {
                name: "Mountain".to_string(),
                colors: vec![],
            },
        ])
    }

    fn rule_set() -> RuleSet {
        RuleSet::new(vec![ArchetypeRule {
            id: "aggro".to_string(),
            name: "Aggro".to_string(),
            priority: 10,
            formats: vec![],
            requires: vec![RuleClause {
                any: vec![CardRequirement {
                    card: "Monastery Swiftspear".to_string(),
                    min_count: 4,
                }],
            }],
            excludes: vec![],
        }])
    }

    fn tournament(decks: Vec<DeckRecord>) -> TournamentRecord {
        TournamentRecord {
            id: "T1".to_string(),
            name: None,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            format: "Standard".to_string(),
            source: "test".to_string(),
            decks,
        }
    }

    fn raw_deck(player: &str, mainboard: &[&str]) -> DeckRecord {
        DeckRecord {
            player: player.to_string(),
            mainboard: mainboard.iter().map(|s| s.to_string()).collect(),
            sideboard: vec![],
            wins: Some(3),
            losses: Some(1),
            rank: None,
        }
    }

    #[test]
    fn test_malformed_deck_skipped_batch_continues() {
        let tournaments = vec![tournament(vec![
            raw_deck("Alice", &["4 Monastery Swiftspear", "20 Mountain"]),
            raw_deck("Bob", &["not a card line"]),
            raw_deck("Carol", &["4 Monastery Swiftspear"]),
        ])];
        let outcome = classify_tournaments(&tournaments, &color_table(), &rule_set());
        assert_eq!(outcome.malformed_decks, 1);
        assert_eq!(outcome.decks.len(), 2);
    }

    #[test]
    fn test_duplicate_players_deduplicated() {
        let tournaments = vec![tournament(vec![
            raw_deck("Alice", &["4 Monastery Swiftspear"]),
            raw_deck("alice ", &["4 Monastery Swiftspear"]),
        ])];
        let outcome = classify_tournaments(&tournaments, &color_table(), &rule_set());
        assert_eq!(outcome.decks.len(), 1);
        assert!((outcome.dedup.duplicate_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_classification_batch_order_independent() {
        let forward = vec![tournament(vec![
            raw_deck("Alice", &["4 Monastery Swiftspear", "4 Lightning Strike"]),
            raw_deck("Bob", &["20 Mountain"]),
        ])];
        let outcome = classify_tournaments(&forward, &color_table(), &rule_set());
        let alice = outcome
            .decks
            .iter()
            .find(|d| d.entry.player == "Alice")
            .unwrap();
        assert_eq!(alice.label, "Mono Red Aggro");

        let reversed = vec![tournament(vec![
            raw_deck("Bob", &["20 Mountain"]),
            raw_deck("Alice", &["4 Monastery Swiftspear", "4 Lightning Strike"]),
        ])];
        let outcome = classify_tournaments(&reversed, &color_table(), &rule_set());
        let alice = outcome
            .decks
            .iter()
            .find(|d| d.entry.player == "Alice")
            .unwrap();
        assert_eq!(alice.label, "Mono Red Aggro");
    }
}
