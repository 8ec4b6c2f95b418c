//! End-to-end pipeline: raw JSON records through classification, dedup,
//! statistics and matchup synthesis.

use std::collections::HashMap;

use metagame_analyzer::archetype::RuleSet;
use metagame_analyzer::color::ColorTable;
use metagame_analyzer::config::{AnalysisSettings, AppConfig};
use metagame_analyzer::domain::TournamentRecord;
use metagame_analyzer::matchup::{synthesize_matrix, ArchetypeRecord};
use metagame_analyzer::ordering::OrderingPolicy;
use metagame_analyzer::services::analysis::classify_tournaments;
use metagame_analyzer::stats;

const CARDS_JSON: &str = r#"[
    {"name": "Monastery Swiftspear", "colors": ["R"]},
    {"name": "Lightning Strike", "colors": ["R"]},
    {"name": "Play with Fire", "colors": ["R"]},
    {"name": "Mountain", "colors": []},
    {"name": "Consider", "colors": ["U"]},
    {"name": "Fiery Impulse", "colors": ["R"]},
    {"name": "Island", "colors": []}
]"#;

const RULES_JSON: &str = r#"[
    {
        "id": "red-aggro",
        "name": "Aggro",
        "priority": 10,
        "requires": [
            {"any": [{"card": "Monastery Swiftspear", "min_count": 4}]},
            {"any": [{"card": "Lightning Strike"}, {"card": "Play with Fire"}]}
        ]
    },
    {
        "id": "prowess",
        "name": "{colors} Prowess",
        "priority": 5,
        "requires": [
            {"any": [{"card": "Monastery Swiftspear", "min_count": 4}]},
            {"any": [{"card": "Consider", "min_count": 4}]}
        ]
    }
]"#;

const DECKS_JSON: &str = r#"[
    {
        "id": "T1",
        "date": "2025-07-01",
        "format": "Standard",
        "source": "test",
        "decks": [
            {
                "player": "Alice",
                "mainboard": ["4 Monastery Swiftspear", "4 Lightning Strike", "20 Mountain"],
                "wins": 4, "losses": 1
            },
            {
                "player": "Alice",
                "mainboard": ["4 Monastery Swiftspear", "4 Lightning Strike", "20 Mountain"],
                "wins": 4, "losses": 1
            },
            {
                "player": "Bob",
                "mainboard": ["4x Monastery Swiftspear", "4 Consider", "18 Island"],
                "wins": 3, "losses": 2
            },
            {
                "player": "Carol",
                "mainboard": ["24 Island", "4 Consider"],
                "wins": 1, "losses": 4
            },
            {
                "player": "Mallory",
                "mainboard": ["sixty cards, trust me"],
                "wins": 5, "losses": 0
            }
        ]
    }
]"#;

fn fixtures() -> (Vec<TournamentRecord>, ColorTable, RuleSet) {
    let tournaments: Vec<TournamentRecord> = serde_json::from_str(DECKS_JSON).unwrap();
    let cards = serde_json::from_str(CARDS_JSON).unwrap();
    let rules: Vec<metagame_analyzer::archetype::ArchetypeRule> =
        serde_json::from_str(RULES_JSON).unwrap();
    (tournaments, ColorTable::from_entries(cards), RuleSet::new(rules))
}

#[test]
fn classifies_dedups_and_skips_malformed() {
    let (tournaments, table, rules) = fixtures();
    let outcome = classify_tournaments(&tournaments, &table, &rules);

    // Alice's duplicate collapses, Mallory's deck is malformed
    assert_eq!(outcome.malformed_decks, 1);
    assert_eq!(outcome.dedup.input_count, 4);
    assert_eq!(outcome.decks.len(), 3);

    let labels: HashMap<&str, &str> = outcome
        .decks
        .iter()
        .map(|d| (d.entry.player.as_str(), d.label.as_str()))
        .collect();
    assert_eq!(labels["Alice"], "Mono Red Aggro");
    // Prowess rule has lower priority and interpolates the identity name
    assert_eq!(labels["Bob"], "Izzet Prowess");
    // No rule matched, mono identity falls back to the identity name alone
    assert_eq!(labels["Carol"], "Mono Blue");
}

#[test]
fn statistics_report_over_classified_table() {
    let (tournaments, table, rules) = fixtures();
    let outcome = classify_tournaments(&tournaments, &table, &rules);

    let settings = AnalysisSettings {
        min_trend_periods: 1,
        ..AnalysisSettings::default()
    };
    let report = stats::analyze(&outcome.decks, &settings);

    assert_eq!(report.total_decks, 3);
    assert_eq!(report.diversity_metrics.archetype_count, 3);
    // Three equal shares: effective archetype count = 3
    assert!((report.diversity_metrics.effective_archetypes - 3.0).abs() < 1e-9);
    assert!(report.diversity_metrics.simpson_index >= 0.0);
    assert!(report.diversity_metrics.simpson_index < 1.0);

    let swiftspear = report
        .card_analysis
        .overall
        .iter()
        .find(|u| u.card == "Monastery Swiftspear")
        .unwrap();
    assert_eq!(swiftspear.deck_count, 2);
    assert!((swiftspear.average_copies - 4.0).abs() < 1e-12);
}

#[test]
fn matchup_matrix_is_symmetric_and_policy_ordered() {
    let records = vec![
        ArchetypeRecord {
            archetype: "Mono Red Aggro".to_string(),
            wins: 120,
            losses: 80,
        },
        ArchetypeRecord {
            archetype: "Izzet Prowess".to_string(),
            wins: 90,
            losses: 90,
        },
        ArchetypeRecord {
            archetype: "Mono Blue".to_string(),
            wins: 40,
            losses: 70,
        },
    ];
    let weights: HashMap<String, f64> = records
        .iter()
        .map(|r| (r.archetype.clone(), (r.wins + r.losses) as f64))
        .collect();

    let config = AppConfig::new();
    let policy = OrderingPolicy::new(Some("Izzet Prowess".to_string()));
    let matrix = synthesize_matrix(&records, &weights, &policy, &config.matchup);

    assert_eq!(
        matrix.archetypes,
        vec!["Izzet Prowess", "Mono Red Aggro", "Mono Blue"]
    );
    assert!(matrix.synthetic);

    for i in 0..matrix.len() {
        for j in 0..matrix.len() {
            let sum = matrix.win_rate[i][j] + matrix.win_rate[j][i];
            assert!((sum - 1.0).abs() < 1e-9);
            assert!(matrix.ci_low[i][j] <= matrix.win_rate[i][j]);
            assert!(matrix.win_rate[i][j] <= matrix.ci_high[i][j]);
        }
    }

    // The favored deck beats the underdog
    let aggro = matrix.index_of("Mono Red Aggro").unwrap();
    let blue = matrix.index_of("Mono Blue").unwrap();
    assert!(matrix.win_rate[aggro][blue] > 0.5);
}

#[test]
fn repeated_runs_are_identical() {
    let (tournaments, table, rules) = fixtures();
    let settings = AnalysisSettings {
        min_trend_periods: 1,
        ..AnalysisSettings::default()
    };

    let first = classify_tournaments(&tournaments, &table, &rules);
    let first_report = stats::analyze(&first.decks, &settings);
    let first_json = serde_json::to_string(&first_report).unwrap();

    for _ in 0..3 {
        let again = classify_tournaments(&tournaments, &table, &rules);
        let report = stats::analyze(&again.decks, &settings);
        assert_eq!(serde_json::to_string(&report).unwrap(), first_json);
    }
}
