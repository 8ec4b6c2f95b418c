//! Matchup estimation from aggregate win rates.
//!
//! No per-match opponent labels exist upstream, so pairwise win rates are
//! synthesized with a Bradley–Terry model: each archetype's aggregate win
//! rate against the field is read as odds against an average-strength
//! opponent, γ = wr/(1−wr), and the pairwise expectation is
//! P(A beats B) = γa/(γa+γb). This makes wr(A,B) + wr(B,A) = 1 by
//! construction. The matrix is an estimate, not a measurement; serialized
//! output carries `synthetic: true` so downstream consumers surface that.

use log::info;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::config::MatchupSettings;
use crate::ordering::OrderingPolicy;

use super::types::{ArchetypeRecord, MatchupMatrix};

/// Bradley–Terry strength from an aggregate win rate. The rate is kept away
/// from 0 and 1 so undefeated small samples don't produce infinite strength.
fn strength(win_rate: f64, epsilon: f64) -> f64 {
    let clamped = win_rate.clamp(epsilon, 1.0 - epsilon);
    clamped / (1.0 - clamped)
}

/// Wilson score interval for a proportion at the configured z.
fn wilson_interval(p: f64, n: f64, z: f64) -> (f64, f64) {
    if n <= 0.0 {
        return (0.0, 1.0);
    }
    let z2 = z * z;
    let denominator = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denominator;
    let margin = (z / denominator) * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
    ((center - margin).max(0.0), (center + margin).min(1.0))
}

/// Effective pairwise sample: harmonic mean of the two archetypes' game
/// counts, the information content of two independent estimates.
fn effective_sample(games_a: u32, games_b: u32) -> f64 {
    if games_a == 0 || games_b == 0 {
        return 0.0;
    }
    let a = games_a as f64;
    let b = games_b as f64;
    2.0 * a * b / (a + b)
}

struct Cell {
    win_rate: f64,
    ci_low: f64,
    ci_high: f64,
    sample: f64,
}

fn synthesize_cell(a: &ArchetypeRecord, b: &ArchetypeRecord, settings: &MatchupSettings) -> Cell {
    let gamma_a = strength(a.win_rate(), settings.win_rate_epsilon);
    let gamma_b = strength(b.win_rate(), settings.win_rate_epsilon);
    let win_rate = gamma_a / (gamma_a + gamma_b);

    let sample = effective_sample(a.games(), b.games());
    let (ci_low, ci_high) = wilson_interval(win_rate, sample, settings.confidence_z);

    Cell {
        win_rate,
        ci_low,
        ci_high,
        sample,
    }
}

/// Build the full archetype×archetype matrix. Axis order comes from the
/// ordering policy applied to `ordering_weights` (metagame share in the
/// pipeline); cells below the minimum sample are marked low-confidence, not
/// dropped. Cell computation is independent per row and runs in parallel.
pub fn synthesize_matrix(
    records: &[ArchetypeRecord],
    ordering_weights: &HashMap<String, f64>,
    policy: &OrderingPolicy,
    settings: &MatchupSettings,
) -> MatchupMatrix {
    let names: Vec<String> = records.iter().map(|r| r.archetype.clone()).collect();
    let archetypes = policy.order(&names, ordering_weights);
    let n = archetypes.len();

    let by_name: HashMap<&str, &ArchetypeRecord> = records
        .iter()
        .map(|r| (r.archetype.as_str(), r))
        .collect();
    let ordered: Vec<&ArchetypeRecord> = archetypes
        .iter()
        .map(|name| by_name[name.as_str()])
        .collect();

    info!("Synthesizing {}x{} matchup matrix", n, n);

    let rows: Vec<Vec<Cell>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        let games = ordered[i].games() as f64;
                        Cell {
                            win_rate: 0.5,
                            ci_low: 0.5,
                            ci_high: 0.5,
                            sample: games,
                        }
                    } else {
                        synthesize_cell(ordered[i], ordered[j], settings)
                    }
                })
                .collect()
        })
        .collect();

    MatchupMatrix {
        win_rate: rows
            .iter()
            .map(|row| row.iter().map(|c| c.win_rate).collect())
            .collect(),
        ci_low: rows
            .iter()
            .map(|row| row.iter().map(|c| c.ci_low).collect())
            .collect(),
        ci_high: rows
            .iter()
            .map(|row| row.iter().map(|c| c.ci_high).collect())
            .collect(),
        sample_size: rows
            .iter()
            .map(|row| row.iter().map(|c| c.sample.round() as u32).collect())
            .collect(),
        low_confidence: rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| (c.sample.round() as u32) < settings.min_sample_size)
                    .collect()
            })
            .collect(),
        archetypes,
        synthetic: true,
    }
}
