use serde::Serialize;

/// Metagame diversity over archetype shares.
#[derive(Debug, Clone, Serialize)]
pub struct DiversityMetrics {
    pub shannon_index: f64,
    pub simpson_index: f64,
    pub effective_archetypes: f64,
    pub archetype_count: usize,
    pub total_decks: usize,
}

/// Shannon H' = -Σ p·ln(p), Simpson D = 1 - Σ p², effective count = e^H'.
/// Only archetypes with nonzero share in the window contribute.
pub fn compute_diversity(counts: &[(String, usize)]) -> DiversityMetrics {
    let total_decks: usize = counts.iter().map(|(_, n)| n).sum();
    let nonzero: Vec<usize> = counts
        .iter()
        .map(|(_, n)| *n)
        .filter(|n| *n > 0)
        .collect();

    if total_decks == 0 {
        return DiversityMetrics {
            shannon_index: 0.0,
            simpson_index: 0.0,
            effective_archetypes: 0.0,
            archetype_count: 0,
            total_decks: 0,
        };
    }

    let mut shannon_index = 0.0;
    let mut simpson_sum = 0.0;
    for n in &nonzero {
        let share = *n as f64 / total_decks as f64;
        shannon_index -= share * share.ln();
        simpson_sum += share * share;
    }
    // A single 100%-share archetype can leave a tiny negative residue
    shannon_index = shannon_index.max(0.0);

    DiversityMetrics {
        shannon_index,
        simpson_index: 1.0 - simpson_sum,
        effective_archetypes: shannon_index.exp(),
        archetype_count: nonzero.len(),
        total_decks,
    }
}
