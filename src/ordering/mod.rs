use std::cmp::Ordering;
use std::collections::HashMap;

/// Shared archetype ordering: optional pinned archetype first, then weight
/// descending (metagame share in practice), then name ascending.
///
/// The matchup matrix and every reporting consumer use the same policy
/// instance, so matrix axes and chart ordering always agree. Repeated calls on
/// unchanged input produce byte-identical sequences.
#[derive(Debug, Clone, Default)]
pub struct OrderingPolicy {
    pub pin: Option<String>,
}

impl OrderingPolicy {
    pub fn new(pin: Option<String>) -> Self {
        Self { pin }
    }

    pub fn compare(&self, a: &str, weight_a: f64, b: &str, weight_b: f64) -> Ordering {
        let a_pinned = self.pin.as_deref() == Some(a);
        let b_pinned = self.pin.as_deref() == Some(b);

        b_pinned
            .cmp(&a_pinned)
            .then_with(|| weight_b.total_cmp(&weight_a))
            .then_with(|| a.cmp(b))
    }

    /// Order archetype names by the supplied weights. Names missing from the
    /// weight map sort as weight zero.
    pub fn order(&self, names: &[String], weights: &HashMap<String, f64>) -> Vec<String> {
        let mut ordered: Vec<String> = names.to_vec();
        ordered.sort_by(|a, b| {
            let weight_a = weights.get(a).copied().unwrap_or(0.0);
            let weight_b = weights.get(b).copied().unwrap_or(0.0);
            self.compare(a, weight_a, b, weight_b)
        });
        ordered
    }
}
