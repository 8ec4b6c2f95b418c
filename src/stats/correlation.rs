use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AnalysisSettings;

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub significant: bool,
    pub periods: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationAnalysis {
    pub pairs: Vec<CorrelationPair>,
    /// Pairs dropped for zero variance or too few periods
    pub omitted_pairs: usize,
}

/// Pearson correlation coefficient, or `None` when either series has zero
/// variance (the correlation is undefined, not zero).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len()) as f64;
    if n < 2.0 {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x * var_y).sqrt())
}

/// Abramowitz & Stegun 7.1.26 polynomial approximation, |error| < 1.5e-7
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + 0.3275911 * x);
    let y = 1.0
        - (((((1.061405429 * t - 1.453152027) * t) + 1.421413741) * t - 0.284496736) * t
            + 0.254829592)
            * t
            * (-x * x).exp();
    sign * y
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Two-sided significance via the Fisher z-transform:
/// z = atanh(r)·sqrt(n-3), p = 2·(1 - Φ(|z|)). Needs at least 4 samples.
pub fn two_sided_p(r: f64, n: usize) -> Option<f64> {
    if n < 4 {
        return None;
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }
    let z = r.atanh() * ((n - 3) as f64).sqrt();
    Some(2.0 * (1.0 - normal_cdf(z.abs())))
}

/// Pairwise Pearson correlation between archetype share series. Pairs with an
/// undefined correlation (zero variance) or too few periods are omitted, not
/// reported as zero.
pub fn analyze_correlations(
    series: &BTreeMap<String, Vec<f64>>,
    settings: &AnalysisSettings,
) -> CorrelationAnalysis {
    let names: Vec<&String> = series.keys().collect();
    let mut pairs = Vec::new();
    let mut omitted_pairs = 0;

    for (i, first) in names.iter().enumerate() {
        for second in names.iter().skip(i + 1) {
            let xs = &series[*first];
            let ys = &series[*second];
            let n = xs.len().min(ys.len());

            let result = pearson(xs, ys).and_then(|r| two_sided_p(r, n).map(|p| (r, p)));
            match result {
                Some((coefficient, p_value)) => pairs.push(CorrelationPair {
                    first: (*first).clone(),
                    second: (*second).clone(),
                    coefficient,
                    p_value,
                    significant: p_value < settings.significance_alpha,
                    periods: n,
                }),
                None => omitted_pairs += 1,
            }
        }
    }

    CorrelationAnalysis {
        pairs,
        omitted_pairs,
    }
}
