use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AnalysisSettings;
use crate::domain::ClassifiedDeck;

// Slopes smaller than this count as flat
const SLOPE_EPSILON: f64 = 1e-4;

/// Trend classification for an archetype's share over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendClass {
    Rising,
    Declining,
    Volatile,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodShare {
    pub period: String,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeTrend {
    pub archetype: String,
    pub shares: Vec<PeriodShare>,
    pub slope: f64,
    pub r_squared: f64,
    pub classification: TrendClass,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendAnalysis {
    pub periods: Vec<String>,
    pub trends: Vec<ArchetypeTrend>,
    /// Archetypes seen in too few periods to classify
    pub excluded_short_series: Vec<String>,
}

/// Calendar-month bucket key, e.g. "2025-07".
pub fn period_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Least-squares fit of y against x = 0..n-1.
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub r_squared: f64,
    pub variance: f64,
}

pub fn linear_fit(ys: &[f64]) -> LinearFit {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return LinearFit {
            slope: 0.0,
            r_squared: 0.0,
            variance: 0.0,
        };
    }

    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // A flat series is fit exactly by its own mean. Summing equal values
    // leaves a rounding residue in var_y, so the check is relative to the
    // mean's scale, not an exact zero.
    let flat_tolerance = 1e-12 * (mean_y * mean_y).max(f64::EPSILON);
    if var_y <= flat_tolerance {
        return LinearFit {
            slope: 0.0,
            r_squared: 1.0,
            variance: 0.0,
        };
    }

    LinearFit {
        slope: covariance / var_x,
        r_squared: (covariance * covariance) / (var_x * var_y),
        variance: var_y / n,
    }
}

/// Per-archetype share series over the window's months, zero-filled for
/// months where the archetype is absent.
pub fn share_series(decks: &[ClassifiedDeck]) -> (Vec<String>, BTreeMap<String, Vec<f64>>) {
    let mut per_period: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for deck in decks {
        let bucket = per_period.entry(period_key(deck.entry.date)).or_default();
        *bucket.entry(deck.label.clone()).or_insert(0) += 1;
    }

    let periods: Vec<String> = per_period.keys().cloned().collect();
    let totals: Vec<usize> = per_period.values().map(|b| b.values().sum()).collect();

    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for deck in decks {
        series.entry(deck.label.clone()).or_insert_with(|| vec![0.0; periods.len()]);
    }
    for (period_idx, (_, bucket)) in per_period.iter().enumerate() {
        for (archetype, count) in bucket {
            let shares = series.get_mut(archetype).unwrap();
            shares[period_idx] = *count as f64 / totals[period_idx] as f64;
        }
    }

    (periods, series)
}

/// Rising/Declining require R² at or above the gate AND a slope outside the
/// ±`SLOPE_EPSILON` band: a well-fit line whose slope is below one hundredth
/// of a share point per period is Stable, not a trend.
fn classify_fit(fit: LinearFit, settings: &AnalysisSettings) -> TrendClass {
    if fit.r_squared >= settings.trend_r_squared_gate {
        if fit.slope > SLOPE_EPSILON {
            return TrendClass::Rising;
        }
        if fit.slope < -SLOPE_EPSILON {
            return TrendClass::Declining;
        }
        return TrendClass::Stable;
    }
    if fit.variance > settings.volatility_threshold {
        TrendClass::Volatile
    } else {
        TrendClass::Stable
    }
}

/// Bucket decks by month, fit each archetype's share series, classify.
/// Archetypes present in fewer than `min_trend_periods` months are excluded
/// rather than mis-classified.
pub fn analyze_trends(decks: &[ClassifiedDeck], settings: &AnalysisSettings) -> TrendAnalysis {
    let (periods, series) = share_series(decks);

    let mut trends = Vec::new();
    let mut excluded_short_series = Vec::new();

    for (archetype, shares) in &series {
        let periods_present = shares.iter().filter(|s| **s > 0.0).count();
        if periods_present < settings.min_trend_periods {
            excluded_short_series.push(archetype.clone());
            continue;
        }

        let fit = linear_fit(shares);
        trends.push(ArchetypeTrend {
            archetype: archetype.clone(),
            shares: periods
                .iter()
                .zip(shares)
                .map(|(period, share)| PeriodShare {
                    period: period.clone(),
                    share: *share,
                })
                .collect(),
            slope: fit.slope,
            r_squared: fit.r_squared,
            classification: classify_fit(fit, settings),
        });
    }

    TrendAnalysis {
        periods,
        trends,
        excluded_short_series,
    }
}
