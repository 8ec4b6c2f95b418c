pub struct AnalysisSettings {
    pub min_trend_periods: usize,
    pub trend_r_squared_gate: f64,
    pub volatility_threshold: f64,
    pub cluster_count: usize,
    pub kmeans_max_iterations: usize,
    pub significance_alpha: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            min_trend_periods: 5,
            trend_r_squared_gate: 0.5,
            volatility_threshold: 0.001,
            cluster_count: 3,
            kmeans_max_iterations: 100,
            significance_alpha: 0.05,
        }
    }
}

pub struct MatchupSettings {
    pub min_sample_size: u32,
    pub confidence_z: f64,
    pub win_rate_epsilon: f64,
}

impl Default for MatchupSettings {
    fn default() -> Self {
        Self {
            min_sample_size: 20,
            confidence_z: 1.96,
            win_rate_epsilon: 0.01,
        }
    }
}

pub struct AppConfig {
    pub analysis: AnalysisSettings,
    pub matchup: MatchupSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            matchup: MatchupSettings::default(),
        }
    }
}

// Config is passed explicitly (dependency injection) rather than held in
// globals, so concurrent analyses with different settings never interfere.
