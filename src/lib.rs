pub mod archetype;
pub mod cli;
pub mod color;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod errors;
pub mod matchup;
pub mod ordering;
pub mod services;
pub mod stats;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use cli::Cli;
use std::path::PathBuf;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::{AnalysisService, AnalysisWindow, PipelineInputs};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_classify(
    decks: PathBuf,
    cards: PathBuf,
    rules: PathBuf,
    output: PathBuf,
) -> Result<()> {
    let config = AppConfig::new();
    let service = AnalysisService::new(config);
    service.run_classify(&PipelineInputs { decks, cards, rules }, &output)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_analyze(
    decks: PathBuf,
    cards: PathBuf,
    rules: PathBuf,
    output: PathBuf,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    pin: Option<String>,
) -> Result<()> {
    let config = AppConfig::new();
    let service = AnalysisService::new(config);
    service.run_analyze(
        &PipelineInputs { decks, cards, rules },
        &AnalysisWindow { from, to, pin },
        &output,
    )
}
