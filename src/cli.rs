use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "tournament metagame analyzer")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Classify raw tournament decklists and write the classified deck table
    Classify {
        /// Tournament deck records (JSON)
        #[arg(long)]
        decks: PathBuf,
        /// Bulk card color table (JSON)
        #[arg(long)]
        cards: PathBuf,
        /// Archetype rule set (JSON)
        #[arg(long)]
        rules: PathBuf,
        /// Output file for the classified deck table
        #[arg(short, long, default_value = "classified_decks.json")]
        output: PathBuf,
    },
    /// Run the full pipeline: classify, dedup, statistics, matchup matrix
    Analyze {
        /// Tournament deck records (JSON)
        #[arg(long)]
        decks: PathBuf,
        /// Bulk card color table (JSON)
        #[arg(long)]
        cards: PathBuf,
        /// Archetype rule set (JSON)
        #[arg(long)]
        rules: PathBuf,
        /// Output directory for the three report files
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
        /// Start of the analysis window (inclusive, YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End of the analysis window (inclusive, YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Archetype to pin first in every ordering
        #[arg(long)]
        pin: Option<String>,
    },
}
