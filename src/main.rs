use anyhow::Result;

use metagame_analyzer::cli::Command;
use metagame_analyzer::{handle_analyze, handle_classify, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Classify {
            decks,
            cards,
            rules,
            output,
        } => handle_classify(decks, cards, rules, output),
        Command::Analyze {
            decks,
            cards,
            rules,
            output,
            from,
            to,
            pin,
        } => handle_analyze(decks, cards, rules, output, from, to, pin),
    }
}
