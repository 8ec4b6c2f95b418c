use std::path::Path;

/// Add context to input-file load errors
pub fn load_context(what: &str, path: &Path) -> String {
    format!("Failed to load {} from: {}", what, path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Describe a deck that could not be parsed into card+count pairs
pub fn malformed_deck_context(player: &str, tournament_id: &str) -> String {
    format!(
        "Malformed deck record for player '{}' in tournament '{}'",
        player, tournament_id
    )
}
