pub mod synthesizer;
pub mod types;

pub use synthesizer::synthesize_matrix;
pub use types::{ArchetypeRecord, MatchupCell, MatchupMatrix};
