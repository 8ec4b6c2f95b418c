pub mod classifier;
pub mod rules;

pub use classifier::classify;
pub use rules::{ArchetypeRule, CardRequirement, RuleClause, RuleSet};
