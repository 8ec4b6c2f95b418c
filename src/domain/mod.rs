pub mod decklist;
pub mod models;

pub use models::*;
