pub mod analysis;

pub use analysis::{AnalysisService, AnalysisWindow, ClassificationOutcome, PipelineInputs};
