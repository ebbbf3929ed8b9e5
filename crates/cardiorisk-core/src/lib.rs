pub mod features;

pub mod scoring;

pub use features::{body_mass_index, FeatureRecord};
pub use scoring::{raw_score, score, sigmoid, RiskLevel, ScoreResult};
