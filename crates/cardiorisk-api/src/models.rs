use cardiorisk_core::{RiskLevel, ScoreResult};
use serde::{Deserialize, Serialize};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub model_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub model: String,
    pub prediction: u8,
    pub probability: [f64; 2],
    pub risk_level: RiskLevel,
}

impl PredictResponse {
    pub fn new(model: impl Into<String>, result: &ScoreResult) -> Self {
        Self {
            model: model.into(),
            prediction: result.prediction,
            probability: result.probability_pair(),
            risk_level: result.risk_level,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}
