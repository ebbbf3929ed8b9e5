use crate::config::ApiConfig;
use cardiorisk_core::{FeatureRecord, RiskLevel};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Prediction as returned by `POST /api/predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePrediction {
    pub model: String,
    pub prediction: u8,
    pub probability: [f64; 2],
    pub risk_level: RiskLevel,
}

/// Prediction API client
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from the configured URL
    pub fn new(config: &ApiConfig) -> Result<Self, String> {
        let base_url = config
            .url
            .as_ref()
            .ok_or("API URL not configured (set api.url or pass --remote URL)")?;
        Self::with_url(base_url)
    }

    pub fn with_url(base_url: &str) -> Result<Self, String> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Test connection to the prediction API
    pub fn health_check(&self) -> Result<bool, String> {
        let url = endpoint(&self.base_url, "/api/health");

        let response = self
            .http_client
            .get(&url)
            .send()
            .map_err(|e| format!("Health check failed: {}", e))?;

        Ok(response.status().is_success())
    }

    /// Score a record on the remote service
    pub fn predict(&self, model: &str, features: &FeatureRecord) -> Result<RemotePrediction, String> {
        let url = endpoint(&self.base_url, "/api/predict");

        let response = self
            .http_client
            .post(&url)
            .json(&request_body(model, features))
            .send()
            .map_err(|e| format!("Failed to reach prediction API: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(format!("Prediction API returned {}: {}", status, message));
        }

        response
            .json::<RemotePrediction>()
            .map_err(|e| format!("Failed to parse prediction response: {}", e))
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn request_body(model: &str, features: &FeatureRecord) -> Value {
    serde_json::json!({
        "model": model,
        "features": features,
    })
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}
