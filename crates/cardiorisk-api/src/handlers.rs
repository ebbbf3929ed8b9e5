use crate::models::*;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use cardiorisk_core::FeatureRecord;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Errors surfaced by the prediction boundary.
///
/// Internal detail never reaches the response body; it is logged instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing features in request body")]
    MissingFeatures,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFeatures => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string()
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        error!("Failed to parse prediction request: {}", err);
        ApiError::Internal
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "cardiorisk-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/predict - Score one feature record
///
/// The body is taken as raw bytes so malformed JSON is reported as a server
/// failure rather than an extractor rejection.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let payload: Value = serde_json::from_slice(&body)?;

    let features = match payload.get("features") {
        None | Some(Value::Null) => {
            warn!("Rejected prediction request without features");
            return Err(ApiError::MissingFeatures);
        }
        Some(features) => FeatureRecord::deserialize(features)?,
    };

    if let Some(requested) = payload.get("model").and_then(Value::as_str) {
        debug!(
            "Requested model `{}`, serving `{}`",
            requested, state.model_id
        );
    }

    for warning in features.range_warnings() {
        warn!("Implausible input: {}", warning);
    }

    let result = cardiorisk_core::score(&features);

    info!(
        "Scored request: raw_score={:.4}, probability={:.4}, prediction={}, risk_level={}",
        result.raw_score,
        result.probability_positive,
        result.prediction,
        result.risk_level.as_str()
    );

    Ok(Json(PredictResponse::new(state.model_id.clone(), &result)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Bytes},
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };
    use cardiorisk_core::RiskLevel;
    use serde_json::Value;

    use super::{health_check, predict, ApiError};
    use crate::models::AppState;

    const TYPICAL_ADULT: &str = include_str!("../../../tests/fixtures/typical_adult.json");
    const HIGH_RISK: &str = include_str!("../../../tests/fixtures/high_risk.json");
    const MISSING_FEATURES: &str = include_str!("../../../tests/fixtures/missing_features.json");
    const NON_NUMERIC: &str = include_str!("../../../tests/fixtures/non_numeric_features.json");

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            model_id: "random_forest_tuned".to_string(),
        }))
    }

    async fn error_body(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn typical_adult_is_low_risk() {
        let response = predict(state(), Bytes::from(TYPICAL_ADULT)).await.unwrap().0;

        assert_eq!(response.model, "random_forest_tuned");
        assert_eq!(response.prediction, 0);
        assert_eq!(response.risk_level, RiskLevel::Low);
        let [negative, positive] = response.probability;
        assert!((positive - 0.300).abs() < 1e-3);
        assert!((negative + positive - 1.0).abs() <= f64::EPSILON);
    }

    #[tokio::test]
    async fn stacked_risk_factors_are_high_risk() {
        let response = predict(state(), Bytes::from(HIGH_RISK)).await.unwrap().0;

        assert_eq!(response.prediction, 1);
        assert_eq!(response.risk_level, RiskLevel::High);
        assert!(response.probability[1] > 0.99);
    }

    #[tokio::test]
    async fn response_uses_wire_shape() {
        let response = predict(state(), Bytes::from(TYPICAL_ADULT)).await.unwrap().0;
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["model"], "random_forest_tuned");
        assert_eq!(json["prediction"], 0);
        assert_eq!(json["risk_level"], "LOW");
        assert_eq!(json["probability"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn missing_features_is_a_client_error() {
        let err = predict(state(), Bytes::from(MISSING_FEATURES))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingFeatures));

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing features in request body");
    }

    #[tokio::test]
    async fn null_features_counts_as_missing() {
        let err = predict(state(), Bytes::from(r#"{"features": null}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingFeatures));
    }

    #[tokio::test]
    async fn malformed_json_is_a_generic_server_error() {
        let err = predict(state(), Bytes::from("{\"features\": {"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal));

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn non_numeric_feature_does_not_leak_detail() {
        let err = predict(state(), Bytes::from(NON_NUMERIC)).await.unwrap_err();
        let (status, body) = error_body(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("age_years"));
    }

    #[tokio::test]
    async fn out_of_range_values_are_still_scored() {
        let body = TYPICAL_ADULT.replace("\"age_years\": 45", "\"age_years\": -10");
        let response = predict(state(), Bytes::from(body)).await.unwrap().0;
        assert_eq!(response.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn configured_model_id_is_reported() {
        let custom = State(Arc::new(AppState {
            model_id: "logistic_v2".to_string(),
        }));
        let response = predict(custom, Bytes::from(TYPICAL_ADULT)).await.unwrap().0;
        assert_eq!(response.model, "logistic_v2");
    }

    #[tokio::test]
    async fn health_reports_service_name() {
        let health = health_check().await.0;
        assert!(health.ok);
        assert_eq!(health.service, "cardiorisk-api");
    }
}
