use crate::error::RequestError;
use crate::models::{HealthReport, PredictionRequest};
use async_trait::async_trait;
use serde_json::Value;

/// Seam between the form controller and the estimation service.
///
/// Successful calls return the decoded JSON body untouched; deciding whether
/// it carries an `error` field or a usable payload is left to the caller.
#[async_trait]
pub trait EstimatorApi: Send + Sync {
    /// `GET /api/get_location_names`
    async fn get_location_names(&self) -> Result<Value, RequestError>;

    /// `POST /api/predict_home_price`
    async fn predict_home_price(&self, request: &PredictionRequest) -> Result<Value, RequestError>;

    /// `GET /api/health`
    async fn health(&self) -> Result<HealthReport, RequestError>;

    /// Human readable name of the service being talked to
    fn service_name(&self) -> String;
}
