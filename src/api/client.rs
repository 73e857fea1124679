use crate::api::traits::EstimatorApi;
use crate::config::Config;
use crate::error::RequestError;
use crate::models::{HealthReport, PredictionRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const LOCATIONS_PATH: &str = "api/get_location_names";
const PREDICT_PATH: &str = "api/predict_home_price";
const HEALTH_PATH: &str = "api/health";

/// reqwest-backed client for the home price estimation service
pub struct HttpEstimatorApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpEstimatorApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("home-price-widget/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send_error(&self, err: reqwest::Error) -> RequestError {
        if err.is_timeout() {
            RequestError::Timeout(self.timeout)
        } else {
            RequestError::Transport(err)
        }
    }

    /// Decode a JSON body, turning non-2xx statuses into `RequestError::Status`
    async fn read_json(&self, response: Response) -> Result<Value, RequestError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| self.send_error(err))?;
        debug!("Received {} bytes with status {}", bytes.len(), status);

        if !status.is_success() {
            warn!("Estimation service returned status: {}", status);
            return Err(RequestError::Status {
                status,
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| RequestError::Decode(err.to_string()))
    }
}

#[async_trait]
impl EstimatorApi for HttpEstimatorApi {
    async fn get_location_names(&self) -> Result<Value, RequestError> {
        let url = self.url(LOCATIONS_PATH);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.send_error(err))?;

        self.read_json(response).await
    }

    async fn predict_home_price(&self, request: &PredictionRequest) -> Result<Value, RequestError> {
        let url = self.url(PREDICT_PATH);
        debug!("Posting {:?} to {}", request, url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| self.send_error(err))?;

        self.read_json(response).await
    }

    async fn health(&self) -> Result<HealthReport, RequestError> {
        let url = self.url(HEALTH_PATH);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.send_error(err))?;

        // A degraded service answers 503 with the same report body
        let body = match self.read_json(response).await {
            Ok(body) => body,
            Err(RequestError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: Some(body),
            }) => body,
            Err(err) => return Err(err),
        };

        serde_json::from_value(body).map_err(|err| RequestError::Decode(err.to_string()))
    }

    fn service_name(&self) -> String {
        self.base_url.clone()
    }
}
