use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Predictor, PredictorError};
use crate::config::AppConfig;
use crate::models::{PredictRequest, PredictionResult};

/// Predictor reached over HTTP (`POST {base_url}/predict`).
pub struct HttpPredictor {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPredictor {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictorError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PredictorError> {
        Self::new(&config.predictor_url, config.predictor_timeout)
    }

    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}

/// Error body shapes: `{"message": ...}` or FastAPI's `{"detail": ...}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

fn server_message(status: u16, body: &str) -> String {
    let from_body = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| {
        b.message.or(b.detail.map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }))
    });
    from_body.unwrap_or_else(|| format!("Request failed with status code {status}"))
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictorError> {
        let url = self.predict_url();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout.as_secs())
                } else {
                    e.to_string()
                };
                PredictorError::Network {
                    url: url.clone(),
                    reason,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), %message, "Predictor returned an error");
            return Err(PredictorError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let result: PredictionResult = response
            .json()
            .await
            .map_err(|e| PredictorError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            probability = result.probability_cancer,
            prediction = result.prediction,
            "Predictor responded"
        );
        Ok(result)
    }
}
