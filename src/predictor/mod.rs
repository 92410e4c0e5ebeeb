//! Remote prediction capability.
//!
//! The model lives behind `POST /predict`; this module only knows how to
//! talk to it. The scenario engine and `CoreState` depend on the trait.

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpPredictor;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PredictRequest, PredictionResult};

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Cannot reach predictor at {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Malformed predictor response: {0}")]
    MalformedResponse(String),

    /// The predictor dropped the call itself (for example a gateway that
    /// sheds superseded requests). `HttpPredictor` never returns it; the
    /// engine treats it as silent and never shows it to the user.
    #[error("Prediction request cancelled")]
    Cancelled,

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl PredictorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PredictorError::Cancelled)
    }
}

/// Anything that can turn a payload into a prediction.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictorError>;
}
