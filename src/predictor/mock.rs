//! Scriptable in-memory predictor for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Predictor, PredictorError};
use crate::models::{PredictRequest, PredictionResult};

/// What the next calls should produce.
#[derive(Debug, Clone)]
enum Behavior {
    Succeed,
    FailWithStatus(u16, String),
    Cancel,
}

/// Mock predictor: answers a fixed probability (or a per-request override),
/// optionally after a delay, and records every call.
pub struct MockPredictor {
    probability: Mutex<f64>,
    overrides: Mutex<Vec<(PredictRequest, f64)>>,
    behavior: Mutex<Behavior>,
    delay: Duration,
    calls: Mutex<Vec<PredictRequest>>,
}

impl MockPredictor {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: Mutex::new(probability),
            overrides: Mutex::new(Vec::new()),
            behavior: Mutex::new(Behavior::Succeed),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_probability(&self, probability: f64) {
        *self.probability.lock().unwrap() = probability;
    }

    /// Answer `probability` for exactly this payload.
    pub fn respond_to(&self, request: PredictRequest, probability: f64) {
        self.overrides.lock().unwrap().push((request, probability));
    }

    pub fn fail_with_status(&self, status: u16, message: &str) {
        *self.behavior.lock().unwrap() = Behavior::FailWithStatus(status, message.to_string());
    }

    pub fn report_cancelled(&self) {
        *self.behavior.lock().unwrap() = Behavior::Cancel;
    }

    pub fn recover(&self) {
        *self.behavior.lock().unwrap() = Behavior::Succeed;
    }

    pub fn calls(&self) -> Vec<PredictRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictorError> {
        self.calls.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            Behavior::FailWithStatus(status, message) => {
                return Err(PredictorError::Server { status, message })
            }
            Behavior::Cancel => return Err(PredictorError::Cancelled),
            Behavior::Succeed => {}
        }

        let probability = self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| r == request)
            .map(|(_, p)| *p)
            .unwrap_or_else(|| *self.probability.lock().unwrap());

        Ok(PredictionResult {
            prediction: probability >= 0.5,
            probability_cancer: probability,
        })
    }
}
