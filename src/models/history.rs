use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patient::{PredictRequest, PredictionResult};

/// One successful assessment: what was sent and what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub payload: PredictRequest,
    pub response: PredictionResult,
}

impl HistoryRecord {
    pub fn new(payload: PredictRequest, response: PredictionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            payload,
            response,
        }
    }
}
