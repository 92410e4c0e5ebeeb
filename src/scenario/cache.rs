//! Session cache of scenario predictions.
//!
//! Keyed by the canonical JSON of the resolved payload. Entries live for the
//! whole session and are never evicted.

use std::collections::HashMap;

use crate::models::{PredictRequest, PredictionResult};

/// Canonical key of a resolved scenario payload.
///
/// `PredictRequest` serializes its eight fields in declaration order, so two
/// equal payloads always give the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioKey(String);

impl ScenarioKey {
    pub fn of(request: &PredictRequest) -> Self {
        let canonical = serde_json::to_string(request).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Scenario payload not serializable, using debug key");
            format!("{request:?}")
        });
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct ScenarioCache {
    entries: HashMap<ScenarioKey, PredictionResult>,
}

impl ScenarioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ScenarioKey) -> Option<PredictionResult> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: ScenarioKey, result: PredictionResult) {
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
