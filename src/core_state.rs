//! Application state shared by the local API handlers.
//!
//! `CoreState` owns every long-lived component: the predictor client, the
//! scenario engine, the history store and the last submitted form. Handlers
//! reach them only through the methods below.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::bmi::{self, BmiCategory};
use crate::config::AppConfig;
use crate::history::{self, HistoryError, HistoryStore};
use crate::models::{
    HistoryRecord, PatientForm, PatientRecord, PredictRequest, PredictionResult, Scenario,
    ScenarioEdit,
};
use crate::predictor::{HttpPredictor, Predictor, PredictorError};
use crate::risk::{detailed_advice, format_percent, Recommendation, RiskTier, TierInfo};
use crate::scenario::{EngineError, ScenarioEngine, ScenarioSnapshot};
use crate::validation::{self, ValidationError};

// ═══════════════════════════════════════════════════════════
// Assessment — result of one form submission
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub record: PatientRecord,
    pub payload: PredictRequest,
    pub result: PredictionResult,
    pub percent: String,
    pub tier: TierInfo,
    pub recommendation: Recommendation,
    pub advice: Vec<&'static str>,
    pub bmi_by_gender: Option<BmiCategory>,
    pub bmi_who: Option<BmiCategory>,
    /// `None` when the history write failed; the assessment still stands.
    pub history_id: Option<Uuid>,
    pub scenario: ScenarioSnapshot,
}

/// A CSV export ready for download.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    pub config: AppConfig,
    predictor: Arc<dyn Predictor>,
    engine: ScenarioEngine,
    history: Mutex<HistoryStore>,
    /// Form of the last submission, target of "apply scenario to form".
    last_form: Mutex<Option<PatientForm>>,
}

impl CoreState {
    pub fn new(config: AppConfig, predictor: Arc<dyn Predictor>, history: HistoryStore) -> Self {
        let engine = ScenarioEngine::new(predictor.clone(), config.debounce);
        Self {
            config,
            predictor,
            engine,
            history: Mutex::new(history),
            last_form: Mutex::new(None),
        }
    }

    /// Build the production state: HTTP predictor plus on-disk history.
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let predictor = Arc::new(HttpPredictor::from_config(&config)?);
        let history = HistoryStore::open(&config.history_db_path())?;
        tracing::info!(
            predictor = %config.predictor_url,
            data_dir = %config.data_dir.display(),
            "Core state initialized"
        );
        Ok(Self::new(config, predictor, history))
    }

    fn history(&self) -> Result<MutexGuard<'_, HistoryStore>, CoreError> {
        self.history.lock().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Assessment ──────────────────────────────────────────

    /// Prefilled form ("Load sample").
    pub fn sample_form(&self) -> PatientForm {
        PatientForm::sample()
    }

    /// Validate, predict, record and make the result the scenario baseline.
    ///
    /// The previous baseline is dropped first, so a failed submission leaves
    /// the what-if panel dormant.
    pub async fn assess(&self, mut form: PatientForm) -> Result<Assessment, CoreError> {
        self.engine.clear_baseline()?;
        form.refresh_bmi();
        let record = validation::validate(&form)?;
        let payload = record.to_request();

        let result = self.predictor.predict(&payload).await?;
        tracing::info!(
            probability = result.probability_cancer,
            prediction = result.prediction,
            "Assessment completed"
        );

        let history_id = match self.history()?.record(payload.clone(), result) {
            Ok(entry) => Some(entry.id),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to record assessment history");
                None
            }
        };

        let scenario = self.engine.set_baseline(record.clone(), result)?;
        *self.last_form.lock().map_err(|_| CoreError::LockPoisoned)? = Some(form.clone());

        let tier = RiskTier::from_probability(result.probability_cancer);
        let (bmi_by_gender, bmi_who) = bmi::categorize(&form.bmi, record.gender);
        Ok(Assessment {
            advice: detailed_advice(&payload, tier),
            percent: format_percent(result.probability_cancer),
            tier: tier.info(),
            recommendation: Recommendation::for_probability(result.probability_cancer),
            bmi_by_gender,
            bmi_who,
            history_id,
            scenario,
            record,
            payload,
            result,
        })
    }

    // ── Scenario ────────────────────────────────────────────

    pub fn scenario(&self) -> ScenarioSnapshot {
        self.engine.snapshot()
    }

    pub fn subscribe_scenario(&self) -> watch::Receiver<ScenarioSnapshot> {
        self.engine.subscribe()
    }

    /// Out-of-range values are rejected before the engine sees them.
    pub fn edit_scenario(&self, edit: &ScenarioEdit) -> Result<ScenarioSnapshot, CoreError> {
        validation::validate_scenario_edit(edit)?;
        Ok(self.engine.edit_scenario(edit)?)
    }

    pub fn replace_scenario(&self, scenario: Scenario) -> Result<ScenarioSnapshot, CoreError> {
        validation::validate_scenario(&scenario)?;
        Ok(self.engine.replace_scenario(scenario)?)
    }

    pub fn reset_scenario(&self) -> Result<ScenarioSnapshot, CoreError> {
        Ok(self.engine.reset_scenario()?)
    }

    pub fn dismiss_scenario_error(&self) -> Result<ScenarioSnapshot, CoreError> {
        Ok(self.engine.dismiss_error()?)
    }

    /// Copy the scenario into the last submitted form and return it.
    pub fn apply_scenario(&self) -> Result<PatientForm, CoreError> {
        let mut guard = self.last_form.lock().map_err(|_| CoreError::LockPoisoned)?;
        let form = guard.as_mut().ok_or(EngineError::NoBaseline)?;
        self.engine.apply_to(form)?;
        Ok(form.clone())
    }

    // ── Connectivity ────────────────────────────────────────

    pub fn set_online(&self, online: bool) -> Result<ScenarioSnapshot, CoreError> {
        Ok(self.engine.set_online(online)?)
    }

    pub fn is_online(&self) -> bool {
        self.engine.is_online()
    }

    // ── History ─────────────────────────────────────────────

    pub fn history_list(&self, limit: Option<usize>) -> Result<Vec<HistoryRecord>, CoreError> {
        Ok(self.history()?.list(limit)?)
    }

    pub fn history_len(&self) -> Result<usize, CoreError> {
        Ok(self.history()?.len()?)
    }

    pub fn latest_history_json(&self) -> Result<Option<String>, CoreError> {
        Ok(self.history()?.latest_json()?)
    }

    pub fn export_history_csv(&self) -> Result<CsvExport, CoreError> {
        let content = self.history()?.export_csv()?;
        Ok(CsvExport {
            file_name: history::export_file_name(Utc::now()),
            content,
        })
    }

    pub fn clear_history(&self) -> Result<usize, CoreError> {
        Ok(self.history()?.clear()?)
    }

    /// Stop background scenario work. Called on server shutdown.
    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

// ═══════════════════════════════════════════════════════════
// Error types
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Predictor(#[from] PredictorError),
    #[error(transparent)]
    Scenario(#[from] EngineError),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
