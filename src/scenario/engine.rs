use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cache::{ScenarioCache, ScenarioKey};
use crate::models::{
    PatientForm, PatientRecord, PredictRequest, PredictionResult, Scenario, ScenarioEdit,
};
use crate::predictor::Predictor;
use crate::risk::{format_percent, HeuristicPolicy, RiskTier, TierInfo};

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Lifecycle of the current scenario estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No baseline assessment yet.
    Dormant,
    /// Waiting for edits to settle before calling the predictor.
    Debouncing,
    /// Predictor call running.
    InFlight,
    /// Up to date: model result, or heuristic only when offline.
    Settled,
    /// Last predictor call failed; heuristic is shown.
    Errored,
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Debouncing | Phase::InFlight)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No baseline assessment yet")]
    NoBaseline,

    #[error("Scenario engine has been shut down")]
    ShutDown,
}

/// Where the displayed probability comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySource {
    Model,
    Heuristic,
    Unknown,
}

/// What the what-if panel shows: model result, else heuristic, else unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioDisplay {
    pub source: DisplaySource,
    pub probability: Option<f64>,
    pub percent: String,
    pub tier: TierInfo,
}

impl ScenarioDisplay {
    fn resolve(model: Option<PredictionResult>, heuristic: Option<f64>) -> Self {
        let (source, probability) = match (model, heuristic) {
            (Some(result), _) => (DisplaySource::Model, Some(result.probability_cancer)),
            (None, Some(estimate)) => (DisplaySource::Heuristic, Some(estimate)),
            (None, None) => (DisplaySource::Unknown, None),
        };
        let value = probability.unwrap_or(f64::NAN);
        Self {
            source,
            probability,
            percent: format_percent(value),
            tier: RiskTier::from_probability(value).info(),
        }
    }
}

/// Point-in-time view of the engine, published on every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSnapshot {
    pub phase: Phase,
    pub loading: bool,
    pub online: bool,
    pub scenario: Option<Scenario>,
    pub baseline_result: Option<PredictionResult>,
    pub model_result: Option<PredictionResult>,
    pub heuristic_probability: Option<f64>,
    pub error: Option<String>,
    pub display: ScenarioDisplay,
}

// ═══════════════════════════════════════════════════════════
// Engine state
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct Baseline {
    record: PatientRecord,
    result: PredictionResult,
}

struct EngineState {
    baseline: Option<Baseline>,
    scenario: Option<Scenario>,
    online: bool,
    phase: Phase,
    model_result: Option<PredictionResult>,
    error: Option<String>,
    cache: ScenarioCache,
    /// Bumped whenever pending work is superseded. A task only writes back
    /// if its generation is still current.
    generation: u64,
    task: Option<JoinHandle<()>>,
    shut_down: bool,
}

impl EngineState {
    fn new() -> Self {
        Self {
            baseline: None,
            scenario: None,
            online: true,
            phase: Phase::Dormant,
            model_result: None,
            error: None,
            cache: ScenarioCache::new(),
            generation: 0,
            task: None,
            shut_down: false,
        }
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.shut_down {
            Err(EngineError::ShutDown)
        } else {
            Ok(())
        }
    }

    /// Abort the debounce timer or in-flight call, whichever is pending.
    fn cancel_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn snapshot(&self, policy: &HeuristicPolicy) -> ScenarioSnapshot {
        let heuristic = match (&self.baseline, &self.scenario) {
            (Some(baseline), Some(scenario)) => {
                policy.estimate(baseline.result.probability_cancer, scenario)
            }
            _ => None,
        };
        ScenarioSnapshot {
            phase: self.phase,
            loading: self.phase.is_loading(),
            online: self.online,
            scenario: self.scenario.clone(),
            baseline_result: self.baseline.as_ref().map(|b| b.result),
            model_result: self.model_result,
            heuristic_probability: heuristic,
            error: self.error.clone(),
            display: ScenarioDisplay::resolve(self.model_result, heuristic),
        }
    }
}

struct Shared {
    predictor: Arc<dyn Predictor>,
    policy: HeuristicPolicy,
    debounce: Duration,
    state: Mutex<EngineState>,
    updates: watch::Sender<ScenarioSnapshot>,
}

impl Shared {
    /// State is always left consistent between statements, so a poisoned
    /// lock is still usable.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &EngineState) -> ScenarioSnapshot {
        let snapshot = state.snapshot(&self.policy);
        if !state.shut_down {
            self.updates.send_replace(snapshot.clone());
        }
        snapshot
    }

    /// Re-run the evaluation for the current scenario and connectivity.
    fn reevaluate(self: &Arc<Self>, state: &mut EngineState) -> ScenarioSnapshot {
        state.cancel_pending();
        state.error = None;

        let request = match (&state.baseline, &state.scenario) {
            (Some(baseline), Some(scenario)) => Some(scenario.resolve(&baseline.record)),
            _ => None,
        };
        let Some(request) = request else {
            state.model_result = None;
            state.phase = Phase::Dormant;
            return self.publish(state);
        };

        if !state.online {
            tracing::debug!("Offline, scenario shows heuristic estimate");
            state.model_result = None;
            state.phase = Phase::Settled;
            return self.publish(state);
        }

        let key = ScenarioKey::of(&request);
        if let Some(hit) = state.cache.get(&key) {
            tracing::debug!(probability = hit.probability_cancer, "Scenario cache hit");
            state.model_result = Some(hit);
            state.phase = Phase::Settled;
            return self.publish(state);
        }

        state.model_result = None;
        state.phase = Phase::Debouncing;
        let generation = state.generation;
        let shared = Arc::clone(self);
        state.task = Some(tokio::spawn(async move {
            shared.run_evaluation(generation, request, key).await;
        }));
        tracing::debug!(
            generation,
            debounce_ms = self.debounce.as_millis() as u64,
            "Scenario debounce started"
        );
        self.publish(state)
    }

    async fn run_evaluation(
        self: Arc<Self>,
        generation: u64,
        request: PredictRequest,
        key: ScenarioKey,
    ) {
        tokio::time::sleep(self.debounce).await;
        {
            let mut state = self.lock();
            if state.generation != generation {
                return;
            }
            state.phase = Phase::InFlight;
            self.publish(&state);
        }

        let outcome = self.predictor.predict(&request).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(generation, "Discarding superseded scenario result");
            return;
        }
        state.task = None;
        match outcome {
            Ok(result) => {
                tracing::debug!(
                    probability = result.probability_cancer,
                    "Scenario prediction received"
                );
                state.cache.insert(key, result);
                state.model_result = Some(result);
                state.error = None;
                state.phase = Phase::Settled;
            }
            Err(e) if e.is_cancelled() => {
                state.phase = Phase::Settled;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scenario prediction failed, falling back to heuristic");
                state.model_result = None;
                state.error = Some(e.to_string());
                state.phase = Phase::Errored;
            }
        }
        self.publish(&state);
    }
}

// ═══════════════════════════════════════════════════════════
// ScenarioEngine
// ═══════════════════════════════════════════════════════════

/// Debounced, cached and cancellable re-evaluation of a what-if scenario.
///
/// Must be used from within a tokio runtime: evaluations run as spawned
/// tasks. Dropping the engine cancels pending work.
pub struct ScenarioEngine {
    shared: Arc<Shared>,
}

impl ScenarioEngine {
    pub fn new(predictor: Arc<dyn Predictor>, debounce: Duration) -> Self {
        Self::with_policy(predictor, debounce, HeuristicPolicy::default())
    }

    pub fn with_policy(
        predictor: Arc<dyn Predictor>,
        debounce: Duration,
        policy: HeuristicPolicy,
    ) -> Self {
        let state = EngineState::new();
        let (updates, _) = watch::channel(state.snapshot(&policy));
        Self {
            shared: Arc::new(Shared {
                predictor,
                policy,
                debounce,
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    /// Start a new scenario from a freshly assessed record.
    ///
    /// The baseline result is cached under the record's own payload, so the
    /// untouched scenario never costs a predictor call.
    pub fn set_baseline(
        &self,
        record: PatientRecord,
        result: PredictionResult,
    ) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        state.cache.insert(ScenarioKey::of(&record.to_request()), result);
        state.scenario = Some(Scenario::from_record(&record));
        state.baseline = Some(Baseline { record, result });
        tracing::info!(probability = result.probability_cancer, "Scenario baseline set");
        Ok(self.shared.reevaluate(&mut state))
    }

    pub fn clear_baseline(&self) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        state.baseline = None;
        state.scenario = None;
        tracing::info!("Scenario baseline cleared");
        Ok(self.shared.reevaluate(&mut state))
    }

    /// Apply a partial edit. An edit that changes nothing is a no-op.
    pub fn edit_scenario(&self, edit: &ScenarioEdit) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        let Some(scenario) = state.scenario.as_mut() else {
            return Err(EngineError::NoBaseline);
        };
        if !edit.apply(scenario) {
            return Ok(state.snapshot(&self.shared.policy));
        }
        Ok(self.shared.reevaluate(&mut state))
    }

    pub fn replace_scenario(&self, scenario: Scenario) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        if state.baseline.is_none() {
            return Err(EngineError::NoBaseline);
        }
        if state.scenario.as_ref() == Some(&scenario) {
            return Ok(state.snapshot(&self.shared.policy));
        }
        state.scenario = Some(scenario);
        Ok(self.shared.reevaluate(&mut state))
    }

    /// Copy the baseline record back into the scenario.
    pub fn reset_scenario(&self) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        let Some(baseline) = state.baseline.as_ref() else {
            return Err(EngineError::NoBaseline);
        };
        let scenario = Scenario::from_record(&baseline.record);
        state.scenario = Some(scenario);
        Ok(self.shared.reevaluate(&mut state))
    }

    /// Connectivity changed. Offline drops any model result and pending call.
    pub fn set_online(&self, online: bool) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        if state.online == online {
            return Ok(state.snapshot(&self.shared.policy));
        }
        state.online = online;
        tracing::info!(online, "Connectivity changed");
        Ok(self.shared.reevaluate(&mut state))
    }

    pub fn dismiss_error(&self) -> Result<ScenarioSnapshot, EngineError> {
        let mut state = self.shared.lock();
        state.ensure_running()?;
        if state.error.take().is_none() {
            return Ok(state.snapshot(&self.shared.policy));
        }
        if state.phase == Phase::Errored {
            state.phase = Phase::Settled;
        }
        Ok(self.shared.publish(&state))
    }

    pub fn snapshot(&self) -> ScenarioSnapshot {
        self.shared.lock().snapshot(&self.shared.policy)
    }

    pub fn subscribe(&self) -> watch::Receiver<ScenarioSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn is_online(&self) -> bool {
        self.shared.lock().online
    }

    /// Write the scenario back into the form, keeping height and weight.
    pub fn apply_to(&self, form: &mut PatientForm) -> Result<(), EngineError> {
        let state = self.shared.lock();
        let scenario = state.scenario.as_ref().ok_or(EngineError::NoBaseline)?;
        scenario.apply_to(form);
        Ok(())
    }

    /// Cancel the timer and any in-flight call. Nothing is published after.
    pub fn shutdown(&self) {
        let mut state = self.shared.lock();
        if state.shut_down {
            return;
        }
        state.cancel_pending();
        state.shut_down = true;
        tracing::info!("Scenario engine shut down");
    }
}

impl Drop for ScenarioEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
