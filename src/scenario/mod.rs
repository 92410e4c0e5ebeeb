//! What-if scenario re-evaluation.
//!
//! `ScenarioEngine` keeps a model-backed estimate in sync with edits to a
//! scenario: debounced, cached per payload, and cancelled when superseded.
//! When the predictor is offline or failing, the snapshot falls back to the
//! heuristic estimate.

pub mod cache;
pub mod engine;

pub use cache::{ScenarioCache, ScenarioKey};
pub use engine::{
    DisplaySource, EngineError, Phase, ScenarioDisplay, ScenarioEngine, ScenarioSnapshot,
};
