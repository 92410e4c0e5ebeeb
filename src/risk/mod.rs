//! Risk presentation: tiers, the heuristic fallback and advice texts.

pub mod advice;
pub mod heuristic;
pub mod tier;

pub use advice::detailed_advice;
pub use heuristic::{HeuristicPolicy, MAX_PROBABILITY};
pub use tier::{format_percent, Recommendation, RiskTier, TierInfo};
