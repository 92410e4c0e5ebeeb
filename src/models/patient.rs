use serde::{Deserialize, Serialize};

use super::enums::{Gender, GeneticRisk};
use super::wire::{bool_flag, lenient_bool};

// ═══════════════════════════════════════════════════════════
// PatientForm — raw input as typed into the form
// ═══════════════════════════════════════════════════════════

/// Raw form fields, kept as strings exactly as the front end holds them.
///
/// `Height`/`Weight` are only used to derive `BMI`; they never reach the
/// predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatientForm {
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    #[serde(rename = "BMI")]
    pub bmi: String,
    pub smoking: String,
    pub genetic_risk: String,
    pub physical_activity: String,
    pub alcohol_intake: String,
    pub cancer_history: String,
}

impl PatientForm {
    /// Quick-fill sample ("Load sample").
    pub fn sample() -> Self {
        Self {
            age: "50".into(),
            gender: "1".into(),
            height: "170".into(),
            weight: "70".into(),
            bmi: "24.2".into(),
            smoking: "0".into(),
            genetic_risk: "2".into(),
            physical_activity: "5.0".into(),
            alcohol_intake: "2.5".into(),
            cancer_history: "0".into(),
        }
    }

    /// Recompute `BMI` from height and weight when both are positive numbers.
    ///
    /// Mirrors the live form behavior: one decimal, previous value kept
    /// when either input is missing or invalid.
    pub fn refresh_bmi(&mut self) {
        let height = parse_number(&self.height);
        let weight = parse_number(&self.weight);
        if let (Some(h), Some(w)) = (height, weight) {
            if let Some(bmi) = compute_bmi(h, w) {
                self.bmi = format!("{bmi:.1}");
            }
        }
    }
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            age: String::new(),
            gender: "1".into(),
            height: String::new(),
            weight: String::new(),
            bmi: String::new(),
            smoking: "0".into(),
            genetic_risk: "0".into(),
            physical_activity: "0".into(),
            alcohol_intake: "0".into(),
            cancer_history: "0".into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// PatientRecord — validated input
// ═══════════════════════════════════════════════════════════

/// A validated patient record. Built by `validation::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub smoking: bool,
    pub genetic_risk: GeneticRisk,
    pub physical_activity: f64,
    pub alcohol_intake: f64,
    pub cancer_history: bool,
}

impl PatientRecord {
    /// Wire payload for the predictor.
    pub fn to_request(&self) -> PredictRequest {
        PredictRequest {
            age: self.age,
            gender: self.gender,
            bmi: self.bmi,
            smoking: self.smoking,
            genetic_risk: self.genetic_risk,
            physical_activity: self.physical_activity,
            alcohol_intake: self.alcohol_intake,
            cancer_history: self.cancer_history,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Predictor wire types
// ═══════════════════════════════════════════════════════════

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "Smoking", with = "bool_flag")]
    pub smoking: bool,
    #[serde(rename = "GeneticRisk")]
    pub genetic_risk: GeneticRisk,
    #[serde(rename = "PhysicalActivity")]
    pub physical_activity: f64,
    #[serde(rename = "AlcoholIntake")]
    pub alcohol_intake: f64,
    #[serde(rename = "CancerHistory", with = "bool_flag")]
    pub cancer_history: bool,
}

/// Response of `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(with = "lenient_bool")]
    pub prediction: bool,
    pub probability_cancer: f64,
}

// ═══════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════

/// BMI = weight / height_m². `None` unless both inputs are positive.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !(height_cm.is_finite() && weight_kg.is_finite()) || height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// Parse a numeric form field. Empty or non-finite input yields `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
