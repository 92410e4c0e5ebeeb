use serde::{Deserialize, Serialize};

use super::enums::{Gender, GeneticRisk};
use super::patient::{PatientForm, PatientRecord, PredictRequest};
use super::wire::{bool_flag, opt_flag};

/// Working copy of the editable risk factors, used by the what-if explorer.
///
/// Age and gender are carried from the baseline and are not editable; when
/// absent they resolve from the baseline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(rename = "Age", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "Gender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
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

impl Scenario {
    /// Start a scenario from the submitted baseline.
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            age: Some(record.age),
            gender: Some(record.gender),
            bmi: record.bmi,
            smoking: record.smoking,
            genetic_risk: record.genetic_risk,
            physical_activity: record.physical_activity,
            alcohol_intake: record.alcohol_intake,
            cancer_history: record.cancer_history,
        }
    }

    /// Predictor payload for this scenario, falling back to the baseline for
    /// fields the scenario does not carry.
    pub fn resolve(&self, baseline: &PatientRecord) -> PredictRequest {
        PredictRequest {
            age: self.age.unwrap_or(baseline.age),
            gender: self.gender.unwrap_or(baseline.gender),
            bmi: self.bmi,
            smoking: self.smoking,
            genetic_risk: self.genetic_risk,
            physical_activity: self.physical_activity,
            alcohol_intake: self.alcohol_intake,
            cancer_history: self.cancer_history,
        }
    }

    /// Copy the scenario into the form ("apply to form").
    /// Height and weight are left as they were.
    pub fn apply_to(&self, form: &mut PatientForm) {
        form.smoking = u8::from(self.smoking).to_string();
        form.genetic_risk = self.genetic_risk.code().to_string();
        form.cancer_history = u8::from(self.cancer_history).to_string();
        form.physical_activity = self.physical_activity.to_string();
        form.alcohol_intake = self.alcohol_intake.to_string();
        form.bmi = self.bmi.to_string();
    }
}

/// A partial update to a scenario; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEdit {
    #[serde(rename = "BMI", default)]
    pub bmi: Option<f64>,
    #[serde(rename = "Smoking", default, with = "opt_flag")]
    pub smoking: Option<bool>,
    #[serde(rename = "GeneticRisk", default)]
    pub genetic_risk: Option<GeneticRisk>,
    #[serde(rename = "PhysicalActivity", default)]
    pub physical_activity: Option<f64>,
    #[serde(rename = "AlcoholIntake", default)]
    pub alcohol_intake: Option<f64>,
    #[serde(rename = "CancerHistory", default, with = "opt_flag")]
    pub cancer_history: Option<bool>,
}

impl ScenarioEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the edit. Returns whether any field actually changed.
    pub fn apply(&self, scenario: &mut Scenario) -> bool {
        let before = scenario.clone();
        if let Some(bmi) = self.bmi {
            scenario.bmi = bmi;
        }
        if let Some(smoking) = self.smoking {
            scenario.smoking = smoking;
        }
        if let Some(genetic_risk) = self.genetic_risk {
            scenario.genetic_risk = genetic_risk;
        }
        if let Some(activity) = self.physical_activity {
            scenario.physical_activity = activity;
        }
        if let Some(alcohol) = self.alcohol_intake {
            scenario.alcohol_intake = alcohol;
        }
        if let Some(history) = self.cancer_history {
            scenario.cancer_history = history;
        }
        *scenario != before
    }
}
