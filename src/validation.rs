//! Input validation: raw `PatientForm` → `PatientRecord`, plus the range
//! checks applied to what-if scenarios before they reach the engine.
//!
//! Range checks follow the training data of the model. All failures are
//! collected so the form can show them together.

use crate::models::{
    compute_bmi, parse_number, Gender, GeneticRisk, PatientForm, PatientRecord, Scenario,
    ScenarioEdit,
};

const AGE_RANGE: (f64, f64) = (18.0, 100.0);
const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);
const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 200.0);
const BMI_RANGE: (f64, f64) = (12.0, 55.0);
const ACTIVITY_RANGE: (f64, f64) = (0.0, 10.0);
const ALCOHOL_RANGE: (f64, f64) = (0.0, 5.0);

const MSG_AGE: &str = "Tuổi nên trong khoảng 18–100.";
const MSG_HEIGHT: &str = "Chiều cao nên trong khoảng 100–250 cm.";
const MSG_WEIGHT: &str = "Cân nặng nên trong khoảng 30–200 kg.";
const MSG_BMI: &str = "BMI bất thường so với dữ liệu huấn luyện điển hình.";
const MSG_SCENARIO_BMI: &str = "BMI nên trong khoảng 12–55.";
const MSG_ACTIVITY: &str = "Hoạt động thể chất nên trong khoảng 0–10.";
const MSG_ALCOHOL: &str = "Mức uống rượu nên trong khoảng 0–5.";

/// One or more out-of-range inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .messages.join(" "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

/// Validate a form and build the record sent to the predictor.
///
/// Selector fields (gender, smoking, ...) only fail on values the form can't
/// produce. Activity and alcohol fall back to 0 when empty, like the form.
/// BMI always comes from height and weight; the BMI field is display only.
pub fn validate(form: &PatientForm) -> Result<PatientRecord, ValidationError> {
    let mut messages = Vec::new();

    let age = parse_number(&form.age).map(f64::trunc);
    let height = parse_number(&form.height);
    let weight = parse_number(&form.weight);

    if !age.is_some_and(|a| in_range(a, AGE_RANGE)) {
        messages.push(MSG_AGE.to_string());
    }
    if !height.is_some_and(|h| in_range(h, HEIGHT_RANGE_CM)) {
        messages.push(MSG_HEIGHT.to_string());
    }
    if !weight.is_some_and(|w| in_range(w, WEIGHT_RANGE_KG)) {
        messages.push(MSG_WEIGHT.to_string());
    }
    let derived_bmi = match (height, weight) {
        (Some(h), Some(w)) => compute_bmi(h, w),
        _ => None,
    };
    if let Some(bmi) = derived_bmi {
        if !in_range(bmi, BMI_RANGE) {
            messages.push(MSG_BMI.to_string());
        }
    }

    let gender = form.gender.parse::<Gender>();
    let genetic_risk = form.genetic_risk.parse::<GeneticRisk>();
    let smoking = parse_flag(&form.smoking);
    let cancer_history = parse_flag(&form.cancer_history);

    if gender.is_err() {
        messages.push(invalid_choice("Gender", &form.gender));
    }
    if genetic_risk.is_err() {
        messages.push(invalid_choice("GeneticRisk", &form.genetic_risk));
    }
    if smoking.is_none() {
        messages.push(invalid_choice("Smoking", &form.smoking));
    }
    if cancer_history.is_none() {
        messages.push(invalid_choice("CancerHistory", &form.cancer_history));
    }

    let physical_activity = parse_number(&form.physical_activity).unwrap_or(0.0);
    let alcohol_intake = parse_number(&form.alcohol_intake).unwrap_or(0.0);
    if !in_range(physical_activity, ACTIVITY_RANGE) {
        messages.push(MSG_ACTIVITY.to_string());
    }
    if !in_range(alcohol_intake, ALCOHOL_RANGE) {
        messages.push(MSG_ALCOHOL.to_string());
    }

    let (
        Some(age),
        Some(height_cm),
        Some(weight_kg),
        Ok(gender),
        Ok(genetic_risk),
        Some(smoking),
        Some(cancer_history),
    ) = (age, height, weight, gender, genetic_risk, smoking, cancer_history)
    else {
        return Err(ValidationError { messages });
    };
    // Height and weight are in range here, so the derived BMI exists.
    let Some(bmi) = derived_bmi.map(|b| (b * 10.0).round() / 10.0) else {
        messages.push(MSG_BMI.to_string());
        return Err(ValidationError { messages });
    };
    if !messages.is_empty() {
        return Err(ValidationError { messages });
    }

    Ok(PatientRecord {
        age: age as u32,
        gender,
        height_cm,
        weight_kg,
        bmi,
        smoking,
        genetic_risk,
        physical_activity,
        alcohol_intake,
        cancer_history,
    })
}

/// Range-check a full scenario against the slider bounds.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    check_factors(
        Some(scenario.bmi),
        Some(scenario.physical_activity),
        Some(scenario.alcohol_intake),
    )
}

/// Range-check the fields a partial edit sets. Unset fields pass.
pub fn validate_scenario_edit(edit: &ScenarioEdit) -> Result<(), ValidationError> {
    check_factors(edit.bmi, edit.physical_activity, edit.alcohol_intake)
}

fn check_factors(
    bmi: Option<f64>,
    activity: Option<f64>,
    alcohol: Option<f64>,
) -> Result<(), ValidationError> {
    let mut messages = Vec::new();
    if bmi.is_some_and(|b| !in_range(b, BMI_RANGE)) {
        messages.push(MSG_SCENARIO_BMI.to_string());
    }
    if activity.is_some_and(|a| !in_range(a, ACTIVITY_RANGE)) {
        messages.push(MSG_ACTIVITY.to_string());
    }
    if alcohol.is_some_and(|a| !in_range(a, ALCOHOL_RANGE)) {
        messages.push(MSG_ALCOHOL.to_string());
    }
    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { messages })
    }
}

fn in_range(value: f64, (low, high): (f64, f64)) -> bool {
    value >= low && value <= high
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "0" | "false" => Some(false),
        "1" | "true" => Some(true),
        _ => None,
    }
}

fn invalid_choice(field: &str, value: &str) -> String {
    format!("Giá trị không hợp lệ cho {field}: \"{value}\".")
}
