//! BMI category labels shown next to the BMI field.
//!
//! Two readings: a gender-specific Vietnamese scale and the WHO scale.

use serde::Serialize;

use crate::models::{parse_number, Gender};

/// A BMI category with its display color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BmiCategory {
    pub category: &'static str,
    pub color: &'static str,
}

/// Gender-specific category. Female cut-offs are lower by one point.
pub fn category_by_gender(bmi: f64, gender: Gender) -> Option<BmiCategory> {
    if !bmi.is_finite() {
        return None;
    }
    let (normal_below, overweight_below) = match gender {
        Gender::Male => (24.9, 29.9),
        Gender::Female => (23.9, 28.9),
    };
    let category = if bmi < 18.5 {
        BmiCategory { category: "Thiếu cân", color: "text-info" }
    } else if bmi < normal_below {
        BmiCategory { category: "Bình thường", color: "text-success" }
    } else if bmi < overweight_below {
        BmiCategory { category: "Thừa cân", color: "text-warning" }
    } else {
        BmiCategory { category: "Béo phì", color: "text-danger" }
    };
    Some(category)
}

/// WHO adult category.
pub fn who_category(bmi: f64) -> Option<BmiCategory> {
    if !bmi.is_finite() {
        return None;
    }
    let category = if bmi < 18.5 {
        BmiCategory { category: "Underweight (WHO)", color: "text-info" }
    } else if bmi < 25.0 {
        BmiCategory { category: "Normal (WHO)", color: "text-success" }
    } else if bmi < 30.0 {
        BmiCategory { category: "Overweight (WHO)", color: "text-warning" }
    } else {
        BmiCategory { category: "Obesity (WHO)", color: "text-danger" }
    };
    Some(category)
}

/// Both readings for a raw form value. Unparsable input yields `None`s.
pub fn categorize(raw_bmi: &str, gender: Gender) -> (Option<BmiCategory>, Option<BmiCategory>) {
    match parse_number(raw_bmi) {
        Some(bmi) => (category_by_gender(bmi, gender), who_category(bmi)),
        None => (None, None),
    }
}
