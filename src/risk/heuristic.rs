//! Client-side fallback estimate used while the predictor is offline or failing.
//!
//! Starts from the baseline probability and adds fixed deltas per risk factor.
//! The result is illustrative only and never replaces a model answer.

use serde::{Deserialize, Serialize};

use crate::models::{GeneticRisk, Scenario};

/// Upper clamp for heuristic probabilities.
pub const MAX_PROBABILITY: f64 = 0.99;

/// Delta magnitudes for each factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicPolicy {
    pub smoker: f64,
    pub non_smoker: f64,
    pub bmi_obese: f64,
    pub bmi_overweight: f64,
    pub bmi_underweight: f64,
    pub activity_low: f64,
    pub activity_moderate: f64,
    pub activity_high: f64,
    pub alcohol_heavy: f64,
    pub alcohol_moderate: f64,
    pub genetic_medium: f64,
    pub genetic_high: f64,
    pub cancer_history: f64,
    pub age_senior: f64,
    pub age_young: f64,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            smoker: 0.10,
            non_smoker: -0.02,
            bmi_obese: 0.08,
            bmi_overweight: 0.04,
            bmi_underweight: 0.02,
            activity_low: 0.05,
            activity_moderate: 0.02,
            activity_high: -0.03,
            alcohol_heavy: 0.04,
            alcohol_moderate: 0.02,
            genetic_medium: 0.06,
            genetic_high: 0.12,
            cancer_history: 0.10,
            age_senior: 0.03,
            age_young: -0.01,
        }
    }
}

impl HeuristicPolicy {
    /// Estimated probability for `scenario`, clamped to [0, 0.99].
    ///
    /// `None` when the baseline probability is not a finite number.
    pub fn estimate(&self, baseline_probability: f64, scenario: &Scenario) -> Option<f64> {
        if !baseline_probability.is_finite() {
            return None;
        }
        let delta = self.delta(scenario);
        Some((baseline_probability + delta).clamp(0.0, MAX_PROBABILITY))
    }

    /// Sum of the per-factor deltas.
    pub fn delta(&self, scenario: &Scenario) -> f64 {
        let mut delta = if scenario.smoking {
            self.smoker
        } else {
            self.non_smoker
        };

        let bmi = scenario.bmi;
        if bmi >= 30.0 {
            delta += self.bmi_obese;
        } else if bmi >= 25.0 {
            delta += self.bmi_overweight;
        } else if bmi < 18.5 {
            delta += self.bmi_underweight;
        }

        let activity = scenario.physical_activity;
        if activity < 3.0 {
            delta += self.activity_low;
        } else if activity <= 5.0 {
            delta += self.activity_moderate;
        } else if activity > 7.0 {
            delta += self.activity_high;
        }

        let alcohol = scenario.alcohol_intake;
        if alcohol > 3.0 {
            delta += self.alcohol_heavy;
        } else if alcohol >= 2.0 {
            delta += self.alcohol_moderate;
        }

        delta += match scenario.genetic_risk {
            GeneticRisk::Low => 0.0,
            GeneticRisk::Medium => self.genetic_medium,
            GeneticRisk::High => self.genetic_high,
        };

        if scenario.cancer_history {
            delta += self.cancer_history;
        }

        // No age delta when the scenario does not carry one.
        match scenario.age {
            Some(age) if age >= 60 => delta += self.age_senior,
            Some(age) if age <= 30 => delta += self.age_young,
            _ => {}
        }

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario {
            age: Some(45),
            gender: None,
            bmi: 22.0,
            smoking: false,
            genetic_risk: GeneticRisk::Low,
            physical_activity: 6.0,
            alcohol_intake: 1.0,
            cancer_history: false,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn healthy_scenario_only_gets_non_smoker_delta() {
        let p = HeuristicPolicy::default().estimate(0.20, &scenario()).unwrap();
        assert!(approx(p, 0.18));
    }

    #[test]
    fn high_risk_factors_accumulate() {
        let s = Scenario {
            age: Some(65),
            smoking: true,
            bmi: 31.0,
            physical_activity: 1.0,
            alcohol_intake: 4.0,
            genetic_risk: GeneticRisk::High,
            cancer_history: true,
            ..scenario()
        };
        let delta = HeuristicPolicy::default().delta(&s);
        // 0.10 + 0.08 + 0.05 + 0.04 + 0.12 + 0.10 + 0.03
        assert!(approx(delta, 0.52));
    }

    #[test]
    fn band_edges() {
        let policy = HeuristicPolicy::default();
        let base = policy.delta(&scenario());
        let at = |s: Scenario| policy.delta(&s) - base;

        assert!(approx(at(Scenario { bmi: 25.0, ..scenario() }), 0.04));
        assert!(approx(at(Scenario { bmi: 18.4, ..scenario() }), 0.02));
        assert!(approx(at(Scenario { physical_activity: 5.0, ..scenario() }), 0.02));
        assert!(approx(at(Scenario { physical_activity: 7.0, ..scenario() }), 0.0));
        assert!(approx(at(Scenario { physical_activity: 8.0, ..scenario() }), -0.03));
        assert!(approx(at(Scenario { alcohol_intake: 2.0, ..scenario() }), 0.02));
        assert!(approx(at(Scenario { alcohol_intake: 3.0, ..scenario() }), 0.02));
        assert!(approx(at(Scenario { genetic_risk: GeneticRisk::Medium, ..scenario() }), 0.06));
        assert!(approx(at(Scenario { age: Some(30), ..scenario() }), -0.01));
        assert!(approx(at(Scenario { age: None, ..scenario() }), 0.0));
    }

    #[test]
    fn result_is_clamped() {
        let policy = HeuristicPolicy::default();
        let worst = Scenario {
            age: Some(70),
            smoking: true,
            bmi: 40.0,
            physical_activity: 0.0,
            alcohol_intake: 5.0,
            genetic_risk: GeneticRisk::High,
            cancer_history: true,
            ..scenario()
        };
        assert_eq!(policy.estimate(0.9, &worst), Some(MAX_PROBABILITY));

        let best = Scenario {
            age: Some(25),
            physical_activity: 9.0,
            ..scenario()
        };
        assert_eq!(policy.estimate(0.01, &best), Some(0.0));
    }

    #[test]
    fn clamp_holds_over_factor_grid() {
        let policy = HeuristicPolicy::default();
        for p0 in [-0.5, 0.0, 0.3, 0.99, 1.5] {
            for smoking in [false, true] {
                for bmi in [15.0, 22.0, 27.0, 35.0] {
                    for genetic_risk in [GeneticRisk::Low, GeneticRisk::Medium, GeneticRisk::High] {
                        let s = Scenario {
                            smoking,
                            bmi,
                            genetic_risk,
                            ..scenario()
                        };
                        let p = policy.estimate(p0, &s).unwrap();
                        assert!((0.0..=MAX_PROBABILITY).contains(&p));
                    }
                }
            }
        }
    }

    #[test]
    fn non_finite_baseline_has_no_estimate() {
        let policy = HeuristicPolicy::default();
        assert!(policy.estimate(f64::NAN, &scenario()).is_none());
        assert!(policy.estimate(f64::INFINITY, &scenario()).is_none());
    }
}
