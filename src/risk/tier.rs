//! Five-tier risk grouping of a predicted probability.
//!
//! Lower bounds are inclusive: 5% is Medium, 4.9999% is Low.

use serde::{Deserialize, Serialize};

/// Risk tier of a probability in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Alert,
    Danger,
    Unknown,
}

impl RiskTier {
    /// Total mapping. Non-finite input is `Unknown`.
    pub fn from_probability(probability: f64) -> Self {
        if !probability.is_finite() {
            return RiskTier::Unknown;
        }
        let pct = probability * 100.0;
        if pct < 5.0 {
            RiskTier::Low
        } else if pct < 15.0 {
            RiskTier::Medium
        } else if pct < 30.0 {
            RiskTier::High
        } else if pct < 70.0 {
            RiskTier::Alert
        } else {
            RiskTier::Danger
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Alert => "alert",
            RiskTier::Danger => "danger",
            RiskTier::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Thấp (0–5%)",
            RiskTier::Medium => "Trung bình (5–15%)",
            RiskTier::High => "Cao (15–30%)",
            RiskTier::Alert => "Báo động (30–70%)",
            RiskTier::Danger => "Nguy hiểm (>70%)",
            RiskTier::Unknown => "—",
        }
    }

    /// Bootstrap badge color.
    pub fn badge(&self) -> &'static str {
        match self {
            RiskTier::Low => "success",
            RiskTier::Medium => "info",
            RiskTier::High => "warning",
            RiskTier::Alert | RiskTier::Danger => "danger",
            RiskTier::Unknown => "secondary",
        }
    }

    /// Progress bar class.
    pub fn bar(&self) -> &'static str {
        match self {
            RiskTier::Low => "bg-success",
            RiskTier::Medium => "bg-info",
            RiskTier::High => "bg-warning",
            RiskTier::Alert | RiskTier::Danger => "bg-danger",
            RiskTier::Unknown => "bg-secondary",
        }
    }

    pub fn cta(&self) -> &'static str {
        match self {
            RiskTier::Low => {
                "Nguy cơ thấp. Duy trì lối sống lành mạnh và tầm soát theo khuyến cáo độ tuổi."
            }
            RiskTier::Medium => {
                "Nguy cơ trung bình. Tối ưu vận động, dinh dưỡng; tiếp tục tầm soát định kỳ."
            }
            RiskTier::High => "Nguy cơ cao. Nên đặt lịch khám sàng lọc trong 2–4 tuần.",
            RiskTier::Alert => {
                "Báo động. Đặt lịch tầm soát trong 7–14 ngày và trao đổi với bác sĩ."
            }
            RiskTier::Danger => {
                "Nguy hiểm. Ưu tiên khám trong 48–72 giờ và chuẩn bị hồ sơ y tế liên quan."
            }
            RiskTier::Unknown => "Không xác định nguy cơ. Vui lòng thử lại.",
        }
    }

    /// Whether the tier calls for a screening appointment.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskTier::High | RiskTier::Alert | RiskTier::Danger)
    }

    pub fn info(&self) -> TierInfo {
        TierInfo {
            tier: *self,
            key: self.key(),
            label: self.label(),
            badge: self.badge(),
            bar: self.bar(),
            cta: self.cta(),
        }
    }
}

/// Everything the UI needs to render a tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierInfo {
    pub tier: RiskTier,
    pub key: &'static str,
    pub label: &'static str,
    pub badge: &'static str,
    pub bar: &'static str,
    pub cta: &'static str,
}

/// General recommendation line for a probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub text: &'static str,
    pub color: &'static str,
}

impl Recommendation {
    pub fn for_probability(probability: f64) -> Self {
        let tier = RiskTier::from_probability(probability);
        Self {
            text: tier.cta(),
            color: tier.badge(),
        }
    }
}

/// `0.18` → `"18.0%"`. Non-finite input renders as `"—"`.
pub fn format_percent(probability: f64) -> String {
    if probability.is_finite() {
        format!("{:.1}%", probability * 100.0)
    } else {
        "—".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(RiskTier::from_probability(0.049999), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.05), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.15), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.3), RiskTier::Alert);
        assert_eq!(RiskTier::from_probability(0.7), RiskTier::Danger);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.99), RiskTier::Danger);
    }

    #[test]
    fn non_finite_is_unknown() {
        for p in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let tier = RiskTier::from_probability(p);
            assert_eq!(tier, RiskTier::Unknown);
            assert_eq!(tier.label(), "—");
            assert_eq!(tier.badge(), "secondary");
        }
    }

    #[test]
    fn alert_tier_display() {
        let info = RiskTier::from_probability(0.42).info();
        assert_eq!(info.key, "alert");
        assert_eq!(info.badge, "danger");
        assert_eq!(info.label, "Báo động (30–70%)");
        assert_eq!(info.bar, "bg-danger");
    }

    #[test]
    fn every_probability_maps_to_a_tier() {
        for i in 0..1000 {
            let tier = RiskTier::from_probability(i as f64 / 1000.0);
            assert_ne!(tier, RiskTier::Unknown);
        }
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_value(RiskTier::High.info()).unwrap();
        assert_eq!(json["tier"], "high");
        assert_eq!(json["badge"], "warning");
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(0.18), "18.0%");
        assert_eq!(format_percent(0.4237), "42.4%");
        assert_eq!(format_percent(f64::NAN), "—");
    }

    #[test]
    fn recommendation_follows_tier() {
        let rec = Recommendation::for_probability(0.2);
        assert_eq!(rec.color, "warning");
        assert!(rec.text.starts_with("Nguy cơ cao."));
    }
}
