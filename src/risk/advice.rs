//! Rule-based lifestyle advice shown with an assessment.

use crate::models::{GeneticRisk, PredictRequest};

use super::tier::RiskTier;

const QUIT_SMOKING: &str = "🚬 Bỏ thuốc lá hoàn toàn.";
const LOSE_WEIGHT: &str = "⚖️ Giảm cân, ưu tiên chế độ ăn nhiều rau, hạn chế đường/béo.";
const GAIN_WEIGHT: &str = "⚖️ BMI thấp, tăng cường dinh dưỡng lành mạnh để đạt cân nặng hợp lý.";
const REDUCE_ALCOHOL: &str = "🍺 Giảm rượu/bia xuống ≤2 đơn vị/tuần hoặc ngưng.";
const EXERCISE: &str = "🏃 Tập luyện ≥150 phút/tuần (đi bộ nhanh, đạp xe...).";
const GENETIC_COUNSELING: &str =
    "🧬 Nguy cơ di truyền cao, cân nhắc tư vấn di truyền/tầm soát định kỳ.";
const HISTORY_FOLLOW_UP: &str =
    "🏥 Có tiền sử ung thư, theo dõi sát và khám định kỳ với bác sĩ chuyên khoa.";
const PREPARE_RECORDS: &str = "🗓️ Chuẩn bị sổ sức khỏe, thuốc đang dùng, hồ sơ cũ khi đi khám.";
const BOOK_SCREENING: &str = "📞 Đặt lịch tầm soát trong 7–14 ngày.";
const URGENT_VISIT: &str = "⏱️ Ưu tiên khám trong 48–72 giờ.";
const KEEP_GOING: &str = "✅ Lối sống hiện tại khá tốt, tiếp tục duy trì.";

/// Advice lines for a submitted payload and its tier. Never empty.
pub fn detailed_advice(request: &PredictRequest, tier: RiskTier) -> Vec<&'static str> {
    let mut advice = Vec::new();

    if request.smoking {
        advice.push(QUIT_SMOKING);
    }
    if request.bmi >= 25.0 {
        advice.push(LOSE_WEIGHT);
    }
    if request.bmi > 0.0 && request.bmi < 18.5 {
        advice.push(GAIN_WEIGHT);
    }
    if request.alcohol_intake > 2.0 {
        advice.push(REDUCE_ALCOHOL);
    }
    if request.physical_activity < 3.0 {
        advice.push(EXERCISE);
    }
    if request.genetic_risk == GeneticRisk::High {
        advice.push(GENETIC_COUNSELING);
    }
    if request.cancer_history {
        advice.push(HISTORY_FOLLOW_UP);
    }

    if tier.is_elevated() {
        advice.push(PREPARE_RECORDS);
    }
    match tier {
        RiskTier::Alert => advice.push(BOOK_SCREENING),
        RiskTier::Danger => advice.push(URGENT_VISIT),
        _ => {}
    }

    if advice.is_empty() {
        advice.push(KEEP_GOING);
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn healthy() -> PredictRequest {
        PredictRequest {
            age: 40,
            gender: Gender::Female,
            bmi: 22.0,
            smoking: false,
            genetic_risk: GeneticRisk::Low,
            physical_activity: 5.0,
            alcohol_intake: 1.0,
            cancer_history: false,
        }
    }

    #[test]
    fn healthy_low_risk_gets_encouragement() {
        assert_eq!(detailed_advice(&healthy(), RiskTier::Low), vec![KEEP_GOING]);
    }

    #[test]
    fn lifestyle_rules_in_order() {
        let request = PredictRequest {
            smoking: true,
            bmi: 27.0,
            alcohol_intake: 3.0,
            physical_activity: 1.0,
            genetic_risk: GeneticRisk::High,
            cancer_history: true,
            ..healthy()
        };
        let advice = detailed_advice(&request, RiskTier::Medium);
        assert_eq!(
            advice,
            vec![
                QUIT_SMOKING,
                LOSE_WEIGHT,
                REDUCE_ALCOHOL,
                EXERCISE,
                GENETIC_COUNSELING,
                HISTORY_FOLLOW_UP
            ]
        );
    }

    #[test]
    fn underweight_but_not_zero_bmi() {
        let thin = PredictRequest { bmi: 17.0, ..healthy() };
        assert_eq!(detailed_advice(&thin, RiskTier::Low), vec![GAIN_WEIGHT]);
        let missing = PredictRequest { bmi: 0.0, ..healthy() };
        assert_eq!(detailed_advice(&missing, RiskTier::Low), vec![KEEP_GOING]);
    }

    #[test]
    fn tier_specific_lines() {
        assert_eq!(detailed_advice(&healthy(), RiskTier::High), vec![PREPARE_RECORDS]);
        assert_eq!(
            detailed_advice(&healthy(), RiskTier::Alert),
            vec![PREPARE_RECORDS, BOOK_SCREENING]
        );
        assert_eq!(
            detailed_advice(&healthy(), RiskTier::Danger),
            vec![PREPARE_RECORDS, URGENT_VISIT]
        );
        assert_eq!(detailed_advice(&healthy(), RiskTier::Unknown), vec![KEEP_GOING]);
    }
}
