use serde::{Deserialize, Serialize};

/// Thresholds and weights applied by the evaluator. The defaults reproduce
/// the reference rubric exactly; hospitals tune nothing in practice, but
/// keeping the dials explicit keeps the rules free of magic numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub min_age: i32,
    pub max_age: i32,
    pub min_weight_kg: f32,
    pub deferral_days: i64,
    pub passing_score: i32,
    pub weights: DeductionWeights,
}

/// Points subtracted from the baseline of 100 when a check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionWeights {
    pub age_range: i32,
    pub low_weight: i32,
    pub recent_donation: i32,
    pub illness: i32,
    pub medication: i32,
    pub travel: i32,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 65,
            min_weight_kg: 50.0,
            deferral_days: 56,
            passing_score: 70,
            weights: DeductionWeights {
                age_range: 50,
                low_weight: 30,
                recent_donation: 40,
                illness: 30,
                medication: 20,
                travel: 15,
            },
        }
    }
}
