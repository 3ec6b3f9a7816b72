use chrono::NaiveDate;

use super::super::domain::EligibilityAnswers;
use super::policy::EligibilityPolicy;
use super::{Deduction, RiskFactor};

const BASELINE_SCORE: i32 = 100;

/// Run all six checks unconditionally and return the audit trail plus the
/// final score. Deductions are independent and additive; there is no early
/// exit and no floor, so the sum can go negative.
pub(crate) fn apply_checks(
    answers: &EligibilityAnswers,
    policy: &EligibilityPolicy,
    today: NaiveDate,
) -> (Vec<Deduction>, i32) {
    let mut deductions = Vec::with_capacity(6);
    let mut score = BASELINE_SCORE;

    if answers.age < policy.min_age || answers.age > policy.max_age {
        score -= policy.weights.age_range;
        deductions.push(Deduction {
            factor: RiskFactor::AgeRange,
            points: -policy.weights.age_range,
            note: format!(
                "age {} outside the {}-{} donor window",
                answers.age, policy.min_age, policy.max_age
            ),
        });
    } else {
        deductions.push(Deduction {
            factor: RiskFactor::AgeRange,
            points: 0,
            note: format!("age {} within the donor window", answers.age),
        });
    }

    if answers.weight_kg < policy.min_weight_kg {
        score -= policy.weights.low_weight;
        deductions.push(Deduction {
            factor: RiskFactor::BodyWeight,
            points: -policy.weights.low_weight,
            note: format!(
                "weight {:.1} kg below the {:.0} kg minimum",
                answers.weight_kg, policy.min_weight_kg
            ),
        });
    } else {
        deductions.push(Deduction {
            factor: RiskFactor::BodyWeight,
            points: 0,
            note: format!("weight {:.1} kg meets the minimum", answers.weight_kg),
        });
    }

    match answers.last_donation {
        Some(last_donation) => {
            let elapsed_days = (today - last_donation).num_days();
            if elapsed_days < policy.deferral_days {
                score -= policy.weights.recent_donation;
                deductions.push(Deduction {
                    factor: RiskFactor::DonationInterval,
                    points: -policy.weights.recent_donation,
                    note: format!(
                        "last donation {elapsed_days} days ago, under the {}-day deferral",
                        policy.deferral_days
                    ),
                });
            } else {
                deductions.push(Deduction {
                    factor: RiskFactor::DonationInterval,
                    points: 0,
                    note: format!("last donation {elapsed_days} days ago"),
                });
            }
        }
        None => deductions.push(Deduction {
            factor: RiskFactor::DonationInterval,
            points: 0,
            note: "no previous donation on record".to_string(),
        }),
    }

    if answers.has_illness {
        score -= policy.weights.illness;
        deductions.push(Deduction {
            factor: RiskFactor::Illness,
            points: -policy.weights.illness,
            note: "reported illness requires medical review".to_string(),
        });
    } else {
        deductions.push(Deduction {
            factor: RiskFactor::Illness,
            points: 0,
            note: "no illness reported".to_string(),
        });
    }

    if answers.takes_medication {
        score -= policy.weights.medication;
        deductions.push(Deduction {
            factor: RiskFactor::Medication,
            points: -policy.weights.medication,
            note: "current medication requires medical review".to_string(),
        });
    } else {
        deductions.push(Deduction {
            factor: RiskFactor::Medication,
            points: 0,
            note: "no medication reported".to_string(),
        });
    }

    if answers.has_traveled {
        score -= policy.weights.travel;
        deductions.push(Deduction {
            factor: RiskFactor::RiskZoneTravel,
            points: -policy.weights.travel,
            note: "recent travel to a risk zone".to_string(),
        });
    } else {
        deductions.push(Deduction {
            factor: RiskFactor::RiskZoneTravel,
            points: 0,
            note: "no risk zone travel reported".to_string(),
        });
    }

    (deductions, score)
}
