mod policy;
mod rules;

pub use policy::{DeductionWeights, EligibilityPolicy};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::EligibilityAnswers;

/// Stateless evaluator applying the deduction policy to questionnaire
/// answers.
///
/// Evaluation is a pure function of the answers, the policy, and the
/// injected `today`: no I/O, no hidden clock, identical input always yields
/// identical output. It is also total: out-of-range numerics flow through
/// the same arithmetic rather than raising errors; the intake guard is
/// responsible for rejecting them beforehand.
pub struct EligibilityEvaluator {
    policy: EligibilityPolicy,
}

impl EligibilityEvaluator {
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    /// Score the answers against `today`, which only feeds the donation
    /// interval check.
    pub fn evaluate(&self, answers: &EligibilityAnswers, today: NaiveDate) -> EligibilityResult {
        let (deductions, score) = rules::apply_checks(answers, &self.policy, today);

        EligibilityResult {
            score,
            eligible: score >= self.policy.passing_score,
            answers: answers.clone(),
            deductions,
        }
    }
}

/// Disqualifying or deferral factors the rubric recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    AgeRange,
    BodyWeight,
    DonationInterval,
    Illness,
    Medication,
    RiskZoneTravel,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            RiskFactor::AgeRange => "age range",
            RiskFactor::BodyWeight => "body weight",
            RiskFactor::DonationInterval => "donation interval",
            RiskFactor::Illness => "illness",
            RiskFactor::Medication => "medication",
            RiskFactor::RiskZoneTravel => "risk zone travel",
        }
    }
}

/// Discrete contribution to the score, kept so hospitals can audit how a
/// verdict came about. `points` is zero when the check passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub factor: RiskFactor,
    pub points: i32,
    pub note: String,
}

/// Outcome persisted with the donation request.
///
/// The input answers are echoed for audit display. Stored as a snapshot and
/// re-read bit-for-bit; the score is never recomputed after submission. The
/// reference arithmetic is unclamped, so stacked deductions can drive the
/// score below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub score: i32,
    pub eligible: bool,
    pub answers: EligibilityAnswers,
    pub deductions: Vec<Deduction>,
}

impl EligibilityResult {
    /// One-line explanation for status views and notifications.
    pub fn rationale(&self) -> String {
        if self.eligible {
            return format!("eligible with score {}", self.score);
        }

        let triggered: Vec<&str> = self
            .deductions
            .iter()
            .filter(|deduction| deduction.points < 0)
            .map(|deduction| deduction.factor.label())
            .collect();

        if triggered.is_empty() {
            format!("not eligible (score {})", self.score)
        } else {
            format!(
                "not eligible (score {}): {}",
                self.score,
                triggered.join(", ")
            )
        }
    }
}
