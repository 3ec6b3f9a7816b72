use chrono::NaiveDate;

use super::domain::{DonationKind, EligibilityAnswers, QuestionnaireSubmission};

/// Validation errors raised by the intake guard.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("donor identity is incomplete")]
    IncompleteDonor,
    #[error("reported age must be a positive number of years, got {0}")]
    InvalidAge(i32),
    #[error("reported weight must be a positive number of kilograms, got {0}")]
    InvalidWeight(f32),
    #[error("last donation date {0} lies in the future")]
    FutureDonationDate(NaiveDate),
    #[error("campaign donations must name a campaign")]
    MissingCampaign,
}

/// Boundary validation for questionnaire submissions.
///
/// The evaluator itself is total and will happily score nonsense, so every
/// sanity check on form data lives here, before anything is scored or
/// persisted.
#[derive(Debug, Default, Clone)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Check a submission and hand back the sanitized answers to score.
    pub fn sanitize(
        &self,
        submission: &QuestionnaireSubmission,
        today: NaiveDate,
    ) -> Result<EligibilityAnswers, IntakeError> {
        let donor = &submission.donor;
        if donor.user_id.trim().is_empty() || donor.email.trim().is_empty() {
            return Err(IntakeError::IncompleteDonor);
        }

        let answers = &submission.answers;
        if answers.age <= 0 {
            return Err(IntakeError::InvalidAge(answers.age));
        }
        if !answers.weight_kg.is_finite() || answers.weight_kg <= 0.0 {
            return Err(IntakeError::InvalidWeight(answers.weight_kg));
        }
        if let Some(last_donation) = answers.last_donation {
            if last_donation > today {
                return Err(IntakeError::FutureDonationDate(last_donation));
            }
        }

        if submission.kind == DonationKind::Campaign && submission.campaign_id.is_none() {
            return Err(IntakeError::MissingCampaign);
        }

        Ok(answers.clone())
    }
}
