use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a campaign, derived from its window and the
/// evaluation instant. Never trusted from storage: read paths recompute it
/// so "transitions" are just repeated classification against an advancing
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Upcoming,
    Active,
    Completed,
}

impl CampaignStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignStatus::Upcoming => "upcoming",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
        }
    }
}

/// Classify `at` against the window `[start, end]`.
///
/// Inclusive on both ends: an instant exactly equal to `start` or `end`
/// counts as active. Pure and total; `end >= start` is a caller-boundary
/// validation, so an inverted window deterministically reads as completed
/// once `at > end`.
pub fn resolve_status(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    at: DateTime<Utc>,
) -> CampaignStatus {
    if at >= start && at <= end {
        CampaignStatus::Active
    } else if at > end {
        CampaignStatus::Completed
    } else {
        CampaignStatus::Upcoming
    }
}
