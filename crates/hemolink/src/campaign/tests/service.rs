use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::campaign::domain::CampaignId;
use crate::campaign::repository::CampaignRepository;
use crate::campaign::{CampaignService, CampaignServiceError, CampaignStatus, CampaignValidationError};
use crate::storage::RepositoryError;

#[test]
fn create_rejects_inverted_window() {
    let (service, _) = build_service();
    let mut draft = draft();
    std::mem::swap(&mut draft.start_date, &mut draft.end_date);

    let error = service
        .create(draft, mid_window())
        .expect_err("inverted window rejected");
    assert!(matches!(
        error,
        CampaignServiceError::Validation(CampaignValidationError::WindowInverted { .. })
    ));
}

#[test]
fn create_rejects_empty_title() {
    let (service, _) = build_service();
    let mut draft = draft();
    draft.title = "   ".to_string();

    let error = service
        .create(draft, mid_window())
        .expect_err("blank title rejected");
    assert!(matches!(
        error,
        CampaignServiceError::Validation(CampaignValidationError::EmptyTitle)
    ));
}

#[test]
fn create_stamps_derived_status() {
    let (service, repository) = build_service();
    let view = service
        .create(draft(), mid_window())
        .expect("campaign created");

    assert_eq!(view.status, CampaignStatus::Active);
    assert_eq!(view.current_donors, 0);
    assert_eq!(view.spots_remaining, 3);

    let stored = repository
        .fetch(&view.id)
        .expect("fetch succeeds")
        .expect("campaign stored");
    assert_eq!(stored.stored_status, CampaignStatus::Active);
}

#[test]
fn reads_override_stale_stored_status() {
    let (service, repository) = build_service();
    let created = service
        .create(draft(), instant(2025, 5, 1, 0, 0, 0))
        .expect("campaign created");
    assert_eq!(created.status, CampaignStatus::Upcoming);

    // Same record, read after the window has closed.
    let after = instant(2025, 6, 8, 0, 0, 0);
    let view = service.get(&created.id, after).expect("campaign read");
    assert_eq!(view.status, CampaignStatus::Completed);

    let stored = repository
        .fetch(&created.id)
        .expect("fetch succeeds")
        .expect("campaign stored");
    assert_eq!(stored.stored_status, CampaignStatus::Upcoming);
}

#[test]
fn join_requires_active_window() {
    let (service, _) = build_service();
    let created = service
        .create(draft(), instant(2025, 5, 1, 0, 0, 0))
        .expect("campaign created");

    let error = service
        .join(&created.id, instant(2025, 5, 2, 0, 0, 0))
        .expect_err("upcoming campaigns reject joins");
    assert!(matches!(
        error,
        CampaignServiceError::NotActive { status: "upcoming", .. }
    ));
}

#[test]
fn join_enforces_capacity() {
    let (service, _) = build_service();
    let created = service
        .create(draft(), mid_window())
        .expect("campaign created");

    for expected in 1..=3u32 {
        let view = service.join(&created.id, mid_window()).expect("join counted");
        assert_eq!(view.current_donors, expected);
    }

    let error = service
        .join(&created.id, mid_window())
        .expect_err("full campaign rejects joins");
    assert!(matches!(
        error,
        CampaignServiceError::CapacityReached { max_donors: 3, .. }
    ));
}

#[test]
fn join_unknown_campaign_is_not_found() {
    let (service, _) = build_service();
    let error = service
        .join(&CampaignId("cmp-missing".to_string()), mid_window())
        .expect_err("unknown id rejected");
    assert!(matches!(
        error,
        CampaignServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn list_sorts_by_start_date_and_filters_by_hospital() {
    let (service, _) = build_service();

    let mut late = draft();
    late.start_date = instant(2025, 7, 1, 8, 0, 0);
    late.end_date = instant(2025, 7, 7, 18, 0, 0);
    service.create(late, mid_window()).expect("late created");

    let mut other_hospital = draft();
    other_hospital.hospital_id = "hosp-002".to_string();
    other_hospital.hospital_name = "Northside Clinic".to_string();
    service
        .create(other_hospital, mid_window())
        .expect("other created");

    service.create(draft(), mid_window()).expect("early created");

    let all = service.list(mid_window()).expect("list succeeds");
    assert_eq!(all.len(), 3);
    assert!(all
        .windows(2)
        .all(|pair| pair[0].start_date <= pair[1].start_date));

    let central = service
        .list_for_hospital("hosp-001", mid_window())
        .expect("filtered list succeeds");
    assert_eq!(central.len(), 2);
    assert!(central.iter().all(|view| view.hospital_id == "hosp-001"));
}

#[test]
fn board_groups_by_derived_status() {
    let (service, _) = build_service();
    let now = mid_window();

    service.create(draft(), now).expect("active created");

    let mut upcoming = draft();
    upcoming.start_date = now + Duration::days(10);
    upcoming.end_date = now + Duration::days(17);
    service.create(upcoming, now).expect("upcoming created");

    let mut completed = draft();
    completed.start_date = now - Duration::days(30);
    completed.end_date = now - Duration::days(23);
    service.create(completed, now).expect("completed created");

    let board = service.board(now).expect("board built");
    assert_eq!(board.totals.active, 1);
    assert_eq!(board.totals.upcoming, 1);
    assert_eq!(board.totals.completed, 1);
    assert_eq!(board.active.len(), 1);
    assert_eq!(board.upcoming.len(), 1);
    assert_eq!(board.completed.len(), 1);
    assert_eq!(board.generated_at, now);
}

#[test]
fn repository_outage_surfaces_as_repository_error() {
    let service = CampaignService::new(Arc::new(UnavailableCampaigns));
    let error = service
        .create(draft(), mid_window())
        .expect_err("outage surfaces");
    assert!(matches!(
        error,
        CampaignServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}
