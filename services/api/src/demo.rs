use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;

use hemolink::blood::BloodType;
use hemolink::campaign::{CampaignSeedImporter, CampaignService};
use hemolink::config::EligibilityConfig;
use hemolink::donation::{
    Appointment, AppointmentStatus, DonationKind, DonationService, DonorIdentity,
    EligibilityAnswers, HospitalDecision, QuestionnaireSubmission,
};
use hemolink::error::AppError;
use hemolink::inventory::{BloodBagDraft, InventoryService};

use crate::infra::{
    eligibility_policy, InMemoryBloodBagRepository, InMemoryCampaignRepository,
    InMemoryDonationRepository, InMemoryNotificationPublisher,
};

#[derive(Args, Debug)]
pub(crate) struct CampaignSeedArgs {
    /// CSV seed file with one campaign per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reference date for the board grouping (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) at: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the inventory portion of the demo
    #[arg(long)]
    pub(crate) skip_inventory: bool,
}

pub(crate) fn run_campaign_seed(args: CampaignSeedArgs) -> Result<(), AppError> {
    let CampaignSeedArgs { csv, at } = args;

    let at = at.unwrap_or_else(|| Local::now().date_naive());
    let now = Utc
        .from_utc_datetime(&at.and_time(NaiveTime::MIN));

    let drafts = CampaignSeedImporter::from_path(&csv)?;
    println!("Loaded {} campaign rows from {}", drafts.len(), csv.display());

    let service = CampaignService::new(Arc::new(InMemoryCampaignRepository::default()));
    for draft in drafts {
        match service.create(draft, now) {
            Ok(view) => println!(
                "- {} '{}' ({} .. {}) -> {}",
                view.id.0, view.title, view.start_date, view.end_date, view.status_label
            ),
            Err(err) => println!("- Row rejected: {err}"),
        }
    }

    let board = match service.board(now) {
        Ok(board) => board,
        Err(err) => {
            println!("Board unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "Board at {at}: {} active / {} upcoming / {} completed",
        board.totals.active, board.totals.upcoming, board.totals.completed
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_inventory,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Blood donation coordination demo");

    println!("\nDonation request intake");
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let donations = DonationService::new(
        Arc::new(InMemoryDonationRepository::default()),
        notifications.clone(),
        eligibility_policy(&EligibilityConfig::default()),
    );

    let submission = QuestionnaireSubmission {
        donor: DonorIdentity {
            user_id: "demo-donor".to_string(),
            display_name: "Demo Donor".to_string(),
            email: "donor@example.com".to_string(),
        },
        blood_type: BloodType::OPositive,
        hospital_id: "hosp-demo".to_string(),
        hospital_name: "Demo General".to_string(),
        campaign_id: None,
        kind: DonationKind::Direct,
        answers: EligibilityAnswers {
            age: 30,
            weight_kg: 72.0,
            last_donation: None,
            has_illness: false,
            takes_medication: false,
            has_traveled: false,
        },
    };

    let record = match donations.submit(submission, today) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    let view = record.status_view();
    println!(
        "- Received request {} -> status {}",
        view.request_id.0, view.status
    );
    println!(
        "  Score {} ({})",
        view.score,
        view.rationale
    );
    for deduction in &record.request.eligibility.deductions {
        println!(
            "    - {}: {} ({})",
            deduction.factor.label(),
            deduction.points,
            deduction.note
        );
    }

    match donations.pending(10) {
        Ok(queue) => println!("- Hospital review queue: {} pending", queue.len()),
        Err(err) => println!("  Queue unavailable: {err}"),
    }

    if let Err(err) = donations.decide(&record.request.id, HospitalDecision::Approve) {
        println!("  Decision unavailable: {err}");
        return Ok(());
    }
    let appointment = Appointment {
        date: today + chrono::Duration::days(3),
        time: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or(NaiveTime::MIN),
        duration_minutes: 45,
        room: Some("B-12".to_string()),
        status: AppointmentStatus::Scheduled,
    };
    match donations.schedule(&record.request.id, appointment) {
        Ok(scheduled) => {
            if let Some(slot) = scheduled.appointment {
                println!("- Approved and scheduled for {} at {}", slot.date, slot.time);
            }
        }
        Err(err) => println!("  Scheduling unavailable: {err}"),
    }
    println!("- Donor notifications sent: {}", notifications.events().len());

    println!("\nCampaign lifecycle");
    let campaigns = CampaignService::new(Arc::new(InMemoryCampaignRepository::default()));
    let now = Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN));
    let draft = hemolink::campaign::CampaignDraft {
        title: "Demo Drive".to_string(),
        description: "Walk-in collection at the demo hall".to_string(),
        hospital_id: "hosp-demo".to_string(),
        hospital_name: "Demo General".to_string(),
        location: hemolink::campaign::CampaignLocation {
            address: "1 Demo Plaza".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        },
        target_blood_types: vec![BloodType::OPositive, BloodType::ANegative],
        start_date: now - chrono::Duration::days(1),
        end_date: now + chrono::Duration::days(5),
        max_donors: 50,
    };
    match campaigns.create(draft, now) {
        Ok(created) => {
            println!("- Campaign {} is {}", created.id.0, created.status_label);
            match campaigns.join(&created.id, now) {
                Ok(joined) => println!(
                    "- Donor joined: {}/{} spots taken",
                    joined.current_donors, joined.max_donors
                ),
                Err(err) => println!("  Join rejected: {err}"),
            }
        }
        Err(err) => println!("  Campaign rejected: {err}"),
    }

    if skip_inventory {
        return Ok(());
    }

    println!("\nInventory snapshot");
    let inventory = InventoryService::new(Arc::new(InMemoryBloodBagRepository::default()));
    for blood_type in [BloodType::OPositive, BloodType::OPositive, BloodType::AbNegative] {
        let draft = BloodBagDraft {
            blood_type,
            hospital_id: "hosp-demo".to_string(),
            volume_ml: 450,
            collected_on: today,
            shelf_life_days: None,
            source_request: None,
        };
        if let Err(err) = inventory.register(draft, today) {
            println!("  Bag rejected: {err}");
        }
    }

    match inventory.stock_summary(today) {
        Ok(summary) => {
            for stock in summary.by_type {
                println!(
                    "- {}: {} available ({})",
                    stock.blood_type, stock.available, stock.level_label
                );
            }
        }
        Err(err) => println!("  Summary unavailable: {err}"),
    }

    Ok(())
}
