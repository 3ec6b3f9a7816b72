use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use super::domain::{CampaignDraft, CampaignLocation};
use crate::blood::BloodType;

/// Error raised while loading a campaign seed file.
#[derive(Debug, thiserror::Error)]
pub enum CampaignImportError {
    #[error("failed to read campaign seed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid campaign seed data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

/// Raw CSV row. Dates accept RFC 3339 instants or plain `YYYY-MM-DD`
/// values; a date-only start means start of day, a date-only end means end
/// of day, so whole-day campaigns can be seeded without writing times.
#[derive(Debug, Deserialize)]
struct SeedRow {
    title: String,
    description: String,
    hospital_id: String,
    hospital_name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    start_date: String,
    end_date: String,
    target_blood_types: String,
    max_donors: u32,
}

/// Loader for campaign seed exports, the bulk path hospitals use to stand
/// up a season of campaigns at once.
pub struct CampaignSeedImporter;

impl CampaignSeedImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CampaignDraft>, CampaignImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CampaignDraft>, CampaignImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut drafts = Vec::new();
        for (index, result) in csv_reader.deserialize::<SeedRow>().enumerate() {
            // header is line 1
            let row_number = index + 2;
            let row = result?;
            let draft = Self::draft_from_row(row, row_number)?;
            drafts.push(draft);
        }

        Ok(drafts)
    }

    fn draft_from_row(row: SeedRow, row_number: usize) -> Result<CampaignDraft, CampaignImportError> {
        let start_date = parse_instant(&row.start_date, false)
            .map_err(|message| CampaignImportError::Row { row: row_number, message })?;
        let end_date = parse_instant(&row.end_date, true)
            .map_err(|message| CampaignImportError::Row { row: row_number, message })?;
        let target_blood_types = parse_blood_types(&row.target_blood_types)
            .map_err(|message| CampaignImportError::Row { row: row_number, message })?;

        Ok(CampaignDraft {
            title: row.title,
            description: row.description,
            hospital_id: row.hospital_id,
            hospital_name: row.hospital_name,
            location: CampaignLocation {
                address: row.address,
                latitude: row.latitude,
                longitude: row.longitude,
            },
            target_blood_types,
            start_date,
            end_date,
            max_donors: row.max_donors,
        })
    }
}

fn parse_instant(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("'{raw}' is neither RFC 3339 nor YYYY-MM-DD ({err})"))?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| "could not build end-of-day time".to_string())?
    } else {
        NaiveTime::MIN
    };
    Ok(date.and_time(time).and_utc())
}

fn parse_blood_types(raw: &str) -> Result<Vec<BloodType>, String> {
    let mut types = Vec::new();
    for label in raw.split('|').filter(|label| !label.trim().is_empty()) {
        let blood_type = label
            .parse::<BloodType>()
            .map_err(|err| err.to_string())?;
        if !types.contains(&blood_type) {
            types.push(blood_type);
        }
    }

    if types.is_empty() {
        return Err(format!("'{raw}' names no blood types"));
    }
    Ok(types)
}
