//! Domain library for the Hemolink blood-donation coordination service.
//!
//! Donors answer an eligibility questionnaire and file donation requests;
//! hospitals run time-boxed collection campaigns, schedule appointments, and
//! track blood-bag stock. Persistence and identity are external collaborators
//! reached through the repository traits in each module; the library itself
//! holds the scoring, status derivation, and workflow rules.

pub mod blood;
pub mod campaign;
pub mod config;
pub mod donation;
pub mod error;
pub mod inventory;
pub mod storage;
pub mod telemetry;
