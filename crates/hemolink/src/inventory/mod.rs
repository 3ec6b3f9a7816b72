//! Blood bag inventory: intake of collected bags, reservation and usage
//! transitions, and per-type stock summaries for hospital dashboards.
//!
//! Expiry is never written back eagerly. Each read derives the effective
//! bag status from the expiry date, mirroring how campaign reads derive
//! lifecycle status from the window.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    BagStatus, BloodBag, BloodBagDraft, BloodBagId, StockLevel, DEFAULT_SHELF_LIFE_DAYS,
};
pub use repository::BloodBagRepository;
pub use router::inventory_router;
pub use service::{
    BagView, InventoryService, InventoryServiceError, StockSummary, TypeStock,
};
