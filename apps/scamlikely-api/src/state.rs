//! Application state for the Scam Likely API

use chrono::NaiveDate;
use scamlikely_core::{Directory, Identifiers, IncidentLocation, ReportCreate, Result};
use tokio::sync::RwLock;

/// Shared application state.
///
/// The whole directory sits behind one lock: writers hold it for an entire
/// operation, so submissions, publishes and disputes never interleave.
pub struct AppState {
    pub directory: RwLock<Directory>,
}

impl AppState {
    pub fn new(directory: Directory) -> Self {
        Self {
            directory: RwLock::new(directory),
        }
    }

    /// State preloaded with the demo entity the mobile screens were built against
    pub fn with_demo_data() -> Result<Self> {
        let mut directory = Directory::new();
        seed_demo(&mut directory)?;
        Ok(Self::new(directory))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Directory::new())
    }
}

/// Inserts "ABC Web Solutions" with one published report
fn seed_demo(directory: &mut Directory) -> Result<()> {
    let receipt = directory.submit_report(ReportCreate {
        identifiers: Identifiers {
            business_name: Some("ABC Web Solutions".to_string()),
            gov_name: None,
            phones: vec!["+1 (443) 555-0123".to_string()],
            emails: Vec::new(),
        },
        category: "fake_invoice".to_string(),
        narrative: "Invoiced us for a website redesign that was never delivered, then stopped answering calls."
            .to_string(),
        amount_cents: Some(120_000),
        currency: "USD".to_string(),
        incident_date: NaiveDate::from_ymd_opt(2024, 9, 12).expect("valid demo date"),
        incident_mode: "in_person".to_string(),
        incident_location: IncidentLocation {
            city: Some("Baltimore".to_string()),
            state: Some("MD".to_string()),
            country: Some("US".to_string()),
            ..Default::default()
        },
        reporter_public_anonymous: true,
        reporter_email: None,
    })?;
    directory.publish_report(receipt.id)?;

    tracing::info!("Seeded demo entity {}", receipt.entity_id);
    Ok(())
}
