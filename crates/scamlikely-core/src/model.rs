//! Data model for entities, reports and disputes

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_type!(
    /// Identifier of a reported business or person
    EntityId
);
id_type!(
    /// Identifier of an incident report
    ReportId
);
id_type!(
    /// Identifier of a dispute filed against a report
    DisputeId
);

/// Kind of reported entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Business,
    Person,
}

/// Moderation status of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Published,
    Disputed,
}

impl ReportStatus {
    /// Statuses shown in public listings
    pub const VISIBLE: [ReportStatus; 2] = [ReportStatus::Published, ReportStatus::Disputed];

    pub fn is_visible(self) -> bool {
        Self::VISIBLE.contains(&self)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Published => write!(f, "published"),
            ReportStatus::Disputed => write!(f, "disputed"),
        }
    }
}

/// Dispute status. No resolution workflow exists, so every dispute stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
}

/// How the incident happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentMode {
    Digital,
    InPerson,
}

impl FromStr for IncidentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digital" => Ok(IncidentMode::Digital),
            "in_person" => Ok(IncidentMode::InPerson),
            other => Err(Error::validation(format!(
                "Invalid incident_mode '{}'. Must be 'digital' or 'in_person'",
                other
            ))),
        }
    }
}

/// Where the incident took place.
///
/// In-person incidents fill the top-level `city`/`state`/`country`. Digital
/// incidents either describe a `scammer_origin` or set `unknown`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Free-form origin of the scammer (country string or structured object)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scammer_origin: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<bool>,
    /// Any other keys (street address, zip, ...) kept as submitted
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Identifiers supplied with a report, used for entity resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifiers {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub gov_name: Option<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

/// A business or person tracked as a potential scam subject
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub display_name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    /// Number of published reports, refreshed on every publish
    pub report_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    /// Contact shown first in listings: first phone, else first e-mail
    pub fn top_identifier(&self) -> Option<&str> {
        self.phones
            .first()
            .or_else(|| self.emails.first())
            .map(String::as_str)
    }
}

/// A single incident report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub id: ReportId,
    pub entity_id: EntityId,
    pub category: String,
    pub narrative: String,
    pub amount_cents: Option<i64>,
    pub currency: String,
    pub incident_date: NaiveDate,
    pub incident_mode: IncidentMode,
    pub incident_location: IncidentLocation,
    pub reporter_public_anonymous: bool,
    #[serde(skip_serializing)]
    pub reporter_email: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// A rebuttal filed against a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub report_id: ReportId,
    pub entity_id: EntityId,
    #[serde(skip_serializing)]
    pub contact_email: String,
    pub text: String,
    pub public_anonymous: bool,
    pub status: DisputeStatus,
    pub created_at: DateTime<Utc>,
}

/// Request body for a new report
#[derive(Debug, Clone, Deserialize)]
pub struct ReportCreate {
    pub identifiers: Identifiers,
    pub category: String,
    pub narrative: String,
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub incident_date: NaiveDate,
    /// Kept as text so an unknown mode surfaces as a validation error
    pub incident_mode: String,
    #[serde(default)]
    pub incident_location: IncidentLocation,
    #[serde(default = "default_true")]
    pub reporter_public_anonymous: bool,
    #[serde(default)]
    pub reporter_email: Option<String>,
}

/// Request body for a new dispute
#[derive(Debug, Clone, Deserialize)]
pub struct DisputeCreate {
    pub contact_email: String,
    pub text: String,
    #[serde(default = "default_true")]
    pub public_anonymous: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}
