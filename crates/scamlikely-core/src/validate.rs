//! Payload validation
//!
//! Schema-level checks for report and dispute bodies, plus the
//! incident-mode location rules applied on submission.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{DisputeCreate, IncidentLocation, IncidentMode, ReportCreate};

pub const MIN_NARRATIVE_CHARS: usize = 50;
pub const MIN_DISPUTE_CHARS: usize = 20;
pub const MAX_DISPUTE_CHARS: usize = 2000;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// True when the value is present and not blank
pub(crate) fn is_present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Schema checks for a report body. Mode and location are checked on submit.
pub fn check_report(payload: &ReportCreate) -> Result<()> {
    if payload.category.trim().is_empty() {
        return Err(Error::validation("category must not be empty"));
    }

    let narrative_len = payload.narrative.chars().count();
    if narrative_len < MIN_NARRATIVE_CHARS {
        return Err(Error::validation(format!(
            "narrative must be at least {} characters (got {})",
            MIN_NARRATIVE_CHARS, narrative_len
        )));
    }

    if let Some(amount) = payload.amount_cents {
        if amount < 0 {
            return Err(Error::validation("amount_cents must not be negative"));
        }
    }

    if let Some(email) = &payload.reporter_email {
        if !is_email(email) {
            return Err(Error::validation(format!(
                "reporter_email '{}' is not a valid e-mail address",
                email
            )));
        }
    }

    Ok(())
}

/// Checks the mode-specific location fields and returns the parsed mode
pub fn check_incident(mode: &str, location: &IncidentLocation) -> Result<IncidentMode> {
    let mode: IncidentMode = mode.parse()?;

    match mode {
        IncidentMode::Digital => {
            let has_origin = match &location.scammer_origin {
                None | Some(serde_json::Value::Null) => false,
                Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            };
            if !has_origin && location.unknown != Some(true) {
                return Err(Error::validation(
                    "digital incidents require incident_location.scammer_origin or incident_location.unknown = true",
                ));
            }
        }
        IncidentMode::InPerson => {
            let missing: Vec<&str> = [
                ("city", location.city.as_ref()),
                ("state", location.state.as_ref()),
                ("country", location.country.as_ref()),
            ]
            .into_iter()
            .filter(|(_, value)| !is_present(*value))
            .map(|(name, _)| name)
            .collect();

            if !missing.is_empty() {
                return Err(Error::validation(format!(
                    "in_person incidents require incident_location fields: {}",
                    missing.join(", ")
                )));
            }
        }
    }

    Ok(mode)
}

/// Validates a dispute body and returns the trimmed text
pub fn check_dispute(payload: &DisputeCreate) -> Result<String> {
    if !is_email(&payload.contact_email) {
        return Err(Error::validation(format!(
            "contact_email '{}' is not a valid e-mail address",
            payload.contact_email
        )));
    }

    let text = payload.text.trim();
    let len = text.chars().count();
    if !(MIN_DISPUTE_CHARS..=MAX_DISPUTE_CHARS).contains(&len) {
        return Err(Error::validation(format!(
            "dispute text must be between {} and {} characters (got {})",
            MIN_DISPUTE_CHARS, MAX_DISPUTE_CHARS, len
        )));
    }

    Ok(text.to_string())
}
