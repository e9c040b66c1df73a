//! The directory: one owned store for entities, reports and disputes,
//! plus the read views served to clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::dispute::DisputeBook;
use crate::error::{Error, Result};
use crate::identity::IdentityStore;
use crate::lifecycle::ReportBook;
use crate::model::{
    Dispute, DisputeCreate, DisputeId, DisputeStatus, Entity, EntityId, Report, ReportCreate,
    ReportId, ReportStatus,
};
use crate::validate::{check_dispute, check_report};

/// Source of timestamps for new records
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Row in the recent-entities and search listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityListing {
    pub id: EntityId,
    pub display_name: String,
    pub top_identifier: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    /// Visible (published or disputed) reports
    pub report_count: usize,
    /// Status of the newest visible report
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    #[serde(flatten)]
    pub report: Report,
    pub disputes_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDetail {
    #[serde(flatten)]
    pub entity: Entity,
    pub reports: Vec<ReportSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub disputes: Vec<Dispute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReceipt {
    pub id: ReportId,
    pub entity_id: EntityId,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisputeReceipt {
    pub id: DisputeId,
    pub report_id: ReportId,
    pub status: DisputeStatus,
    pub report_status: ReportStatus,
}

/// Search filters. `q` matches name and contacts; `state`/`city` match exactly.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: String,
    pub state: Option<String>,
    pub city: Option<String>,
}

pub struct Directory {
    identities: IdentityStore,
    reports: ReportBook,
    disputes: DisputeBook,
    clock: Clock,
}

impl Directory {
    pub fn new() -> Self {
        Self::with_clock(Box::new(Utc::now))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            identities: IdentityStore::new(),
            reports: ReportBook::new(),
            disputes: DisputeBook::new(),
            clock,
        }
    }

    pub fn identities(&self) -> &IdentityStore {
        &self.identities
    }

    pub fn reports(&self) -> &ReportBook {
        &self.reports
    }

    pub fn disputes(&self) -> &DisputeBook {
        &self.disputes
    }

    pub fn submit_report(&mut self, payload: ReportCreate) -> Result<SubmitReceipt> {
        check_report(&payload)?;
        let now = (self.clock)();
        let id = self.reports.submit(&mut self.identities, payload, now)?;
        let report = self.reports.get(id)?;

        Ok(SubmitReceipt {
            id,
            entity_id: report.entity_id,
            status: report.status,
        })
    }

    pub fn publish_report(&mut self, id: ReportId) -> Result<ReportStatus> {
        self.reports.publish(&mut self.identities, id)
    }

    pub fn open_dispute(&mut self, report_id: ReportId, payload: DisputeCreate) -> Result<DisputeReceipt> {
        let text = check_dispute(&payload)?;
        let now = (self.clock)();
        let id = self.disputes.open(
            &mut self.reports,
            report_id,
            &payload.contact_email,
            &text,
            payload.public_anonymous,
            now,
        )?;

        Ok(DisputeReceipt {
            id,
            report_id,
            status: DisputeStatus::Open,
            report_status: self.reports.get(report_id)?.status,
        })
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.identities
            .get(id)
            .ok_or_else(|| Error::not_found("Entity", id))
    }

    pub fn report(&self, id: ReportId) -> Result<ReportDetail> {
        let report = self.reports.get(id)?.clone();
        let disputes = self.disputes_for_report(id)?;
        Ok(ReportDetail { report, disputes })
    }

    pub fn disputes_for_report(&self, id: ReportId) -> Result<Vec<Dispute>> {
        Ok(self
            .disputes
            .list_for_report(&self.reports, id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Entity plus its visible reports, each with its dispute count
    pub fn entity_detail(&self, id: EntityId) -> Result<EntityDetail> {
        let entity = self.entity(id)?.clone();
        let reports = self
            .reports
            .visible_for_entity(id)
            .into_iter()
            .map(|report| ReportSummary {
                disputes_count: self.disputes.count_for_report(report.id),
                report: report.clone(),
            })
            .collect();

        Ok(EntityDetail { entity, reports })
    }

    /// Entities with at least one visible report, newest activity first
    pub fn recent_entities(&self) -> Vec<EntityListing> {
        self.listings(|_| true)
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<EntityListing> {
        let needle = query.q.trim().to_lowercase();
        let state = query.state.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let city = query.city.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let results = self.listings(|entity| {
            let haystack = std::iter::once(entity.display_name.as_str())
                .chain(entity.phones.iter().map(String::as_str))
                .chain(entity.emails.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();

            haystack.contains(&needle)
                && state.map_or(true, |s| entity.state.as_deref() == Some(s))
                && city.map_or(true, |c| entity.city.as_deref() == Some(c))
        });

        debug!("Search {:?} matched {} entities", query, results.len());
        results
    }

    /// Reports filed under a reporter e-mail, any status
    pub fn reports_for_reporter(&self, email: &str) -> Vec<Report> {
        self.reports
            .list_for_reporter(email)
            .into_iter()
            .cloned()
            .collect()
    }

    fn listings(&self, filter: impl Fn(&Entity) -> bool) -> Vec<EntityListing> {
        let mut rows: Vec<(DateTime<Utc>, EntityListing)> = self
            .identities
            .iter()
            .filter(|&entity| filter(entity))
            .filter_map(|entity| {
                let latest = self.reports.latest_visible(entity.id)?;
                Some((
                    latest.created_at,
                    EntityListing {
                        id: entity.id,
                        display_name: entity.display_name.clone(),
                        top_identifier: entity.top_identifier().map(str::to_string),
                        state: entity.state.clone(),
                        city: entity.city.clone(),
                        report_count: self.reports.count_visible(entity.id),
                        status: latest.status,
                    },
                ))
            })
            .collect();

        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("entities", &self.identities.len())
            .field("reports", &self.reports.len())
            .field("disputes", &self.disputes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    const NARRATIVE: &str =
        "Caller claimed to be from the utility company and demanded gift cards to avoid shutoff.";

    /// Clock that advances one minute per call
    fn ticking_clock() -> Clock {
        let start = Utc::now();
        let ticks = Arc::new(AtomicI64::new(0));
        Box::new(move || start + Duration::minutes(ticks.fetch_add(1, Ordering::SeqCst)))
    }

    fn report(identifiers: serde_json::Value, location: serde_json::Value) -> ReportCreate {
        serde_json::from_value(json!({
            "identifiers": identifiers,
            "category": "impersonation",
            "narrative": NARRATIVE,
            "incident_date": "2024-06-01",
            "incident_mode": "in_person",
            "incident_location": location,
            "reporter_email": "reporter@example.com"
        }))
        .unwrap()
    }

    fn dispute() -> DisputeCreate {
        DisputeCreate {
            contact_email: "owner@example.com".into(),
            text: "We are the real utility company; this was not us.".into(),
            public_anonymous: true,
        }
    }

    fn baltimore() -> serde_json::Value {
        json!({ "city": "Baltimore", "state": "MD", "country": "US" })
    }

    #[test]
    fn test_end_to_end_flow() {
        let mut dir = Directory::with_clock(ticking_clock());
        let receipt = dir
            .submit_report(report(
                json!({ "business_name": "ABC Web Solutions", "phones": ["+1 (443) 555-0123"] }),
                baltimore(),
            ))
            .unwrap();
        assert_eq!(receipt.status, ReportStatus::Pending);
        assert!(dir.recent_entities().is_empty());

        dir.publish_report(receipt.id).unwrap();
        let recent = dir.recent_entities();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, receipt.entity_id);
        assert_eq!(recent[0].report_count, 1);
        assert_eq!(recent[0].top_identifier.as_deref(), Some("+1 (443) 555-0123"));

        let opened = dir.open_dispute(receipt.id, dispute()).unwrap();
        assert_eq!(opened.report_status, ReportStatus::Disputed);

        let detail = dir.entity_detail(receipt.entity_id).unwrap();
        assert_eq!(detail.reports.len(), 1);
        assert_eq!(detail.reports[0].report.status, ReportStatus::Disputed);
        assert_eq!(detail.reports[0].disputes_count, 1);

        let recent = dir.recent_entities();
        assert_eq!(recent[0].status, ReportStatus::Disputed);
        assert_eq!(recent[0].report_count, 1);
    }

    #[test]
    fn test_schema_validation_precedes_lookup() {
        let mut dir = Directory::new();
        let short = DisputeCreate {
            text: "too short".into(),
            ..dispute()
        };
        assert!(matches!(
            dir.open_dispute(ReportId::new(), short),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            dir.open_dispute(ReportId::new(), dispute()),
            Err(Error::NotFound { .. })
        ));

        let mut body = report(json!({ "phones": ["1"] }), baltimore());
        body.narrative = "short".into();
        assert!(matches!(dir.submit_report(body), Err(Error::Validation(_))));
        assert!(dir.identities().is_empty());
    }

    #[test]
    fn test_recent_entities_newest_first() {
        let mut dir = Directory::with_clock(ticking_clock());
        let older = dir
            .submit_report(report(json!({ "phones": ["1"] }), baltimore()))
            .unwrap();
        let newer = dir
            .submit_report(report(json!({ "phones": ["2"] }), baltimore()))
            .unwrap();
        let hidden = dir
            .submit_report(report(json!({ "phones": ["3"] }), baltimore()))
            .unwrap();
        dir.publish_report(older.id).unwrap();
        dir.publish_report(newer.id).unwrap();

        let ids: Vec<EntityId> = dir.recent_entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newer.entity_id, older.entity_id]);
        assert!(!ids.contains(&hidden.entity_id));
    }

    #[test]
    fn test_search_filters() {
        let mut dir = Directory::new();
        let abc = dir
            .submit_report(report(
                json!({ "business_name": "ABC Web Solutions", "emails": ["billing@abcweb.biz"] }),
                baltimore(),
            ))
            .unwrap();
        let other = dir
            .submit_report(report(
                json!({ "gov_name": "Sam Smith", "phones": ["+1 212 555 0199"] }),
                json!({ "city": "New York", "state": "NY", "country": "US" }),
            ))
            .unwrap();
        dir.publish_report(abc.id).unwrap();
        dir.publish_report(other.id).unwrap();

        let search = |q: &str, state: Option<&str>, city: Option<&str>| -> Vec<EntityId> {
            dir.search(&SearchQuery {
                q: q.to_string(),
                state: state.map(str::to_string),
                city: city.map(str::to_string),
            })
            .iter()
            .map(|e| e.id)
            .collect()
        };

        assert_eq!(search("web sol", None, None), vec![abc.entity_id]);
        assert_eq!(search("ABCWEB.BIZ", None, None), vec![abc.entity_id]);
        assert_eq!(search("555 0199", None, None), vec![other.entity_id]);
        assert_eq!(search("abc", Some("NY"), None), Vec::<EntityId>::new());
        assert_eq!(search("", Some("NY"), Some("New York")), vec![other.entity_id]);
        assert_eq!(search("", None, None).len(), 2);
    }

    #[test]
    fn test_report_detail_hides_reporter_email() {
        let mut dir = Directory::new();
        let receipt = dir
            .submit_report(report(json!({ "phones": ["1"] }), baltimore()))
            .unwrap();
        dir.open_dispute(receipt.id, dispute()).unwrap();

        let detail = dir.report(receipt.id).unwrap();
        assert_eq!(detail.disputes.len(), 1);

        let value = serde_json::to_value(&detail).unwrap();
        assert!(value.get("reporter_email").is_none());
        assert!(value["disputes"][0].get("contact_email").is_none());
        assert_eq!(value["status"], "disputed");
    }

    #[test]
    fn test_entity_detail_unknown() {
        let dir = Directory::new();
        assert!(matches!(
            dir.entity_detail(EntityId::new()),
            Err(Error::NotFound { kind: "Entity", .. })
        ));
    }

    #[test]
    fn test_reports_for_reporter() {
        let mut dir = Directory::new();
        dir.submit_report(report(json!({ "phones": ["1"] }), baltimore()))
            .unwrap();

        assert_eq!(dir.reports_for_reporter("REPORTER@example.com").len(), 1);
        assert!(dir.reports_for_reporter("someone@example.com").is_empty());
    }
}
