//! Report lifecycle: submission, moderation and per-entity counts
//!
//! ```text
//! pending ──publish──▶ published
//!    │                   │  ▲
//!    └──dispute──▶ disputed ┘ (publish again)
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{Error, Result};
use crate::identity::IdentityStore;
use crate::model::{EntityId, Report, ReportCreate, ReportId, ReportStatus};
use crate::resolver::EntityResolver;
use crate::validate::check_incident;

#[derive(Debug, Default)]
pub struct ReportBook {
    reports: Vec<Report>,
    index: HashMap<ReportId, usize>,
}

impl ReportBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the incident mode and location, resolves the entity and
    /// stores a `pending` report.
    pub fn submit(
        &mut self,
        identities: &mut IdentityStore,
        payload: ReportCreate,
        now: DateTime<Utc>,
    ) -> Result<ReportId> {
        let incident_mode = check_incident(&payload.incident_mode, &payload.incident_location)?;

        let entity_id = EntityResolver::new(identities).resolve_or_create(
            &payload.identifiers,
            &payload.incident_location,
            now,
        );

        let id = ReportId::new();
        self.index.insert(id, self.reports.len());
        self.reports.push(Report {
            id,
            entity_id,
            category: payload.category,
            narrative: payload.narrative,
            amount_cents: payload.amount_cents,
            currency: payload.currency,
            incident_date: payload.incident_date,
            incident_mode,
            incident_location: payload.incident_location,
            reporter_public_anonymous: payload.reporter_public_anonymous,
            reporter_email: payload
                .reporter_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            status: ReportStatus::Pending,
            created_at: now,
        });

        info!("Report {} submitted against entity {}", id, entity_id);
        Ok(id)
    }

    /// Publishes a report from any status, including `disputed`, and
    /// refreshes the entity's published count.
    pub fn publish(
        &mut self,
        identities: &mut IdentityStore,
        id: ReportId,
    ) -> Result<ReportStatus> {
        let report = self.get_mut(id)?;
        let previous = report.status;
        report.status = ReportStatus::Published;
        let entity_id = report.entity_id;

        let published = self.count_with_status(entity_id, &[ReportStatus::Published]);
        identities.set_report_count(entity_id, published);

        info!(
            "Report {} published (was {}), entity {} now has {} published",
            id, previous, entity_id, published
        );
        Ok(ReportStatus::Published)
    }

    pub fn get(&self, id: ReportId) -> Result<&Report> {
        self.index
            .get(&id)
            .map(|&i| &self.reports[i])
            .ok_or_else(|| Error::not_found("Report", id))
    }

    fn get_mut(&mut self, id: ReportId) -> Result<&mut Report> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.reports[i]),
            None => Err(Error::not_found("Report", id)),
        }
    }

    /// Forces a report into `disputed` whatever its current status
    pub(crate) fn mark_disputed(&mut self, id: ReportId) -> Result<&Report> {
        let report = self.get_mut(id)?;
        if report.status != ReportStatus::Disputed {
            info!("Report {} disputed (was {})", id, report.status);
        }
        report.status = ReportStatus::Disputed;
        Ok(&*report)
    }

    /// Reports for an entity whose status is in `statuses`, in submission order
    pub fn list_for_entity(&self, entity_id: EntityId, statuses: &[ReportStatus]) -> Vec<&Report> {
        self.reports
            .iter()
            .filter(|r| r.entity_id == entity_id && statuses.contains(&r.status))
            .collect()
    }

    pub fn visible_for_entity(&self, entity_id: EntityId) -> Vec<&Report> {
        self.list_for_entity(entity_id, &ReportStatus::VISIBLE)
    }

    pub fn count_with_status(&self, entity_id: EntityId, statuses: &[ReportStatus]) -> usize {
        self.reports
            .iter()
            .filter(|r| r.entity_id == entity_id && statuses.contains(&r.status))
            .count()
    }

    /// Published plus disputed reports; zero keeps the entity out of listings
    pub fn count_visible(&self, entity_id: EntityId) -> usize {
        self.count_with_status(entity_id, &ReportStatus::VISIBLE)
    }

    /// Newest visible report of an entity
    pub fn latest_visible(&self, entity_id: EntityId) -> Option<&Report> {
        self.visible_for_entity(entity_id)
            .into_iter()
            .max_by_key(|r| r.created_at)
    }

    /// Reports filed with the given reporter e-mail (case-insensitive)
    pub fn list_for_reporter(&self, email: &str) -> Vec<&Report> {
        let email = email.trim().to_lowercase();
        self.reports
            .iter()
            .filter(|r| {
                r.reporter_email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase() == email)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
