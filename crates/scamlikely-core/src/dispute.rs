//! Dispute manager

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::lifecycle::ReportBook;
use crate::model::{Dispute, DisputeId, DisputeStatus, ReportId};

#[derive(Debug, Default)]
pub struct DisputeBook {
    disputes: Vec<Dispute>,
}

impl DisputeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a dispute and moves the report to `disputed`, overriding
    /// `published`. Text length is checked by the caller; only trimming
    /// happens here.
    pub fn open(
        &mut self,
        reports: &mut ReportBook,
        report_id: ReportId,
        contact_email: &str,
        text: &str,
        public_anonymous: bool,
        now: DateTime<Utc>,
    ) -> Result<DisputeId> {
        let report = reports.mark_disputed(report_id)?;

        let id = DisputeId::new();
        self.disputes.push(Dispute {
            id,
            report_id,
            entity_id: report.entity_id,
            contact_email: contact_email.trim().to_string(),
            text: text.trim().to_string(),
            public_anonymous,
            status: DisputeStatus::Open,
            created_at: now,
        });

        info!("Dispute {} opened on report {}", id, report_id);
        Ok(id)
    }

    /// Disputes on a report, newest first. Equal timestamps keep filing order.
    pub fn list_for_report(&self, reports: &ReportBook, report_id: ReportId) -> Result<Vec<&Dispute>> {
        reports.get(report_id)?;

        let mut disputes: Vec<&Dispute> = self
            .disputes
            .iter()
            .filter(|d| d.report_id == report_id)
            .collect();
        disputes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(disputes)
    }

    pub fn count_for_report(&self, report_id: ReportId) -> usize {
        self.disputes
            .iter()
            .filter(|d| d.report_id == report_id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.disputes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disputes.is_empty()
    }
}
