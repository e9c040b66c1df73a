//! Core engine for the Scam Likely directory
//!
//! Decides whether an incoming report matches a known entity, moves reports
//! through moderation and disputes, and derives the counts shown in public
//! listings. Everything lives in memory inside a [`Directory`].

pub mod directory;
pub mod dispute;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod model;
pub mod resolver;
pub mod validate;

pub use directory::{
    Clock, Directory, DisputeReceipt, EntityDetail, EntityListing, ReportDetail, ReportSummary,
    SearchQuery, SubmitReceipt,
};
pub use error::{Error, Result};
pub use model::{
    Dispute, DisputeCreate, DisputeId, DisputeStatus, Entity, EntityId, EntityType, Identifiers,
    IncidentLocation, IncidentMode, Report, ReportCreate, ReportId, ReportStatus,
};
