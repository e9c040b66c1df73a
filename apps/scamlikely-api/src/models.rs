//! Request and response shapes for the Scam Likely API

use scamlikely_core::{EntityListing, ReportId, ReportStatus};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Generic list envelope
#[derive(Debug, Clone, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

/// Search results. Pagination is not implemented, so `next_page` is always null.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub items: Vec<EntityListing>,
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MineParams {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishResponse {
    pub id: ReportId,
    pub status: ReportStatus,
}
