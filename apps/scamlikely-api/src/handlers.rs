//! HTTP handlers for the Scam Likely API

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use scamlikely_core::{
    Dispute, DisputeCreate, DisputeReceipt, EntityDetail, EntityId, EntityListing, Report,
    ReportCreate, ReportDetail, ReportId, SearchQuery, SubmitReceipt,
};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Parses a path id. Malformed ids are reported as unknown ids.
fn parse_id<T: FromStr>(kind: &'static str, raw: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound {
        kind,
        id: raw.to_string(),
    })
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Entities with at least one published or disputed report
pub async fn recent_entities(State(state): State<Arc<AppState>>) -> Json<Items<EntityListing>> {
    let directory = state.directory.read().await;
    Json(Items {
        items: directory.recent_entities(),
    })
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let directory = state.directory.read().await;
    let items = directory.search(&SearchQuery {
        q: params.q,
        state: params.state,
        city: params.city,
    });

    Json(SearchResponse {
        items,
        next_page: None,
    })
}

/// Submit a new report (starts out pending)
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportCreate>,
) -> Result<Json<SubmitReceipt>, ApiError> {
    let mut directory = state.directory.write().await;
    let receipt = directory.submit_report(req)?;

    tracing::info!(
        "Created report {} for entity {}",
        receipt.id,
        receipt.entity_id
    );
    Ok(Json(receipt))
}

/// Reports filed under a reporter e-mail
pub async fn my_reports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MineParams>,
) -> Result<Json<Items<Report>>, ApiError> {
    if params.email.trim().is_empty() {
        return Err(ApiError::Validation("email must not be empty".into()));
    }

    let directory = state.directory.read().await;
    Ok(Json(Items {
        items: directory.reports_for_reporter(&params.email),
    }))
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReportDetail>, ApiError> {
    let id: ReportId = parse_id("Report", &id)?;
    let directory = state.directory.read().await;
    Ok(Json(directory.report(id)?))
}

/// Moderation: publish a report
pub async fn publish_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PublishResponse>, ApiError> {
    let id: ReportId = parse_id("Report", &id)?;
    let mut directory = state.directory.write().await;
    let status = directory.publish_report(id)?;

    Ok(Json(PublishResponse { id, status }))
}

pub async fn get_entity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EntityDetail>, ApiError> {
    let id: EntityId = parse_id("Entity", &id)?;
    let directory = state.directory.read().await;
    Ok(Json(directory.entity_detail(id)?))
}

/// Dispute a report; the report becomes `disputed`
pub async fn create_dispute(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DisputeCreate>,
) -> Result<Json<DisputeReceipt>, ApiError> {
    let id: ReportId = parse_id("Report", &id)?;
    let mut directory = state.directory.write().await;
    let receipt = directory.open_dispute(id, req)?;

    tracing::info!("Opened dispute {} on report {}", receipt.id, id);
    Ok(Json(receipt))
}

pub async fn list_disputes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Items<Dispute>>, ApiError> {
    let id: ReportId = parse_id("Report", &id)?;
    let directory = state.directory.read().await;
    Ok(Json(Items {
        items: directory.disputes_for_report(id)?,
    }))
}
