//! Reading endpoints.
//!
//! - `POST /api/readings`: record + classify + trend
//! - `GET /api/patients/:patient_id/readings`: recent readings
//! - `GET /api/patients/:patient_id/trend`: trend of the latest reading

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{parse_id, ApiError};
use crate::api::types::ApiContext;
use crate::db;
use crate::models::VitalReading;
use crate::monitoring::{self, PatientTrend, ReadingInput, RecordOutcome, TrendMode};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

/// `POST /api/readings`
pub async fn record(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ReadingInput>, JsonRejection>,
) -> Result<Json<RecordOutcome>, ApiError> {
    let Json(input) = payload?;
    let now = ctx.now();

    let conn = ctx.core.lock_db()?;
    let outcome = monitoring::record_reading(&conn, ctx.core.notifier(), &input, now)?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
pub struct ReadingsQuery {
    pub template_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ReadingsResponse {
    pub patient_id: String,
    pub readings: Vec<VitalReading>,
}

/// `GET /api/patients/:patient_id/readings`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    query: Result<Query<ReadingsQuery>, QueryRejection>,
) -> Result<Json<ReadingsResponse>, ApiError> {
    let Query(query) = query?;
    let template_id = query.template_id.as_deref().map(parse_id).transpose()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let conn = ctx.core.lock_db()?;
    let readings = db::get_vital_readings(&conn, &patient_id, template_id.as_ref(), limit)?;
    Ok(Json(ReadingsResponse {
        patient_id,
        readings,
    }))
}

#[derive(Deserialize)]
pub struct TrendQuery {
    pub template_id: Option<String>,
    #[serde(default)]
    pub mode: TrendMode,
}

/// `GET /api/patients/:patient_id/trend`
pub async fn trend(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<Json<PatientTrend>, ApiError> {
    let Query(query) = query?;
    let template_id = query
        .template_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("template_id is required".into()))
        .and_then(parse_id)?;
    let now = ctx.now();

    let conn = ctx.core.lock_db()?;
    let trend = monitoring::patient_trend(&conn, &patient_id, &template_id, query.mode, now)?;
    Ok(Json(trend))
}
