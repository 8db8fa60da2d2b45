//! Alert endpoints.
//!
//! - `GET /api/patients/:patient_id/alerts`: alerts, optional `status` filter
//! - `POST /api/alerts/:id/acknowledge`
//! - `POST /api/alerts/:id/resolve`

use std::str::FromStr;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{parse_id, ApiError};
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{AlertStatus, VitalAlert};
use crate::monitoring;

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct AlertsResponse {
    pub patient_id: String,
    pub alerts: Vec<VitalAlert>,
}

/// `GET /api/patients/:patient_id/alerts`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    query: Result<Query<AlertsQuery>, QueryRejection>,
) -> Result<Json<AlertsResponse>, ApiError> {
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .map(AlertStatus::from_str)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let conn = ctx.core.lock_db()?;
    let alerts = db::list_vital_alerts(&conn, &patient_id, status)?;
    Ok(Json(AlertsResponse { patient_id, alerts }))
}

/// `POST /api/alerts/:id/acknowledge`
pub async fn acknowledge(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<VitalAlert>, ApiError> {
    let id = parse_id(&id)?;
    let now = ctx.now();
    let conn = ctx.core.lock_db()?;
    Ok(Json(monitoring::acknowledge_alert(&conn, &id, now)?))
}

/// `POST /api/alerts/:id/resolve`
pub async fn resolve(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<VitalAlert>, ApiError> {
    let id = parse_id(&id)?;
    let now = ctx.now();
    let conn = ctx.core.lock_db()?;
    Ok(Json(monitoring::resolve_alert(&conn, &id, now)?))
}
