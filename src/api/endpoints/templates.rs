//! Vital template endpoints.
//!
//! - `GET /api/templates`: all templates
//! - `POST /api/templates`: create a template
//! - `GET /api/templates/:id`: one template

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{parse_id, ApiError};
use crate::api::types::ApiContext;
use crate::classifier;
use crate::db;
use crate::models::{NormalRange, VitalKind, VitalTemplate};

#[derive(Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<VitalTemplate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    /// Resolved from `name` when absent.
    pub kind: Option<VitalKind>,
    pub unit: String,
    pub normal_min: Option<f64>,
    pub normal_max: Option<f64>,
}

/// `GET /api/templates`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<TemplatesResponse>, ApiError> {
    let conn = ctx.core.lock_db()?;
    let templates = db::list_vital_templates(&conn)?;
    Ok(Json(TemplatesResponse { templates }))
}

/// `POST /api/templates`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<CreateTemplateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VitalTemplate>), ApiError> {
    let Json(req) = payload?;

    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Template name is required".into()));
    }
    if req.unit.trim().is_empty() {
        return Err(ApiError::BadRequest("Unit is required".into()));
    }
    let range = NormalRange::new(req.normal_min, req.normal_max);
    classifier::validate_range(&range)?;

    let template = VitalTemplate::new(req.name.trim(), req.kind, req.unit.trim(), range);

    let conn = ctx.core.lock_db()?;
    db::insert_vital_template(&conn, &template)?;
    tracing::info!(template_id = %template.id, kind = template.kind.as_str(), "Vital template created");

    Ok((StatusCode::CREATED, Json(template)))
}

/// `GET /api/templates/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<VitalTemplate>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    db::get_vital_template(&conn, &id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("vital template {id}")))
}
