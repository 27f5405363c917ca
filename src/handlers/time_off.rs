//! # Time Off API Handlers
//!
//! Staff-facing catalog of one-off closed intervals. Shares the calendar
//! scoping rules with the working-hours surface.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiError, forbidden};
use crate::handlers::working_hours::resolve_target_staff;
use crate::models::time_off;
use crate::server::AppState;

/// Query parameters for the time-off listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTimeOffQuery {
    /// Staff member whose intervals to manage; admins only
    pub staff_id: Option<Uuid>,
    /// Only intervals ending at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Only intervals starting at or before this instant
    pub to: Option<DateTime<Utc>>,
}

/// Query parameter naming the calendar a write applies to
#[derive(Debug, Deserialize, IntoParams)]
pub struct TimeOffScopeQuery {
    /// Staff member whose intervals to manage; admins only
    pub staff_id: Option<Uuid>,
}

/// Request body for creating a time-off interval
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TimeOffRequest {
    /// Interval start (RFC 3339, UTC)
    pub start_at: DateTime<Utc>,
    /// Interval end (RFC 3339, UTC), exclusive
    pub end_at: DateTime<Utc>,
    /// Optional note shown alongside the interval
    pub reason: Option<String>,
}

/// A time-off interval for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeOffInfo {
    /// Unique identifier for the interval
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Staff member the interval belongs to
    #[schema(value_type = String)]
    pub staff_id: Uuid,
    /// Interval start
    pub start_at: DateTime<Utc>,
    /// Interval end, exclusive
    pub end_at: DateTime<Utc>,
    /// Optional note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<time_off::Model> for TimeOffInfo {
    fn from(model: time_off::Model) -> Self {
        Self {
            id: model.id,
            staff_id: model.staff_id,
            start_at: model.start_at.with_timezone(&Utc),
            end_at: model.end_at.with_timezone(&Utc),
            reason: model.reason,
        }
    }
}

/// Response wrapper for time-off listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeOffResponse {
    /// Intervals, newest first
    pub time_off: Vec<TimeOffInfo>,
}

/// Lists time-off intervals for a staff member
#[utoipa::path(
    get,
    path = "/api/v1/staff/time-off",
    params(ListTimeOffQuery),
    responses(
        (status = 200, description = "Declared intervals", body = TimeOffResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError)
    ),
    tag = "time-off"
)]
pub async fn list_time_off(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListTimeOffQuery>,
) -> Result<Json<TimeOffResponse>, ApiError> {
    let staff_id = resolve_target_staff(&state, &auth, query.staff_id).await?;

    let rows = state
        .time_off
        .list(auth.tenant_id, staff_id, query.from, query.to)
        .await?;

    Ok(Json(TimeOffResponse {
        time_off: rows.into_iter().map(TimeOffInfo::from).collect(),
    }))
}

/// Creates a time-off interval
#[utoipa::path(
    post,
    path = "/api/v1/staff/time-off",
    params(TimeOffScopeQuery),
    request_body = TimeOffRequest,
    responses(
        (status = 201, description = "Interval created", body = TimeOffInfo),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError),
        (status = 422, description = "Validation error", body = ApiError)
    ),
    tag = "time-off"
)]
pub async fn create_time_off(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<TimeOffScopeQuery>,
    Json(request): Json<TimeOffRequest>,
) -> Result<(StatusCode, Json<TimeOffInfo>), ApiError> {
    let staff_id = resolve_target_staff(&state, &auth, query.staff_id).await?;

    let created = state
        .time_off
        .create(
            auth.tenant_id,
            staff_id,
            request.start_at,
            request.end_at,
            request.reason,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Deletes a time-off interval
#[utoipa::path(
    delete,
    path = "/api/v1/staff/time-off/{id}",
    params(("id" = String, Path, description = "Interval id")),
    responses(
        (status = 204, description = "Interval deleted"),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError),
        (status = 404, description = "Interval not found", body = ApiError)
    ),
    tag = "time-off"
)]
pub async fn delete_time_off(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let existing = state.time_off.find(auth.tenant_id, id).await?;

    if !auth.may_act_for_staff(existing.staff_id) {
        return Err(forbidden(Some("Caller may not manage this calendar")));
    }

    state.time_off.delete(auth.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
