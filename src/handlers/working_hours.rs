//! # Working Hours API Handlers
//!
//! Staff-facing catalog of recurring weekly open ranges. Staff manage their
//! own ranges; admins manage any staff member's by passing staff_id.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{AuthContext, Capability};
use crate::error::{ApiError, forbidden, validation_error};
use crate::models::working_hour;
use crate::server::AppState;

/// Query parameters for the working-hours listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListWorkingHoursQuery {
    /// Staff member whose ranges to manage; admins only
    pub staff_id: Option<Uuid>,
    /// Narrow the listing to one weekday (0 = Sunday .. 6 = Saturday)
    pub weekday: Option<i16>,
}

/// Query parameter naming the calendar a write applies to
#[derive(Debug, Deserialize, IntoParams)]
pub struct StaffScopeQuery {
    /// Staff member whose ranges to manage; admins only
    pub staff_id: Option<Uuid>,
}

/// Request body for creating or updating a working-hour range
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct WorkingHourRequest {
    /// Weekday the range recurs on (0 = Sunday .. 6 = Saturday)
    pub weekday: i16,
    /// Range start (HH:MM:SS)
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    /// Range end (HH:MM:SS), exclusive
    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

/// A working-hour range for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkingHourInfo {
    /// Unique identifier for the range
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Staff member the range belongs to
    #[schema(value_type = String)]
    pub staff_id: Uuid,
    /// Weekday the range recurs on
    pub weekday: i16,
    /// Range start
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    /// Range end, exclusive
    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

impl From<working_hour::Model> for WorkingHourInfo {
    fn from(model: working_hour::Model) -> Self {
        Self {
            id: model.id,
            staff_id: model.staff_id,
            weekday: model.weekday,
            start_time: model.start_time,
            end_time: model.end_time,
        }
    }
}

/// Response wrapper for working-hour listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkingHoursResponse {
    /// Ranges ordered by weekday then start time
    pub working_hours: Vec<WorkingHourInfo>,
}

/// Lists working-hour ranges for a staff member
#[utoipa::path(
    get,
    path = "/api/v1/staff/working-hours",
    params(ListWorkingHoursQuery),
    responses(
        (status = 200, description = "Declared ranges", body = WorkingHoursResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError)
    ),
    tag = "working-hours"
)]
pub async fn list_working_hours(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListWorkingHoursQuery>,
) -> Result<Json<WorkingHoursResponse>, ApiError> {
    let staff_id = resolve_target_staff(&state, &auth, query.staff_id).await?;

    let rows = state
        .working_hours
        .list(auth.tenant_id, staff_id, query.weekday)
        .await?;

    Ok(Json(WorkingHoursResponse {
        working_hours: rows.into_iter().map(WorkingHourInfo::from).collect(),
    }))
}

/// Creates a working-hour range
#[utoipa::path(
    post,
    path = "/api/v1/staff/working-hours",
    params(StaffScopeQuery),
    request_body = WorkingHourRequest,
    responses(
        (status = 201, description = "Range created", body = WorkingHourInfo),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError),
        (status = 409, description = "Range overlaps an existing one", body = ApiError),
        (status = 422, description = "Validation error", body = ApiError)
    ),
    tag = "working-hours"
)]
pub async fn create_working_hours(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<StaffScopeQuery>,
    Json(request): Json<WorkingHourRequest>,
) -> Result<(StatusCode, Json<WorkingHourInfo>), ApiError> {
    let staff_id = resolve_target_staff(&state, &auth, query.staff_id).await?;

    let created = state
        .working_hours
        .create(
            auth.tenant_id,
            staff_id,
            request.weekday,
            request.start_time,
            request.end_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Updates a working-hour range
#[utoipa::path(
    put,
    path = "/api/v1/staff/working-hours/{id}",
    params(("id" = String, Path, description = "Range id")),
    request_body = WorkingHourRequest,
    responses(
        (status = 200, description = "Range updated", body = WorkingHourInfo),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError),
        (status = 404, description = "Range not found", body = ApiError),
        (status = 409, description = "Range overlaps an existing one", body = ApiError),
        (status = 422, description = "Validation error", body = ApiError)
    ),
    tag = "working-hours"
)]
pub async fn update_working_hours(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<WorkingHourRequest>,
) -> Result<Json<WorkingHourInfo>, ApiError> {
    let existing = state.working_hours.find(auth.tenant_id, id).await?;
    ensure_may_manage(&auth, existing.staff_id)?;

    let updated = state
        .working_hours
        .update(
            auth.tenant_id,
            id,
            request.weekday,
            request.start_time,
            request.end_time,
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Deletes a working-hour range
#[utoipa::path(
    delete,
    path = "/api/v1/staff/working-hours/{id}",
    params(("id" = String, Path, description = "Range id")),
    responses(
        (status = 204, description = "Range deleted"),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not manage this calendar", body = ApiError),
        (status = 404, description = "Range not found", body = ApiError)
    ),
    tag = "working-hours"
)]
pub async fn delete_working_hours(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let existing = state.working_hours.find(auth.tenant_id, id).await?;
    ensure_may_manage(&auth, existing.staff_id)?;

    state.working_hours.delete(auth.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolves which staff member a catalog operation targets.
///
/// Staff always target themselves and may not pass a different staff_id.
/// Admins must name the target explicitly; the id must belong to a
/// staff-side principal in the tenant.
pub async fn resolve_target_staff(
    state: &AppState,
    auth: &AuthContext,
    requested: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    match auth.capability {
        Capability::Staff => match requested {
            None => Ok(auth.user_id),
            Some(id) if id == auth.user_id => Ok(id),
            Some(_) => Err(forbidden(Some("Staff may only manage their own calendar"))),
        },
        Capability::Admin => {
            let staff_id = requested.ok_or_else(|| {
                validation_error("staff_id is required", serde_json::json!({}))
            })?;

            if !state.staff.is_staff_in_tenant(auth.tenant_id, staff_id).await? {
                return Err(validation_error(
                    "staff_id does not name a staff member",
                    serde_json::json!({ "staff_id": staff_id }),
                ));
            }

            Ok(staff_id)
        }
        Capability::Client => Err(forbidden(Some("Staff or admin capability required"))),
    }
}

fn ensure_may_manage(auth: &AuthContext, staff_id: Uuid) -> Result<(), ApiError> {
    if auth.may_act_for_staff(staff_id) {
        Ok(())
    } else {
        Err(forbidden(Some("Caller may not manage this calendar")))
    }
}
