//! # Staff Appointments API Handlers
//!
//! Staff-facing calendar surface: list appointments for a day or window,
//! reschedule, mark done or no-show, and cancel on the client's behalf.
//! Staff see their own calendar; admins see any calendar in the tenant.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{AuthContext, Capability};
use crate::error::{ApiError, forbidden, validation_error};
use crate::handlers::appointments::{AppointmentView, AppointmentsResponse, expand, notice_for};
use crate::mail::{AppointmentEvent, notify_detached};
use crate::scheduling::{AppointmentStatus, CanceledBy};
use crate::server::AppState;

/// Query parameters for the staff calendar listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// Single day to list (YYYY-MM-DD, UTC); exclusive with from/to
    pub date: Option<NaiveDate>,
    /// Window start (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Window end, exclusive (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    /// Staff member whose calendar to list; admins only
    pub staff_id: Option<Uuid>,
}

/// Request body for rescheduling an appointment
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RescheduleRequest {
    /// New appointment start (RFC 3339, UTC)
    pub start_at: DateTime<Utc>,
    /// New service set; duplicates are collapsed
    #[schema(value_type = Vec<String>)]
    pub service_ids: Vec<Uuid>,
}

/// Request body for marking an appointment done or no-show
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status: done or no_show
    pub status: String,
}

/// Request body for a staff-side cancellation; the reason is required
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StaffCancelRequest {
    /// Reason for the cancellation, shown to the client
    pub reason: String,
}

/// Lists appointments on a staff calendar
#[utoipa::path(
    get,
    path = "/api/v1/staff/appointments",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Appointments in the requested window", body = AppointmentsResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not view this calendar", body = ApiError),
        (status = 422, description = "Validation error", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn list_calendar(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let staff_scope = resolve_staff_scope(&auth, query.staff_id)?;

    let (from, to) = match (query.date, query.from, query.to) {
        (Some(date), None, None) => {
            let start = date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now);
            (start, start + chrono::Duration::days(1))
        }
        (None, Some(from), Some(to)) => {
            if from >= to {
                return Err(validation_error(
                    "from must be before to",
                    serde_json::json!({ "from": from, "to": to }),
                ));
            }
            (from, to)
        }
        _ => {
            return Err(validation_error(
                "Provide either date or both from and to",
                serde_json::json!({}),
            ));
        }
    };

    let rows = state
        .appointments
        .list_starting_between(auth.tenant_id, staff_scope, from, to)
        .await?;

    let mut appointments = Vec::with_capacity(rows.len());
    for row in rows {
        appointments.push(expand(&state, row).await?);
    }

    Ok(Json(AppointmentsResponse { appointments }))
}

/// Reschedules a scheduled appointment
#[utoipa::path(
    put,
    path = "/api/v1/staff/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = RescheduleRequest,
    responses(
        (status = 200, description = "Appointment rescheduled", body = AppointmentView),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not act on this calendar", body = ApiError),
        (status = 404, description = "Appointment not found", body = ApiError),
        (status = 409, description = "New time slot already booked", body = ApiError),
        (status = 422, description = "Validation error or slot unavailable", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn reschedule_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<AppointmentView>, ApiError> {
    let updated = state
        .engine
        .reschedule(
            auth.tenant_id,
            &auth,
            id,
            request.start_at,
            &request.service_ids,
        )
        .await?;

    notify_detached(
        Arc::clone(&state.mailer),
        notice_for(&updated, AppointmentEvent::Rescheduled),
    );

    let view = expand(&state, updated).await?;
    Ok(Json(view))
}

/// Marks a scheduled appointment done or no-show
#[utoipa::path(
    post,
    path = "/api/v1/staff/appointments/{id}/status",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AppointmentView),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not act on this calendar", body = ApiError),
        (status = 404, description = "Appointment not found", body = ApiError),
        (status = 422, description = "Illegal status transition", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<AppointmentView>, ApiError> {
    let target = match AppointmentStatus::parse(&request.status) {
        Some(status @ (AppointmentStatus::Done | AppointmentStatus::NoShow)) => status,
        _ => {
            return Err(validation_error(
                "status must be done or no_show",
                serde_json::json!({ "status": request.status }),
            ));
        }
    };

    let updated = state
        .engine
        .update_status(auth.tenant_id, &auth, id, target)
        .await?;

    notify_detached(
        Arc::clone(&state.mailer),
        notice_for(&updated, AppointmentEvent::StatusChanged),
    );

    let view = expand(&state, updated).await?;
    Ok(Json(view))
}

/// Cancels an appointment on behalf of the business
#[utoipa::path(
    post,
    path = "/api/v1/staff/appointments/{id}/cancel",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = StaffCancelRequest,
    responses(
        (status = 200, description = "Appointment canceled", body = AppointmentView),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Caller may not act on this calendar", body = ApiError),
        (status = 404, description = "Appointment not found", body = ApiError),
        (status = 422, description = "Appointment is not scheduled", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<StaffCancelRequest>,
) -> Result<Json<AppointmentView>, ApiError> {
    if request.reason.trim().is_empty() {
        return Err(validation_error(
            "reason is required",
            serde_json::json!({ "reason": request.reason }),
        ));
    }

    let canceled = state
        .engine
        .cancel(
            auth.tenant_id,
            &auth,
            id,
            Some(request.reason),
            CanceledBy::Staff,
        )
        .await?;

    notify_detached(
        Arc::clone(&state.mailer),
        notice_for(&canceled, AppointmentEvent::Canceled),
    );

    let view = expand(&state, canceled).await?;
    Ok(Json(view))
}

/// Resolves which staff calendar a listing covers.
///
/// Staff are pinned to their own calendar and may not pass a different
/// staff_id. Admins default to the whole tenant and may narrow to one staff
/// member.
pub fn resolve_staff_scope(
    auth: &AuthContext,
    requested: Option<Uuid>,
) -> Result<Option<Uuid>, ApiError> {
    match auth.capability {
        Capability::Staff => match requested {
            None => Ok(Some(auth.user_id)),
            Some(id) if id == auth.user_id => Ok(Some(id)),
            Some(_) => Err(forbidden(Some("Staff may only view their own calendar"))),
        },
        Capability::Admin => Ok(requested),
        Capability::Client => Err(forbidden(Some("Staff or admin capability required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TenantId;

    fn ctx(capability: Capability) -> AuthContext {
        AuthContext {
            tenant_id: TenantId(Uuid::new_v4()),
            user_id: Uuid::new_v4(),
            capability,
        }
    }

    #[test]
    fn staff_scope_defaults_to_own_calendar() {
        let auth = ctx(Capability::Staff);
        assert_eq!(
            resolve_staff_scope(&auth, None).unwrap(),
            Some(auth.user_id)
        );
    }

    #[test]
    fn staff_cannot_request_another_calendar() {
        let auth = ctx(Capability::Staff);
        assert!(resolve_staff_scope(&auth, Some(Uuid::new_v4())).is_err());
    }

    #[test]
    fn admin_scope_defaults_to_whole_tenant() {
        let auth = ctx(Capability::Admin);
        assert_eq!(resolve_staff_scope(&auth, None).unwrap(), None);

        let target = Uuid::new_v4();
        assert_eq!(
            resolve_staff_scope(&auth, Some(target)).unwrap(),
            Some(target)
        );
    }

    #[test]
    fn clients_are_rejected_from_the_staff_surface() {
        let auth = ctx(Capability::Client);
        assert!(resolve_staff_scope(&auth, None).is_err());
    }
}
