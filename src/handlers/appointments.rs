//! # Appointments API Handlers
//!
//! Client-facing booking surface: book an appointment, list own
//! appointments, cancel own appointments. Every write goes through the
//! booking engine; handlers only shape requests and responses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::mail::{AppointmentEvent, AppointmentNotice, notify_detached};
use crate::models::appointment;
use crate::scheduling::{BookingRequest, CanceledBy};
use crate::server::AppState;

/// Request body for booking an appointment
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BookAppointmentRequest {
    /// Staff member to book with
    #[schema(value_type = String)]
    pub staff_id: Uuid,
    /// Appointment start (RFC 3339, UTC)
    pub start_at: DateTime<Utc>,
    /// Services to book; duplicates are collapsed
    #[schema(value_type = Vec<String>)]
    pub service_ids: Vec<Uuid>,
}

/// Request body for canceling an appointment
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CancelAppointmentRequest {
    /// Reason for the cancellation
    pub reason: Option<String>,
}

/// A principal as embedded in an appointment view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonInfo {
    /// Unique identifier for the user
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}

/// A booked service as captured at booking time
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookedServiceInfo {
    /// Service identifier
    #[schema(value_type = String)]
    pub service_id: Uuid,
    /// Service display name at read time
    pub name: Option<String>,
    /// Price frozen at booking time
    #[schema(value_type = String, example = "45.00")]
    pub price: Decimal,
    /// Duration in minutes frozen at booking time
    pub duration_minutes: i32,
}

/// Expanded appointment representation for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentView {
    /// Unique identifier for the appointment
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Client who booked
    pub client: PersonInfo,
    /// Staff member booked with
    pub staff: PersonInfo,
    /// Appointment start
    pub start_at: DateTime<Utc>,
    /// Appointment end
    pub end_at: DateTime<Utc>,
    /// Current status (scheduled|done|no_show|canceled)
    pub status: String,
    /// Sum of service prices captured at booking time
    #[schema(value_type = String, example = "45.00")]
    pub total_price: Decimal,
    /// Booked services with their frozen price and duration
    pub services: Vec<BookedServiceInfo>,
    /// Reason recorded at cancellation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Who canceled (client|staff)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_by: Option<String>,
}

/// Response wrapper for appointment listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentsResponse {
    /// Appointments visible to the caller
    pub appointments: Vec<AppointmentView>,
}

/// Books a new appointment for the authenticated client
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentView),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Time slot already booked", body = ApiError),
        (status = 422, description = "Validation error or slot unavailable", body = ApiError)
    ),
    tag = "appointments"
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentView>), ApiError> {
    let booked = state
        .engine
        .book(
            auth.tenant_id,
            BookingRequest {
                client_id: auth.user_id,
                staff_id: request.staff_id,
                start_at: request.start_at,
                service_ids: request.service_ids,
            },
        )
        .await?;

    notify_detached(
        Arc::clone(&state.mailer),
        notice_for(&booked, AppointmentEvent::Booked),
    );

    let view = expand(&state, booked).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Lists the authenticated client's own appointments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    responses(
        (status = 200, description = "Caller's appointments", body = AppointmentsResponse),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "appointments"
)]
pub async fn list_my_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let rows = state
        .appointments
        .list_for_client(auth.tenant_id, auth.user_id)
        .await?;

    let mut appointments = Vec::with_capacity(rows.len());
    for row in rows {
        appointments.push(expand(&state, row).await?);
    }

    Ok(Json(AppointmentsResponse { appointments }))
}

/// Cancels one of the authenticated client's appointments
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment canceled", body = AppointmentView),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Not the caller's appointment", body = ApiError),
        (status = 404, description = "Appointment not found", body = ApiError),
        (status = 422, description = "Appointment is not scheduled", body = ApiError)
    ),
    tag = "appointments"
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<AppointmentView>, ApiError> {
    let canceled = state
        .engine
        .cancel(
            auth.tenant_id,
            &auth,
            id,
            request.reason,
            CanceledBy::Client,
        )
        .await?;

    notify_detached(
        Arc::clone(&state.mailer),
        notice_for(&canceled, AppointmentEvent::Canceled),
    );

    let view = expand(&state, canceled).await?;
    Ok(Json(view))
}

/// Builds the expanded view of an appointment: client, staff, and the
/// snapshot rows joined to current service names.
pub async fn expand(
    state: &AppState,
    row: appointment::Model,
) -> Result<AppointmentView, ApiError> {
    let tenant = crate::auth::TenantId(row.tenant_id);

    let client = state.staff.find_user(tenant, row.client_id).await?;
    let staff = state.staff.find_user(tenant, row.staff_id).await?;

    let snapshots = state.appointments.snapshots_for(row.id).await?;
    let mut services = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let name = state
            .services
            .find_name(tenant, snapshot.service_id)
            .await?;
        services.push(BookedServiceInfo {
            service_id: snapshot.service_id,
            name,
            price: snapshot.price_snapshot,
            duration_minutes: snapshot.duration_snapshot,
        });
    }

    Ok(AppointmentView {
        id: row.id,
        client: person(client),
        staff: person(staff),
        start_at: row.start_at.with_timezone(&Utc),
        end_at: row.end_at.with_timezone(&Utc),
        status: row.status,
        total_price: row.total_price,
        services,
        cancel_reason: row.cancel_reason,
        canceled_by: row.canceled_by,
    })
}

pub fn notice_for(row: &appointment::Model, event: AppointmentEvent) -> AppointmentNotice {
    AppointmentNotice {
        event,
        appointment_id: row.id,
        tenant_id: row.tenant_id,
        client_id: row.client_id,
        staff_id: row.staff_id,
        start_at: row.start_at.with_timezone(&Utc),
        status: row.status.clone(),
    }
}

fn person(user: crate::models::user::Model) -> PersonInfo {
    PersonInfo {
        id: user.id,
        name: user.name,
        email: user.email,
    }
}
