//! # Availability API Handlers
//!
//! Read-only slot listing for one staff member on one day. The computation
//! runs without locks; a returned slot is an offer that the booking commit
//! path re-verifies, not a reservation.

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::scheduling::{
    DEFAULT_DURATION_MINUTES, DEFAULT_STEP_MINUTES, MAX_DURATION_MINUTES, MAX_STEP_MINUTES,
    MIN_DURATION_MINUTES, MIN_STEP_MINUTES, busy_intervals, day_bounds, generate_slots,
};
use crate::server::AppState;

/// Query parameters for the availability listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Staff member whose calendar to inspect
    pub staff_id: Uuid,
    /// Day to inspect (YYYY-MM-DD, UTC)
    pub date: NaiveDate,
    /// Explicit slot duration in minutes; overrides the service-derived sum
    pub duration_minutes: Option<i64>,
    /// Comma-separated service ids; their summed duration sizes the slot
    /// when no explicit duration is given
    pub service_ids: Option<String>,
    /// Candidate spacing in minutes (default: 15)
    pub step_minutes: Option<i64>,
}

/// Availability listing for one staff member and day
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    /// Staff member the slots belong to
    #[schema(value_type = String)]
    pub staff_id: Uuid,
    /// Day the slots fall on
    #[schema(value_type = String, example = "2026-03-02")]
    pub date: NaiveDate,
    /// Slot duration the listing was computed for
    pub duration_minutes: i64,
    /// Candidate spacing the listing was computed for
    pub step_minutes: i64,
    /// Free slot start times, ascending
    pub slots: Vec<DateTime<Utc>>,
}

/// Lists free appointment slots for a staff member on a given day
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free slots for the day", body = AvailabilityResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 422, description = "Validation error or staff/services unavailable", body = ApiError)
    ),
    tag = "availability"
)]
pub async fn get_availability(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let tenant = auth.tenant_id;

    let step_minutes = query.step_minutes.unwrap_or(DEFAULT_STEP_MINUTES);
    if !(MIN_STEP_MINUTES..=MAX_STEP_MINUTES).contains(&step_minutes) {
        return Err(crate::error::validation_error(
            &format!("step_minutes must be between {MIN_STEP_MINUTES} and {MAX_STEP_MINUTES}"),
            serde_json::json!({ "step_minutes": step_minutes }),
        ));
    }

    state.staff.bookable(tenant, query.staff_id).await?;

    // Service ids are still validated when present, but an explicit
    // duration_minutes wins over their summed duration.
    let service_duration = match parse_service_ids(query.service_ids.as_deref())? {
        Some(service_ids) => {
            let services = state.services.resolve_active(tenant, &service_ids).await?;
            state
                .services
                .staff_provides_all(tenant, query.staff_id, &service_ids)
                .await?;
            Some(services.iter().map(|s| i64::from(s.duration_minutes)).sum())
        }
        None => None,
    };
    let duration_minutes = query
        .duration_minutes
        .or(service_duration)
        .unwrap_or(DEFAULT_DURATION_MINUTES);

    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
        return Err(crate::error::validation_error(
            &format!(
                "duration_minutes must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}"
            ),
            serde_json::json!({ "duration_minutes": duration_minutes }),
        ));
    }

    let weekday = query.date.weekday().num_days_from_sunday() as i16;

    let ranges = state
        .working_hours
        .for_weekday(tenant, query.staff_id, weekday)
        .await?;

    let busy = busy_intervals(state.db.as_ref(), query.staff_id, day_bounds(query.date)).await?;

    let slots = generate_slots(query.date, &ranges, &busy, duration_minutes, step_minutes);

    Ok(Json(AvailabilityResponse {
        staff_id: query.staff_id,
        date: query.date,
        duration_minutes,
        step_minutes,
        slots,
    }))
}

/// Parses the comma-separated service id list; `None` when absent or empty.
fn parse_service_ids(raw: Option<&str>) -> Result<Option<Vec<Uuid>>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut ids = Vec::new();
    for part in trimmed.split(',') {
        let id = Uuid::parse_str(part.trim()).map_err(|_| {
            crate::error::validation_error(
                "service_ids must be a comma-separated list of UUIDs",
                serde_json::json!({ "service_ids": raw }),
            )
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Ok(Some(ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_service_ids_absent_or_blank_is_none() {
        assert!(parse_service_ids(None).unwrap().is_none());
        assert!(parse_service_ids(Some("  ")).unwrap().is_none());
    }

    #[test]
    fn parse_service_ids_splits_trims_and_dedupes() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!(" {a} , {b},{a}");

        let parsed = parse_service_ids(Some(&raw)).unwrap().unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn parse_service_ids_rejects_garbage() {
        assert!(parse_service_ids(Some("not-a-uuid")).is_err());
    }
}
