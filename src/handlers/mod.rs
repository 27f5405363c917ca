//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Bookings API.

use crate::models::ServiceInfo;
use axum::response::Json;

pub mod appointments;
pub mod availability;
pub mod staff_appointments;
pub mod time_off;
pub mod working_hours;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}
