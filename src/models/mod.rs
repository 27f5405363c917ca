//! # Data Models
//!
//! This module contains all the SeaORM entity models used throughout the
//! Bookings API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod appointment;
pub mod appointment_service;
pub mod service;
pub mod staff_service;
pub mod tenant;
pub mod time_off;
pub mod user;
pub mod working_hour;

pub use appointment::Entity as Appointment;
pub use appointment_service::Entity as AppointmentService;
pub use service::Entity as Service;
pub use staff_service::Entity as StaffService;
pub use tenant::Entity as Tenant;
pub use time_off::Entity as TimeOff;
pub use user::Entity as User;
pub use working_hour::Entity as WorkingHour;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "bookings".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
