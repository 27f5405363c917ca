//! # Repositories
//!
//! Tenant-scoped data access for the Bookings API. Every method takes the
//! caller's [`TenantId`](crate::auth::TenantId) explicitly; an id lookup that
//! lands in another tenant is rejected with `Forbidden` rather than silently
//! filtered away.

pub mod appointment;
pub mod service;
pub mod staff;
pub mod time_off;
pub mod working_hours;

pub use appointment::{
    AppointmentRepository, has_scheduled_conflict, insert_snapshots, replace_snapshots,
};
pub use service::ServiceRepository;
pub use staff::StaffRepository;
pub use time_off::TimeOffRepository;
pub use working_hours::WorkingHoursRepository;
