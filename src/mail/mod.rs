//! Appointment notification module
//!
//! Provides a shared notification abstraction the HTTP handlers use to tell
//! clients and staff about booking lifecycle events. Delivery is
//! fire-and-forget; a failed or slow notification never fails the request
//! that triggered it.

pub mod default;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lifecycle events that produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentEvent {
    Booked,
    Rescheduled,
    Canceled,
    StatusChanged,
}

impl AppointmentEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentEvent::Booked => "booked",
            AppointmentEvent::Rescheduled => "rescheduled",
            AppointmentEvent::Canceled => "canceled",
            AppointmentEvent::StatusChanged => "status_changed",
        }
    }
}

/// The facts a notification carries about an appointment.
#[derive(Debug, Clone)]
pub struct AppointmentNotice {
    pub event: AppointmentEvent,
    pub appointment_id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub status: String,
}

/// Trait for notification delivery implementations
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a notice for an appointment lifecycle event.
    async fn notify(&self, notice: AppointmentNotice);
}

/// Spawns delivery in the background so the calling handler returns
/// immediately.
pub fn notify_detached(mailer: std::sync::Arc<dyn Mailer>, notice: AppointmentNotice) {
    tokio::spawn(async move {
        mailer.notify(notice).await;
    });
}
