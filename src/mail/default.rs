//! Default notification implementation
//!
//! Emits each notice as a structured log record. A real deployment swaps in
//! a provider-backed mailer behind the same trait.

use async_trait::async_trait;

use crate::mail::{AppointmentNotice, Mailer};

/// Log-backed mailer used when no delivery provider is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn notify(&self, notice: AppointmentNotice) {
        tracing::info!(
            event = notice.event.as_str(),
            appointment_id = %notice.appointment_id,
            tenant_id = %notice.tenant_id,
            client_id = %notice.client_id,
            staff_id = %notice.staff_id,
            start_at = %notice.start_at,
            status = %notice.status,
            "Appointment notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn notify_completes_without_error() {
        let mailer = LogMailer::new();
        mailer
            .notify(AppointmentNotice {
                event: crate::mail::AppointmentEvent::Booked,
                appointment_id: Uuid::new_v4(),
                tenant_id: Uuid::new_v4(),
                client_id: Uuid::new_v4(),
                staff_id: Uuid::new_v4(),
                start_at: Utc::now(),
                status: "scheduled".to_string(),
            })
            .await;
    }
}
