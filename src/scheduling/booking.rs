//! Booking engine.
//!
//! Owns every write to the appointments table. Each commit path runs the
//! same shape: validate on the pool, then acquire the per-staff lock, then
//! re-check conflicts inside a transaction before touching rows. The in-lock
//! re-check is authoritative; everything before it is advisory and may race.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::auth::{AuthContext, Capability, TenantId};
use crate::error::BookingError;
use crate::models::appointment::{self, Entity as Appointment, STATUS_SCHEDULED};
use crate::models::service;
use crate::repositories::{
    ServiceRepository, StaffRepository, TimeOffRepository, WorkingHoursRepository,
    has_scheduled_conflict, insert_snapshots, replace_snapshots,
};
use crate::scheduling::locks::StaffLockRegistry;
use crate::scheduling::slots::fits_working_hours;
use crate::scheduling::state::{AppointmentStatus, CanceledBy, ensure_transition};

/// A validated booking attempt.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub service_ids: Vec<Uuid>,
}

/// Serializes and commits appointment writes.
#[derive(Debug, Clone)]
pub struct BookingEngine {
    db: Arc<DatabaseConnection>,
    staff: StaffRepository,
    services: ServiceRepository,
    working_hours: WorkingHoursRepository,
    time_off: TimeOffRepository,
    locks: Arc<StaffLockRegistry>,
    lock_timeout: Duration,
}

/// The resolved shape of a booking attempt after validation.
struct ValidatedBooking {
    services: Vec<service::Model>,
    end_at: DateTime<Utc>,
    total_price: Decimal,
}

impl BookingEngine {
    pub fn new(db: Arc<DatabaseConnection>, lock_timeout: Duration) -> Self {
        Self {
            staff: StaffRepository::new(Arc::clone(&db)),
            services: ServiceRepository::new(Arc::clone(&db)),
            working_hours: WorkingHoursRepository::new(Arc::clone(&db)),
            time_off: TimeOffRepository::new(Arc::clone(&db)),
            locks: Arc::new(StaffLockRegistry::new()),
            lock_timeout,
            db,
        }
    }

    /// Books a new appointment for a client.
    pub async fn book(
        &self,
        tenant: TenantId,
        request: BookingRequest,
    ) -> Result<appointment::Model, BookingError> {
        let service_ids = dedupe(&request.service_ids);
        let validated = self
            .validate(tenant, request.staff_id, request.start_at, &service_ids)
            .await?;

        let _guard = self
            .locks
            .acquire(request.staff_id, self.lock_timeout)
            .await?;

        let txn = self.db.begin().await.map_err(BookingError::Database)?;

        if has_scheduled_conflict(
            &txn,
            request.staff_id,
            request.start_at,
            validated.end_at,
            None,
        )
        .await?
        {
            metrics::counter!("booking_conflicts_total").increment(1);
            return Err(BookingError::Conflict);
        }

        let now = Utc::now().fixed_offset();
        let model = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.0),
            client_id: Set(request.client_id),
            staff_id: Set(request.staff_id),
            start_at: Set(request.start_at.fixed_offset()),
            end_at: Set(validated.end_at.fixed_offset()),
            status: Set(STATUS_SCHEDULED.to_string()),
            total_price: Set(validated.total_price),
            cancel_reason: Set(None),
            canceled_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let appointment = model.insert(&txn).await?;
        insert_snapshots(&txn, appointment.id, &validated.services).await?;

        txn.commit().await.map_err(BookingError::Database)?;

        metrics::counter!("bookings_committed_total").increment(1);
        tracing::info!(
            appointment_id = %appointment.id,
            staff_id = %appointment.staff_id,
            start_at = %appointment.start_at,
            "Appointment booked"
        );

        Ok(appointment)
    }

    /// Moves a scheduled appointment to a new start time and service set.
    /// Only the owning staff member or an admin may reschedule.
    pub async fn reschedule(
        &self,
        tenant: TenantId,
        actor: &AuthContext,
        appointment_id: Uuid,
        start_at: DateTime<Utc>,
        service_ids: &[Uuid],
    ) -> Result<appointment::Model, BookingError> {
        let existing = self.find_in_tenant(tenant, appointment_id).await?;

        if !actor.may_act_for_staff(existing.staff_id) {
            return Err(BookingError::Forbidden);
        }

        if AppointmentStatus::parse(&existing.status) != Some(AppointmentStatus::Scheduled) {
            return Err(BookingError::State(
                "Only scheduled appointments can be rescheduled".to_string(),
            ));
        }

        let service_ids = dedupe(service_ids);
        let validated = self
            .validate(tenant, existing.staff_id, start_at, &service_ids)
            .await?;

        let _guard = self
            .locks
            .acquire(existing.staff_id, self.lock_timeout)
            .await?;

        let txn = self.db.begin().await.map_err(BookingError::Database)?;

        if has_scheduled_conflict(
            &txn,
            existing.staff_id,
            start_at,
            validated.end_at,
            Some(existing.id),
        )
        .await?
        {
            metrics::counter!("booking_conflicts_total").increment(1);
            return Err(BookingError::Conflict);
        }

        let mut model: appointment::ActiveModel = existing.into();
        model.start_at = Set(start_at.fixed_offset());
        model.end_at = Set(validated.end_at.fixed_offset());
        model.total_price = Set(validated.total_price);
        model.updated_at = Set(Utc::now().fixed_offset());

        let appointment = model.update(&txn).await?;
        replace_snapshots(&txn, appointment.id, &validated.services).await?;

        txn.commit().await.map_err(BookingError::Database)?;

        tracing::info!(
            appointment_id = %appointment.id,
            start_at = %appointment.start_at,
            "Appointment rescheduled"
        );

        Ok(appointment)
    }

    /// Cancels a scheduled appointment, recording the reason and origin.
    ///
    /// Clients may cancel only their own appointments; staff their own
    /// calendar; admins any appointment in the tenant.
    pub async fn cancel(
        &self,
        tenant: TenantId,
        actor: &AuthContext,
        appointment_id: Uuid,
        reason: Option<String>,
        canceled_by: CanceledBy,
    ) -> Result<appointment::Model, BookingError> {
        let existing = self.find_in_tenant(tenant, appointment_id).await?;

        let allowed = match actor.capability {
            Capability::Client => existing.client_id == actor.user_id,
            Capability::Staff | Capability::Admin => actor.may_act_for_staff(existing.staff_id),
        };
        if !allowed {
            return Err(BookingError::Forbidden);
        }

        ensure_transition(&existing.status, AppointmentStatus::Canceled)?;

        let updated = Appointment::update_many()
            .col_expr(
                appointment::Column::Status,
                Expr::value(AppointmentStatus::Canceled.as_str()),
            )
            .col_expr(appointment::Column::CancelReason, Expr::value(reason))
            .col_expr(
                appointment::Column::CanceledBy,
                Expr::value(canceled_by.as_str()),
            )
            .col_expr(
                appointment::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(appointment::Column::Id.eq(existing.id))
            .filter(appointment::Column::Status.eq(STATUS_SCHEDULED))
            .exec(self.db.as_ref())
            .await?;

        // A concurrent transition can win between the read and the guarded
        // update; zero affected rows means the appointment already left
        // `scheduled`.
        if updated.rows_affected == 0 {
            return Err(BookingError::State(
                "Appointment is no longer scheduled".to_string(),
            ));
        }

        metrics::counter!("bookings_canceled_total").increment(1);
        tracing::info!(appointment_id = %existing.id, canceled_by = canceled_by.as_str(), "Appointment canceled");

        self.find_in_tenant(tenant, appointment_id).await
    }

    /// Marks a scheduled appointment `done` or `no_show`.
    pub async fn update_status(
        &self,
        tenant: TenantId,
        actor: &AuthContext,
        appointment_id: Uuid,
        target: AppointmentStatus,
    ) -> Result<appointment::Model, BookingError> {
        if !matches!(target, AppointmentStatus::Done | AppointmentStatus::NoShow) {
            return Err(BookingError::Validation(
                "status must be done or no_show".to_string(),
            ));
        }

        let existing = self.find_in_tenant(tenant, appointment_id).await?;

        if !actor.may_act_for_staff(existing.staff_id) {
            return Err(BookingError::Forbidden);
        }

        ensure_transition(&existing.status, target)?;

        let updated = Appointment::update_many()
            .col_expr(appointment::Column::Status, Expr::value(target.as_str()))
            .col_expr(
                appointment::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(appointment::Column::Id.eq(existing.id))
            .filter(appointment::Column::Status.eq(STATUS_SCHEDULED))
            .exec(self.db.as_ref())
            .await?;

        if updated.rows_affected == 0 {
            return Err(BookingError::State(
                "Appointment is no longer scheduled".to_string(),
            ));
        }

        tracing::info!(appointment_id = %existing.id, status = target.as_str(), "Appointment status updated");

        self.find_in_tenant(tenant, appointment_id).await
    }

    /// The shared pre-lock validation pipeline for book and reschedule.
    async fn validate(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        start_at: DateTime<Utc>,
        service_ids: &[Uuid],
    ) -> Result<ValidatedBooking, BookingError> {
        if service_ids.is_empty() {
            return Err(BookingError::Validation(
                "At least one service is required".to_string(),
            ));
        }

        self.staff.bookable(tenant, staff_id).await?;

        let services = self.services.resolve_active(tenant, service_ids).await?;
        self.services
            .staff_provides_all(tenant, staff_id, service_ids)
            .await?;

        if start_at <= Utc::now() {
            return Err(BookingError::Validation(
                "Start time must be in the future".to_string(),
            ));
        }

        let duration_minutes: i64 = services.iter().map(|s| i64::from(s.duration_minutes)).sum();
        let end_at = start_at + chrono::Duration::minutes(duration_minutes);
        let total_price: Decimal = services.iter().map(|s| s.price).sum();

        let weekday = start_at.weekday().num_days_from_sunday() as i16;
        let ranges = self
            .working_hours
            .for_weekday(tenant, staff_id, weekday)
            .await?;

        if !fits_working_hours(&ranges, start_at, end_at) {
            return Err(BookingError::Unavailable("Outside working hours".to_string()));
        }

        if self
            .time_off
            .any_overlapping(tenant, staff_id, start_at, end_at)
            .await?
        {
            return Err(BookingError::Unavailable("Staff is unavailable".to_string()));
        }

        Ok(ValidatedBooking {
            services,
            end_at,
            total_price,
        })
    }

    async fn find_in_tenant(
        &self,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<appointment::Model, BookingError> {
        let row = Appointment::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(BookingError::NotFound("Appointment"))?;

        if row.tenant_id != tenant.0 {
            return Err(BookingError::Forbidden);
        }

        Ok(row)
    }
}

/// Collapses duplicate service ids, preserving first-seen order.
fn dedupe(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_preserves_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedupe(&[a, b, a, b, a]), vec![a, b]);
    }

    #[test]
    fn dedupe_of_empty_input_is_empty() {
        assert!(dedupe(&[]).is_empty());
    }
}
