//! Appointment data access.
//!
//! Pool-scoped reads for listings and lookups, plus the transaction-scoped
//! conflict check and snapshot writes the booking engine runs inside its
//! critical section. The conflict predicate is the single source of truth
//! for "these two appointments collide".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::auth::TenantId;
use crate::error::BookingError;
use crate::models::appointment::{self, Entity as Appointment, STATUS_SCHEDULED};
use crate::models::appointment_service::{self, Entity as AppointmentService};
use crate::models::service;

/// Repository for appointment reads outside the booking transaction
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    db: Arc<DatabaseConnection>,
}

impl AppointmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetches by id, rejecting rows that belong to another tenant.
    pub async fn find(
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

    /// A client's own appointments, newest first.
    pub async fn list_for_client(
        &self,
        tenant: TenantId,
        client_id: Uuid,
    ) -> Result<Vec<appointment::Model>, BookingError> {
        let rows = Appointment::find()
            .filter(appointment::Column::TenantId.eq(tenant.0))
            .filter(appointment::Column::ClientId.eq(client_id))
            .order_by_desc(appointment::Column::StartAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows)
    }

    /// Calendar listing: appointments starting within `[from, to)`,
    /// optionally narrowed to one staff member, in start order.
    pub async fn list_starting_between(
        &self,
        tenant: TenantId,
        staff_id: Option<Uuid>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<appointment::Model>, BookingError> {
        let mut query = Appointment::find()
            .filter(appointment::Column::TenantId.eq(tenant.0))
            .filter(appointment::Column::StartAt.gte(from))
            .filter(appointment::Column::StartAt.lt(to));

        if let Some(staff_id) = staff_id {
            query = query.filter(appointment::Column::StaffId.eq(staff_id));
        }

        let rows = query
            .order_by_asc(appointment::Column::StartAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows)
    }

    /// Snapshot rows for one appointment.
    pub async fn snapshots_for(
        &self,
        appointment_id: Uuid,
    ) -> Result<Vec<appointment_service::Model>, BookingError> {
        let rows = AppointmentService::find()
            .filter(appointment_service::Column::AppointmentId.eq(appointment_id))
            .all(self.db.as_ref())
            .await?;

        Ok(rows)
    }
}

/// Whether a `scheduled` appointment for `staff_id` overlaps
/// `[start_at, end_at)`, excluding `exclude_id` when rescheduling.
///
/// Runs on any connection so the booking engine can issue it inside its
/// transaction as the authoritative in-lock re-check.
pub async fn has_scheduled_conflict<C: ConnectionTrait>(
    conn: &C,
    staff_id: Uuid,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    exclude_id: Option<Uuid>,
) -> Result<bool, BookingError> {
    let mut query = Appointment::find()
        .filter(appointment::Column::StaffId.eq(staff_id))
        .filter(appointment::Column::Status.eq(STATUS_SCHEDULED))
        .filter(appointment::Column::StartAt.lt(end_at))
        .filter(appointment::Column::EndAt.gt(start_at));

    if let Some(exclude_id) = exclude_id {
        query = query.filter(appointment::Column::Id.ne(exclude_id));
    }

    Ok(query.count(conn).await? > 0)
}

/// Inserts one snapshot row per booked service, freezing price and duration.
pub async fn insert_snapshots<C: ConnectionTrait>(
    conn: &C,
    appointment_id: Uuid,
    services: &[service::Model],
) -> Result<(), BookingError> {
    let rows: Vec<appointment_service::ActiveModel> = services
        .iter()
        .map(|svc| appointment_service::ActiveModel {
            id: Set(Uuid::new_v4()),
            appointment_id: Set(appointment_id),
            service_id: Set(svc.id),
            price_snapshot: Set(svc.price),
            duration_snapshot: Set(svc.duration_minutes),
        })
        .collect();

    AppointmentService::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Replaces an appointment's snapshot rows; used by reschedule.
pub async fn replace_snapshots<C: ConnectionTrait>(
    conn: &C,
    appointment_id: Uuid,
    services: &[service::Model],
) -> Result<(), BookingError> {
    AppointmentService::delete_many()
        .filter(appointment_service::Column::AppointmentId.eq(appointment_id))
        .exec(conn)
        .await?;

    insert_snapshots(conn, appointment_id, services).await
}
