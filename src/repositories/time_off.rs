//! Time-off catalog.
//!
//! Constrained CRUD over one-off closed intervals per staff member. Writes
//! enforce `start_at < end_at`; list reads support a from/to window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::auth::TenantId;
use crate::error::BookingError;
use crate::models::time_off::{self, Entity as TimeOff};

/// Repository for time-off operations
#[derive(Debug, Clone)]
pub struct TimeOffRepository {
    db: Arc<DatabaseConnection>,
}

impl TimeOffRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists time-off rows for a staff member, newest first, optionally
    /// narrowed to intervals touching `[from, to]`.
    pub async fn list(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<time_off::Model>, BookingError> {
        let mut query = TimeOff::find()
            .filter(time_off::Column::TenantId.eq(tenant.0))
            .filter(time_off::Column::StaffId.eq(staff_id));

        if let Some(from) = from {
            query = query.filter(time_off::Column::EndAt.gte(from));
        }

        if let Some(to) = to {
            query = query.filter(time_off::Column::StartAt.lte(to));
        }

        let rows = query
            .order_by_desc(time_off::Column::StartAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows)
    }

    pub async fn create(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<time_off::Model, BookingError> {
        if start_at >= end_at {
            return Err(BookingError::Validation(
                "start_at must be before end_at".to_string(),
            ));
        }

        let model = time_off::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.0),
            staff_id: Set(staff_id),
            start_at: Set(start_at.fixed_offset()),
            end_at: Set(end_at.fixed_offset()),
            reason: Set(reason),
        };

        Ok(model.insert(self.db.as_ref()).await?)
    }

    pub async fn delete(&self, tenant: TenantId, id: Uuid) -> Result<(), BookingError> {
        let existing = self.find(tenant, id).await?;
        TimeOff::delete_by_id(existing.id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    /// Whether any time-off interval overlaps `[start_at, end_at)`.
    pub async fn any_overlapping(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        let overlapping = TimeOff::find()
            .filter(time_off::Column::TenantId.eq(tenant.0))
            .filter(time_off::Column::StaffId.eq(staff_id))
            .filter(time_off::Column::StartAt.lt(end_at))
            .filter(time_off::Column::EndAt.gt(start_at))
            .count(self.db.as_ref())
            .await?;

        Ok(overlapping > 0)
    }

    /// Fetches by id, rejecting rows that belong to another tenant.
    pub async fn find(&self, tenant: TenantId, id: Uuid) -> Result<time_off::Model, BookingError> {
        let row = TimeOff::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(BookingError::NotFound("Time off"))?;

        if row.tenant_id != tenant.0 {
            return Err(BookingError::Forbidden);
        }

        Ok(row)
    }
}
