//! Working hours catalog.
//!
//! Constrained CRUD over per-staff recurring open intervals. Writes enforce
//! `start_time < end_time` and reject ranges overlapping an existing row for
//! the same staff member and weekday; that check is independent of the
//! booking conflict check.

use std::sync::Arc;

use chrono::NaiveTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::auth::TenantId;
use crate::error::BookingError;
use crate::models::working_hour::{self, Entity as WorkingHour};

/// Repository for working-hour range operations
#[derive(Debug, Clone)]
pub struct WorkingHoursRepository {
    db: Arc<DatabaseConnection>,
}

impl WorkingHoursRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists ranges for a staff member, optionally narrowed to one weekday,
    /// ordered by weekday then start time.
    pub async fn list(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        weekday: Option<i16>,
    ) -> Result<Vec<working_hour::Model>, BookingError> {
        let mut query = WorkingHour::find()
            .filter(working_hour::Column::TenantId.eq(tenant.0))
            .filter(working_hour::Column::StaffId.eq(staff_id));

        if let Some(weekday) = weekday {
            query = query.filter(working_hour::Column::Weekday.eq(weekday));
        }

        let rows = query
            .order_by_asc(working_hour::Column::Weekday)
            .order_by_asc(working_hour::Column::StartTime)
            .all(self.db.as_ref())
            .await?;

        Ok(rows)
    }

    /// Ranges declared for one weekday, in start-time order. This is the
    /// read the slot generator and the booking fit check both build on.
    pub async fn for_weekday(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        weekday: i16,
    ) -> Result<Vec<working_hour::Model>, BookingError> {
        self.list(tenant, staff_id, Some(weekday)).await
    }

    /// Creates a range after validating ordering and overlap constraints.
    pub async fn create(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        weekday: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<working_hour::Model, BookingError> {
        validate_range(weekday, start_time, end_time)?;

        if self
            .overlaps_existing(tenant, staff_id, weekday, start_time, end_time, None)
            .await?
        {
            return Err(BookingError::Conflict);
        }

        let model = working_hour::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.0),
            staff_id: Set(staff_id),
            weekday: Set(weekday),
            start_time: Set(start_time),
            end_time: Set(end_time),
        };

        Ok(model.insert(self.db.as_ref()).await?)
    }

    /// Updates a range; the overlap check excludes the row being edited.
    pub async fn update(
        &self,
        tenant: TenantId,
        id: Uuid,
        weekday: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<working_hour::Model, BookingError> {
        validate_range(weekday, start_time, end_time)?;

        let existing = self.find(tenant, id).await?;

        if self
            .overlaps_existing(
                tenant,
                existing.staff_id,
                weekday,
                start_time,
                end_time,
                Some(id),
            )
            .await?
        {
            return Err(BookingError::Conflict);
        }

        let mut model: working_hour::ActiveModel = existing.into();
        model.weekday = Set(weekday);
        model.start_time = Set(start_time);
        model.end_time = Set(end_time);

        Ok(model.update(self.db.as_ref()).await?)
    }

    pub async fn delete(&self, tenant: TenantId, id: Uuid) -> Result<(), BookingError> {
        let existing = self.find(tenant, id).await?;
        WorkingHour::delete_by_id(existing.id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    /// Fetches by id, rejecting rows that belong to another tenant.
    pub async fn find(
        &self,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<working_hour::Model, BookingError> {
        let row = WorkingHour::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(BookingError::NotFound("Working hour range"))?;

        if row.tenant_id != tenant.0 {
            return Err(BookingError::Forbidden);
        }

        Ok(row)
    }

    async fn overlaps_existing(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        weekday: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
        ignore_id: Option<Uuid>,
    ) -> Result<bool, BookingError> {
        let mut query = WorkingHour::find()
            .filter(working_hour::Column::TenantId.eq(tenant.0))
            .filter(working_hour::Column::StaffId.eq(staff_id))
            .filter(working_hour::Column::Weekday.eq(weekday))
            .filter(working_hour::Column::StartTime.lt(end_time))
            .filter(working_hour::Column::EndTime.gt(start_time));

        if let Some(ignore_id) = ignore_id {
            query = query.filter(working_hour::Column::Id.ne(ignore_id));
        }

        Ok(query.count(self.db.as_ref()).await? > 0)
    }
}

fn validate_range(
    weekday: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), BookingError> {
    if !(0..=6).contains(&weekday) {
        return Err(BookingError::Validation(
            "weekday must be between 0 and 6".to_string(),
        ));
    }

    if start_time >= end_time {
        return Err(BookingError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }

    Ok(())
}
