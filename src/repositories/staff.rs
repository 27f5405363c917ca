//! Staff lookups.
//!
//! Resolves bookable staff members within a tenant: a principal with the
//! staff or admin role whose calendar currently accepts bookings.

use std::sync::Arc;

use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::TenantId;
use crate::error::BookingError;
use crate::models::user::{self, Entity as User, ROLE_ADMIN, ROLE_STAFF};

/// Repository for staff principal lookups
#[derive(Debug, Clone)]
pub struct StaffRepository {
    db: Arc<DatabaseConnection>,
}

impl StaffRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds a staff member who can currently be booked. Returns
    /// `Unavailable` for unknown, non-staff, inactive, or cross-tenant ids,
    /// matching the availability surface's error contract.
    pub async fn bookable(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
    ) -> Result<user::Model, BookingError> {
        let staff = User::find_by_id(staff_id)
            .filter(staff_role_condition())
            .filter(user::Column::BookableActive.eq(true))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| BookingError::Unavailable("Staff not available".to_string()))?;

        if staff.tenant_id != tenant.0 {
            return Err(BookingError::Forbidden);
        }

        Ok(staff)
    }

    /// Whether `staff_id` names a staff-side principal within the tenant.
    pub async fn is_staff_in_tenant(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
    ) -> Result<bool, BookingError> {
        let found = User::find_by_id(staff_id)
            .filter(user::Column::TenantId.eq(tenant.0))
            .filter(staff_role_condition())
            .one(self.db.as_ref())
            .await?;

        Ok(found.is_some())
    }

    /// Fetches any principal by id within the tenant.
    pub async fn find_user(
        &self,
        tenant: TenantId,
        user_id: Uuid,
    ) -> Result<user::Model, BookingError> {
        let user = User::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(BookingError::NotFound("User"))?;

        if user.tenant_id != tenant.0 {
            return Err(BookingError::Forbidden);
        }

        Ok(user)
    }
}

fn staff_role_condition() -> Condition {
    Condition::any()
        .add(user::Column::Role.eq(ROLE_STAFF))
        .add(user::Column::Role.eq(ROLE_ADMIN))
}
