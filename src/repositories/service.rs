//! Service lookups.
//!
//! Resolves requested services for booking and availability: all must exist,
//! be active, belong to the caller's tenant, and be assigned to the target
//! staff member.

use std::sync::Arc;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::TenantId;
use crate::error::BookingError;
use crate::models::service::{self, Entity as Service};
use crate::models::staff_service::{self, Entity as StaffService};

/// Repository for service lookups
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    db: Arc<DatabaseConnection>,
}

impl ServiceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolves the requested service ids to active tenant-owned services.
    /// Any id that is missing, inactive, or cross-tenant makes the whole set
    /// invalid; duplicates in the input are collapsed by the caller.
    pub async fn resolve_active(
        &self,
        tenant: TenantId,
        service_ids: &[Uuid],
    ) -> Result<Vec<service::Model>, BookingError> {
        let services = Service::find()
            .filter(service::Column::TenantId.eq(tenant.0))
            .filter(service::Column::Id.is_in(service_ids.iter().copied()))
            .filter(service::Column::Active.eq(true))
            .all(self.db.as_ref())
            .await?;

        if services.len() != service_ids.len() {
            return Err(BookingError::Unavailable("Invalid services".to_string()));
        }

        Ok(services)
    }

    /// Current display name of a service; `None` when the row no longer
    /// exists. Snapshot rows keep appointment views working regardless.
    pub async fn find_name(
        &self,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<String>, BookingError> {
        let service = Service::find_by_id(id)
            .filter(service::Column::TenantId.eq(tenant.0))
            .one(self.db.as_ref())
            .await?;

        Ok(service.map(|s| s.name))
    }

    /// Verifies the staff member is assigned every requested service.
    pub async fn staff_provides_all(
        &self,
        tenant: TenantId,
        staff_id: Uuid,
        service_ids: &[Uuid],
    ) -> Result<(), BookingError> {
        let assigned = StaffService::find()
            .filter(staff_service::Column::TenantId.eq(tenant.0))
            .filter(staff_service::Column::StaffId.eq(staff_id))
            .filter(staff_service::Column::ServiceId.is_in(service_ids.iter().copied()))
            .count(self.db.as_ref())
            .await?;

        if assigned as usize != service_ids.len() {
            return Err(BookingError::Unavailable(
                "Staff does not provide selected services".to_string(),
            ));
        }

        Ok(())
    }
}
