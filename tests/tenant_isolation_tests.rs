//! Tests ensuring tenant isolation across repositories and the engine.

use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;

use bookings::auth::{Capability, TenantId};
use bookings::error::BookingError;
use bookings::repositories::{AppointmentRepository, StaffRepository, WorkingHoursRepository};
use bookings::scheduling::{BookingRequest, CanceledBy};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::*;

#[tokio::test]
async fn appointment_lookups_reject_cross_tenant_access() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let client = create_client(&db, tenant_a).await?;
    let staff = create_staff(&db, tenant_a).await?;
    let svc = create_service(&db, tenant_a, 30, Decimal::new(4500, 2), true).await?;
    assign_service(&db, tenant_a, staff, svc).await?;
    add_all_week_hours(&db, tenant_a, staff).await?;

    let engine = test_engine(&db);
    let booked = engine
        .book(
            TenantId(tenant_a),
            BookingRequest {
                client_id: client,
                staff_id: staff,
                start_at: future_start(2, 10, 0),
                service_ids: vec![svc],
            },
        )
        .await?;

    // A lookup with the wrong tenant is rejected, not silently filtered.
    let repo = AppointmentRepository::new(Arc::clone(&db));
    let cross = repo.find(TenantId(tenant_b), booked.id).await;
    assert!(matches!(cross, Err(BookingError::Forbidden)));

    // The same boundary holds for engine writes.
    let intruder = auth_ctx(tenant_b, create_admin(&db, tenant_b).await?, Capability::Admin);
    let denied = engine
        .cancel(
            TenantId(tenant_b),
            &intruder,
            booked.id,
            None,
            CanceledBy::Staff,
        )
        .await;
    assert!(matches!(denied, Err(BookingError::Forbidden)));

    Ok(())
}

#[tokio::test]
async fn staff_lookups_are_tenant_scoped() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let staff_a = create_staff(&db, tenant_a).await?;

    let repo = StaffRepository::new(Arc::clone(&db));

    let cross = repo.bookable(TenantId(tenant_b), staff_a).await;
    assert!(matches!(cross, Err(BookingError::Forbidden)));

    assert!(!repo.is_staff_in_tenant(TenantId(tenant_b), staff_a).await?);
    assert!(repo.is_staff_in_tenant(TenantId(tenant_a), staff_a).await?);

    Ok(())
}

#[tokio::test]
async fn client_listings_only_see_their_own_tenant_and_rows() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let tenant = create_test_tenant(&db).await?;
    let client_a = create_client(&db, tenant).await?;
    let client_b = create_client(&db, tenant).await?;
    let staff = create_staff(&db, tenant).await?;
    let svc = create_service(&db, tenant, 30, Decimal::new(4500, 2), true).await?;
    assign_service(&db, tenant, staff, svc).await?;
    add_all_week_hours(&db, tenant, staff).await?;

    let engine = test_engine(&db);
    engine
        .book(
            TenantId(tenant),
            BookingRequest {
                client_id: client_a,
                staff_id: staff,
                start_at: future_start(2, 10, 0),
                service_ids: vec![svc],
            },
        )
        .await?;

    let repo = AppointmentRepository::new(Arc::clone(&db));
    assert_eq!(repo.list_for_client(TenantId(tenant), client_a).await?.len(), 1);
    assert!(repo.list_for_client(TenantId(tenant), client_b).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn working_hours_catalog_rejects_cross_tenant_edits() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let staff = create_staff(&db, tenant_a).await?;
    let range = add_working_hours(&db, tenant_a, staff, 1, (9, 0), (17, 0)).await?;

    let repo = WorkingHoursRepository::new(Arc::clone(&db));

    let cross_find = repo.find(TenantId(tenant_b), range).await;
    assert!(matches!(cross_find, Err(BookingError::Forbidden)));

    let cross_delete = repo.delete(TenantId(tenant_b), range).await;
    assert!(matches!(cross_delete, Err(BookingError::Forbidden)));

    Ok(())
}
